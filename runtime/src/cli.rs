use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "tensorgate",
    version,
    about = "Turn hand-entered values into tensor inference requests"
)]
pub struct Cli {
    /// Log level (RUST_LOG syntax)
    #[arg(long, global = true, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the request payload without submitting it
    Assemble {
        /// Model metadata JSON with the declared inputs
        #[arg(long)]
        signature: PathBuf,

        #[command(flatten)]
        values: ValuesArgs,
    },
    /// Assemble a request and submit it to the inference server
    Infer {
        /// Model metadata JSON; fetched from the server when omitted
        #[arg(long)]
        signature: Option<PathBuf>,

        #[command(flatten)]
        values: ValuesArgs,

        /// Model name (defaults to the name in the signature)
        #[arg(long)]
        model: Option<String>,

        /// Model version
        #[arg(long)]
        version: Option<String>,

        /// Base HTTP url of the server (overrides TENSORGATE_URL)
        #[arg(long)]
        url: Option<String>,

        /// Request timeout in seconds (overrides TENSORGATE_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<u64>,

        /// Submit even if the server does not report ready
        #[arg(long)]
        skip_ready_check: bool,
    },
    /// Print the initial guided-form value of every input
    Template {
        /// Model metadata JSON with the declared inputs
        #[arg(long)]
        signature: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ValuesArgs {
    /// JSON object mapping each input name to its raw value
    #[arg(long)]
    pub values: PathBuf,

    /// How the raw values were entered
    #[arg(long, value_enum, default_value_t = Mode::Guided)]
    pub mode: Mode,
}

/// Which set of raw values the caller is submitting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Guided,
    Text,
}
