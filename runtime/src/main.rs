mod cli;

use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tensorgate_api::{ClientConfig, TensorgateClient};
use tensorgate_common::{
    model::Model,
    tensor::{value::RawValue, InferenceRequest},
    Tensorgate,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, Mode, ValuesArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log)?)
        .with_writer(::std::io::stderr)
        .init();

    match cli.command {
        Command::Assemble { signature, values } => {
            let model = load_signature(&signature)?;
            let inputs = load_values(&values)?;

            let request = InferenceRequest::assemble(&model.inputs, &inputs)?;
            println!("{}", request.to_json()?);
            Ok(())
        }
        Command::Infer {
            signature,
            values,
            model,
            version,
            url,
            timeout,
            skip_ready_check,
        } => {
            let mut config = ClientConfig::try_infer()?;
            if let Some(url) = url {
                config.url = url.trim_end_matches('/').to_string();
            }
            if let Some(timeout) = timeout {
                config.timeout = Duration::from_secs(timeout);
            }
            let client = TensorgateClient::new(config);

            if !skip_ready_check && !client.is_ready().await {
                bail!("Server must be ready to perform inference");
            }

            let mut signature = match (signature, model.as_deref()) {
                (Some(path), _) => load_signature(&path)?,
                (None, Some(name)) => client.metadata(name, version.as_deref()).await?,
                (None, None) => bail!("either --signature or --model is required"),
            };
            if let Some(name) = model {
                signature.name = name;
            }
            let inputs = load_values(&values)?;

            info!(model = %signature.name, version = ?version, "running inference");
            let response = client.call(&signature, version.as_deref(), &inputs).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Command::Template { signature } => {
            let model = load_signature(&signature)?;
            for shape in &model.inputs {
                let value = RawValue::guided(shape);
                println!("{}: {}", &shape.name, serde_json::to_string(&value)?);
            }
            Ok(())
        }
    }
}

fn load_signature(path: &Path) -> Result<Model> {
    let file = fs::read_to_string(path)
        .with_context(|| format!("failed to read the signature: {}", path.display()))?;
    let model: Model = serde_json::from_str(&file)
        .with_context(|| format!("failed to parse the signature: {}", path.display()))?;
    if model.inputs.is_empty() {
        bail!("This model has no inputs defined.");
    }
    Ok(model)
}

fn load_values(args: &ValuesArgs) -> Result<HashMap<String, RawValue>> {
    let path = &args.values;
    let file = fs::read_to_string(path)
        .with_context(|| format!("failed to read the values: {}", path.display()))?;
    let values: HashMap<String, RawValue> = serde_json::from_str(&file)
        .with_context(|| format!("failed to parse the values: {}", path.display()))?;

    Ok(match args.mode {
        Mode::Guided => values,
        Mode::Text => values
            .into_iter()
            .map(|(name, value)| into_text(value).map(|value| (name, value)))
            .collect::<serde_json::Result<_>>()?,
    })
}

/// Free-text mode sees every value as the text the user would have typed.
fn into_text(value: RawValue) -> serde_json::Result<RawValue> {
    match value {
        RawValue::Text(text) | RawValue::Scalar(text) => Ok(RawValue::Text(text)),
        structured => serde_json::to_string(&structured).map(RawValue::Text),
    }
}
