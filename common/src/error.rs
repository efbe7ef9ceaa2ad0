use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Input '{0}' is required")]
    MissingRequiredInput(String),
    /// Never raised by the lenient shape resolver; kept for a strict mode.
    #[error("shape mismatched for input '{name}': {shape:?} cannot hold {len} elements")]
    Shape {
        name: String,
        shape: Vec<usize>,
        len: usize,
    },
    #[error("{0}")]
    Transport(String),
}

impl Error {
    pub fn transport(message: impl ToString) -> Self {
        Self::Transport(message.to_string())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,
}
