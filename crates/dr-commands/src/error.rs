//! Command-pipeline error taxonomy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("command '{0}' is not registered")]
    UnknownCommand(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    #[error(transparent)]
    Research(#[from] dr_research::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
