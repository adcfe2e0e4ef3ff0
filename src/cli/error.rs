use miette::Diagnostic;
use thiserror::Error;

use crate::db::DbError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Db(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(
        code(forms::cli::io),
        help("Pass --db or set FORMS_QUESTION_DB to a writable location")
    )]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(forms::cli::output))]
    Output { message: String },

    #[error("Invalid argument: {message}")]
    #[diagnostic(code(forms::cli::invalid_argument))]
    InvalidArgument { message: String },
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
