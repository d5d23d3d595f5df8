//! Crate-wide error kinds: a small `thiserror` enum in the library, with
//! usage errors reserved for the CLI boundary since only the binary parses
//! argv.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input in {section}: {message}")]
    InvalidInput { section: String, message: String },

    #[error("no plan exists for this task")]
    Unsolvable,

    #[error("search budget of {0:?} exceeded")]
    BudgetExceeded(std::time::Duration),

    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(section: impl Into<String>, message: impl Into<String>) -> Error {
        Error::InvalidInput {
            section: section.into(),
            message: message.into(),
        }
    }
}
