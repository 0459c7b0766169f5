// ================================================================
// File: closetiq-common/src/error.rs
// ================================================================

use thiserror::Error;

use crate::models::Occasion;

#[derive(Debug, Error)]
pub enum Error {
    /// A required setting (the AI credential) is missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The AI service answered with a non-success status.
    #[error("{0}")]
    Service(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The AI text could not be parsed as JSON once fences were stripped.
    #[error("Invalid response format from AI")]
    Format(String),

    /// The AI picked ids that are missing from the wardrobe or sit in the wrong slot.
    #[error("{0}")]
    Selection(String),

    /// The AI refused to pick an outfit and said why.
    #[error("{0}")]
    Declined(String),

    #[error("You need at least one top, bottom, and footwear for this occasion.")]
    InsufficientItems(Occasion),

    /// Wraps a failure from the network/parsing boundary of the AI path.
    #[error("AI service error: {0}")]
    AiService(Box<Error>),

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for failures that come from talking to the AI service or reading its
    /// reply, as opposed to semantic checks on what it picked.
    pub fn is_ai_boundary(&self) -> bool {
        matches!(self, Error::Service(_) | Error::Http(_) | Error::Format(_))
    }

    /// Wraps boundary failures in [`Error::AiService`]; everything else passes through.
    pub fn into_ai_service(self) -> Self {
        if self.is_ai_boundary() {
            Error::AiService(Box::new(self))
        } else {
            self
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}
