use thiserror::Error;

use crate::model::{Field, PlayerKey};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("player {0} not found")]
    NotFound(PlayerKey),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("database path error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("{message}")]
    Validation { field: Field, message: String },
    #[error("Please select a player to {action}.")]
    NoSelection { action: &'static str },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RosterError {
    pub(crate) fn validation(field: Field, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// The input field that failed validation, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound(_)))
    }
}

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("malformed player id {0:?}")]
    MalformedId(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("http {0}")]
    Status(reqwest::StatusCode),
    #[error("photo body of {0} bytes is too large")]
    TooLarge(u64),
    #[error("undecodable image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("{0}")]
    Other(String),
}
