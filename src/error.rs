//! Error types for mysqler operations

use thiserror::Error;

/// Errors that can occur while compiling or running statements
#[derive(Debug, Error)]
pub enum MysqlerError {
    /// A DELETE whose WHERE clause compiled to nothing was refused before
    /// reaching the database.
    #[error("DELETE_ALL_NOT_ALLOWED")]
    DeleteAllNotAllowed,

    #[error(transparent)]
    Sql(#[from] sqlx::Error),

    /// Failure reported by an actor that does not speak sqlx.
    #[error("{code}: {message}")]
    Actor { code: String, message: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MysqlerError {
    pub fn actor(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Actor {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Server or actor error code, when the failure carries one
    ///
    /// For MySQL server errors this is the SQLSTATE reported by the driver.
    pub fn code(&self) -> Option<String> {
        match self {
            Self::DeleteAllNotAllowed => Some("DELETE_ALL_NOT_ALLOWED".to_string()),
            Self::Sql(sqlx::Error::Database(e)) => e.code().map(|c| c.into_owned()),
            Self::Actor { code, .. } => Some(code.clone()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MysqlerError>;
