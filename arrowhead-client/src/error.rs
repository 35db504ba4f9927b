//! Error types for the Arrowhead client.

use std::path::PathBuf;
use thiserror::Error;
use crate::connector::Operation;

/// Errors that can occur when talking to the Arrowhead Core.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Core answered with a non-success status.
    #[error("{message}")]
    Core {
        /// HTTP status code.
        status: u16,
        /// Operation that was attempted.
        operation: Operation,
        /// Human readable diagnostic.
        message: String,
    },

    /// Failed to encode a message as JSON.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A credential file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PKCS#12 bundle or CA certificate could not be loaded.
    #[error("Invalid certificate: {0}")]
    Certificate(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response did not have the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// HTTP status returned by the Core, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Core { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
