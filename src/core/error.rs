// src/core/error.rs

use std::time::Duration;
use thiserror::Error;

/// Rejection of the input URL. This is the only error `analyze` surfaces;
/// every other failure ends up as a finding inside the report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed URL '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("Unsupported scheme '{0}': only http and https are accepted")]
    UnsupportedScheme(String),

    #[error("URL '{0}' has no host")]
    MissingHost(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Server responded with non-200 status {0}")]
    NonOk(u16),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("Could not resolve {host}: {reason}")]
    Resolve { host: String, reason: String },

    #[error("TCP connection error: {0}")]
    Connect(String),

    #[error("TLS handshake error: {0}")]
    Handshake(String),

    #[error("Server did not provide a certificate")]
    NoCertificate,

    #[error("Certificate inspection timed out after {0:?}")]
    Timeout(Duration),

    #[error("Certificate inspection task failed: {0}")]
    Task(String),
}
