//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors. All of these are fatal to the client
/// process; the server stays unaffected.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not reach the server at all
    #[error("Cannot connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    /// A write to the server failed
    #[error("Failed to send to server: {0}")]
    Send(#[source] std::io::Error),

    /// The server closed the connection
    #[error("Disconnected from {0}")]
    Disconnected(String),
}
