//! Client execution logic.

use super::{error::ClientError, session::run_client_session};

/// Run the chat client.
///
/// # Arguments
///
/// * `name` - Display name announced to the server
/// * `host` - Remote server address
/// * `port` - Remote server port
pub async fn run_client(name: String, host: String, port: u16) -> Result<(), ClientError> {
    tracing::info!("Connecting to {}:{} as '{}'", host, port, name);

    let result = run_client_session(&name, &host, port).await;
    match &result {
        Ok(()) => tracing::info!("Client session ended normally"),
        Err(e) => tracing::error!("Client session failed: {}", e),
    }
    result
}
