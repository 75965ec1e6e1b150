//! Server state and connection management.
//!
//! All connection and channel bookkeeping lives in one aggregate owned
//! by the multiplexer task. Nothing else holds a reference to it, so
//! every mutation happens on that single task by construction.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::protocol::SessionBuffer;

/// Identifier assigned to a connection when it is accepted.
pub type ConnId = u64;

/// Per-connection bookkeeping.
pub struct ClientConn {
    /// Outbound frame channel, drained by the connection's writer task.
    pub sender: mpsc::UnboundedSender<String>,
    /// Display name; `None` until the first plain frame arrives.
    pub name: Option<String>,
    /// Channel the connection currently occupies, if any.
    pub channel: Option<String>,
    /// Reassembly buffer for partial reads.
    pub buffer: SessionBuffer,
}

/// The single aggregate holding all cross-connection state.
#[derive(Default)]
pub struct ServerState {
    pub(super) clients: HashMap<ConnId, ClientConn>,
    /// Channel name to member list, in join order. Channels persist
    /// even with zero members.
    pub(super) channels: HashMap<String, Vec<ConnId>>,
}

impl ServerState {
    /// Register a freshly accepted connection.
    pub fn register(&mut self, id: ConnId, sender: mpsc::UnboundedSender<String>) {
        self.clients.insert(
            id,
            ClientConn {
                sender,
                name: None,
                channel: None,
                buffer: SessionBuffer::new(),
            },
        );
    }

    pub fn is_named(&self, id: ConnId) -> bool {
        self.clients.get(&id).is_some_and(|c| c.name.is_some())
    }

    /// Assign a connection's display name. A name, once set, is never
    /// overwritten.
    pub fn set_name(&mut self, id: ConnId, name: String) {
        if let Some(client) = self.clients.get_mut(&id)
            && client.name.is_none()
        {
            client.name = Some(name);
        }
    }

    /// Display name for notices. Empty string for unnamed connections.
    pub fn display_name(&self, id: ConnId) -> String {
        self.clients
            .get(&id)
            .and_then(|c| c.name.clone())
            .unwrap_or_default()
    }

    pub fn current_channel(&self, id: ConnId) -> Option<String> {
        self.clients.get(&id).and_then(|c| c.channel.clone())
    }

    /// Feed one socket read into the connection's session buffer and
    /// pop at most one complete frame.
    pub fn push_bytes(&mut self, id: ConnId, chunk: &[u8]) -> Option<String> {
        let client = self.clients.get_mut(&id)?;
        client.buffer.extend(chunk);
        client.buffer.next_frame()
    }

    /// Whether a connection has at least one more complete frame
    /// waiting in its session buffer.
    pub fn has_buffered_frame(&self, id: ConnId) -> bool {
        self.clients.get(&id).is_some_and(|c| c.buffer.has_frame())
    }

    /// Queue one frame for a single connection.
    ///
    /// A closed channel means the writer task already died; the
    /// matching `Disconnected` event will clean the entry up, so this
    /// only logs.
    pub fn send_to(&self, id: ConnId, message: &str) {
        if let Some(client) = self.clients.get(&id)
            && client.sender.send(message.to_string()).is_err()
        {
            tracing::warn!("Failed to queue message for connection {}", id);
        }
    }

    /// Queue one frame for every member of a channel except `exclude`.
    pub fn broadcast(&self, channel: &str, exclude: ConnId, message: &str) {
        let Some(members) = self.channels.get(channel) else {
            return;
        };
        for &member in members {
            if member != exclude {
                self.send_to(member, message);
            }
        }
    }

    /// Tear a connection down: leave its channel (notifying remaining
    /// members) and drop every trace of it from the aggregate, in one
    /// call. Idempotent; late events for an already-removed connection
    /// are ignored.
    pub fn teardown(&mut self, id: ConnId) {
        if !self.clients.contains_key(&id) {
            return;
        }
        self.leave_channel(id);
        self.clients.remove(&id);
        tracing::info!("Connection {} removed", id);
    }
}
