//! Channel registry: create/join/leave/list over the server state.
//!
//! Side effects are always notices broadcast to channel members; the
//! requester itself only ever gets a direct success or error reply.

use thiserror::Error;

use super::state::{ConnId, ServerState};

/// Recoverable channel errors, reported to the requesting connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("A channel named '{0}' already exists")]
    ChannelExists(String),

    #[error("No channel named '{0}' exists")]
    NoSuchChannel(String),
}

impl ServerState {
    /// Create a channel and join the requester to it.
    pub fn create_channel(&mut self, name: &str, requester: ConnId) -> Result<(), RegistryError> {
        if self.channels.contains_key(name) {
            return Err(RegistryError::ChannelExists(name.to_string()));
        }
        self.channels.insert(name.to_string(), Vec::new());
        tracing::info!("Channel '{}' created", name);
        self.join_channel(name, requester)
    }

    /// Move the requester into a channel.
    ///
    /// Leaves the current channel first (with a "left" notice to its
    /// remaining members), announces the arrival to the target
    /// channel's existing members, then appends the requester. The
    /// announce-before-append order is what keeps the requester out of
    /// its own join notice.
    pub fn join_channel(&mut self, name: &str, requester: ConnId) -> Result<(), RegistryError> {
        if !self.channels.contains_key(name) {
            return Err(RegistryError::NoSuchChannel(name.to_string()));
        }

        self.leave_channel(requester);

        let notice = format!("{} has joined {}", self.display_name(requester), name);
        self.broadcast(name, requester, &notice);

        if let Some(members) = self.channels.get_mut(name) {
            members.push(requester);
        }
        if let Some(client) = self.clients.get_mut(&requester) {
            client.channel = Some(name.to_string());
        }

        self.send_to(requester, &format!("You have joined {}", name));
        tracing::info!(
            "Connection {} joined channel '{}'",
            requester,
            name
        );
        Ok(())
    }

    /// Remove a connection from its current channel, notifying the
    /// remaining members. No-op for a connection that is not in any
    /// channel.
    pub fn leave_channel(&mut self, id: ConnId) {
        let Some(channel) = self.current_channel(id) else {
            return;
        };

        if let Some(members) = self.channels.get_mut(&channel) {
            members.retain(|&member| member != id);
        }
        if let Some(client) = self.clients.get_mut(&id) {
            client.channel = None;
        }

        let notice = format!("{} has left {}", self.display_name(id), channel);
        self.broadcast(&channel, id, &notice);
    }

    /// Names of all channels, in no particular order.
    pub fn channel_names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }
}
