//! Multi-channel TCP chat application library.
//!
//! This library provides the server and client implementations for a
//! frame-based TCP chat service with named channels.

// layers
pub mod client;
pub mod protocol;
pub mod server;

// shared library
pub mod common;
