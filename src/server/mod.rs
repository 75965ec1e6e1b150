//! TCP chat server implementation.

mod handler;
mod registry;
mod runner;
mod state;

pub use runner::{ChatServer, run_server};
