//! Server execution logic: the connection multiplexer.
//!
//! One broker task owns the whole [`ServerState`] and is the only code
//! that touches it. Per-connection tasks do raw socket I/O and nothing
//! else: readers forward byte chunks as events, writers drain an
//! outbound queue onto the socket. Protocol and channel logic stay in
//! `handler`/`registry`, where they are testable without sockets.

use bytes::{Bytes, BytesMut};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{
        TcpListener,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
};

use crate::protocol::{FRAME_LEN, encode_frame};

use super::{
    handler::handle_frame,
    state::{ConnId, ServerState},
};

/// Connection lifecycle events reported to the broker task.
enum Event {
    /// Bytes arrived from one socket read.
    Data(ConnId, Bytes),
    /// The peer closed, or reading/writing failed.
    Disconnected(ConnId),
}

/// A bound chat server, ready to run.
pub struct ChatServer {
    listener: TcpListener,
}

impl ChatServer {
    /// Bind the listening socket. Failure here is fatal to the process.
    pub async fn bind(host: &str, port: u16) -> std::io::Result<Self> {
        let listener = TcpListener::bind((host, port)).await?;
        Ok(Self { listener })
    }

    /// The address actually bound (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept/event loop until Ctrl+C.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let mut state = ServerState::default();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let mut next_id: ConnId = 0;
        let mut shutdown = std::pin::pin!(tokio::signal::ctrl_c());

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, addr)) => {
                        next_id += 1;
                        let id = next_id;

                        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
                        state.register(id, outbound_tx);

                        let (read_half, write_half) = socket.into_split();
                        tokio::spawn(read_loop(id, read_half, events_tx.clone()));
                        tokio::spawn(write_loop(id, write_half, outbound_rx, events_tx.clone()));

                        tracing::info!("Connection {} accepted from {}", id, addr);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                    }
                },
                event = events_rx.recv() => match event {
                    Some(Event::Data(id, chunk)) => {
                        // One frame per readiness event. A connection
                        // with further complete frames buffered stays
                        // "ready": requeue an empty chunk so they drain
                        // one per event instead of stalling.
                        if let Some(text) = state.push_bytes(id, &chunk) {
                            handle_frame(&mut state, id, &text);
                            if state.has_buffered_frame(id) {
                                let _ = events_tx.send(Event::Data(id, Bytes::new()));
                            }
                        }
                    }
                    Some(Event::Disconnected(id)) => {
                        state.teardown(id);
                    }
                    // Unreachable while we hold events_tx, but a broken
                    // channel should stop the loop rather than spin.
                    None => break,
                },
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Forward raw socket reads to the broker until EOF or error.
async fn read_loop(id: ConnId, mut reader: OwnedReadHalf, events: mpsc::UnboundedSender<Event>) {
    let mut chunk = BytesMut::with_capacity(FRAME_LEN);
    loop {
        match reader.read_buf(&mut chunk).await {
            // Zero bytes means orderly peer shutdown.
            Ok(0) => break,
            Ok(_) => {
                if events.send(Event::Data(id, chunk.split().freeze())).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Read error on connection {}: {}", id, e);
                break;
            }
        }
    }
    let _ = events.send(Event::Disconnected(id));
}

/// Drain the outbound queue onto the socket, encoding each message as
/// one frame. A write failure tears down only this connection.
async fn write_loop(
    id: ConnId,
    mut writer: OwnedWriteHalf,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<Event>,
) {
    while let Some(message) = outbound.recv().await {
        if let Err(e) = writer.write_all(&encode_frame(&message)).await {
            tracing::warn!("Write to connection {} failed: {}", id, e);
            let _ = events.send(Event::Disconnected(id));
            return;
        }
    }
    // Queue closed: the broker tore this connection down. Dropping the
    // write half sends FIN.
}

/// Run the chat server.
///
/// # Arguments
///
/// * `host` - The host address to bind to (e.g., "127.0.0.1")
/// * `port` - The port number to bind to (e.g., 8080)
pub async fn run_server(host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let server = ChatServer::bind(&host, port).await?;

    tracing::info!("Chat server listening on {}", server.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    server.run().await
}
