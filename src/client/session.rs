//! Client session: socket I/O loop plus a blocking readline thread.

use bytes::BytesMut;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    sync::mpsc,
};

use crate::protocol::{FRAME_LEN, SessionBuffer, encode_frame};

use super::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// Run one client session until the user exits or the server goes away.
pub async fn run_client_session(name: &str, host: &str, port: u16) -> Result<(), ClientError> {
    let remote = format!("{}:{}", host, port);

    let stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| ClientError::Connect {
            host: host.to_string(),
            port,
            source,
        })?;

    tracing::info!("Connected to chat server at {}", remote);

    let (mut read_half, mut write_half) = stream.into_split();

    // The very first frame carries the display name.
    write_half
        .write_all(&encode_frame(name))
        .await
        .map_err(ClientError::Send)?;

    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        name
    );

    // Receive frames from the server and print them.
    let name_for_read = name.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut buffer = SessionBuffer::new();
        let mut chunk = BytesMut::with_capacity(FRAME_LEN);
        loop {
            match read_half.read_buf(&mut chunk).await {
                Ok(0) => return true,
                Ok(_) => {
                    buffer.extend(&chunk.split());
                    while let Some(text) = buffer.next_frame() {
                        if !text.is_empty() {
                            print!("{}", MessageFormatter::format_incoming(&text));
                            redisplay_prompt(&name_for_read);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Read error: {}", e);
                    return true;
                }
            }
        }
    });

    // Blocking readline thread feeding typed lines into a channel.
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = format!("{}> ", name);
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Encode typed lines into frames and send them.
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            if let Err(e) = write_half.write_all(&encode_frame(&line)).await {
                tracing::warn!("Failed to send message: {}", e);
                return true;
            }
        }
        false
    });

    // If any one of the tasks completes, abort the other.
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(true) {
                return Err(ClientError::Disconnected(remote));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::Disconnected(remote));
            }
        }
    }

    Ok(())
}
