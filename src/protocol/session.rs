//! Per-connection reassembly of frames from partial socket reads.

use bytes::BytesMut;

use super::frame::{FRAME_LEN, decode_frame};

/// Accumulates arbitrarily-chunked bytes from a socket and yields
/// complete frames.
///
/// TCP delivers a byte stream, not frames: a single read may return a
/// fraction of a frame or several frames glued together. The buffer
/// yields at most one frame per [`next_frame`](Self::next_frame) call;
/// any further complete frames stay buffered for later calls.
#[derive(Debug, Default)]
pub struct SessionBuffer {
    buf: BytesMut,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(FRAME_LEN),
        }
    }

    /// Append bytes from one socket read.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Whether at least one full frame is buffered.
    pub fn has_frame(&self) -> bool {
        self.buf.len() >= FRAME_LEN
    }

    /// Consume and decode exactly one frame, if one is buffered.
    pub fn next_frame(&mut self) -> Option<String> {
        if !self.has_frame() {
            return None;
        }
        let frame = self.buf.split_to(FRAME_LEN);
        Some(decode_frame(&frame))
    }
}
