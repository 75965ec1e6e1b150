//! Wire protocol shared by the server and the client.
//!
//! The protocol is a sequence of fixed-length, space-padded text frames
//! over a plain TCP stream. There is no length prefix and no escaping.

mod command;
mod frame;
mod session;

pub use command::{Command, CommandError};
pub use frame::{FRAME_LEN, decode_frame, encode_frame};
pub use session::SessionBuffer;
