//! Classification of a decoded frame into a command or a chat message.

use thiserror::Error;

/// Everything a client can say in one frame, as a closed sum.
///
/// Dispatch over this type is an exhaustive match; there is no
/// string-keyed command table to fall through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// First non-command frame from an unnamed connection.
    SetName(String),
    /// Plain chat text from a named connection.
    Chat(String),
    /// `/create <channel>`
    Create(String),
    /// `/join <channel>`
    Join(String),
    /// `/list`
    List,
}

/// Parse errors for control frames. Reported to the offending client as
/// a notice; never a reason to drop the connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: /{0}")]
    UnknownCommand(String),

    #[error("Usage: /create <channel>")]
    CreateUsage,

    #[error("Usage: /join <channel>")]
    JoinUsage,

    #[error("Usage: /list")]
    ListUsage,
}

impl Command {
    /// Classify the trimmed text of one decoded frame.
    ///
    /// # Arguments
    ///
    /// * `text` - The decoded, whitespace-trimmed frame payload
    /// * `named` - Whether the sending connection already has a name
    pub fn parse(text: &str, named: bool) -> Result<Command, CommandError> {
        if let Some(rest) = text.strip_prefix('/') {
            return parse_control(rest);
        }

        // A connection's very first plain frame is its display name,
        // even if the trimmed text is empty.
        if !named {
            return Ok(Command::SetName(text.to_string()));
        }

        Ok(Command::Chat(text.to_string()))
    }
}

fn parse_control(rest: &str) -> Result<Command, CommandError> {
    let mut tokens = rest.split_whitespace();
    let name = tokens.next().unwrap_or("");
    let args: Vec<&str> = tokens.collect();

    match name {
        "create" => match args.as_slice() {
            [channel] => Ok(Command::Create(channel.to_string())),
            _ => Err(CommandError::CreateUsage),
        },
        "join" => match args.as_slice() {
            [channel] => Ok(Command::Join(channel.to_string())),
            _ => Err(CommandError::JoinUsage),
        },
        "list" => match args.as_slice() {
            [] => Ok(Command::List),
            _ => Err(CommandError::ListUsage),
        },
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}
