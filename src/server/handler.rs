//! Frame dispatch: from decoded frame text to registry and broadcast
//! side effects.

use crate::protocol::Command;

use super::state::{ConnId, ServerState};

const NOT_IN_CHANNEL: &str =
    "You are not in a channel. Use /create <channel> or /join <channel> first";

/// Handle one complete frame received from a connection.
///
/// Recoverable problems (bad command, unknown channel, chatting from
/// nowhere) are answered with a notice to the sender only; nothing here
/// ever drops the connection.
pub fn handle_frame(state: &mut ServerState, id: ConnId, text: &str) {
    let command = match Command::parse(text, state.is_named(id)) {
        Ok(command) => command,
        Err(e) => {
            tracing::debug!("Rejected command from connection {}: {}", id, e);
            state.send_to(id, &e.to_string());
            return;
        }
    };

    match command {
        Command::SetName(name) => {
            tracing::info!("Connection {} is now known as '{}'", id, name);
            state.set_name(id, name);
        }
        Command::Chat(message) => match state.current_channel(id) {
            Some(channel) => {
                let line = format!("[{}] {}", state.display_name(id), message);
                state.broadcast(&channel, id, &line);
            }
            None => state.send_to(id, NOT_IN_CHANNEL),
        },
        Command::Create(channel) => {
            if let Err(e) = state.create_channel(&channel, id) {
                state.send_to(id, &e.to_string());
            }
        }
        Command::Join(channel) => {
            if let Err(e) = state.join_channel(&channel, id) {
                state.send_to(id, &e.to_string());
            }
        }
        Command::List => {
            let names = state.channel_names();
            let reply = if names.is_empty() {
                "No channels exist".to_string()
            } else {
                names.join("\n")
            };
            state.send_to(id, &reply);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn register_client(state: &mut ServerState, id: ConnId) -> mpsc::UnboundedReceiver<String> {
        let (sender, receiver) = mpsc::unbounded_channel();
        state.register(id, sender);
        receiver
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[test]
    fn test_first_frame_names_the_connection() {
        // テスト項目: 最初のフレームで接続に名前が付き、返信は発生しない
        // given (前提条件):
        let mut state = ServerState::default();
        let mut rx = register_client(&mut state, 1);

        // when (操作):
        handle_frame(&mut state, 1, "alice");

        // then (期待する結果):
        assert_eq!(state.display_name(1), "alice");
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_chat_without_channel_yields_notice() {
        // テスト項目: チャンネル未参加でのチャットは本人への通知のみになる
        // given (前提条件):
        let mut state = ServerState::default();
        let mut rx = register_client(&mut state, 1);
        handle_frame(&mut state, 1, "alice");

        // when (操作):
        handle_frame(&mut state, 1, "hello?");

        // then (期待する結果):
        assert_eq!(drain(&mut rx), vec![NOT_IN_CHANNEL]);
    }

    #[test]
    fn test_chat_reaches_other_members_only() {
        // テスト項目: チャットは送信者以外のチャンネルメンバーに整形されて届く
        // given (前提条件):
        let mut state = ServerState::default();
        let mut rx1 = register_client(&mut state, 1);
        let mut rx2 = register_client(&mut state, 2);
        handle_frame(&mut state, 1, "alice");
        handle_frame(&mut state, 2, "bob");
        handle_frame(&mut state, 1, "/create lobby");
        handle_frame(&mut state, 2, "/join lobby");
        drain(&mut rx1);
        drain(&mut rx2);

        // when (操作):
        handle_frame(&mut state, 1, "hello");

        // then (期待する結果):
        assert_eq!(drain(&mut rx2), vec!["[alice] hello"]);
        assert!(drain(&mut rx1).is_empty());
    }

    #[test]
    fn test_bad_command_reports_without_dropping() {
        // テスト項目: 不正なコマンドは usage 通知になり、接続は維持される
        // given (前提条件):
        let mut state = ServerState::default();
        let mut rx = register_client(&mut state, 1);
        handle_frame(&mut state, 1, "alice");

        // when (操作):
        handle_frame(&mut state, 1, "/join");
        handle_frame(&mut state, 1, "/quit now");

        // then (期待する結果):
        assert_eq!(
            drain(&mut rx),
            vec!["Usage: /join <channel>", "Unknown command: /quit"]
        );
        assert!(state.is_named(1));
    }

    #[test]
    fn test_join_unknown_channel_reports_error() {
        // テスト項目: 存在しないチャンネルへの参加はエラー通知になり状態は変わらない
        // given (前提条件):
        let mut state = ServerState::default();
        let mut rx = register_client(&mut state, 1);
        handle_frame(&mut state, 1, "alice");

        // when (操作):
        handle_frame(&mut state, 1, "/join nosuch");

        // then (期待する結果):
        assert_eq!(drain(&mut rx), vec!["No channel named 'nosuch' exists"]);
        assert_eq!(state.current_channel(1), None);
        assert!(state.channel_names().is_empty());
    }

    #[test]
    fn test_list_reports_channel_names() {
        // テスト項目: /list は全チャンネル名を 1 フレームで返す
        // given (前提条件):
        let mut state = ServerState::default();
        let mut rx = register_client(&mut state, 1);
        handle_frame(&mut state, 1, "alice");
        handle_frame(&mut state, 1, "/create lobby");
        drain(&mut rx);

        // when (操作):
        handle_frame(&mut state, 1, "/list");

        // then (期待する結果):
        assert_eq!(drain(&mut rx), vec!["lobby"]);
    }

    #[test]
    fn test_list_with_no_channels() {
        // テスト項目: チャンネルが存在しない場合の /list はその旨を返す
        // given (前提条件):
        let mut state = ServerState::default();
        let mut rx = register_client(&mut state, 1);
        handle_frame(&mut state, 1, "alice");

        // when (操作):
        handle_frame(&mut state, 1, "/list");

        // then (期待する結果):
        assert_eq!(drain(&mut rx), vec!["No channels exist"]);
    }

    #[test]
    fn test_commands_work_before_name_is_set() {
        // テスト項目: 名前設定前でも制御コマンドは処理される
        // given (前提条件):
        let mut state = ServerState::default();
        let mut rx = register_client(&mut state, 1);

        // when (操作):
        handle_frame(&mut state, 1, "/create lobby");

        // then (期待する結果):
        assert_eq!(drain(&mut rx), vec!["You have joined lobby"]);
        assert!(!state.is_named(1));
    }
}
