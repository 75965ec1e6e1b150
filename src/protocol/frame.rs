//! Fixed-length frame encoding and decoding.

use bytes::{BufMut, Bytes, BytesMut};

/// Number of bytes in every frame on the wire. Both sides of a
/// connection must agree on this value.
pub const FRAME_LEN: usize = 512;

/// Encode a text payload into one wire frame.
///
/// The payload's UTF-8 bytes are right-padded with ASCII spaces up to
/// [`FRAME_LEN`]. Payloads longer than [`FRAME_LEN`] bytes are silently
/// truncated at the frame boundary.
pub fn encode_frame(payload: &str) -> Bytes {
    let raw = payload.as_bytes();
    let take = raw.len().min(FRAME_LEN);

    let mut frame = BytesMut::with_capacity(FRAME_LEN);
    frame.put_slice(&raw[..take]);
    frame.resize(FRAME_LEN, b' ');
    frame.freeze()
}

/// Decode one wire frame back into its text payload.
///
/// Strips the space padding (and any other leading/trailing whitespace,
/// matching what clients send for interactively typed lines). Invalid
/// UTF-8 is replaced rather than rejected; a chat relay has no reason to
/// drop a connection over a mangled character.
///
/// Callers must pass exactly [`FRAME_LEN`] bytes; the session buffer
/// guarantees this for socket input.
pub fn decode_frame(frame: &[u8]) -> String {
    debug_assert_eq!(frame.len(), FRAME_LEN);
    String::from_utf8_lossy(frame).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pads_to_frame_len() {
        // テスト項目: 短いペイロードが FRAME_LEN までスペースで埋められる
        // given (前提条件):
        let payload = "hello";

        // when (操作):
        let frame = encode_frame(payload);

        // then (期待する結果):
        assert_eq!(frame.len(), FRAME_LEN);
        assert_eq!(&frame[..5], b"hello");
        assert!(frame[5..].iter().all(|&b| b == b' '));
    }

    #[test]
    fn test_encode_truncates_oversized_payload() {
        // テスト項目: FRAME_LEN を超えるペイロードがフレーム境界で切り捨てられる
        // given (前提条件):
        let payload = "x".repeat(FRAME_LEN + 100);

        // when (操作):
        let frame = encode_frame(&payload);

        // then (期待する結果):
        assert_eq!(frame.len(), FRAME_LEN);
        assert!(frame.iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_round_trip_recovers_trimmed_payload() {
        // テスト項目: decode(encode(t)) == t.trim() が成り立つ
        // given (前提条件):
        let payloads = ["hello", "/join lobby", "", "a", "日本語のメッセージ"];

        for payload in payloads {
            // when (操作):
            let decoded = decode_frame(&encode_frame(payload));

            // then (期待する結果):
            assert_eq!(decoded, payload.trim());
        }
    }

    #[test]
    fn test_trailing_whitespace_does_not_round_trip() {
        // テスト項目: 末尾の空白はパディングと区別できず往復しない（既知のプロトコル制限）
        // given (前提条件):
        let payload = "hello   ";

        // when (操作):
        let decoded = decode_frame(&encode_frame(payload));

        // then (期待する結果):
        assert_eq!(decoded, "hello");
        assert_ne!(decoded, payload);
    }

    #[test]
    fn test_decode_empty_frame_yields_empty_string() {
        // テスト項目: 全てパディングのフレームは空文字列にデコードされる
        // given (前提条件):
        let frame = encode_frame("");

        // when (操作):
        let decoded = decode_frame(&frame);

        // then (期待する結果):
        assert_eq!(decoded, "");
    }
}
