use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;
use serde_json::Value;
use std::io;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

const LENGTH_PREFIX_SIZE: usize = 4;

/// Largest message the browser will send to a native host (64 MiB).
pub const MAX_INCOMING_MESSAGE_SIZE: usize = 64 * 1024 * 1024;
/// Largest message the browser accepts from a native host (1 MiB).
pub const MAX_OUTGOING_MESSAGE_SIZE: usize = 1024 * 1024;

#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Reading or writing the underlying stream failed.
    #[error("Message stream I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The stream ended in the middle of a frame.
    #[error("Truncated message: expected {expected} bytes, stream ended after {received}")]
    Truncated { expected: usize, received: usize },

    /// The frame exceeds the size the peer is allowed to send or receive.
    #[error("Message too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    /// The payload is not valid UTF-8 JSON, or a response could not be serialized.
    #[error("Malformed JSON message: {0}")]
    Json(#[from] serde_json::Error),
}

/// Frame format: [length: u32, native endian][data: UTF-8 JSON]
#[derive(Debug, Clone)]
pub struct MessageCodec {
    max_incoming: usize,
    max_outgoing: usize,
}

impl Default for MessageCodec {
    fn default() -> Self {
        Self {
            max_incoming: MAX_INCOMING_MESSAGE_SIZE,
            max_outgoing: MAX_OUTGOING_MESSAGE_SIZE,
        }
    }
}

impl MessageCodec {
    pub fn with_limits(max_incoming: usize, max_outgoing: usize) -> Self {
        Self {
            max_incoming,
            max_outgoing,
        }
    }

    fn payload_length(src: &BytesMut) -> usize {
        u32::from_ne_bytes([src[0], src[1], src[2], src[3]]) as usize
    }
}

impl Decoder for MessageCodec {
    type Item = Value;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < LENGTH_PREFIX_SIZE {
            return Ok(None);
        }

        let length = Self::payload_length(src);
        if length > self.max_incoming {
            return Err(ProtocolError::TooLarge {
                size: length,
                limit: self.max_incoming,
            });
        }

        let frame_length = LENGTH_PREFIX_SIZE + length;
        if src.len() < frame_length {
            src.reserve(frame_length - src.len());
            return Ok(None);
        }

        src.advance(LENGTH_PREFIX_SIZE);
        let data = src.split_to(length);
        Ok(Some(serde_json::from_slice(&data)?))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(message) = self.decode(src)? {
            return Ok(Some(message));
        }
        if src.is_empty() {
            // peer closed the pipe between messages
            return Ok(None);
        }

        let (expected, received) = if src.len() < LENGTH_PREFIX_SIZE {
            (LENGTH_PREFIX_SIZE, src.len())
        } else {
            (Self::payload_length(src), src.len() - LENGTH_PREFIX_SIZE)
        };
        src.clear();
        Err(ProtocolError::Truncated { expected, received })
    }
}

impl<T: Serialize> Encoder<T> for MessageCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let payload = serde_json::to_vec(&item)?;
        if payload.len() > self.max_outgoing {
            return Err(ProtocolError::TooLarge {
                size: payload.len(),
                limit: self.max_outgoing,
            });
        }

        dst.reserve(LENGTH_PREFIX_SIZE + payload.len());
        dst.put_u32_ne(payload.len() as u32);
        dst.extend_from_slice(&payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{SinkExt, StreamExt};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio_util::codec::{FramedRead, FramedWrite};

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut bytes = (payload.len() as u32).to_ne_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[tokio::test]
    async fn test_messages_survive_write_then_read() {
        let messages = vec![
            json!({ "action": "save", "filename": "2024_01_15.md", "content": "- clipped ✂️" }),
            json!({ "action": "setConfig", "key": "graphPath", "value": null }),
        ];

        let mut writer = FramedWrite::new(Vec::new(), MessageCodec::default());
        for message in &messages {
            writer.send(message).await.unwrap();
        }
        let bytes = writer.into_inner();

        let mut reader = FramedRead::new(&bytes[..], MessageCodec::default());
        let mut decoded = Vec::new();
        while let Some(message) = reader.next().await {
            decoded.push(message.unwrap());
        }

        assert_eq!(messages, decoded);
    }

    #[test]
    fn test_encode_writes_native_endian_prefix_and_compact_json() {
        let mut dst = BytesMut::new();
        MessageCodec::default()
            .encode(json!({ "success": true }), &mut dst)
            .unwrap();

        let expected = frame(br#"{"success":true}"#);
        assert_eq!(expected, dst.to_vec());
    }

    #[tokio::test]
    async fn test_empty_stream_is_end_of_stream() {
        let mut reader = FramedRead::new(&[][..], MessageCodec::default());
        assert!(reader.next().await.is_none());
    }

    #[tokio::test]
    async fn test_truncated_payload_is_an_error() {
        let mut bytes = frame(br#"{"action":"ping"}"#);
        bytes.truncate(bytes.len() - 3);

        let mut reader = FramedRead::new(&bytes[..], MessageCodec::default());
        match reader.next().await {
            Some(Err(ProtocolError::Truncated { expected, received })) => {
                assert_eq!(17, expected);
                assert_eq!(14, received);
            }
            other => panic!("expected truncated frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncated_length_prefix_is_an_error() {
        let bytes = [7u8, 0];
        let mut reader = FramedRead::new(&bytes[..], MessageCodec::default());
        match reader.next().await {
            Some(Err(ProtocolError::Truncated { expected, received })) => {
                assert_eq!(LENGTH_PREFIX_SIZE, expected);
                assert_eq!(2, received);
            }
            other => panic!("expected truncated prefix, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let bytes = frame(b"{not json");
        let mut reader = FramedRead::new(&bytes[..], MessageCodec::default());
        assert!(matches!(
            reader.next().await,
            Some(Err(ProtocolError::Json(_)))
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_an_error() {
        let bytes = frame(&[b'"', 0xff, 0xfe, b'"']);
        let mut reader = FramedRead::new(&bytes[..], MessageCodec::default());
        assert!(matches!(
            reader.next().await,
            Some(Err(ProtocolError::Json(_)))
        ));
    }

    #[test]
    fn test_oversized_incoming_frame_is_rejected_before_buffering() {
        let mut src = BytesMut::from(&((MAX_INCOMING_MESSAGE_SIZE as u32) + 1).to_ne_bytes()[..]);
        match MessageCodec::default().decode(&mut src) {
            Err(ProtocolError::TooLarge { size, limit }) => {
                assert_eq!(MAX_INCOMING_MESSAGE_SIZE + 1, size);
                assert_eq!(MAX_INCOMING_MESSAGE_SIZE, limit);
            }
            other => panic!("expected oversized frame, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_outgoing_message_is_not_written() {
        let mut codec = MessageCodec::with_limits(MAX_INCOMING_MESSAGE_SIZE, 16);
        let mut dst = BytesMut::new();
        let result = codec.encode(json!({ "pages": ["a long page name"] }), &mut dst);

        assert!(matches!(result, Err(ProtocolError::TooLarge { limit: 16, .. })));
        assert!(dst.is_empty());
    }

    #[test]
    fn test_partial_frame_waits_for_more_bytes() {
        let bytes = frame(br#"{"action":"ping"}"#);
        let mut codec = MessageCodec::default();
        let mut src = BytesMut::from(&bytes[..10]);

        assert!(codec.decode(&mut src).unwrap().is_none());

        src.extend_from_slice(&bytes[10..]);
        assert_eq!(
            Some(json!({ "action": "ping" })),
            codec.decode(&mut src).unwrap()
        );
        assert!(src.is_empty());
    }
}
