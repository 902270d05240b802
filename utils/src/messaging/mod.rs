use tokio::io::{Stdin, Stdout};
use tokio_util::codec::{FramedRead, FramedWrite};

pub mod manifest;
pub mod message_codec;

pub use message_codec::{MessageCodec, ProtocolError};

/// Reader half of a native messaging channel.
pub type MessageReader<R> = FramedRead<R, MessageCodec>;
/// Writer half of a native messaging channel.
pub type MessageWriter<W> = FramedWrite<W, MessageCodec>;

/// Frames stdin/stdout the way the browser talks to a native host.
pub fn stdio_channel() -> (MessageReader<Stdin>, MessageWriter<Stdout>) {
    (
        FramedRead::new(tokio::io::stdin(), MessageCodec::default()),
        FramedWrite::new(tokio::io::stdout(), MessageCodec::default()),
    )
}
