use clipper_core::Dispatcher;
use clipper_core::types::Response;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};
use utils::messaging::{MessageReader, MessageWriter, ProtocolError};

/// Answers requests one at a time until the browser closes its end of the pipe.
///
/// A request that fails is answered with `success: false` and the loop goes on, as
/// is one whose response would exceed the outgoing size limit. A frame that cannot
/// be decoded ends the loop with the protocol error.
pub async fn serve<R, W>(
    reader: &mut MessageReader<R>,
    writer: &mut MessageWriter<W>,
    dispatcher: &Dispatcher,
) -> Result<usize, ProtocolError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut handled = 0;

    while let Some(frame) = reader.next().await {
        let message = frame.inspect_err(|e| error!("Unreadable message: {}", e))?;
        debug!("Request {} received", handled + 1);

        let response = dispatcher.handle_message(&message);
        match writer.send(&response).await {
            // The encoder rejects the frame before buffering any of it.
            Err(e @ ProtocolError::TooLarge { .. }) => {
                warn!("Response to request {} dropped: {}", handled + 1, e);
                writer
                    .send(&Response::failure(e.to_string()))
                    .await
                    .inspect_err(|e| error!("Could not send response: {}", e))?;
            }
            result => result.inspect_err(|e| error!("Could not send response: {}", e))?,
        }
        handled += 1;
    }

    info!("Input closed after {} requests", handled);
    Ok(handled)
}
