//! Event writer -- serializes classified events as JSON lines.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use eqalert_core::event::ClassifiedEvent;

/// Write each event as one JSON object per line until the channel closes.
///
/// Flushes after every event so downstream readers see events promptly.
/// Returns the number of events written.
pub async fn write_events<W>(
    mut events: mpsc::Receiver<ClassifiedEvent>,
    writer: &mut W,
) -> io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(event) = events.recv().await {
        let mut json = event.to_json().map_err(io::Error::other)?;
        json.push('\n');
        writer.write_all(json.as_bytes()).await?;
        writer.flush().await?;
        written += 1;
    }
    Ok(written)
}
