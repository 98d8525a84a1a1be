//! Line feeder -- reads a byte stream line by line into the inbound queue.
//!
//! The source is read to EOF (stdin or a file); following a growing file
//! is left to whoever pipes into the daemon. Bytes that are not valid
//! UTF-8 are replaced rather than rejected.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use eqalert_core::types::RawLine;

/// Forward every line from `reader` into `tx`.
///
/// Returns the number of lines forwarded. Stops early, without error,
/// when `cancel` fires or the pipeline drops its receiver. Dropping `tx`
/// on return lets the worker see the end of input.
pub async fn forward_lines<R>(
    mut reader: R,
    tx: mpsc::Sender<RawLine>,
    cancel: CancellationToken,
) -> io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut forwarded = 0u64;
    let mut buf = Vec::with_capacity(256);

    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            read = reader.read_until(b'\n', &mut buf) => read?,
        };
        if read == 0 {
            break;
        }

        let line = RawLine::new(strip_line_ending(&buf));
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = tx.send(line) => {
                if sent.is_err() {
                    tracing::debug!("line receiver closed, stopping feeder");
                    break;
                }
                forwarded += 1;
            }
        }
    }

    tracing::debug!(lines = forwarded, "line feeder finished");
    Ok(forwarded)
}

fn strip_line_ending(buf: &[u8]) -> String {
    let mut end = buf.len();
    if end > 0 && buf[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && buf[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_unix_and_windows_endings() {
        assert_eq!(strip_line_ending(b"abc\n"), "abc");
        assert_eq!(strip_line_ending(b"abc\r\n"), "abc");
        assert_eq!(strip_line_ending(b"abc"), "abc");
        assert_eq!(strip_line_ending(b"\n"), "");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(strip_line_ending(b"caf\xe9\n"), "caf\u{fffd}");
    }

    #[tokio::test]
    async fn forwards_all_lines_until_eof() {
        let input: &[u8] = b"first\r\nsecond\n\nlast";
        let (tx, mut rx) = mpsc::channel(8);
        let n = forward_lines(input, tx, CancellationToken::new()).await.unwrap();
        assert_eq!(n, 4);

        let mut got = Vec::new();
        while let Some(line) = rx.recv().await {
            got.push(line.into_inner());
        }
        assert_eq!(got, vec!["first", "second", "", "last"]);
    }

    #[tokio::test]
    async fn cancelled_feeder_forwards_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (tx, _rx) = mpsc::channel(8);
        let n = forward_lines(&b"a\nb\n"[..], tx, cancel).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn closed_receiver_stops_feeder() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let n = forward_lines(&b"a\nb\n"[..], tx, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(n, 0);
    }
}
