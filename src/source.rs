//! Bus feed.
//!
//! The engine consumes `Frame`s; where they come from is a transport
//! concern. This module reads newline-delimited JSON frames from a Unix
//! socket or stdin and forwards them over a channel, which also serializes
//! delivery: the dispatch loop sees one message at a time, in arrival order.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::watch::Frame;

const FEED_BUFFER: usize = 256;

/// Connect to a Unix socket delivering NDJSON frames and stream them.
pub fn spawn_socket(path: PathBuf) -> mpsc::Receiver<Frame> {
    let (tx, rx) = mpsc::channel(FEED_BUFFER);
    tokio::spawn(async move {
        let stream = match UnixStream::connect(&path).await {
            Ok(s) => s,
            Err(e) => {
                warn!("failed to connect to bus feed {}: {}", path.display(), e);
                return;
            }
        };
        info!("attached to bus feed at {}", path.display());
        read_frames(stream, tx).await;
    });
    rx
}

/// Stream NDJSON frames from stdin.
pub fn spawn_stdin() -> mpsc::Receiver<Frame> {
    let (tx, rx) = mpsc::channel(FEED_BUFFER);
    tokio::spawn(async move {
        read_frames(tokio::io::stdin(), tx).await;
    });
    rx
}

async fn read_frames<R: AsyncRead + Unpin>(reader: R, tx: mpsc::Sender<Frame>) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Frame>(&line) {
            Ok(frame) => {
                if tx.send(frame).await.is_err() {
                    return;
                }
            }
            // A broken feed envelope is a transport glitch, not a message
            // fault; the per-message diagnostics only cover decoded frames.
            Err(e) => trace!("skipping malformed feed line: {e} ({line})"),
        }
    }
    debug!("bus feed closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn streams_frames_and_skips_malformed_envelopes() {
        let input: &[u8] = b"{\"subject\":\"dea.stop\",\"body\":\"{}\"}\n\
            not an envelope\n\
            \n\
            {\"subject\":\"droplet.exited\",\"reply_to\":\"inbox-9\"}\n";

        let (tx, mut rx) = mpsc::channel(8);
        read_frames(input, tx).await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.subject, "dea.stop");
        assert_eq!(first.body, "{}");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.subject, "droplet.exited");
        assert_eq!(second.reply_to.as_deref(), Some("inbox-9"));

        assert!(rx.recv().await.is_none());
    }
}
