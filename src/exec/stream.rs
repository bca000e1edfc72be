// src/exec/stream.rs

//! Child output multiplexing.
//!
//! Each child contributes two independent byte streams. A reader task per
//! stream turns them into tagged lines on the shared sink as they arrive, so
//! output from concurrent children interleaves at line granularity only.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::output::{OutputSink, StatusClass, StreamKind};

/// Spawn a reader task that copies `reader` to the sink line by line.
///
/// A read error is reported through the sink as a tagged error status and
/// ends this stream's loop; the sibling stream and the process wait are
/// unaffected.
pub fn spawn_stream_reader<R>(
    reader: R,
    tag: String,
    kind: StreamKind,
    sink: OutputSink,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let reader = BufReader::new(reader);
        let mut lines = reader.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => sink.line(&tag, kind, &line),
                Ok(None) => break,
                Err(err) => {
                    sink.status(
                        &tag,
                        StatusClass::Error,
                        &format!("Error reading {}: {}", kind.label(), err),
                    );
                    break;
                }
            }
        }

        debug!(tag = %tag, kind = kind.label(), "stream reader finished");
    })
}
