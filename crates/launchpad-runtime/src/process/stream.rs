//! Child output readers (non-UTF8-safe).
//!
//! stdout and stderr are read by one task each and merged into a single line
//! channel, which is what the readiness scan consumes. Lines are decoded
//! lossily so stray non-UTF8 bytes do not end the reader.

use std::sync::Arc;

use launchpad_core::{OutputLine, OutputSink, OutputStream};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawn a task forwarding every line of `stream` to `merged` and `sink`.
///
/// The task keeps draining after the receiving side of `merged` is dropped,
/// so the child never blocks on a full pipe. It exits at EOF.
pub(crate) fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    pid: u32,
    kind: OutputStream,
    merged: UnboundedSender<OutputLine>,
    sink: Arc<dyn OutputSink>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }

                    let line = OutputLine {
                        stream: kind,
                        text: String::from_utf8_lossy(&buf).into_owned(),
                    };
                    debug!(pid, stream = %kind, "{}", line.text);
                    sink.append(pid, &line);
                    // Receiver is gone once readiness has been decided
                    let _ = merged.send(line);
                }
                Err(e) => {
                    debug!(pid, stream = %kind, error = %e, "Output reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(pid, stream = %kind, "Output reader task exiting");
    })
}

/// Sink forwarding child output to tracing at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn append(&self, pid: u32, line: &OutputLine) {
        info!(target: "launchpad::child", pid, stream = %line.stream, "{}", line.text);
    }
}
