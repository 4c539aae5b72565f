//! Line source: turns an `AsyncRead` (stdin or a file) into complete lines
//! and feeds them into the controller's merged channel. Never delivers a
//! partial line. An optional tee writer receives every raw line verbatim
//! before any decoding happens.

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::controller::ControlEvent;

/// Abstract producer of stream lines: a complete line, a clean end of
/// stream, or an error. Nothing in between.
#[async_trait]
pub trait LineSource: Send {
    async fn next_line(&mut self) -> std::io::Result<Option<String>>;
}

pub struct JsonLineReader<R> {
    lines: Lines<BufReader<R>>,
    tee: Option<Box<dyn Write + Send>>,
}

impl<R: AsyncRead + Unpin + Send> JsonLineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            tee: None,
        }
    }

    /// Copies every raw line to `tee`, newline-terminated.
    pub fn with_tee(mut self, tee: Box<dyn Write + Send>) -> Self {
        self.tee = Some(tee);
        self
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> LineSource for JsonLineReader<R> {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        match self.lines.next_line().await? {
            Some(line) => {
                if let Some(tee) = &mut self.tee {
                    writeln!(tee, "{line}")?;
                }
                Ok(Some(line))
            }
            None => Ok(None),
        }
    }
}

/// Reads lines until EOF or error, translating them into control events.
/// The task stops on its own when the controller side hangs up, which is
/// how an interrupt abandons an in-flight read.
pub fn spawn_source(
    mut source: impl LineSource + 'static,
    tx: mpsc::Sender<ControlEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match source.next_line().await {
                Ok(Some(line)) => {
                    trace!(len = line.len(), "line read");
                    if tx.send(ControlEvent::LineReady(line)).await.is_err() {
                        return;
                    }
                }
                Ok(None) => {
                    let _ = tx.send(ControlEvent::EndOfStream).await;
                    return;
                }
                Err(err) => {
                    let _ = tx.send(ControlEvent::LineError(err)).await;
                    return;
                }
            }
        }
    })
}
