//! Progress events over an in-process channel.

use tokio::sync::mpsc;
use tracing::debug;

use reel_models::WsMessage;

/// Sender half of a job's progress stream.
///
/// The orchestrator emits log, segment and percentage updates through
/// this; the caller that owns the run emits the terminal `done`/`error`
/// message once the run settles. Sends never fail the run — a dropped
/// receiver just means nobody is listening anymore.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<WsMessage>,
}

impl ProgressSender {
    /// Create a progress channel, returning the sender and the stream of
    /// messages to forward to the caller.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<WsMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// A sender whose messages are discarded.
    pub fn discard() -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        Self { tx }
    }

    fn emit(&self, message: WsMessage) {
        if self.tx.send(message).is_err() {
            debug!("Progress receiver dropped, discarding event");
        }
    }

    /// Emit a log line.
    pub fn log(&self, message: impl Into<String>) {
        self.emit(WsMessage::log(message));
    }

    /// Emit a progress percentage.
    pub fn progress(&self, value: u8) {
        self.emit(WsMessage::progress(value));
    }

    /// Emit a segment-started marker.
    pub fn segment_started(&self, segment: u32, total: u32) {
        self.emit(WsMessage::segment_started(segment, total));
    }

    /// Emit the terminal done message.
    pub fn done(&self, output: impl Into<String>) {
        self.emit(WsMessage::done(output));
    }

    /// Emit the terminal error message.
    pub fn error(&self, message: impl Into<String>) {
        self.emit(WsMessage::error(message));
    }
}
