//! Progress events emitted while a flash sequence runs

use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::models::flash::FlashOutcome;
use crate::models::sequence::FlashStep;

/// Events for progress observers (CLI printer, tests)
#[derive(Debug, Clone)]
pub enum FlashEvent {
    StepStarted(FlashStep),
    CopyStarted { total: usize, destination: PathBuf },
    FileCopying { index: usize, total: usize, file: PathBuf },
    FileCopied { copied: usize, total: usize, file: PathBuf, sha256: String },
    CopyFinished(FlashOutcome),
    PortPoll { port: String, attempt: u32 },
    /// Subprocess output line (build, boot)
    Output(String),
}

/// Receives progress events synchronously, in emission order
pub trait FlashObserver: Send + Sync {
    fn on_event(&self, event: FlashEvent);
}

impl FlashObserver for mpsc::UnboundedSender<FlashEvent> {
    fn on_event(&self, event: FlashEvent) {
        // A dropped receiver only means nobody is watching
        let _ = self.send(event);
    }
}

/// Observer that discards everything
pub struct NoopObserver;

impl FlashObserver for NoopObserver {
    fn on_event(&self, _event: FlashEvent) {}
}
