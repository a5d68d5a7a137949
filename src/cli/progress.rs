//! Console rendering of flash progress events

use tokio::sync::mpsc;

use crate::models::FlashEvent;

pub fn render_event(event: &FlashEvent) -> Option<String> {
    match event {
        FlashEvent::StepStarted(step) => Some(format!("▶ {}", step)),
        FlashEvent::CopyStarted { total, destination } => Some(format!(
            "📦 Copying {} image(s) to {}",
            total,
            destination.display()
        )),
        FlashEvent::FileCopying { index, total, file } => Some(format!(
            "   [{}/{}] {}",
            index + 1,
            total,
            file.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string())
        )),
        FlashEvent::FileCopied { sha256, .. } => Some(format!("         sha256 {}", sha256)),
        // The sequence reports the outcome as a notice
        FlashEvent::CopyFinished(outcome) => {
            log::debug!("Copy finished: {}", outcome);
            None
        }
        FlashEvent::PortPoll { port, attempt } => {
            log::debug!("Waiting for {} (poll {})", port, attempt);
            None
        }
        FlashEvent::Output(line) => Some(format!("   │ {}", line)),
    }
}

/// Print events until every sender is dropped
pub async fn print_events(mut rx: mpsc::UnboundedReceiver<FlashEvent>) {
    while let Some(event) = rx.recv().await {
        if let Some(line) = render_event(&event) {
            println!("{}", line);
        }
    }
}
