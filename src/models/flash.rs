//! Flash-related data models

use std::fmt;

/// Terminal result of copying images to the device drive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashOutcome {
    /// Every requested file was copied
    Success { copied: usize },
    /// The user cancelled; `copied` files were left in place
    Cancelled { copied: usize },
    /// A copy failed; `copied` files made it before the failure
    Failed { copied: usize, message: String },
}

impl FlashOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FlashOutcome::Success { .. })
    }

    /// Number of files written to the destination
    pub fn copied(&self) -> usize {
        match self {
            FlashOutcome::Success { copied }
            | FlashOutcome::Cancelled { copied }
            | FlashOutcome::Failed { copied, .. } => *copied,
        }
    }
}

impl fmt::Display for FlashOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashOutcome::Success { copied } => write!(
                f,
                "flashed {} file{}",
                copied,
                if *copied == 1 { "" } else { "s" }
            ),
            FlashOutcome::Cancelled { copied } => {
                write!(f, "flash cancelled after {} file(s)", copied)
            }
            FlashOutcome::Failed { message, .. } => write!(f, "flash failed: {}", message),
        }
    }
}
