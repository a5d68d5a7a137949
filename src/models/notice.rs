//! User-facing notices and the follow-up actions attached to them

use std::fmt;

use crate::models::port::PortRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Action the user can take to fix whatever made a run abort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    SelectTarget,
    SelectFlashLocation,
    SetBootloaderPort,
    SetRunPort,
    SetToolchainPath,
    SelectApp,
    Build,
}

impl FollowUp {
    pub fn set_port(role: PortRole) -> Self {
        match role {
            PortRole::Run => FollowUp::SetRunPort,
            PortRole::Bootloader => FollowUp::SetBootloaderPort,
        }
    }

    /// Button-style label
    pub fn label(&self) -> &'static str {
        match self {
            FollowUp::SelectTarget => "Select Target",
            FollowUp::SelectFlashLocation => "Select Folder",
            FollowUp::SetBootloaderPort | FollowUp::SetRunPort => "Set Port",
            FollowUp::SetToolchainPath => "Set xous-core Path",
            FollowUp::SelectApp => "Select App",
            FollowUp::Build => "Build",
        }
    }

    /// baobrew invocation that performs the action
    pub fn command_hint(&self) -> &'static str {
        match self {
            FollowUp::SelectTarget => "baobrew config set build-target <TARGET>",
            FollowUp::SelectFlashLocation => "baobrew config set-flash-location <DIR>",
            FollowUp::SetBootloaderPort => "baobrew config set-port --bootloader",
            FollowUp::SetRunPort => "baobrew config set-port --run",
            FollowUp::SetToolchainPath => "baobrew config set xous-core-path <DIR>",
            FollowUp::SelectApp => "baobrew apps select <APP>",
            FollowUp::Build => "baobrew build",
        }
    }
}

/// A single message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub follow_up: Option<FollowUp>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            follow_up: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            follow_up: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            follow_up: None,
        }
    }

    pub fn with_follow_up(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = Some(follow_up);
        self
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.level {
            NoticeLevel::Info => "ℹ️ ",
            NoticeLevel::Warning => "⚠️ ",
            NoticeLevel::Error => "❌",
        };
        write!(f, "{} {}", symbol, self.message)?;
        if let Some(action) = self.follow_up {
            write!(f, "\n   → {}: {}", action.label(), action.command_hint())?;
        }
        Ok(())
    }
}
