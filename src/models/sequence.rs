//! Flash/boot sequence steps and outcomes

use std::fmt;

use crate::models::version::VersionInfo;

/// Steps of the flash/boot sequence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashStep {
    Build,
    ResolveDestination,
    GatherArtifacts,
    ResolveBootloaderPort,
    CompareVersions,
    SelectFiles,
    CopyFiles,
    SendBoot,
    ResolveRunPort,
    WaitForRunPort,
    AttachMonitor,
}

impl FlashStep {
    pub fn description(&self) -> &'static str {
        match self {
            FlashStep::Build => "build",
            FlashStep::ResolveDestination => "resolve flash location",
            FlashStep::GatherArtifacts => "gather firmware images",
            FlashStep::ResolveBootloaderPort => "resolve bootloader-mode port",
            FlashStep::CompareVersions => "compare firmware versions",
            FlashStep::SelectFiles => "select images",
            FlashStep::CopyFiles => "copy images",
            FlashStep::SendBoot => "send boot command",
            FlashStep::ResolveRunPort => "resolve run-mode port",
            FlashStep::WaitForRunPort => "wait for run-mode port",
            FlashStep::AttachMonitor => "attach monitor",
        }
    }
}

impl fmt::Display for FlashStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// What a completed sequence did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceReport {
    pub copied: usize,
    /// `None` when the version comparison was skipped (force-all)
    pub version: Option<VersionInfo>,
    /// `None` when the sequence stopped after copying
    pub run_port_ready: Option<bool>,
    pub monitor_attached: bool,
}

/// Terminal state of one sequence run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOutcome {
    Completed(SequenceReport),
    Aborted { step: FlashStep, message: String },
}

impl SequenceOutcome {
    pub fn aborted_at(&self) -> Option<FlashStep> {
        match self {
            SequenceOutcome::Aborted { step, .. } => Some(*step),
            SequenceOutcome::Completed(_) => None,
        }
    }
}
