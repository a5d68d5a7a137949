//! Scripted stand-ins for the toolchain, the user and the device ports
//!
//! Every fake records what it was asked so tests can assert on call order and
//! prompt counts without touching real hardware.

#![allow(dead_code)]

use async_trait::async_trait;
use baobrew::errors::{BaoError, Result};
use baobrew::models::{FlashEvent, FlashObserver, Notice, NoticeLevel, PortEntry, PortRole};
use baobrew::services::PortLister;
use baobrew::toolchain::{
    FirmwareBuilder, MonitorLauncher, RISCV_TARGET, RustEnvironment, ToolRun, Toolchain,
};
use baobrew::ui::Prompter;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Answers `bao.py <command>` from a table keyed by the first argument
pub struct ScriptedToolchain {
    root: PathBuf,
    responses: Mutex<HashMap<String, ToolRun>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedToolchain {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, command: &str, run: ToolRun) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(command.to_string(), run);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, command: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|args| args.first().map(String::as_str) == Some(command))
            .collect()
    }
}

#[async_trait]
impl Toolchain for ScriptedToolchain {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn run(&self, args: &[String]) -> Result<ToolRun> {
        self.calls.lock().unwrap().push(args.to_vec());
        let command = args.first().cloned().unwrap_or_default();
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&command)
            .cloned()
            .unwrap_or_else(|| ToolRun::failed(2, format!("unknown command: {}", command))))
    }
}

/// Prompter that replays queued answers and records everything shown
#[derive(Default)]
pub struct ScriptedPrompter {
    confirms: Mutex<VecDeque<bool>>,
    choices: Mutex<VecDeque<Option<usize>>>,
    directories: Mutex<VecDeque<Option<PathBuf>>>,
    ports: Mutex<VecDeque<Option<String>>>,
    notices: Mutex<Vec<Notice>>,
    prompts: AtomicUsize,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm_with(self, answer: bool) -> Self {
        self.confirms.lock().unwrap().push_back(answer);
        self
    }

    pub fn choose_with(self, answer: Option<usize>) -> Self {
        self.choices.lock().unwrap().push_back(answer);
        self
    }

    pub fn directory(self, answer: Option<PathBuf>) -> Self {
        self.directories.lock().unwrap().push_back(answer);
        self
    }

    pub fn port(self, answer: Option<&str>) -> Self {
        self.ports
            .lock()
            .unwrap()
            .push_back(answer.map(str::to_string));
        self
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    /// Warnings and errors only
    pub fn problems(&self) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|n| n.level != NoticeLevel::Info)
            .collect()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    async fn confirm(&self, _message: &str, _affirmative: &str) -> Result<bool> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(false))
    }

    async fn choose(&self, _message: &str, _options: &[&str]) -> Result<Option<usize>> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(self.choices.lock().unwrap().pop_front().flatten())
    }

    async fn select_directory(&self, _title: &str) -> Result<Option<PathBuf>> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(self.directories.lock().unwrap().pop_front().flatten())
    }

    async fn select_port(
        &self,
        _role: PortRole,
        _candidates: &[PortEntry],
    ) -> Result<Option<String>> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(self.ports.lock().unwrap().pop_front().flatten())
    }
}

/// Port listings replayed in order; the last one repeats forever
pub struct ScriptedPorts {
    script: Mutex<VecDeque<Vec<String>>>,
    last: Mutex<Vec<String>>,
    polls: AtomicUsize,
}

impl ScriptedPorts {
    pub fn new(script: Vec<Vec<&str>>) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|names| names.into_iter().map(str::to_string).collect())
                    .collect(),
            ),
            last: Mutex::new(Vec::new()),
            polls: AtomicUsize::new(0),
        }
    }

    /// Always lists exactly `names`
    pub fn always(names: &[&str]) -> Self {
        Self::new(vec![names.to_vec()])
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortLister for ScriptedPorts {
    async fn list_ports(&self) -> Result<Vec<PortEntry>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(last
            .iter()
            .map(|name| PortEntry {
                name: name.clone(),
                description: None,
            })
            .collect())
    }
}

/// Records monitor attachments instead of opening a terminal
#[derive(Default)]
pub struct RecordingMonitor {
    attached: Mutex<Vec<(String, u32)>>,
    fail: bool,
}

impl RecordingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn attached(&self) -> Vec<(String, u32)> {
        self.attached.lock().unwrap().clone()
    }
}

#[async_trait]
impl MonitorLauncher for RecordingMonitor {
    async fn attach(&self, port: &str, baud: u32) -> Result<()> {
        self.attached.lock().unwrap().push((port.to_string(), baud));
        if self.fail {
            return Err(BaoError::Toolchain(format!("monitor on {} exited with 1", port)));
        }
        Ok(())
    }
}

/// Builder that succeeds or fails without running cargo
pub struct FakeBuilder {
    pub fail: bool,
    pub runs: AtomicUsize,
}

impl FakeBuilder {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            runs: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FirmwareBuilder for FakeBuilder {
    async fn build(&self, observer: Arc<dyn FlashObserver>) -> Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        observer.on_event(FlashEvent::Output("Compiling xous-kernel".to_string()));
        if self.fail {
            return Err(BaoError::Build("cargo xtask exited 101".to_string()));
        }
        Ok(())
    }
}

/// Host Rust install with configurable gaps
pub struct FakeRust {
    pub tools: Vec<String>,
    /// `None` when rustup is missing
    pub targets: Option<Vec<String>>,
    pub install_fails: bool,
    added: Mutex<Vec<String>>,
}

impl FakeRust {
    /// rustc, cargo and the RISC-V target all present
    pub fn complete() -> Self {
        Self {
            tools: vec!["rustc".to_string(), "cargo".to_string()],
            targets: Some(vec![
                "x86_64-unknown-linux-gnu".to_string(),
                RISCV_TARGET.to_string(),
            ]),
            install_fails: false,
            added: Mutex::new(Vec::new()),
        }
    }

    pub fn without_tool(mut self, tool: &str) -> Self {
        self.tools.retain(|t| t != tool);
        self
    }

    pub fn without_riscv_target(mut self) -> Self {
        if let Some(targets) = &mut self.targets {
            targets.retain(|t| t != RISCV_TARGET);
        }
        self
    }

    pub fn without_rustup(mut self) -> Self {
        self.targets = None;
        self
    }

    pub fn failing_install(mut self) -> Self {
        self.install_fails = true;
        self
    }

    pub fn added(&self) -> Vec<String> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl RustEnvironment for FakeRust {
    async fn tool_version(&self, tool: &str) -> Option<String> {
        self.tools
            .iter()
            .any(|t| t == tool)
            .then(|| format!("{} 1.90.0", tool))
    }

    async fn installed_targets(&self) -> Option<Vec<String>> {
        let mut targets = self.targets.clone()?;
        targets.extend(self.added());
        Some(targets)
    }

    async fn add_target(&self, target: &str) -> Result<()> {
        if self.install_fails {
            return Err(BaoError::Build("toolchain 'stable' is not installed".to_string()));
        }
        self.added.lock().unwrap().push(target.to_string());
        Ok(())
    }
}

/// Collects events; optionally raises a cancel flag once `k` files are copied
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<FlashEvent>>,
    cancel_after: Option<(usize, Arc<AtomicBool>)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_after(copied: usize, flag: Arc<AtomicBool>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cancel_after: Some((copied, flag)),
        }
    }

    pub fn events(&self) -> Vec<FlashEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Files in the order they started copying
    pub fn copy_order(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                FlashEvent::FileCopying { file, .. } => Some(file),
                _ => None,
            })
            .collect()
    }
}

impl FlashObserver for RecordingObserver {
    fn on_event(&self, event: FlashEvent) {
        if let (FlashEvent::FileCopied { copied, .. }, Some((k, flag))) =
            (&event, &self.cancel_after)
        {
            if copied == k {
                flag.store(true, Ordering::SeqCst);
            }
        }
        self.events.lock().unwrap().push(event);
    }
}
