//! User interaction
//!
//! The flash sequence needs a handful of decisions from the user (pick a
//! folder, continue or reselect, pick a port). They go through [`Prompter`]
//! so the sequence can run against a terminal or a scripted fake.

pub mod terminal;

pub use terminal::TerminalPrompter;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::Result;
use crate::models::{Notice, PortEntry, PortRole};

#[async_trait]
pub trait Prompter: Send + Sync {
    /// Show a message. Never blocks for input.
    fn notify(&self, notice: Notice);

    /// Modal explanation with a single affirmative action. `true` when taken.
    async fn confirm(&self, message: &str, affirmative: &str) -> Result<bool>;

    /// Modal choice; `None` when dismissed
    async fn choose(&self, message: &str, options: &[&str]) -> Result<Option<usize>>;

    /// Ask for a directory; `None` when dismissed
    async fn select_directory(&self, title: &str) -> Result<Option<PathBuf>>;

    /// Pick one of `candidates` for `role`; returns the bare port name
    async fn select_port(&self, role: PortRole, candidates: &[PortEntry])
    -> Result<Option<String>>;
}
