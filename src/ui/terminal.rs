//! Line-based prompts on stdin/stderr

use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use crate::errors::{BaoError, Result};
use crate::models::{Notice, PortEntry, PortRole};
use crate::ui::Prompter;

/// Prompts on the controlling terminal.
///
/// With `assume_yes` every confirmation is accepted and every choice takes
/// its first option; directory and port pickers still need input.
pub struct TerminalPrompter {
    input: Mutex<BufReader<Stdin>>,
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin())),
            assume_yes,
        }
    }

    async fn ask(&self, prompt: &str) -> Result<Option<String>> {
        eprint!("{} ", prompt);
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .await
            .read_line(&mut line)
            .await
            .map_err(|e| BaoError::Prompt(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            return Ok(None);
        }
        let line = line.trim();
        Ok((!line.is_empty()).then(|| line.to_string()))
    }
}

/// Parse a 1-based menu answer
fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}

#[async_trait]
impl Prompter for TerminalPrompter {
    fn notify(&self, notice: Notice) {
        log::debug!("notice ({:?}): {}", notice.level, notice.message);
        eprintln!("{}", notice);
    }

    async fn confirm(&self, message: &str, affirmative: &str) -> Result<bool> {
        eprintln!("\n{}", message);
        if self.assume_yes {
            eprintln!("→ {}", affirmative);
            return Ok(true);
        }
        let answer = self.ask(&format!("{}? [y/N]", affirmative)).await?;
        Ok(matches!(
            answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    async fn choose(&self, message: &str, options: &[&str]) -> Result<Option<usize>> {
        eprintln!("\n{}", message);
        if self.assume_yes && !options.is_empty() {
            eprintln!("→ {}", options[0]);
            return Ok(Some(0));
        }
        for (i, option) in options.iter().enumerate() {
            eprintln!("  [{}] {}", i + 1, option);
        }
        let answer = self.ask("Choose (empty to cancel):").await?;
        Ok(answer.and_then(|a| parse_choice(&a, options.len())))
    }

    async fn select_directory(&self, title: &str) -> Result<Option<PathBuf>> {
        let answer = self.ask(&format!("{} (path, empty to cancel):", title)).await?;
        Ok(answer.map(PathBuf::from))
    }

    async fn select_port(
        &self,
        role: PortRole,
        candidates: &[PortEntry],
    ) -> Result<Option<String>> {
        eprintln!("\nSelect {} serial port:", role.friendly_name());
        for (i, port) in candidates.iter().enumerate() {
            match &port.description {
                Some(desc) => eprintln!("  [{}] {}  ({})", i + 1, port.name, desc),
                None => eprintln!("  [{}] {}", i + 1, port.name),
            }
        }
        let answer = self.ask("Port number (empty to cancel):").await?;
        Ok(answer
            .and_then(|a| parse_choice(&a, candidates.len()))
            .map(|i| candidates[i].name.clone()))
    }
}
