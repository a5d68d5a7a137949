//! Structured vs. scraped toolchain output

use serde::de::DeserializeOwned;

/// Parsed stdout of a toolchain query.
///
/// JSON is the contract; plain text is kept only so callers can apply an
/// explicit, degraded interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput<T> {
    Structured(T),
    FallbackText(String),
}

impl<T: DeserializeOwned> ToolOutput<T> {
    /// Parse the whole of stdout as JSON, else the last line that looks like
    /// JSON (the tool may log before printing its payload), else keep the text.
    pub fn parse(stdout: &str) -> Self {
        let trimmed = stdout.trim();
        if let Ok(value) = serde_json::from_str::<T>(trimmed) {
            return ToolOutput::Structured(value);
        }

        let json_line = trimmed
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| line.starts_with('{') || line.starts_with('['));
        if let Some(line) = json_line {
            if let Ok(value) = serde_json::from_str::<T>(line) {
                return ToolOutput::Structured(value);
            }
        }

        ToolOutput::FallbackText(trimmed.to_string())
    }
}
