//! Text helpers for user-facing diagnostics

/// Maximum length of a subprocess diagnostic shown to the user
pub const MAX_DIAGNOSTIC_CHARS: usize = 300;

/// Trim and cut a message to at most `max_chars` characters.
///
/// Counts chars, not bytes, so multi-byte output never splits a code point.
pub fn truncate_diagnostic(message: &str, max_chars: usize) -> String {
    let trimmed = message.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => trimmed[..cut].to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_is_only_trimmed() {
        assert_eq!(truncate_diagnostic("  port busy\n", 300), "port busy");
    }

    #[test]
    fn test_long_message_is_cut() {
        let long = "x".repeat(1000);
        assert_eq!(truncate_diagnostic(&long, 300).len(), 300);
    }

    #[test]
    fn test_cut_respects_char_boundaries() {
        let msg = "é".repeat(10);
        assert_eq!(truncate_diagnostic(&msg, 4), "éééé");
    }
}
