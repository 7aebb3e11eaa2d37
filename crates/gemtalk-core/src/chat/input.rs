//! Classification of a line typed at the chat prompt.

/// Words that end the chat session, matched case-insensitively.
pub const TERMINATION_KEYWORDS: [&str; 3] = ["exit", "quit", "bye"];

/// What the chat loop should do with one line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// A termination keyword: say goodbye and stop. No remote call.
    Quit,
    /// Blank line: prompt again. No remote call.
    Skip,
    /// Forward the text to the model.
    Send(String),
}

/// Whether `text` is one of [`TERMINATION_KEYWORDS`], ignoring case and
/// surrounding whitespace.
pub fn is_termination_keyword(text: &str) -> bool {
    let text = text.trim();
    TERMINATION_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(text))
}

/// Classify a raw input line.
pub fn classify_input(line: &str) -> InputAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        InputAction::Skip
    } else if is_termination_keyword(trimmed) {
        InputAction::Quit
    } else {
        InputAction::Send(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_keywords_any_case() {
        for word in ["exit", "EXIT", "Quit", "qUiT", "bye", "Bye", "  bye  "] {
            assert!(is_termination_keyword(word), "{word}");
            assert_eq!(classify_input(word), InputAction::Quit);
        }
    }

    #[test]
    fn test_keywords_must_match_whole_line() {
        for text in ["exit now", "goodbye", "quitting", "/exit"] {
            assert!(!is_termination_keyword(text), "{text}");
        }
        assert_eq!(
            classify_input("bye for now"),
            InputAction::Send("bye for now".to_string())
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(classify_input(""), InputAction::Skip);
        assert_eq!(classify_input("   \t"), InputAction::Skip);
    }

    #[test]
    fn test_send_trims_text() {
        assert_eq!(
            classify_input("  tell me a joke \n"),
            InputAction::Send("tell me a joke".to_string())
        );
    }
}
