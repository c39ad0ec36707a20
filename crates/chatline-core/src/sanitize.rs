//! Make untrusted text safe to put on screen.
//!
//! Message text comes from the user and from the server. It is shown exactly
//! as written: markup stays literal, and control characters (which a terminal
//! would otherwise act on, e.g. `ESC [2J`) are replaced by a visible escape.

/// Escape control characters other than newline and tab.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\t' => out.push(c),
            '\r' => {}
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_kept_literal() {
        assert_eq!(escape_text("<script>x</script>"), "<script>x</script>");
    }

    #[test]
    fn escape_sequences_become_visible() {
        assert_eq!(escape_text("\x1b[2Jgone"), "\\u{1b}[2Jgone");
    }

    #[test]
    fn newlines_and_tabs_survive() {
        assert_eq!(escape_text("a\r\n\tb"), "a\n\tb");
    }

    #[test]
    fn unicode_passes_through() {
        assert_eq!(escape_text("héllo 👋"), "héllo 👋");
    }
}
