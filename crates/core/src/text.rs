/// Trimmed string equality, the rule behind the editor's dirty flag.
///
/// Whitespace-only differences never count as unsaved work, so they neither
/// block navigation nor trigger spurious autosaves.
#[must_use]
pub fn trimmed_eq(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_whitespace_is_not_a_difference() {
        assert!(trimmed_eq(
            "Patient reports improved mood.",
            "Patient reports improved mood. "
        ));
        assert!(!trimmed_eq("Patient reports improved mood.", "Patient reports low mood."));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        // é is two bytes; cutting mid-char steps back.
        assert_eq!(truncate("café", 4), "caf");
    }
}
