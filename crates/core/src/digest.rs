//! Local fallback digest for a page of session notes.
//!
//! Used when the external summarization endpoint is unconfigured or fails.
//! Must never fail itself: it degrades to a fixed message when the notes
//! contain no usable lines.

/// Maximum number of lines carried into the local digest.
pub const MAX_DIGEST_LINES: usize = 8;

/// Emitted when no non-empty lines remain after trimming.
pub const NO_HIGHLIGHTS: &str = "No salient highlights for this session.";

/// Derive a bullet-list digest from raw note texts.
///
/// Splits every text into lines, trims them, drops empties, and keeps the
/// first [`MAX_DIGEST_LINES`] in original order.
#[must_use]
pub fn local_digest(texts: &[String]) -> String {
    let lines: Vec<&str> = texts
        .iter()
        .flat_map(|t| t.lines())
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(MAX_DIGEST_LINES)
        .collect();

    if lines.is_empty() {
        return NO_HIGHLIGHTS.to_owned();
    }

    lines.iter().map(|l| format!("• {l}")).collect::<Vec<_>>().join("\n")
}
