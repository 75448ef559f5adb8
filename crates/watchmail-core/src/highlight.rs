//! Per-line change highlighting for the redraw cycle.

use crate::ansi::{RESET, REVERSE};
use std::collections::HashSet;

/// Decides which rendered lines get reverse-video emphasis.
///
/// The tracker remembers every line index that has ever differed between two
/// consecutive outputs. In accumulate mode that memory drives the rendering,
/// so a line stays marked even after its content reverts; in transient mode
/// only the lines that changed this round are emphasized. The marked set
/// grows in both modes so switching modes mid-run keeps history intact.
#[derive(Debug, Default)]
pub struct HighlightTracker {
    marked: HashSet<usize>,
}

impl HighlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `current` against `previous`, wrapping highlighted lines in a
    /// reverse-video escape pair. Missing entries compare as empty strings.
    pub fn render(&mut self, previous: &[&str], current: &[&str], accumulate: bool) -> String {
        let max_len = previous.len().max(current.len());
        let mut out = Vec::with_capacity(max_len);

        for i in 0..max_len {
            let old_line = previous.get(i).copied().unwrap_or("");
            let new_line = current.get(i).copied().unwrap_or("");
            let changed = old_line != new_line;

            if changed {
                self.marked.insert(i);
            }

            let highlight = if accumulate {
                self.marked.contains(&i)
            } else {
                changed
            };

            if highlight {
                out.push(format!("{}{}{}", REVERSE, new_line, RESET));
            } else {
                out.push(new_line.to_string());
            }
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_mode_highlights_only_changed_lines() {
        let mut tracker = HighlightTracker::new();
        let rendered = tracker.render(&["a", "b"], &["a", "X"], false);
        assert_eq!(rendered, format!("a\n{}X{}", REVERSE, RESET));
    }

    #[test]
    fn test_accumulate_mode_keeps_reverted_lines_marked() {
        let mut tracker = HighlightTracker::new();
        tracker.render(&["a", "b"], &["a", "X"], true);

        // Index 1 reverted to its original value but stays marked; index 0
        // changed this round.
        let rendered = tracker.render(&["a", "X"], &["Y", "b"], true);
        assert_eq!(
            rendered,
            format!("{}Y{}\n{}b{}", REVERSE, RESET, REVERSE, RESET)
        );
    }

    #[test]
    fn test_marked_set_grows_even_in_transient_mode() {
        let mut tracker = HighlightTracker::new();
        tracker.render(&["a", "b"], &["a", "X"], false);

        // Nothing changed this round, but index 1 was recorded above.
        let rendered = tracker.render(&["a", "X"], &["a", "X"], true);
        assert_eq!(rendered, format!("a\n{}X{}", REVERSE, RESET));
    }

    #[test]
    fn test_length_mismatch_fills_with_empty_strings() {
        let mut tracker = HighlightTracker::new();
        let rendered = tracker.render(&["a"], &["a", "new"], false);
        assert_eq!(rendered, format!("a\n{}new{}", REVERSE, RESET));

        let mut tracker = HighlightTracker::new();
        let rendered = tracker.render(&["a", "gone"], &["a"], false);
        assert_eq!(rendered, format!("a\n{}{}", REVERSE, RESET));
    }

    #[test]
    fn test_identical_inputs_render_plain() {
        let mut tracker = HighlightTracker::new();
        assert_eq!(tracker.render(&["a", "b"], &["a", "b"], false), "a\nb");
    }
}
