//! Rope-backed line index for span resolution.
//!
//! Converts between character offsets and 1-based line/column positions using
//! [`ropey::Rope`] for O(log n) line access. The markup parser and trigger
//! resolution both need this conversion; the rest of the engine works on
//! already-resolved spans.

use ropey::Rope;

/// Line index over an immutable text, expressed in character offsets
/// (Unicode scalar values) and 1-based line/column positions.
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Build a line index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Convert a character offset to a 1-based `(line, column)` position.
    ///
    /// Offsets past the end of the text clamp to the final position.
    pub fn position_at(&self, char_offset: usize) -> (u32, u32) {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line_idx = self.rope.char_to_line(char_offset);
        let line_start = self.rope.line_to_char(line_idx);
        ((line_idx + 1) as u32, (char_offset - line_start + 1) as u32)
    }

    /// Convert a 1-based `(line, column)` position to a character offset.
    ///
    /// Out-of-range positions clamp to the nearest valid offset.
    pub fn offset_at(&self, line: u32, column: u32) -> usize {
        let line_idx = (line.max(1) as usize) - 1;
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let line_start = self.rope.line_to_char(line_idx);
        let line_end = if line_idx + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line_idx + 1) - 1
        } else {
            self.rope.len_chars()
        };
        let column_idx = (column.max(1) as usize) - 1;
        (line_start + column_idx).min(line_end)
    }

    /// Text of the given 0-based line, without its trailing newline.
    pub fn line_text(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let mut text = self.rope.line(line_idx).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_at_is_one_based() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");
        assert_eq!(index.position_at(0), (1, 1)); // A
        assert_eq!(index.position_at(2), (1, 3)); // C
        assert_eq!(index.position_at(4), (2, 1)); // D
        assert_eq!(index.position_at(8), (3, 1)); // G
    }

    #[test]
    fn test_offset_at_round_trips() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");
        assert_eq!(index.offset_at(1, 1), 0);
        assert_eq!(index.offset_at(2, 1), 4);
        assert_eq!(index.offset_at(3, 3), 10);
    }

    #[test]
    fn test_offset_at_clamps_past_line_end() {
        let index = LineIndex::from_text("AB\nCD");
        // Column 99 on line 1 clamps to just before the newline.
        assert_eq!(index.offset_at(1, 99), 2);
    }

    #[test]
    fn test_position_at_clamps_past_text_end() {
        let index = LineIndex::from_text("AB");
        assert_eq!(index.position_at(999), (1, 3));
    }

    #[test]
    fn test_cjk_offsets_count_chars_not_bytes() {
        let index = LineIndex::from_text("你好\n世界");
        assert_eq!(index.char_count(), 5);
        assert_eq!(index.position_at(3), (2, 1));
        assert_eq!(index.offset_at(2, 2), 4);
    }

    #[test]
    fn test_line_text_strips_newline() {
        let index = LineIndex::from_text("one\ntwo\n");
        assert_eq!(index.line_text(0).as_deref(), Some("one"));
        assert_eq!(index.line_text(1).as_deref(), Some("two"));
        assert_eq!(index.line_text(5), None);
    }
}
