//! Line-based text diff and rendering.
//!
//! A small LCS-based diff used by the project verifier to render content
//! mismatches. Two rendering modes:
//!
//! - the default unified rendering (`-`/`+`/space prefixes), and
//! - a line-ending-visible rendering used when two texts differ **only** in
//!   line-ending style, where a plain diff would show identical-looking
//!   lines. `\r` and `\n` are rendered as literal `\r`/`\n` tokens so the
//!   discrepancy is unambiguous.

/// One operation in a line diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    /// Line present in both texts.
    Equal(String),
    /// Line present only in the expected text.
    Delete(String),
    /// Line present only in the actual text.
    Insert(String),
}

/// Split text into lines, keeping each line's ending characters.
fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split_inclusive('\n').collect()
}

/// Build the LCS length table for two line sequences.
fn lcs_table(expected: &[&str], actual: &[&str]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; actual.len() + 1]; expected.len() + 1];
    for i in (0..expected.len()).rev() {
        for j in (0..actual.len()).rev() {
            table[i][j] = if expected[i] == actual[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }
    table
}

/// Compute a line diff between two texts.
///
/// Lines compare with their endings included, so `"a\n"` and `"a\r\n"` are
/// different lines.
pub fn diff_lines(expected: &str, actual: &str) -> Vec<DiffOp> {
    let expected_lines = split_lines(expected);
    let actual_lines = split_lines(actual);
    let table = lcs_table(&expected_lines, &actual_lines);

    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < expected_lines.len() && j < actual_lines.len() {
        if expected_lines[i] == actual_lines[j] {
            ops.push(DiffOp::Equal(expected_lines[i].to_string()));
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            ops.push(DiffOp::Delete(expected_lines[i].to_string()));
            i += 1;
        } else {
            ops.push(DiffOp::Insert(actual_lines[j].to_string()));
            j += 1;
        }
    }
    while i < expected_lines.len() {
        ops.push(DiffOp::Delete(expected_lines[i].to_string()));
        i += 1;
    }
    while j < actual_lines.len() {
        ops.push(DiffOp::Insert(actual_lines[j].to_string()));
        j += 1;
    }
    ops
}

/// Returns `true` if the two texts are unequal but become equal once all
/// line endings are normalized to LF.
pub fn differs_only_in_line_endings(expected: &str, actual: &str) -> bool {
    expected != actual && normalize_endings(expected) == normalize_endings(actual)
}

fn normalize_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Render `\r` and `\n` as literal two-character tokens, keeping a real
/// newline after each `\n` so the output stays line-shaped.
pub fn render_visible_endings(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n\n")
}

/// Render a unified diff between two texts.
///
/// When the only discrepancy is line-ending style, both sides are re-rendered
/// with visible line-ending tokens first; otherwise the diff would show two
/// visually identical lines.
pub fn render_unified(expected: &str, actual: &str) -> String {
    let (expected_view, actual_view);
    let (expected, actual) = if differs_only_in_line_endings(expected, actual) {
        expected_view = render_visible_endings(expected);
        actual_view = render_visible_endings(actual);
        (expected_view.as_str(), actual_view.as_str())
    } else {
        (expected, actual)
    };

    let mut out = String::new();
    for op in diff_lines(expected, actual) {
        let (prefix, line) = match &op {
            DiffOp::Equal(line) => (' ', line),
            DiffOp::Delete(line) => ('-', line),
            DiffOp::Insert(line) => ('+', line),
        };
        out.push(prefix);
        out.push_str(line.trim_end_matches(['\r', '\n']));
        out.push('\n');
    }
    out
}
