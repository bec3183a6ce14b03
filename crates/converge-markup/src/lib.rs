#![warn(missing_docs)]
//! Inline markup parsing for `converge-core`.
//!
//! Test sources can embed location markers directly in the text instead of
//! spelling out line/column coordinates:
//!
//! - `[|...|]` marks an anonymous span
//! - `{|Id:...|}` marks a span carrying a diagnostic id
//!
//! Markers nest and may appear any number of times. Positions are reported as
//! 1-based line/column against the **stripped** text (the text with all
//! markers removed), which is what the engine and the diagnostic engine see.
//!
//! The parser runs once at setup; the engine itself only ever consumes the
//! already-parsed [`MarkupFile`].
//!
//! ```rust
//! use converge_markup::parse_markup;
//!
//! let file = parse_markup("src/lib.rs", "class C { void M(){|X1: ;|} }").unwrap();
//! assert_eq!(file.text, "class C { void M() ; }");
//! assert_eq!(file.spans[0].id.as_deref(), Some("X1"));
//! ```

use std::sync::OnceLock;

use converge_core::{ExpectedDiagnostic, LineIndex, ResolvedSpan, Severity};
use regex::Regex;
use thiserror::Error;

/// Errors produced by the markup parser.
///
/// Offsets are character offsets into the marked (unstripped) input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    /// A span marker was opened but never closed.
    #[error("unterminated span marker opened at offset {offset}")]
    UnterminatedSpan {
        /// Character offset of the opening marker.
        offset: usize,
    },

    /// A close marker appeared with no matching open marker.
    #[error("unexpected close marker {token:?} at offset {offset}")]
    UnexpectedClose {
        /// Character offset of the close marker.
        offset: usize,
        /// The close token encountered.
        token: &'static str,
    },

    /// A close marker did not match the kind of the innermost open marker.
    #[error("close marker {found:?} at offset {offset} does not match open marker (expected {expected:?})")]
    MismatchedClose {
        /// Character offset of the close marker.
        offset: usize,
        /// The close token required by the innermost open marker.
        expected: &'static str,
        /// The close token encountered.
        found: &'static str,
    },

    /// A `{|...|}` marker had no `:` separating the id from the content.
    #[error("diagnostic marker at offset {offset} is missing the ':' id separator")]
    MissingIdSeparator {
        /// Character offset of the opening marker.
        offset: usize,
    },

    /// A diagnostic id was empty or contained invalid characters.
    #[error("invalid diagnostic id {id:?} at offset {offset}")]
    InvalidDiagnosticId {
        /// Character offset of the opening marker.
        offset: usize,
        /// The offending id text.
        id: String,
    },
}

/// One span extracted from markup, in order of opening position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    /// Diagnostic id for `{|Id:...|}` markers, `None` for `[|...|]`.
    pub id: Option<String>,
    /// The span's resolved 1-based location in the stripped text.
    pub span: ResolvedSpan,
}

/// The result of parsing a marked-up source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupFile {
    /// The source text with all markers removed.
    pub text: String,
    /// Extracted spans, ordered by opening position.
    pub spans: Vec<MarkupSpan>,
}

impl MarkupFile {
    /// Build expected diagnostics from the id-carrying spans.
    ///
    /// All diagnostics get the given severity and an argument-free message
    /// expectation; callers refine individual entries afterwards if needed.
    pub fn expected_diagnostics(&self, severity: Severity) -> Vec<ExpectedDiagnostic> {
        self.spans
            .iter()
            .filter_map(|marked| {
                let id = marked.id.as_ref()?;
                Some(ExpectedDiagnostic::new(id, severity).with_span(
                    marked.span.path.clone(),
                    marked.span.start_line,
                    marked.span.start_column,
                    marked.span.end_line,
                    marked.span.end_column,
                ))
            })
            .collect()
    }

    /// The first span, if any (the usual refactoring trigger location).
    pub fn first_span(&self) -> Option<&ResolvedSpan> {
        self.spans.first().map(|marked| &marked.span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Anonymous,
    Diagnostic,
}

impl MarkerKind {
    fn close_token(self) -> &'static str {
        match self {
            Self::Anonymous => "|]",
            Self::Diagnostic => "|}",
        }
    }
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.]*$").expect("static pattern"))
}

/// Parse a marked-up source text into stripped text plus extracted spans.
///
/// `path` is recorded on every extracted span.
pub fn parse_markup(path: &str, marked: &str) -> Result<MarkupFile, MarkupError> {
    let chars: Vec<char> = marked.chars().collect();
    let mut stripped = String::new();
    let mut stripped_len = 0usize;

    // (kind, marked offset of the open token, index into `pending`)
    let mut stack: Vec<(MarkerKind, usize, usize)> = Vec::new();
    // (id, start offset in stripped text, end offset once closed)
    let mut pending: Vec<(Option<String>, usize, Option<usize>)> = Vec::new();

    let mut i = 0usize;
    while i < chars.len() {
        match (chars[i], chars.get(i + 1)) {
            ('[', Some('|')) => {
                stack.push((MarkerKind::Anonymous, i, pending.len()));
                pending.push((None, stripped_len, None));
                i += 2;
            }
            ('{', Some('|')) => {
                let mut j = i + 2;
                let mut id = String::new();
                loop {
                    match chars.get(j) {
                        Some(':') => break,
                        Some('|') if chars.get(j + 1) == Some(&'}') => {
                            return Err(MarkupError::MissingIdSeparator { offset: i });
                        }
                        Some(c) => {
                            id.push(*c);
                            j += 1;
                        }
                        None => return Err(MarkupError::MissingIdSeparator { offset: i }),
                    }
                }
                if !id_pattern().is_match(&id) {
                    return Err(MarkupError::InvalidDiagnosticId { offset: i, id });
                }
                stack.push((MarkerKind::Diagnostic, i, pending.len()));
                pending.push((Some(id), stripped_len, None));
                i = j + 1;
            }
            ('|', Some(']')) => {
                close_marker(&mut stack, &mut pending, MarkerKind::Anonymous, i, stripped_len)?;
                i += 2;
            }
            ('|', Some('}')) => {
                close_marker(&mut stack, &mut pending, MarkerKind::Diagnostic, i, stripped_len)?;
                i += 2;
            }
            (c, _) => {
                stripped.push(c);
                stripped_len += 1;
                i += 1;
            }
        }
    }

    if let Some((_, offset, _)) = stack.first() {
        return Err(MarkupError::UnterminatedSpan { offset: *offset });
    }

    let index = LineIndex::from_text(&stripped);
    let spans = pending
        .into_iter()
        .map(|(id, start, end)| {
            let (start_line, start_column) = index.position_at(start);
            // Closed markers always carry an end offset at this point.
            let (end_line, end_column) = index.position_at(end.unwrap_or(start));
            MarkupSpan {
                id,
                span: ResolvedSpan::new(path, start_line, start_column, end_line, end_column),
            }
        })
        .collect();

    Ok(MarkupFile {
        text: stripped,
        spans,
    })
}

fn close_marker(
    stack: &mut Vec<(MarkerKind, usize, usize)>,
    pending: &mut [(Option<String>, usize, Option<usize>)],
    kind: MarkerKind,
    offset: usize,
    stripped_len: usize,
) -> Result<(), MarkupError> {
    match stack.pop() {
        None => Err(MarkupError::UnexpectedClose {
            offset,
            token: kind.close_token(),
        }),
        Some((open_kind, _, _)) if open_kind != kind => Err(MarkupError::MismatchedClose {
            offset,
            expected: open_kind.close_token(),
            found: kind.close_token(),
        }),
        Some((_, _, index)) => {
            pending[index].2 = Some(stripped_len);
            Ok(())
        }
    }
}
