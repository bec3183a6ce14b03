//! Span and location value types.
//!
//! Diagnostic locations are expressed as **1-based line/column spans** tied to
//! a file path. Expected spans may leave any of the four numeric fields
//! unchecked (a wildcard that always matches), so a test can pin down only the
//! coordinates it cares about. Actual spans produced by the diagnostic engine
//! are always fully resolved.

/// One coordinate of an expected span: either an exact 1-based value or a
/// wildcard that matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineColumn {
    /// An exact 1-based line or column number.
    Exact(u32),
    /// Wildcard: this coordinate is not checked.
    Unchecked,
}

impl LineColumn {
    /// Returns `true` if this coordinate matches the resolved value.
    pub fn matches(self, actual: u32) -> bool {
        match self {
            Self::Exact(value) => value == actual,
            Self::Unchecked => true,
        }
    }

    /// Sort key used by the canonical diagnostic order.
    ///
    /// Unchecked coordinates use a fixed zero sentinel so partially-checked
    /// expectations still sort deterministically.
    pub fn sort_key(self) -> u32 {
        match self {
            Self::Exact(value) => value,
            Self::Unchecked => 0,
        }
    }
}

impl std::fmt::Display for LineColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(value) => write!(f, "{}", value),
            Self::Unchecked => write!(f, "*"),
        }
    }
}

/// A line/column pair where each coordinate may independently be a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePosition {
    /// 1-based line number, or wildcard.
    pub line: LineColumn,
    /// 1-based column number, or wildcard.
    pub column: LineColumn,
}

impl LinePosition {
    /// Create an exact position.
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line: LineColumn::Exact(line),
            column: LineColumn::Exact(column),
        }
    }

    /// Create a fully unchecked position.
    pub fn unchecked() -> Self {
        Self {
            line: LineColumn::Unchecked,
            column: LineColumn::Unchecked,
        }
    }
}

/// An expected span: a path plus start/end positions with optional wildcards.
///
/// The absence of a span altogether (modeled as `Option<LocationSpan>` on the
/// diagnostic types) denotes a project-wide diagnostic with no location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSpan {
    /// File path the span refers to (with folder segments, `/`-separated).
    pub path: String,
    /// Start position (inclusive).
    pub start: LinePosition,
    /// End position (exclusive in columns, per the usual convention).
    pub end: LinePosition,
}

impl LocationSpan {
    /// Create a fully exact span.
    pub fn new(
        path: impl Into<String>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            path: path.into(),
            start: LinePosition::new(start_line, start_column),
            end: LinePosition::new(end_line, end_column),
        }
    }

    /// Create a span that checks only the path.
    pub fn path_only(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            start: LinePosition::unchecked(),
            end: LinePosition::unchecked(),
        }
    }

    /// Canonical sort key: path, then the four coordinates with wildcard
    /// sentinels.
    pub fn sort_key(&self) -> (&str, u32, u32, u32, u32) {
        (
            &self.path,
            self.start.line.sort_key(),
            self.start.column.sort_key(),
            self.end.line.sort_key(),
            self.end.column.sort_key(),
        )
    }

    /// Returns the first mismatching field against a resolved span, or `None`
    /// if every checked field matches.
    ///
    /// The returned tuple is `(field name, expected rendering, actual value)`.
    pub fn first_mismatch(&self, actual: &ResolvedSpan) -> Option<(&'static str, String, String)> {
        if self.path != actual.path {
            return Some(("path", self.path.clone(), actual.path.clone()));
        }
        let fields: [(&'static str, LineColumn, u32); 4] = [
            ("start line", self.start.line, actual.start_line),
            ("start column", self.start.column, actual.start_column),
            ("end line", self.end.line, actual.end_line),
            ("end column", self.end.column, actual.end_column),
        ];
        for (name, expected, observed) in fields {
            if !expected.matches(observed) {
                return Some((name, expected.to_string(), observed.to_string()));
            }
        }
        None
    }
}

impl std::fmt::Display for LocationSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({},{})-({},{})",
            self.path, self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// A fully resolved span as reported by the diagnostic engine.
///
/// All coordinates are concrete 1-based values; there are no wildcards on the
/// actual side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedSpan {
    /// File path the span refers to.
    pub path: String,
    /// 1-based start line.
    pub start_line: u32,
    /// 1-based start column.
    pub start_column: u32,
    /// 1-based end line.
    pub end_line: u32,
    /// 1-based end column.
    pub end_column: u32,
}

impl ResolvedSpan {
    /// Create a resolved span.
    pub fn new(
        path: impl Into<String>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            path: path.into(),
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Canonical sort key: path, then the four coordinates.
    pub fn sort_key(&self) -> (&str, u32, u32, u32, u32) {
        (
            &self.path,
            self.start_line,
            self.start_column,
            self.end_line,
            self.end_column,
        )
    }
}

impl std::fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({},{})-({},{})",
            self.path, self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}
