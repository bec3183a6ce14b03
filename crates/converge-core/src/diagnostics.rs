//! Diagnostic data model.
//!
//! Two mirrored shapes: [`ExpectedDiagnostic`] is built by the test author
//! (directly or via markup parsing) and may leave fields unchecked;
//! [`ActualDiagnostic`] is produced by the external diagnostic engine with
//! every field concrete. Both share the **canonical diagnostic order** used by
//! the matcher: primary-span path, start line, start column, end line, end
//! column, then id. Diagnostics without a location sort first via a fixed
//! sentinel so project-wide diagnostics group deterministically.

use crate::span::{LocationSpan, ResolvedSpan};

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error diagnostics.
    Error,
    /// Warning diagnostics.
    Warning,
    /// Informational diagnostics.
    Information,
    /// Hint diagnostics.
    Hint,
}

impl Severity {
    /// The variant name as a pasteable Rust path, for replayable rendering.
    pub fn literal(self) -> &'static str {
        match self {
            Self::Error => "Severity::Error",
            Self::Warning => "Severity::Warning",
            Self::Information => "Severity::Information",
            Self::Hint => "Severity::Hint",
        }
    }
}

/// How an expected diagnostic's message is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageExpectation {
    /// Compare the fully rendered message text verbatim.
    Literal(String),
    /// Substitute these arguments into the actual diagnostic's declared
    /// message format (`{0}`, `{1}`, ...) and compare the result.
    ///
    /// An empty argument list compares the bare format string, which is the
    /// default for diagnostics whose messages take no arguments.
    Arguments(Vec<String>),
}

impl MessageExpectation {
    /// Resolve the expectation into concrete message text.
    ///
    /// `format` is the actual diagnostic's declared message format and is only
    /// consulted for the [`MessageExpectation::Arguments`] variant.
    pub fn resolve(&self, format: &str) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Arguments(args) => {
                let mut message = format.to_string();
                for (i, arg) in args.iter().enumerate() {
                    message = message.replace(&format!("{{{}}}", i), arg);
                }
                message
            }
        }
    }
}

/// A diagnostic the test expects the analysis step to produce.
///
/// Immutable after construction; consumed once by the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDiagnostic {
    /// Diagnostic id (e.g. `"X1"`).
    pub id: String,
    /// Expected severity.
    pub severity: Severity,
    /// Message expectation.
    pub message: MessageExpectation,
    /// Primary span, or `None` for a project-wide diagnostic with no location.
    pub primary: Option<LocationSpan>,
    /// Additional spans, in order.
    pub additional: Vec<LocationSpan>,
    /// Whether the diagnostic is expected to be suppressed.
    pub is_suppressed: bool,
}

impl ExpectedDiagnostic {
    /// Create an expectation with no location and an argument-free message.
    pub fn new(id: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            severity,
            message: MessageExpectation::Arguments(Vec::new()),
            primary: None,
            additional: Vec::new(),
            is_suppressed: false,
        }
    }

    /// Set the primary span to an exact location.
    pub fn with_span(
        mut self,
        path: impl Into<String>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        self.primary = Some(LocationSpan::new(
            path,
            start_line,
            start_column,
            end_line,
            end_column,
        ));
        self
    }

    /// Set the primary span directly (for partially-checked spans).
    pub fn with_location(mut self, span: LocationSpan) -> Self {
        self.primary = Some(span);
        self
    }

    /// Expect the message text verbatim.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = MessageExpectation::Literal(message.into());
        self
    }

    /// Expect the message to be the declared format with these arguments.
    pub fn with_arguments(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.message = MessageExpectation::Arguments(args.into_iter().map(Into::into).collect());
        self
    }

    /// Append an additional span.
    pub fn with_additional_span(mut self, span: LocationSpan) -> Self {
        self.additional.push(span);
        self
    }

    /// Mark the diagnostic as expected-suppressed.
    pub fn suppressed(mut self) -> Self {
        self.is_suppressed = true;
        self
    }

    /// Canonical sort key; no-location diagnostics use the empty-path sentinel.
    pub fn sort_key(&self) -> (String, u32, u32, u32, u32, String) {
        match &self.primary {
            Some(span) => {
                let (path, sl, sc, el, ec) = span.sort_key();
                (path.to_string(), sl, sc, el, ec, self.id.clone())
            }
            None => (String::new(), 0, 0, 0, 0, self.id.clone()),
        }
    }
}

/// A diagnostic produced by the external diagnostic engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualDiagnostic {
    /// Diagnostic id.
    pub id: String,
    /// Reported severity.
    pub severity: Severity,
    /// Fully rendered message text.
    pub message: String,
    /// The declared message format the message was rendered from.
    pub message_format: String,
    /// Primary span, or `None` for a project-wide diagnostic.
    pub primary: Option<ResolvedSpan>,
    /// Additional spans, in order.
    pub additional: Vec<ResolvedSpan>,
    /// Whether the diagnostic was reported as suppressed.
    pub is_suppressed: bool,
}

impl ActualDiagnostic {
    /// Create an actual diagnostic whose message format equals its message.
    pub fn new(id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            id: id.into(),
            severity,
            message_format: message.clone(),
            message,
            primary: None,
            additional: Vec::new(),
            is_suppressed: false,
        }
    }

    /// Set the primary span.
    pub fn with_span(mut self, span: ResolvedSpan) -> Self {
        self.primary = Some(span);
        self
    }

    /// Append an additional span.
    pub fn with_additional_span(mut self, span: ResolvedSpan) -> Self {
        self.additional.push(span);
        self
    }

    /// Set the declared message format.
    pub fn with_message_format(mut self, format: impl Into<String>) -> Self {
        self.message_format = format.into();
        self
    }

    /// Mark the diagnostic as suppressed.
    pub fn suppressed(mut self) -> Self {
        self.is_suppressed = true;
        self
    }

    /// Canonical sort key; no-location diagnostics use the empty-path sentinel.
    pub fn sort_key(&self) -> (String, u32, u32, u32, u32, String) {
        match &self.primary {
            Some(span) => {
                let (path, sl, sc, el, ec) = span.sort_key();
                (path.to_string(), sl, sc, el, ec, self.id.clone())
            }
            None => (String::new(), 0, 0, 0, 0, self.id.clone()),
        }
    }

    /// Render this diagnostic as a re-playable expectation literal.
    ///
    /// The output is a pasteable builder chain, so a failing test's output can
    /// be copied back into the test as a passing expectation.
    pub fn render_expectation(&self) -> String {
        let mut out = format!(
            "ExpectedDiagnostic::new({:?}, {})",
            self.id,
            self.severity.literal()
        );
        if let Some(span) = &self.primary {
            out.push_str(&format!(
                ".with_span({:?}, {}, {}, {}, {})",
                span.path, span.start_line, span.start_column, span.end_line, span.end_column
            ));
        }
        out.push_str(&format!(".with_message({:?})", self.message));
        for span in &self.additional {
            out.push_str(&format!(
                ".with_additional_span(LocationSpan::new({:?}, {}, {}, {}, {}))",
                span.path, span.start_line, span.start_column, span.end_line, span.end_column
            ));
        }
        if self.is_suppressed {
            out.push_str(".suppressed()");
        }
        out
    }
}
