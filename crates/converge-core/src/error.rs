//! Failure taxonomy for verification runs.
//!
//! Every divergence between expected and observed behavior surfaces as a
//! [`VerifyError`]: a structured [`FailureKind`] plus the breadcrumb context
//! accumulated through [`crate::verifier::Verifier::push_context`]. The
//! taxonomy is deliberately closed: a failure inside "apply iteration 2"
//! versus "verify fixed-state diagnostics" must be distinguishable without
//! reading a backtrace.

use thiserror::Error;

/// The closed set of ways a verification run can fail.
#[derive(Debug, Error)]
pub enum FailureKind {
    /// An expectation did not match observed behavior (counts, fields, diffs).
    #[error("{0}")]
    ExpectationMismatch(String),

    /// More than one candidate action matched the selection criteria.
    ///
    /// Distinct from "no action available": it means the test's selection
    /// criteria under-specify intent.
    #[error("multiple candidate actions matched the selection criteria: {0:?}")]
    AmbiguousSelection(Vec<String>),

    /// The iteration budget required at least one transformation, but the
    /// transformer never produced an appliable action.
    #[error("expected a transformation but none applied")]
    ExpectedTransformation,

    /// More effective iterations were attempted than the budget allows.
    #[error("iteration budget exceeded: expected at most {expected}, attempted {attempted}")]
    IterationBudgetExceeded {
        /// The maximum number of effective iterations allowed.
        expected: usize,
        /// The iteration ordinal that exceeded the budget.
        attempted: usize,
    },

    /// An exact iteration budget was not consumed exactly.
    #[error("iteration count mismatch: expected exactly {expected}, consumed {consumed}")]
    IterationCountMismatch {
        /// The exact number of effective iterations the caller contracted for.
        expected: usize,
        /// The number of effective iterations actually consumed.
        consumed: usize,
    },

    /// The transformer raised while computing or applying an action.
    ///
    /// Propagated, never masked; the engine does not retry a throwing
    /// transformer.
    #[error("transformer failure: {0}")]
    Transformer(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A newly introduced compiler error failed the run under
    /// [`crate::engine::CompilerRegressionPolicy::FailFast`].
    #[error("transformation introduced new compiler errors:\n{0}")]
    CompilerRegression(String),

    /// Cancellation was observed before the next iteration began.
    #[error("operation cancelled")]
    Cancelled,

    /// Two files in one project state share a path.
    #[error("duplicate path in project: {0:?}")]
    DuplicatePath(String),
}

/// A verification failure with its breadcrumb context.
///
/// The context path reads outermost-first, e.g.
/// `code fix application / iteration 2 / diagnostics of fixed state`.
#[derive(Debug)]
pub struct VerifyError {
    /// Breadcrumb labels pushed by nested verification stages.
    pub context: Vec<String>,
    /// The underlying failure.
    pub kind: FailureKind,
}

impl VerifyError {
    /// Create an error with no breadcrumb context.
    pub fn new(kind: FailureKind) -> Self {
        Self {
            context: Vec::new(),
            kind,
        }
    }

    /// Shorthand for an [`FailureKind::ExpectationMismatch`] without context.
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ExpectationMismatch(message.into()))
    }
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.context.join(" / "), self.kind)
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
