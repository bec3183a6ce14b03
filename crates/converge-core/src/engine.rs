//! Transformation convergence engine.
//!
//! The bounded apply/re-analyze loop at the heart of the verifier:
//!
//! ```text
//! Start → Analyzing → Selecting → Applying → Analyzing (loop)
//!                                          → Converged | Failed
//! ```
//!
//! Each iteration runs the transformer against the current project to obtain
//! a candidate-action tree rooted at the trigger location, deterministically
//! selects one leaf (see [`crate::action::select`]), applies it to produce a
//! new [`ProjectState`], and re-analyzes. The loop ends when no action is
//! available (the normal convergence signal) or when the iteration budget is
//! violated.
//!
//! Determinism: the engine consults no clock, no randomness, and no I/O.
//! Given the same initial project and transformer, the sequence of
//! intermediate states is reproducible; applied action titles are recorded in
//! the outcome so reproducibility can be asserted.
//!
//! Cancellation is cooperative: the token is checked before each iteration
//! begins. An in-flight apply is never interrupted mid-step.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace, warn};

use crate::action::{ActionSelection, CandidateAction, select};
use crate::diagnostics::{ActualDiagnostic, Severity};
use crate::error::{FailureKind, VerifyError};
use crate::host::AnalysisTrigger;
use crate::project::ProjectState;
use crate::verifier::Verifier;

/// Error type external collaborators may raise.
pub type TransformerError = Box<dyn std::error::Error + Send + Sync>;

/// The external diagnostic engine (out of scope for the core; consumed as a
/// trait).
pub trait DiagnosticEngine {
    /// Run the diagnostic-producing analysis step against a project.
    fn diagnostics(&self, project: &ProjectState)
    -> Result<Vec<ActualDiagnostic>, TransformerError>;

    /// Compiler-level diagnostics, used to detect regressions introduced by
    /// an applied edit. Defaults to none for hosts without a compiler.
    fn compiler_diagnostics(
        &self,
        project: &ProjectState,
    ) -> Result<Vec<ActualDiagnostic>, TransformerError> {
        let _ = project;
        Ok(Vec::new())
    }
}

/// The pluggable component under test: proposes and applies edits.
pub trait Transformer {
    /// Compute the candidate-action tree rooted at the trigger location.
    fn compute_actions(
        &self,
        project: &ProjectState,
        trigger: &AnalysisTrigger,
    ) -> Result<Vec<CandidateAction>, TransformerError>;

    /// Apply a chosen leaf action, producing a new project state.
    fn apply(
        &self,
        project: &ProjectState,
        action: &CandidateAction,
    ) -> Result<ProjectState, TransformerError>;
}

/// Cooperative cancellation signal.
///
/// Cloned tokens share the same flag. The engine checks the token before
/// starting each iteration; it never interrupts an in-flight apply.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns `true` once cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// The caller's contract on how many effective iterations are expected.
///
/// Positive means "exactly N non-empty iterations are required", negative
/// means "at most |N|", zero means "no transformation is expected to apply".
/// This is a hard contract, not a heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationBudget(i32);

impl IterationBudget {
    /// Wrap a raw signed budget value.
    pub fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Exactly `n` effective iterations are required.
    pub fn exactly(n: u16) -> Self {
        Self(i32::from(n))
    }

    /// At most `n` effective iterations are allowed.
    pub fn at_most(n: u16) -> Self {
        Self(-i32::from(n))
    }

    /// No transformation is expected to apply.
    pub fn none() -> Self {
        Self(0)
    }

    /// The maximum number of effective iterations.
    pub fn limit(self) -> usize {
        self.0.unsigned_abs() as usize
    }

    /// Returns `true` if the budget is an exact (positive) count.
    pub fn is_exact(self) -> bool {
        self.0 > 0
    }
}

/// What to do when an applied edit introduces new compiler errors.
///
/// The reference behavior was inconsistent across call sites, so the rule is
/// an explicit policy here rather than a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompilerRegressionPolicy {
    /// Record the regression in the outcome and log it, but keep going.
    /// The final project diff still surfaces any lasting damage.
    #[default]
    Surface,
    /// Fail the run on the first new compiler error.
    FailFast,
    /// Skip the compiler re-check entirely (batch/fix-all style providers
    /// that intentionally pass through intermediate broken states).
    Ignore,
}

/// How the trigger location is chosen each iteration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TriggerMode {
    /// Root actions at the first diagnostic in canonical order; no
    /// diagnostics means convergence.
    #[default]
    FirstDiagnostic,
    /// Root actions at an explicit trigger (refactoring style).
    Explicit(AnalysisTrigger),
}

/// Callback that may inspect the chosen action before it is applied.
pub type ActionInspector = Box<dyn Fn(&CandidateAction) -> Result<(), String>>;

/// Configuration for one [`converge`] run.
pub struct ConvergeOptions {
    /// Action selection criteria.
    pub selection: ActionSelection,
    /// Iteration budget.
    pub budget: IterationBudget,
    /// Compiler-regression policy.
    pub regression_policy: CompilerRegressionPolicy,
    /// Trigger mode.
    pub trigger: TriggerMode,
    /// Cancellation token.
    pub cancel: CancelToken,
    /// Optional pre-apply inspection callback.
    pub inspector: Option<ActionInspector>,
}

impl ConvergeOptions {
    /// Options with the given budget and defaults everywhere else.
    pub fn new(budget: IterationBudget) -> Self {
        Self {
            selection: ActionSelection::single(),
            budget,
            regression_policy: CompilerRegressionPolicy::default(),
            trigger: TriggerMode::default(),
            cancel: CancelToken::new(),
            inspector: None,
        }
    }

    /// Override the selection criteria.
    pub fn with_selection(mut self, selection: ActionSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Override the compiler-regression policy.
    pub fn with_regression_policy(mut self, policy: CompilerRegressionPolicy) -> Self {
        self.regression_policy = policy;
        self
    }

    /// Override the trigger mode.
    pub fn with_trigger(mut self, trigger: TriggerMode) -> Self {
        self.trigger = trigger;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Attach a pre-apply inspection callback.
    pub fn with_inspector(
        mut self,
        inspector: impl Fn(&CandidateAction) -> Result<(), String> + 'static,
    ) -> Self {
        self.inspector = Some(Box::new(inspector));
        self
    }
}

/// The result of a successful convergence run.
#[derive(Debug, Clone)]
pub struct ConvergeOutcome {
    /// The final project state.
    pub project: ProjectState,
    /// Number of effective iterations consumed.
    pub iterations: usize,
    /// Titles of applied actions, in application order.
    pub applied_titles: Vec<String>,
    /// New compiler errors surfaced under
    /// [`CompilerRegressionPolicy::Surface`].
    pub regressions: Vec<ActualDiagnostic>,
}

/// Drive the transformer to convergence, verifying the iteration contract.
pub fn converge(
    initial: &ProjectState,
    transformer: &dyn Transformer,
    diagnostics: &dyn DiagnosticEngine,
    options: &ConvergeOptions,
    verifier: &Verifier,
) -> Result<ConvergeOutcome, VerifyError> {
    let verifier = verifier.push_context("transformation convergence");
    let limit = options.budget.limit();
    let mut project = initial.clone();
    let mut applied_titles: Vec<String> = Vec::new();
    let mut regressions: Vec<ActualDiagnostic> = Vec::new();
    let mut consumed = 0usize;

    loop {
        if options.cancel.is_cancelled() {
            return Err(verifier.raise(FailureKind::Cancelled));
        }
        let step = verifier.push_context(format!("iteration {}", consumed + 1));

        let trigger = match &options.trigger {
            TriggerMode::Explicit(trigger) => Some(trigger.clone()),
            TriggerMode::FirstDiagnostic => {
                let mut found = diagnostics
                    .diagnostics(&project)
                    .map_err(|e| step.raise(FailureKind::Transformer(e)))?;
                found.sort_by_key(|d| d.sort_key());
                trace!(diagnostics = found.len(), "analyzed project");
                found.first().map(trigger_for)
            }
        };
        let Some(trigger) = trigger else {
            break;
        };

        let roots = transformer
            .compute_actions(&project, &trigger)
            .map_err(|e| step.raise(FailureKind::Transformer(e)))?;
        debug!(
            iteration = consumed + 1,
            candidates = roots.len(),
            "computed candidate actions"
        );

        let Some(action) = select(&roots, &options.selection, &step)? else {
            break;
        };

        if consumed == limit {
            return Err(verifier.raise(FailureKind::IterationBudgetExceeded {
                expected: limit,
                attempted: consumed + 1,
            }));
        }

        if let Some(inspect) = &options.inspector {
            inspect(action).map_err(|message| step.fail(message))?;
        }

        let errors_before = match options.regression_policy {
            CompilerRegressionPolicy::Ignore => BTreeSet::new(),
            _ => compiler_error_keys(diagnostics, &project, &step)?,
        };

        project = transformer
            .apply(&project, action)
            .map_err(|e| step.raise(FailureKind::Transformer(e)))?;
        debug!(iteration = consumed + 1, action = %action.title, "applied action");

        if options.regression_policy != CompilerRegressionPolicy::Ignore {
            let introduced: Vec<ActualDiagnostic> = diagnostics
                .compiler_diagnostics(&project)
                .map_err(|e| step.raise(FailureKind::Transformer(e)))?
                .into_iter()
                .filter(|d| {
                    d.severity == Severity::Error && !errors_before.contains(&error_key(d))
                })
                .collect();
            if !introduced.is_empty() {
                let rendered = introduced
                    .iter()
                    .map(render_compiler_error)
                    .collect::<Vec<_>>()
                    .join("\n");
                match options.regression_policy {
                    CompilerRegressionPolicy::FailFast => {
                        return Err(step.raise(FailureKind::CompilerRegression(rendered)));
                    }
                    _ => {
                        warn!(
                            iteration = consumed + 1,
                            errors = introduced.len(),
                            "transformation introduced new compiler errors:\n{rendered}"
                        );
                        regressions.extend(introduced);
                    }
                }
            }
        }

        applied_titles.push(action.title.clone());
        consumed += 1;
    }

    if options.budget.is_exact() {
        if consumed == 0 {
            return Err(verifier.raise(FailureKind::ExpectedTransformation));
        }
        if consumed != limit {
            return Err(verifier.raise(FailureKind::IterationCountMismatch {
                expected: limit,
                consumed,
            }));
        }
    }

    debug!(iterations = consumed, "converged");
    Ok(ConvergeOutcome {
        project,
        iterations: consumed,
        applied_titles,
        regressions,
    })
}

/// Gather diagnostics across independent projects.
///
/// Each project is analyzed in isolation; results are returned in input
/// order. The operation is embarrassingly parallel, but is evaluated
/// sequentially here to keep the collaborator trait object-safe.
pub fn gather_diagnostics(
    projects: &[ProjectState],
    diagnostics: &dyn DiagnosticEngine,
) -> Result<Vec<Vec<ActualDiagnostic>>, VerifyError> {
    let verifier = Verifier::new().push_context("gathering diagnostics");
    projects
        .iter()
        .map(|project| {
            diagnostics
                .diagnostics(project)
                .map_err(|e| verifier.raise(FailureKind::Transformer(e)))
        })
        .collect()
}

fn trigger_for(diagnostic: &ActualDiagnostic) -> AnalysisTrigger {
    match &diagnostic.primary {
        Some(span) => AnalysisTrigger::SyntaxNode(span.clone()),
        None => AnalysisTrigger::CompilationStart,
    }
}

type ErrorKey = (String, Option<crate::span::ResolvedSpan>, String);

fn error_key(diagnostic: &ActualDiagnostic) -> ErrorKey {
    (
        diagnostic.id.clone(),
        diagnostic.primary.clone(),
        diagnostic.message.clone(),
    )
}

fn compiler_error_keys(
    diagnostics: &dyn DiagnosticEngine,
    project: &ProjectState,
    verifier: &Verifier,
) -> Result<BTreeSet<ErrorKey>, VerifyError> {
    Ok(diagnostics
        .compiler_diagnostics(project)
        .map_err(|e| verifier.raise(FailureKind::Transformer(e)))?
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(error_key)
        .collect())
}

fn render_compiler_error(diagnostic: &ActualDiagnostic) -> String {
    match &diagnostic.primary {
        Some(span) => format!("{}: {} at {}", diagnostic.id, diagnostic.message, span),
        None => format!("{}: {}", diagnostic.id, diagnostic.message),
    }
}
