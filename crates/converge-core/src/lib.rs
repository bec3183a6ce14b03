#![warn(missing_docs)]
//! Converge Core - Verification Engine for Source Transformation Providers
//!
//! # Overview
//!
//! `converge-core` verifies pluggable source-to-source transformation
//! providers (analyzer + code-fix style components): given an input source
//! tree, a transformer proposing edits, and an expected output tree, it runs
//! the diagnostic analysis step, matches produced diagnostics against a
//! declarative expectation, drives the transformer to convergence under a
//! hard iteration budget, and verifies the final tree byte-for-byte (text,
//! encoding, checksum algorithm, and file placement).
//!
//! The engine is deterministic by construction: no clock, no randomness, no
//! I/O ordering enters the loop, and action selection is fully specified by
//! document order plus the caller's selection criteria. Every failure carries
//! a breadcrumb context path and, where possible, a literal value the caller
//! can paste back into the expectation to accept the new behavior.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Convergence Engine (apply/re-analyze loop) │  ← engine
//! ├─────────────────────────────────────────────┤
//! │  Matcher & Project Diff Verifier            │  ← matcher, project_diff
//! ├─────────────────────────────────────────────┤
//! │  Candidate Actions & Selection              │  ← action
//! ├─────────────────────────────────────────────┤
//! │  Diagnostics, Spans, Project Model          │  ← diagnostics, span, project
//! ├─────────────────────────────────────────────┤
//! │  Verifier (breadcrumbs) & Line Diff         │  ← verifier, diff
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use converge_core::{
//!     ActualDiagnostic, ExpectedDiagnostic, ResolvedSpan, Severity, Verifier,
//!     match_diagnostics,
//! };
//!
//! let expected = vec![
//!     ExpectedDiagnostic::new("X1", Severity::Warning)
//!         .with_span("src/lib.rs", 1, 22, 1, 23)
//!         .with_message("semicolon should be followed by a space"),
//! ];
//! let actual = vec![
//!     ActualDiagnostic::new("X1", Severity::Warning, "semicolon should be followed by a space")
//!         .with_span(ResolvedSpan::new("src/lib.rs", 1, 22, 1, 23)),
//! ];
//! match_diagnostics(&expected, &actual, &Verifier::new()).unwrap();
//! ```
//!
//! # Module Description
//!
//! - [`span`] - span/location value types with unchecked-field wildcards
//! - [`line_index`] - rope-backed offset ↔ line/column conversion
//! - [`diagnostics`] - expected/actual diagnostic model and canonical order
//! - [`matcher`] - diagnostic expectation matching
//! - [`action`] - candidate action trees and deterministic selection
//! - [`project`] - immutable project/document model
//! - [`engine`] - the bounded transformation convergence loop
//! - [`diff`] - line diff with line-ending-visible rendering
//! - [`project_diff`] - document/project diff verification
//! - [`verifier`] - breadcrumb-carrying assertion surface
//! - [`host`] - analysis triggers and host capability negotiation
//! - [`error`] - failure taxonomy

pub mod action;
pub mod diagnostics;
pub mod diff;
pub mod engine;
pub mod error;
pub mod host;
pub mod line_index;
pub mod matcher;
pub mod project;
pub mod project_diff;
pub mod span;
pub mod verifier;

pub use action::{ActionSelection, CandidateAction, flatten_leaves, select};
pub use diagnostics::{ActualDiagnostic, ExpectedDiagnostic, MessageExpectation, Severity};
pub use diff::{DiffOp, diff_lines, differs_only_in_line_endings, render_unified};
pub use engine::{
    CancelToken, CompilerRegressionPolicy, ConvergeOptions, ConvergeOutcome, DiagnosticEngine,
    IterationBudget, Transformer, TransformerError, TriggerMode, converge, gather_diagnostics,
};
pub use error::{FailureKind, VerifyError};
pub use host::{AnalysisTrigger, HostCapabilities};
pub use line_index::LineIndex;
pub use matcher::match_diagnostics;
pub use project::{ChecksumAlgorithm, ProjectState, SourceFile, TextEncoding};
pub use project_diff::{verify_documents, verify_project};
pub use span::{LineColumn, LinePosition, LocationSpan, ResolvedSpan};
pub use verifier::{Verifier, fail_now};
