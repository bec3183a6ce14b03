//! Host-facing model: analysis triggers and capability negotiation.
//!
//! [`AnalysisTrigger`] is the closed set of analysis-context kinds a
//! diagnostic can originate from. The engine and matcher are agnostic to
//! which variant produced a diagnostic; the variant only tells the
//! transformer where to root its candidate actions.
//!
//! [`HostCapabilities`] replaces per-call reflection-style probing of the
//! host: the feature set is negotiated once at startup and queried by name
//! afterwards.

use std::collections::BTreeSet;

use crate::span::ResolvedSpan;

/// Where an analysis pass was rooted when it produced a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisTrigger {
    /// Start of a whole-compilation analysis.
    CompilationStart,
    /// A named symbol.
    Symbol(String),
    /// A syntax node covering the given span.
    SyntaxNode(ResolvedSpan),
    /// A whole syntax tree, identified by file path.
    SyntaxTree(String),
    /// A semantic model for the given file path.
    SemanticModel(String),
    /// An operation covering the given span.
    Operation(ResolvedSpan),
    /// A code block covering the given span.
    CodeBlock(ResolvedSpan),
}

impl AnalysisTrigger {
    /// The span this trigger points at, if it carries one.
    pub fn span(&self) -> Option<&ResolvedSpan> {
        match self {
            Self::SyntaxNode(span) | Self::Operation(span) | Self::CodeBlock(span) => Some(span),
            _ => None,
        }
    }
}

/// Host feature set, negotiated once at startup.
#[derive(Debug, Clone, Default)]
pub struct HostCapabilities {
    features: BTreeSet<String>,
}

impl HostCapabilities {
    /// Create an empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a supported feature.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    /// Query whether the host supports a feature.
    pub fn supports(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_span_accessor() {
        let span = ResolvedSpan::new("a.rs", 1, 2, 1, 3);
        assert_eq!(
            AnalysisTrigger::SyntaxNode(span.clone()).span(),
            Some(&span)
        );
        assert_eq!(AnalysisTrigger::CompilationStart.span(), None);
        assert_eq!(AnalysisTrigger::SyntaxTree("a.rs".into()).span(), None);
    }

    #[test]
    fn test_capabilities_query_by_name() {
        let caps = HostCapabilities::new()
            .with_feature("suppression")
            .with_feature("fix-all");
        assert!(caps.supports("fix-all"));
        assert!(!caps.supports("rename"));
    }
}
