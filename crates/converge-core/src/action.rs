//! Candidate action model and deterministic selection.
//!
//! A transformer proposes edits as a tree of [`CandidateAction`]s: a top-level
//! action may expose nested alternatives, and only leaf actions are directly
//! appliable. The tree is recomputed on every engine iteration and discarded
//! after one leaf is applied.
//!
//! Selection is deterministic: leaves are flattened in document order, then
//! filtered by equivalence key (if configured), then picked by ordinal index
//! (if configured). With neither configured, exactly one candidate must
//! remain; several is an ambiguity failure, zero is the normal convergence
//! signal.

use crate::error::{FailureKind, VerifyError};
use crate::verifier::Verifier;

/// One proposed edit, possibly with nested alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAction {
    /// Display title of the action.
    pub title: String,
    /// Opaque key grouping semantically-equivalent actions across
    /// iterations/batches, or `None` if the provider gave no key.
    pub equivalence_key: Option<String>,
    /// Nested alternatives, in document order. Empty for appliable leaves.
    pub children: Vec<CandidateAction>,
}

impl CandidateAction {
    /// Create a leaf action with no equivalence key.
    pub fn leaf(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            equivalence_key: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf action with an equivalence key.
    pub fn keyed(title: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            equivalence_key: Some(key.into()),
            children: Vec::new(),
        }
    }

    /// Create a grouping action with nested alternatives.
    pub fn group(title: impl Into<String>, children: Vec<CandidateAction>) -> Self {
        Self {
            title: title.into(),
            equivalence_key: None,
            children,
        }
    }

    /// Returns `true` if this action has no nested alternatives.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a CandidateAction>) {
        if self.is_leaf() {
            out.push(self);
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }
}

/// Flatten candidate trees to their leaves, in document order.
pub fn flatten_leaves(roots: &[CandidateAction]) -> Vec<&CandidateAction> {
    let mut leaves = Vec::new();
    for root in roots {
        root.collect_leaves(&mut leaves);
    }
    leaves
}

/// Caller-configured selection criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSelection {
    /// Ordinal among the (possibly key-filtered) leaves.
    pub index: Option<usize>,
    /// Keep only leaves carrying this equivalence key.
    pub equivalence_key: Option<String>,
}

impl ActionSelection {
    /// Select whichever single action the transformer offers.
    pub fn single() -> Self {
        Self::default()
    }

    /// Select by ordinal index among the offered leaves.
    pub fn at_index(index: usize) -> Self {
        Self {
            index: Some(index),
            equivalence_key: None,
        }
    }

    /// Select by equivalence key.
    pub fn by_key(key: impl Into<String>) -> Self {
        Self {
            index: None,
            equivalence_key: Some(key.into()),
        }
    }

    /// Select by equivalence key, then by ordinal among the matches.
    pub fn by_key_at_index(key: impl Into<String>, index: usize) -> Self {
        Self {
            index: Some(index),
            equivalence_key: Some(key.into()),
        }
    }
}

/// Apply the selection criteria to a candidate tree.
///
/// Returns `Ok(None)` when no candidate matches — the normal convergence
/// signal, not a failure. Returns an [`FailureKind::AmbiguousSelection`] error
/// when the criteria leave more than one candidate and no index disambiguates.
pub fn select<'a>(
    roots: &'a [CandidateAction],
    selection: &ActionSelection,
    verifier: &Verifier,
) -> Result<Option<&'a CandidateAction>, VerifyError> {
    let mut leaves = flatten_leaves(roots);
    if let Some(key) = &selection.equivalence_key {
        leaves.retain(|leaf| leaf.equivalence_key.as_deref() == Some(key.as_str()));
    }
    if leaves.is_empty() {
        return Ok(None);
    }
    if let Some(index) = selection.index {
        return match leaves.get(index) {
            Some(leaf) => Ok(Some(leaf)),
            None => Err(verifier.fail(format!(
                "no candidate action at index {}, only {} available",
                index,
                leaves.len()
            ))),
        };
    }
    if leaves.len() > 1 {
        let titles = leaves.iter().map(|leaf| leaf.title.clone()).collect();
        return Err(verifier.raise(FailureKind::AmbiguousSelection(titles)));
    }
    Ok(Some(leaves[0]))
}
