//! Pluggable assertion surface.
//!
//! Every component reports divergence through a [`Verifier`] rather than
//! panicking or printing directly. The verifier carries a breadcrumb context
//! stack ([`Verifier::push_context`] returns a child verifier that prefixes
//! all subsequent failures), and each check returns a structured
//! [`VerifyError`] value. Hosts decide what to do with the error: the bundled
//! helpers either panic (test-host style, see [`fail_now`]) or collect, and a
//! custom host can render the error through any assertion mechanism it likes
//! since the failure is plain data.

use crate::error::{FailureKind, VerifyError};

/// Breadcrumb-carrying verifier used by all verification stages.
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    context: Vec<String>,
}

impl Verifier {
    /// Create a verifier with an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current breadcrumb path, outermost first.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Return a child verifier whose failures are prefixed with `label`.
    pub fn push_context(&self, label: impl Into<String>) -> Verifier {
        let mut context = self.context.clone();
        context.push(label.into());
        Verifier { context }
    }

    /// Build a failure of the given kind carrying this verifier's context.
    pub fn raise(&self, kind: FailureKind) -> VerifyError {
        VerifyError {
            context: self.context.clone(),
            kind,
        }
    }

    /// Build an expectation-mismatch failure with the given message.
    pub fn fail(&self, message: impl Into<String>) -> VerifyError {
        self.raise(FailureKind::ExpectationMismatch(message.into()))
    }

    /// Check that two values are equal; `what` names the compared field.
    pub fn equal<T: PartialEq + std::fmt::Debug>(
        &self,
        what: &str,
        expected: &T,
        actual: &T,
    ) -> Result<(), VerifyError> {
        if expected == actual {
            Ok(())
        } else {
            Err(self.fail(format!(
                "expected {} {:?} actual {:?}",
                what, expected, actual
            )))
        }
    }

    /// Check that a condition holds.
    pub fn is_true(&self, condition: bool, message: &str) -> Result<(), VerifyError> {
        if condition {
            Ok(())
        } else {
            Err(self.fail(message))
        }
    }

    /// Check that a condition does not hold.
    pub fn is_false(&self, condition: bool, message: &str) -> Result<(), VerifyError> {
        self.is_true(!condition, message)
    }

    /// Check that a collection is empty; `what` names the collection.
    pub fn empty<T: std::fmt::Debug>(&self, what: &str, items: &[T]) -> Result<(), VerifyError> {
        if items.is_empty() {
            Ok(())
        } else {
            Err(self.fail(format!("expected no {}, found {:?}", what, items)))
        }
    }

    /// Check that a collection is not empty; `what` names the collection.
    pub fn not_empty<T>(&self, what: &str, items: &[T]) -> Result<(), VerifyError> {
        if items.is_empty() {
            Err(self.fail(format!("expected at least one {}", what)))
        } else {
            Ok(())
        }
    }

    /// Check two sequences element-wise with an injectable comparer.
    ///
    /// Fails on length mismatch first, then on the first element pair the
    /// comparer rejects.
    pub fn sequence_equal<T: std::fmt::Debug>(
        &self,
        what: &str,
        expected: &[T],
        actual: &[T],
        comparer: impl Fn(&T, &T) -> bool,
    ) -> Result<(), VerifyError> {
        if expected.len() != actual.len() {
            return Err(self.fail(format!(
                "expected {} {} elements actual {}",
                expected.len(),
                what,
                actual.len()
            )));
        }
        for (i, (e, a)) in expected.iter().zip(actual.iter()).enumerate() {
            if !comparer(e, a) {
                return Err(self.fail(format!(
                    "{} element {} differs: expected {:?} actual {:?}",
                    what, i, e, a
                )));
            }
        }
        Ok(())
    }
}

/// Panic with the rendered failure, for hosts that report through `panic!`.
pub fn fail_now(error: VerifyError) -> ! {
    panic!("{}", error)
}
