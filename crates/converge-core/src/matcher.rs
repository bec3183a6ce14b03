//! Diagnostic expectation matching.
//!
//! Compares the set of diagnostics the analysis step actually produced against
//! the test's declared expectations. Counts are checked first (a gross
//! mismatch skips pairwise alignment entirely, and the failure message renders
//! every actual diagnostic as a re-playable expectation literal). Matching
//! pairs are then aligned by the canonical diagnostic order and compared
//! field by field; the first mismatching field aborts with a message naming
//! the field, the expected value, and the actual value.
//!
//! Order independence: because both sides are sorted canonically before the
//! element-wise pass, shuffling the input order of actual diagnostics cannot
//! change the verdict or the reported mismatch field.

use crate::diagnostics::{ActualDiagnostic, ExpectedDiagnostic};
use crate::error::VerifyError;
use crate::verifier::Verifier;

/// Match expected diagnostics against actual diagnostics.
///
/// Any mismatch is a hard failure; this is the terminal check for a single
/// diagnostics-verification call.
pub fn match_diagnostics(
    expected: &[ExpectedDiagnostic],
    actual: &[ActualDiagnostic],
    verifier: &Verifier,
) -> Result<(), VerifyError> {
    if expected.len() != actual.len() {
        return Err(verifier.fail(render_count_mismatch(expected.len(), actual)));
    }

    let mut expected: Vec<&ExpectedDiagnostic> = expected.iter().collect();
    let mut actual: Vec<&ActualDiagnostic> = actual.iter().collect();
    expected.sort_by_key(|d| d.sort_key());
    actual.sort_by_key(|d| d.sort_key());

    for (i, (exp, act)) in expected.iter().zip(actual.iter()).enumerate() {
        match_one(exp, act, &verifier.push_context(format!("diagnostic {}", i)))?;
    }
    Ok(())
}

/// Render the fail-fast count-mismatch message, with every actual diagnostic
/// as a pasteable expectation literal.
fn render_count_mismatch(expected_count: usize, actual: &[ActualDiagnostic]) -> String {
    let mut message = format!(
        "Mismatch between number of diagnostics returned, expected \"{}\" actual \"{}\"",
        expected_count,
        actual.len()
    );
    if !actual.is_empty() {
        message.push_str("\n\nDiagnostics:\n");
        for diagnostic in actual {
            message.push_str(&diagnostic.render_expectation());
            message.push_str(",\n");
        }
    }
    message
}

fn match_one(
    expected: &ExpectedDiagnostic,
    actual: &ActualDiagnostic,
    verifier: &Verifier,
) -> Result<(), VerifyError> {
    verifier.equal("id", &expected.id.as_str(), &actual.id.as_str())?;
    verifier.equal("severity", &expected.severity, &actual.severity)?;

    let expected_message = expected.message.resolve(&actual.message_format);
    verifier.equal(
        "message",
        &expected_message.as_str(),
        &actual.message.as_str(),
    )?;

    match (&expected.primary, &actual.primary) {
        (None, None) => {}
        (None, Some(span)) => {
            return Err(verifier.fail(format!("expected no location actual {}", span)));
        }
        (Some(span), None) => {
            return Err(verifier.fail(format!("expected location {} actual no location", span)));
        }
        (Some(expected_span), Some(actual_span)) => {
            if let Some((field, exp, act)) = expected_span.first_mismatch(actual_span) {
                return Err(verifier.fail(format!(
                    "expected primary span {} \"{}\" actual \"{}\"",
                    field, exp, act
                )));
            }
        }
    }

    verifier.equal(
        "additional span count",
        &expected.additional.len(),
        &actual.additional.len(),
    )?;
    for (i, (expected_span, actual_span)) in expected
        .additional
        .iter()
        .zip(actual.additional.iter())
        .enumerate()
    {
        if let Some((field, exp, act)) = expected_span.first_mismatch(actual_span) {
            return Err(verifier.fail(format!(
                "expected additional span {} {} \"{}\" actual \"{}\"",
                i, field, exp, act
            )));
        }
    }

    verifier.equal("suppression", &expected.is_suppressed, &actual.is_suppressed)?;
    Ok(())
}
