//! Document and project diff verification.
//!
//! Compares a resulting project against the expected final state,
//! byte-for-byte: text content, encoding, checksum algorithm, logical file
//! name, and folder placement. Primary, additional, and config documents are
//! each compared as separate ordered collections; count mismatches fail first
//! with a count-naming message, mirroring the matcher's fail-fast policy.
//!
//! Generated-source documents (produced by the transformer, not supplied as
//! input) occupy the positions after the original input documents, so the
//! positional comparison covers them as long as the expectation lists them in
//! the generator's own output order.

use crate::diff::render_unified;
use crate::error::VerifyError;
use crate::project::{ProjectState, SourceFile};
use crate::verifier::Verifier;

/// Verify that the actual project matches the expected project.
pub fn verify_project(
    expected: &ProjectState,
    actual: &ProjectState,
    verifier: &Verifier,
) -> Result<(), VerifyError> {
    verify_documents(
        "source",
        &expected.sources,
        &actual.sources,
        &verifier.push_context("source documents"),
    )?;
    verify_documents(
        "additional",
        &expected.additional_files,
        &actual.additional_files,
        &verifier.push_context("additional documents"),
    )?;
    verify_documents(
        "config",
        &expected.config_files,
        &actual.config_files,
        &verifier.push_context("config documents"),
    )?;
    verifier.equal("references", &expected.references, &actual.references)?;
    Ok(())
}

/// Verify one ordered document collection.
pub fn verify_documents(
    kind: &str,
    expected: &[SourceFile],
    actual: &[SourceFile],
    verifier: &Verifier,
) -> Result<(), VerifyError> {
    if expected.len() != actual.len() {
        return Err(verifier.fail(format!(
            "Mismatch between number of {} documents, expected \"{}\" actual \"{}\"",
            kind,
            expected.len(),
            actual.len()
        )));
    }
    for (expected_file, actual_file) in expected.iter().zip(actual.iter()) {
        verify_document(
            expected_file,
            actual_file,
            &verifier.push_context(expected_file.path.clone()),
        )?;
    }
    Ok(())
}

fn verify_document(
    expected: &SourceFile,
    actual: &SourceFile,
    verifier: &Verifier,
) -> Result<(), VerifyError> {
    if expected.content != actual.content {
        return Err(verifier.fail(format!(
            "content differs:\n{}",
            render_unified(&expected.content, &actual.content)
        )));
    }
    verifier.equal("encoding", &expected.encoding.name(), &actual.encoding.name())?;
    if expected.checksum_algorithm != actual.checksum_algorithm {
        return Err(verifier.fail(format!(
            "expected checksum algorithm {} ({}) actual {} ({})",
            expected.checksum_algorithm,
            expected.checksum_algorithm.digest(&expected.content),
            actual.checksum_algorithm,
            actual.checksum_algorithm.digest(&actual.content),
        )));
    }
    verifier.equal("file name", &expected.name(), &actual.name())?;
    verifier.equal("folders", &expected.folders(), &actual.folders())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ChecksumAlgorithm, TextEncoding};

    fn single(file: SourceFile) -> ProjectState {
        ProjectState::new().add_source(file).unwrap()
    }

    #[test]
    fn test_identical_projects_pass() {
        let expected = single(SourceFile::new("src/a.rs", "fn main() {}\n"));
        let actual = expected.clone();
        assert!(verify_project(&expected, &actual, &Verifier::new()).is_ok());
    }

    #[test]
    fn test_count_mismatch_fails_first() {
        let expected = ProjectState::new()
            .add_source(SourceFile::new("a.rs", ""))
            .unwrap()
            .add_source(SourceFile::new("b.rs", "different content"))
            .unwrap();
        let actual = single(SourceFile::new("a.rs", "also different"));
        let err = verify_project(&expected, &actual, &Verifier::new()).unwrap_err();
        assert!(err.to_string().contains(
            "Mismatch between number of source documents, expected \"2\" actual \"1\""
        ));
    }

    #[test]
    fn test_content_mismatch_renders_diff() {
        let expected = single(SourceFile::new("a.rs", "line one\nline two\n"));
        let actual = single(SourceFile::new("a.rs", "line one\nline 2\n"));
        let err = verify_project(&expected, &actual, &Verifier::new()).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("-line two"));
        assert!(rendered.contains("+line 2"));
        assert!(rendered.contains("a.rs"));
    }

    #[test]
    fn test_line_ending_mismatch_is_visible() {
        let expected = single(SourceFile::new("a.rs", "one\ntwo\n"));
        let actual = single(SourceFile::new("a.rs", "one\r\ntwo\r\n"));
        let err = verify_project(&expected, &actual, &Verifier::new()).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("\\r\\n"));
        assert!(rendered.contains("\\n"));
    }

    #[test]
    fn test_encoding_compared_by_name() {
        let expected = single(SourceFile::new("a.rs", "x"));
        let actual = single(SourceFile::new("a.rs", "x").with_encoding(TextEncoding::Utf16Le));
        let err = verify_project(&expected, &actual, &Verifier::new()).unwrap_err();
        assert!(err
            .to_string()
            .contains("expected encoding \"utf-8\" actual \"utf-16LE\""));
    }

    #[test]
    fn test_checksum_algorithm_mismatch_includes_digests() {
        let expected = single(SourceFile::new("a.rs", "abc"));
        let actual =
            single(SourceFile::new("a.rs", "abc").with_checksum_algorithm(ChecksumAlgorithm::Blake3));
        let err = verify_project(&expected, &actual, &Verifier::new()).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("sha-256"));
        assert!(rendered.contains("blake3"));
        assert!(rendered
            .contains("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"));
    }

    #[test]
    fn test_folder_placement_checked() {
        let expected = single(SourceFile::new("src/a.rs", "x"));
        let actual = single(SourceFile::new("other/a.rs", "x"));
        let err = verify_project(&expected, &actual, &Verifier::new()).unwrap_err();
        assert!(err.to_string().contains("folders"));
    }

    #[test]
    fn test_additional_and_config_collections_compared_separately() {
        let expected = ProjectState::new()
            .add_additional_file(SourceFile::new("notes.txt", "n"))
            .unwrap();
        let actual = ProjectState::new()
            .add_config_file(SourceFile::new("notes.txt", "n"))
            .unwrap();
        let err = verify_project(&expected, &actual, &Verifier::new()).unwrap_err();
        assert!(err.to_string().contains("additional documents"));
    }

    #[test]
    fn test_reference_sets_compared() {
        let expected = ProjectState::new().add_reference("Other");
        let actual = ProjectState::new();
        let err = verify_project(&expected, &actual, &Verifier::new()).unwrap_err();
        assert!(err.to_string().contains("references"));
    }

    #[test]
    fn test_generated_documents_matched_after_inputs() {
        let expected = ProjectState::new()
            .add_source(SourceFile::new("input.rs", "i"))
            .unwrap()
            .add_source(SourceFile::new("generated/out.g.rs", "g"))
            .unwrap();
        let actual = expected.clone();
        assert!(verify_project(&expected, &actual, &Verifier::new()).is_ok());
    }
}
