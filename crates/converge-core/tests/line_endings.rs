//! Diff fidelity for line-ending-only mismatches: the verifier must render
//! the ending characters as visible tokens instead of reporting a failing
//! equality with no visible difference.

use converge_core::{
    ProjectState, SourceFile, Verifier, differs_only_in_line_endings, render_unified,
    verify_project,
};

fn single(content: &str) -> ProjectState {
    ProjectState::new()
        .add_source(SourceFile::new("a.rs", content))
        .unwrap()
}

#[test]
fn test_crlf_versus_lf_is_detected_as_ending_only() {
    assert!(differs_only_in_line_endings("a\nb\n", "a\r\nb\r\n"));
    assert!(differs_only_in_line_endings("a\rb\r", "a\nb\n"));
}

#[test]
fn test_content_change_is_not_ending_only() {
    assert!(!differs_only_in_line_endings("a\nb\n", "a\r\nc\r\n"));
}

#[test]
fn test_rendered_diff_shows_ending_tokens() {
    let rendered = render_unified("one\ntwo\n", "one\r\ntwo\r\n");
    assert!(rendered.contains("-one\\n"));
    assert!(rendered.contains("+one\\r\\n"));
    assert!(rendered.contains("-two\\n"));
    assert!(rendered.contains("+two\\r\\n"));
}

#[test]
fn test_project_verifier_surfaces_ending_tokens() {
    let err = verify_project(&single("x\ny\n"), &single("x\r\ny\r\n"), &Verifier::new())
        .unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("a.rs"));
    assert!(rendered.contains("\\r\\n"));
}

#[test]
fn test_mixed_change_uses_plain_diff() {
    // Content differs beyond endings, so the plain rendering applies.
    let rendered = render_unified("one\n", "two\r\n");
    assert!(rendered.contains("-one"));
    assert!(rendered.contains("+two"));
    assert!(!rendered.contains("\\r"));
}
