//! End-to-end code-fix scenarios driven through the public API: a small
//! semicolon-spacing analyzer plus a transformer that inserts the missing
//! space, verified for convergence, budget accounting, and final-state diffs.

use converge_core::{
    ActionSelection, ActualDiagnostic, AnalysisTrigger, CandidateAction, ConvergeOptions,
    DiagnosticEngine, ExpectedDiagnostic, FailureKind, IterationBudget, LineIndex, ProjectState,
    ResolvedSpan, Severity, SourceFile, Transformer, TransformerError, Verifier, converge,
    match_diagnostics, verify_project,
};

/// Reports `X1` for every `;` not followed by a space.
struct SemicolonSpacingEngine;

impl DiagnosticEngine for SemicolonSpacingEngine {
    fn diagnostics(
        &self,
        project: &ProjectState,
    ) -> Result<Vec<ActualDiagnostic>, TransformerError> {
        let mut found = Vec::new();
        for file in &project.sources {
            let index = LineIndex::from_text(&file.content);
            let chars: Vec<char> = file.content.chars().collect();
            for (offset, c) in chars.iter().enumerate() {
                if *c == ';' && chars.get(offset + 1) != Some(&' ') {
                    let (line, column) = index.position_at(offset);
                    found.push(
                        ActualDiagnostic::new(
                            "X1",
                            Severity::Warning,
                            "semicolon should be followed by a space",
                        )
                        .with_span(ResolvedSpan::new(
                            file.path.clone(),
                            line,
                            column,
                            line,
                            column + 1,
                        )),
                    );
                }
            }
        }
        Ok(found)
    }
}

/// Offers a single "Insert space" action at the trigger location.
struct InsertSpaceFix;

impl Transformer for InsertSpaceFix {
    fn compute_actions(
        &self,
        _project: &ProjectState,
        _trigger: &AnalysisTrigger,
    ) -> Result<Vec<CandidateAction>, TransformerError> {
        Ok(vec![CandidateAction::leaf("Insert space")])
    }

    fn apply(
        &self,
        project: &ProjectState,
        _action: &CandidateAction,
    ) -> Result<ProjectState, TransformerError> {
        // Fix the first offending semicolon in document order.
        for file in &project.sources {
            let chars: Vec<char> = file.content.chars().collect();
            for (offset, c) in chars.iter().enumerate() {
                if *c == ';' && chars.get(offset + 1) != Some(&' ') {
                    let mut fixed: String = chars[..=offset].iter().collect();
                    fixed.push(' ');
                    fixed.extend(&chars[offset + 1..]);
                    return Ok(project
                        .replace_source(&file.path, fixed)
                        .ok_or("trigger file missing")?);
                }
            }
        }
        Err("no offending semicolon left to fix".into())
    }
}

fn project_with(content: &str) -> ProjectState {
    ProjectState::new()
        .add_source(SourceFile::new("src/c.rs", content))
        .unwrap()
}

#[test]
fn test_semicolon_scenario_single_iteration() {
    let initial = project_with("class C { void M() { ;} }");

    // The analysis step reports the diagnostic where expected.
    let actual = SemicolonSpacingEngine.diagnostics(&initial).unwrap();
    let expected = vec![
        ExpectedDiagnostic::new("X1", Severity::Warning)
            .with_span("src/c.rs", 1, 22, 1, 23)
            .with_message("semicolon should be followed by a space"),
    ];
    match_diagnostics(&expected, &actual, &Verifier::new()).unwrap();

    // One fix application converges within a budget of at most one.
    let outcome = converge(
        &initial,
        &InsertSpaceFix,
        &SemicolonSpacingEngine,
        &ConvergeOptions::new(IterationBudget::at_most(1)),
        &Verifier::new(),
    )
    .unwrap();
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.applied_titles, ["Insert space"]);

    let expected_fixed = project_with("class C { void M() { ; } }");
    verify_project(&expected_fixed, &outcome.project, &Verifier::new()).unwrap();
}

#[test]
fn test_two_fixes_need_exactly_two_iterations() {
    let initial = project_with("a;b;c ");
    let outcome = converge(
        &initial,
        &InsertSpaceFix,
        &SemicolonSpacingEngine,
        &ConvergeOptions::new(IterationBudget::exactly(2)),
        &Verifier::new(),
    )
    .unwrap();
    assert_eq!(outcome.iterations, 2);
    assert_eq!(outcome.project.source("src/c.rs").unwrap().content, "a; b; c ");
}

#[test]
fn test_budget_of_one_is_exceeded_by_second_fix() {
    let initial = project_with("a;b;c ");
    let err = converge(
        &initial,
        &InsertSpaceFix,
        &SemicolonSpacingEngine,
        &ConvergeOptions::new(IterationBudget::at_most(1)),
        &Verifier::new(),
    )
    .unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::IterationBudgetExceeded {
            expected: 1,
            attempted: 2
        }
    ));
}

#[test]
fn test_rerunning_on_fixed_output_converges_immediately() {
    let initial = project_with("a;b ");
    let first = converge(
        &initial,
        &InsertSpaceFix,
        &SemicolonSpacingEngine,
        &ConvergeOptions::new(IterationBudget::at_most(5)),
        &Verifier::new(),
    )
    .unwrap();
    let second = converge(
        &first.project,
        &InsertSpaceFix,
        &SemicolonSpacingEngine,
        &ConvergeOptions::new(IterationBudget::at_most(5)),
        &Verifier::new(),
    )
    .unwrap();
    assert_eq!(second.iterations, 0);
    assert_eq!(second.project, first.project);
}

/// Offers two keyed alternatives; used to pin down selection determinism.
struct TwoWayFix;

impl Transformer for TwoWayFix {
    fn compute_actions(
        &self,
        _project: &ProjectState,
        _trigger: &AnalysisTrigger,
    ) -> Result<Vec<CandidateAction>, TransformerError> {
        Ok(vec![CandidateAction::group(
            "Fix semicolon",
            vec![
                CandidateAction::keyed("Insert space", "A"),
                CandidateAction::keyed("Remove semicolon", "B"),
            ],
        )])
    }

    fn apply(
        &self,
        project: &ProjectState,
        action: &CandidateAction,
    ) -> Result<ProjectState, TransformerError> {
        let file = &project.sources[0];
        let fixed = match action.equivalence_key.as_deref() {
            Some("A") => file.content.replace(';', "; "),
            Some("B") => file.content.replace(';', ""),
            other => return Err(format!("unexpected key {:?}", other).into()),
        };
        Ok(project.replace_source(&file.path, fixed).ok_or("missing")?)
    }
}

#[test]
fn test_equivalence_key_selection_is_deterministic() {
    for _ in 0..4 {
        let outcome = converge(
            &project_with("a;b "),
            &TwoWayFix,
            &SemicolonSpacingEngine,
            &ConvergeOptions::new(IterationBudget::at_most(1))
                .with_selection(ActionSelection::by_key("B")),
            &Verifier::new(),
        )
        .unwrap();
        assert_eq!(outcome.applied_titles, ["Remove semicolon"]);
        assert_eq!(outcome.project.source("src/c.rs").unwrap().content, "ab ");
    }
}

#[test]
fn test_unkeyed_selection_with_two_alternatives_is_ambiguous() {
    let err = converge(
        &project_with("a;b "),
        &TwoWayFix,
        &SemicolonSpacingEngine,
        &ConvergeOptions::new(IterationBudget::at_most(1)),
        &Verifier::new(),
    )
    .unwrap_err();
    assert!(matches!(err.kind, FailureKind::AmbiguousSelection(_)));
}

#[test]
fn test_inspector_sees_the_chosen_title() {
    let outcome = converge(
        &project_with("a;b "),
        &TwoWayFix,
        &SemicolonSpacingEngine,
        &ConvergeOptions::new(IterationBudget::at_most(1))
            .with_selection(ActionSelection::by_key("A"))
            .with_inspector(|action| {
                if action.title == "Insert space" {
                    Ok(())
                } else {
                    Err(format!("unexpected action {:?}", action.title))
                }
            }),
        &Verifier::new(),
    )
    .unwrap();
    assert_eq!(outcome.iterations, 1);
}
