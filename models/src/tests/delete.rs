use crate::{BatchDeleteResult, DeleteOutcome, ProjectId};

/// **VALUE**: Verifies that a partially failed batch reports exactly the failed subset.
///
/// **WHY THIS MATTERS**: A bulk delete that silently reports "ok" when some items were
/// refused leaves the caller believing data is gone when it is not.
///
/// **BUG THIS CATCHES**: Would catch if `succeeded()`/`failed()` ever collapse outcomes or
/// if `is_complete_success()` ignores per-item errors.
#[test]
fn given_partial_failure_when_inspecting_batch_then_reports_exact_subsets() {
    // GIVEN: Three ids, the middle one refused
    let a = ProjectId::new_random();
    let b = ProjectId::new_random();
    let c = ProjectId::new_random();
    let batch = BatchDeleteResult::new(vec![
        DeleteOutcome::succeeded(a),
        DeleteOutcome::failed(b, "Resource not found"),
        DeleteOutcome::succeeded(c),
    ]);

    // WHEN: Inspecting
    let succeeded = batch.succeeded();
    let failed = batch.failed();

    // THEN: Exactly b failed
    assert_eq!(succeeded, vec![a, c]);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, b);
    assert_eq!(failed[0].error.as_deref(), Some("Resource not found"));
    assert!(!batch.is_complete_success());
    assert!(batch.outcome_for(c).is_some_and(DeleteOutcome::is_success));
}

#[test]
fn given_outcome_without_error_field_when_decoded_then_counts_as_success() {
    let id = ProjectId::new_random();
    let json = format!(r#"{{"data":[{{"id":"{id}"}}]}}"#);

    let batch: BatchDeleteResult<ProjectId> = serde_json::from_str(&json).unwrap();

    assert!(batch.is_complete_success());
    assert_eq!(batch.len(), 1);
}
