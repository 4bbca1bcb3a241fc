//! Unit tests for the submit use case

use super::*;
use crate::domain::DomainError;
use crate::error::AppError;
use crate::port::score_evaluator::mocks::MockScoreEvaluator;
use crate::port::submission_repository::mocks::InMemorySubmissionRepository;
use crate::port::time_provider::FixedTimeProvider;

fn request(problem_id: i64, solution: &str, force: bool) -> SubmitRequest {
    SubmitRequest {
        problem_id,
        solution: solution.to_string(),
        force,
    }
}

fn service(
    evaluator: MockScoreEvaluator,
    repo: Arc<InMemorySubmissionRepository>,
) -> SubmissionService {
    SubmissionService::new(
        Arc::new(evaluator),
        repo,
        Arc::new(FixedTimeProvider(1_700_000_000_000)),
    )
}

#[test]
fn test_validate_rejects_non_positive_problem() {
    let result = submit::validate_request(&request(0, "{}", false));
    assert!(result.unwrap_err().to_string().contains("positive"));
}

#[test]
fn test_validate_rejects_blank_solution() {
    let result = submit::validate_request(&request(1, "  \n", false));
    assert!(result.unwrap_err().to_string().contains("empty"));
}

#[tokio::test]
async fn test_first_submission_is_recorded() {
    let repo = Arc::new(InMemorySubmissionRepository::new());
    let svc = service(MockScoreEvaluator::with_score(120), repo.clone());

    let outcome = svc.submit(request(3, "{\"vertices\":[]}", false)).await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Recorded(1));
    let stored = repo.get(1).unwrap();
    assert_eq!(stored.problem_id, 3);
    assert_eq!(stored.estimated_score, 120);
    assert_eq!(stored.submitted_at, 1_700_000_000_000);
}

#[tokio::test]
async fn test_invalid_solution_is_rejected() {
    let repo = Arc::new(InMemorySubmissionRepository::new());
    let svc = service(MockScoreEvaluator::with_score(-1), repo.clone());

    let err = svc.submit(request(3, "{}", false)).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Domain(DomainError::InvalidSolution(_))
    ));
    assert_eq!(repo.count(), 0);
}

#[tokio::test]
async fn test_skipped_when_official_is_at_least_as_good() {
    let repo = Arc::new(InMemorySubmissionRepository::new());
    service(MockScoreEvaluator::with_score(100), repo.clone())
        .submit(request(3, "{}", false))
        .await
        .unwrap();
    repo.set_official_score(1, 100).await.unwrap();

    let outcome = service(MockScoreEvaluator::with_score(100), repo.clone())
        .submit(request(3, "{\"v\":1}", false))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Skipped {
            estimated: 100,
            best: 100
        }
    );
    assert_eq!(repo.count(), 1);
}

#[tokio::test]
async fn test_better_score_is_recorded() {
    let repo = Arc::new(InMemorySubmissionRepository::new());
    service(MockScoreEvaluator::with_score(100), repo.clone())
        .submit(request(3, "{}", false))
        .await
        .unwrap();
    repo.set_official_score(1, 100).await.unwrap();

    let outcome = service(MockScoreEvaluator::with_score(99), repo.clone())
        .submit(request(3, "{\"v\":1}", false))
        .await
        .unwrap();

    assert_eq!(outcome, SubmitOutcome::Recorded(2));
}

#[tokio::test]
async fn test_force_overrides_skip() {
    let repo = Arc::new(InMemorySubmissionRepository::new());
    service(MockScoreEvaluator::with_score(50), repo.clone())
        .submit(request(3, "{}", false))
        .await
        .unwrap();
    repo.set_official_score(1, 50).await.unwrap();

    let outcome = service(MockScoreEvaluator::with_score(80), repo.clone())
        .submit(request(3, "{}", true))
        .await
        .unwrap();

    assert_eq!(outcome, SubmitOutcome::Recorded(2));
}

#[tokio::test]
async fn test_unscored_submissions_do_not_block() {
    // Only official scores gate a submission; estimates alone never do
    let repo = Arc::new(InMemorySubmissionRepository::new());
    service(MockScoreEvaluator::with_score(10), repo.clone())
        .submit(request(3, "{}", false))
        .await
        .unwrap();

    let outcome = service(MockScoreEvaluator::with_score(20), repo.clone())
        .submit(request(3, "{}", false))
        .await
        .unwrap();

    assert_eq!(outcome, SubmitOutcome::Recorded(2));
    let best = service(MockScoreEvaluator::with_score(0), repo)
        .best_scores(3, "")
        .await
        .unwrap();
    assert_eq!(best.official, None);
    assert_eq!(best.estimated, Some(10));
}

#[tokio::test]
async fn test_evaluator_failure_is_propagated() {
    let repo = Arc::new(InMemorySubmissionRepository::new());
    let evaluator = MockScoreEvaluator::new_unavailable("503");
    let svc = service(evaluator, repo.clone());

    let err = svc.submit(request(3, "{}", false)).await.unwrap_err();

    assert!(matches!(err, AppError::Evaluation(_)));
    assert_eq!(repo.count(), 0);
}
