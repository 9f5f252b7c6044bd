mod helpers;

use turnstile::application::ports::JobRepository;
use turnstile::application::services::TransitionError;
use turnstile::domain::{JobEvent, JobEventKind, JobStatus, StatusLifecycle};

use helpers::{job_machine, job_with_status, minutes_ago, processing_job_started_at};

fn sample_event(kind: JobEventKind) -> JobEvent {
    match kind {
        JobEventKind::Start => JobEvent::Start,
        JobEventKind::UpdateProgress => JobEvent::UpdateProgress { progress: 10 },
        JobEventKind::Complete => JobEvent::Complete { result_count: None },
        JobEventKind::Fail => JobEvent::Fail {
            error: "boom".to_string(),
        },
        JobEventKind::Retry => JobEvent::Retry,
        JobEventKind::Cancel => JobEvent::Cancel { reason: None },
    }
}

#[tokio::test]
async fn given_every_pair_missing_from_the_table_when_transitioning_then_rejected_without_mutation()
 {
    let all_statuses = [
        JobStatus::Queued,
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Failed,
        JobStatus::Retrying,
        JobStatus::Completed,
        JobStatus::Cancelled,
        JobStatus::PermanentlyFailed,
    ];

    for status in all_statuses {
        for kind in JobEventKind::ALL {
            if status.can_transition(kind) {
                continue;
            }

            let (repository, machine, _) = job_machine();
            let job = job_with_status(status);
            repository.create(&job).await.unwrap();

            let error = machine
                .transition(job.id, sample_event(kind))
                .await
                .unwrap_err();
            assert!(
                matches!(error, TransitionError::InvalidTransition { .. }),
                "({status}, {kind}) should be rejected"
            );

            let stored = repository.get_by_id(job.id).await.unwrap().unwrap();
            assert_eq!(stored, job, "({status}, {kind}) must not mutate the job");
        }
    }
}

#[tokio::test]
async fn given_queued_job_when_starting_then_it_is_processing_with_start_time() {
    let (repository, machine, _) = job_machine();
    let job = job_with_status(JobStatus::Queued);
    repository.create(&job).await.unwrap();

    let updated = machine.transition(job.id, JobEvent::Start).await.unwrap();

    assert_eq!(updated.status, JobStatus::Processing);
    assert!(updated.started_at.is_some());
    assert_eq!(updated.last_error, None);
}

#[tokio::test]
async fn given_excessive_progress_when_updating_then_it_is_clamped_to_one_hundred() {
    let (repository, machine, _) = job_machine();
    let job = job_with_status(JobStatus::Processing);
    repository.create(&job).await.unwrap();

    let updated = machine
        .transition(job.id, JobEvent::UpdateProgress { progress: 150 })
        .await
        .unwrap();

    assert_eq!(updated.progress, 100);
    assert_eq!(updated.status, JobStatus::Processing);
}

#[tokio::test]
async fn given_negative_progress_when_updating_then_it_is_clamped_to_zero() {
    let (repository, machine, _) = job_machine();
    let job = job_with_status(JobStatus::Processing);
    repository.create(&job).await.unwrap();

    let updated = machine
        .transition(job.id, JobEvent::UpdateProgress { progress: -10 })
        .await
        .unwrap();

    assert_eq!(updated.progress, 0);
}

#[tokio::test]
async fn given_started_job_when_completing_then_duration_and_result_count_are_recorded() {
    let (repository, machine, _) = job_machine();
    let job = processing_job_started_at(minutes_ago(5));
    repository.create(&job).await.unwrap();

    let updated = machine
        .transition(
            job.id,
            JobEvent::Complete {
                result_count: Some(12),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, JobStatus::Completed);
    assert!(updated.completed_at.is_some());
    assert_eq!(updated.result_count, Some(12));
    let duration_ms = updated.duration_ms.unwrap();
    assert!(
        (300_000..360_000).contains(&duration_ms),
        "duration {duration_ms}ms should be about five minutes"
    );
}

#[tokio::test]
async fn given_retries_left_when_failing_then_job_is_retryable_failed_with_attempt_record() {
    let (repository, machine, _) = job_machine();
    let job = job_with_status(JobStatus::Processing);
    repository.create(&job).await.unwrap();

    let updated = machine
        .transition(
            job.id,
            JobEvent::Fail {
                error: "upstream worker crashed".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, JobStatus::Failed);
    let failure = updated.last_error.unwrap();
    assert_eq!(failure.message, "upstream worker crashed");
    assert_eq!(failure.attempt, 1);
}

#[tokio::test]
async fn given_retries_exhausted_when_failing_then_job_is_permanently_failed() {
    let (repository, machine, _) = job_machine();
    let mut job = job_with_status(JobStatus::Processing);
    job.retry_count = 3;
    job.max_retries = 3;
    repository.create(&job).await.unwrap();

    let updated = machine
        .transition(
            job.id,
            JobEvent::Fail {
                error: "still broken".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, JobStatus::PermanentlyFailed);
    assert_eq!(updated.last_error.unwrap().attempt, 4);
    assert!(updated.completed_at.is_some());
}

#[tokio::test]
async fn given_failed_job_when_retrying_then_counter_increments_and_progress_resets() {
    let (repository, machine, _) = job_machine();
    let mut job = job_with_status(JobStatus::Failed);
    job.progress = 80;
    job.retry_count = 1;
    repository.create(&job).await.unwrap();

    let updated = machine.transition(job.id, JobEvent::Retry).await.unwrap();

    assert_eq!(updated.status, JobStatus::Retrying);
    assert_eq!(updated.retry_count, 2);
    assert_eq!(updated.progress, 0);
    assert_eq!(updated.last_error, None);
}

#[tokio::test]
async fn given_retry_count_at_limit_when_retrying_then_error_and_job_is_unchanged() {
    let (repository, machine, _) = job_machine();
    let mut job = job_with_status(JobStatus::Failed);
    job.retry_count = 3;
    job.max_retries = 3;
    repository.create(&job).await.unwrap();

    let error = machine
        .transition(job.id, JobEvent::Retry)
        .await
        .unwrap_err();

    match error {
        TransitionError::RetryLimitExceeded {
            retry_count,
            max_retries,
        } => {
            assert_eq!(retry_count, 3);
            assert_eq!(max_retries, 3);
        }
        other => panic!("expected RetryLimitExceeded, got {other:?}"),
    }

    let stored = repository.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored, job);
}

#[tokio::test]
async fn given_retrying_job_when_starting_then_it_is_processing_again() {
    let (repository, machine, _) = job_machine();
    let job = job_with_status(JobStatus::Retrying);
    repository.create(&job).await.unwrap();

    let updated = machine.transition(job.id, JobEvent::Start).await.unwrap();

    assert_eq!(updated.status, JobStatus::Processing);
}

#[tokio::test]
async fn given_pending_job_when_cancelling_then_reason_and_completion_are_recorded() {
    let (repository, machine, _) = job_machine();
    let job = job_with_status(JobStatus::Pending);
    repository.create(&job).await.unwrap();

    let updated = machine
        .transition(
            job.id,
            JobEvent::Cancel {
                reason: Some("superseded by newer upload".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, JobStatus::Cancelled);
    assert!(updated.completed_at.is_some());
    assert_eq!(
        updated.last_error.unwrap().message,
        "superseded by newer upload"
    );
}

#[tokio::test]
async fn given_completed_job_when_starting_then_invalid_transition_with_empty_allowed_set() {
    let (repository, machine, _) = job_machine();
    let job = job_with_status(JobStatus::Completed);
    repository.create(&job).await.unwrap();

    let error = machine
        .transition(job.id, JobEvent::Start)
        .await
        .unwrap_err();

    match error {
        TransitionError::InvalidTransition {
            current,
            event,
            allowed,
        } => {
            assert_eq!(current, JobStatus::Completed);
            assert_eq!(event, JobEventKind::Start);
            assert!(allowed.is_empty());
        }
        other => panic!("expected InvalidTransition, got {other:?}"),
    }
}
