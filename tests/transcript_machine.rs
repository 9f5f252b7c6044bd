mod helpers;

use turnstile::application::ports::{EntityKind, TranscriptRepository};
use turnstile::application::services::TransitionError;
use turnstile::domain::{
    StatusLifecycle, TranscriptEvent, TranscriptEventKind, TranscriptId, TranscriptStatus,
};

use helpers::{transcript_machine, transcript_with_status};

fn sample_event(kind: TranscriptEventKind) -> TranscriptEvent {
    match kind {
        TranscriptEventKind::StartProcessing => TranscriptEvent::StartProcessing {
            queue_job_id: "job-1".to_string(),
        },
        TranscriptEventKind::MarkCleaned => TranscriptEvent::MarkCleaned,
        TranscriptEventKind::MarkFailed => TranscriptEvent::MarkFailed {
            error: "boom".to_string(),
        },
        TranscriptEventKind::StartInsightExtraction => TranscriptEvent::StartInsightExtraction {
            queue_job_id: "job-2".to_string(),
        },
        TranscriptEventKind::Retry => TranscriptEvent::Retry,
    }
}

#[tokio::test]
async fn given_every_pair_missing_from_the_table_when_transitioning_then_rejected_without_mutation()
 {
    let all_statuses = [
        TranscriptStatus::Raw,
        TranscriptStatus::Processing,
        TranscriptStatus::Cleaned,
        TranscriptStatus::Failed,
        TranscriptStatus::Published,
        TranscriptStatus::Archived,
    ];

    for status in all_statuses {
        for kind in TranscriptEventKind::ALL {
            if status.can_transition(kind) {
                continue;
            }

            let (repository, machine, _) = transcript_machine();
            let transcript = transcript_with_status(status);
            repository.create(&transcript).await.unwrap();

            let error = machine
                .transition(transcript.id, sample_event(kind))
                .await
                .unwrap_err();
            assert!(
                matches!(error, TransitionError::InvalidTransition { .. }),
                "({status}, {kind}) should be rejected"
            );

            let stored = repository.get_by_id(transcript.id).await.unwrap().unwrap();
            assert_eq!(
                stored, transcript,
                "({status}, {kind}) must not mutate the transcript"
            );
        }
    }
}

#[tokio::test]
async fn given_raw_transcript_when_starting_processing_then_job_id_and_start_time_are_set() {
    let (repository, machine, _) = transcript_machine();
    let transcript = transcript_with_status(TranscriptStatus::Raw);
    repository.create(&transcript).await.unwrap();

    let updated = machine
        .transition(
            transcript.id,
            TranscriptEvent::StartProcessing {
                queue_job_id: "job-1".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, TranscriptStatus::Processing);
    assert_eq!(updated.queue_job_id.as_deref(), Some("job-1"));
    assert!(updated.processing_started_at.is_some());
    assert_eq!(updated.error_message, None);
}

#[tokio::test]
async fn given_processing_transcript_when_marking_failed_then_error_is_recorded_and_job_id_cleared()
{
    let (repository, machine, _) = transcript_machine();
    let transcript = transcript_with_status(TranscriptStatus::Processing);
    repository.create(&transcript).await.unwrap();

    let updated = machine
        .transition(
            transcript.id,
            TranscriptEvent::MarkFailed {
                error: "timeout".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, TranscriptStatus::Failed);
    assert_eq!(updated.error_message.as_deref(), Some("timeout"));
    assert_eq!(updated.queue_job_id, None);
}

#[tokio::test]
async fn given_processing_transcript_when_marking_cleaned_then_completion_is_stamped() {
    let (repository, machine, _) = transcript_machine();
    let transcript = transcript_with_status(TranscriptStatus::Processing);
    repository.create(&transcript).await.unwrap();

    let updated = machine
        .transition(transcript.id, TranscriptEvent::MarkCleaned)
        .await
        .unwrap();

    assert_eq!(updated.status, TranscriptStatus::Cleaned);
    assert!(updated.processing_completed_at.is_some());
    assert_eq!(updated.queue_job_id, None);
}

#[tokio::test]
async fn given_cleaned_transcript_when_starting_insight_extraction_then_it_is_processing_again() {
    let (repository, machine, _) = transcript_machine();
    let transcript = transcript_with_status(TranscriptStatus::Cleaned);
    repository.create(&transcript).await.unwrap();

    let updated = machine
        .transition(
            transcript.id,
            TranscriptEvent::StartInsightExtraction {
                queue_job_id: "job-2".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, TranscriptStatus::Processing);
    assert_eq!(updated.queue_job_id.as_deref(), Some("job-2"));
    assert!(updated.processing_started_at.is_some());
    assert_eq!(updated.processing_completed_at, None);
}

#[tokio::test]
async fn given_failed_transcript_when_retrying_then_it_returns_to_raw_with_cleared_error() {
    let (repository, machine, _) = transcript_machine();
    let mut transcript = transcript_with_status(TranscriptStatus::Failed);
    transcript.error_message = Some("boom".to_string());
    repository.create(&transcript).await.unwrap();

    let updated = machine
        .transition(transcript.id, TranscriptEvent::Retry)
        .await
        .unwrap();

    assert_eq!(updated.status, TranscriptStatus::Raw);
    assert_eq!(updated.error_message, None);
    assert_eq!(updated.queue_job_id, None);
    assert_eq!(updated.processing_started_at, None);
}

#[tokio::test]
async fn given_raw_transcript_when_marking_cleaned_then_invalid_transition_with_diagnostics() {
    let (repository, machine, _) = transcript_machine();
    let transcript = transcript_with_status(TranscriptStatus::Raw);
    repository.create(&transcript).await.unwrap();

    let error = machine
        .transition(transcript.id, TranscriptEvent::MarkCleaned)
        .await
        .unwrap_err();

    match error {
        TransitionError::InvalidTransition {
            current,
            event,
            allowed,
        } => {
            assert_eq!(current, TranscriptStatus::Raw);
            assert_eq!(event, TranscriptEventKind::MarkCleaned);
            assert_eq!(allowed, &[TranscriptEventKind::StartProcessing][..]);
        }
        other => panic!("expected InvalidTransition, got {other:?}"),
    }

    // the rejected event must not have mutated the entity
    let stored = repository.get_by_id(transcript.id).await.unwrap().unwrap();
    assert_eq!(stored, transcript);
}

#[tokio::test]
async fn given_unknown_id_when_transitioning_then_not_found() {
    let (_, machine, _) = transcript_machine();
    let id = TranscriptId::new();

    let error = machine
        .transition(id, TranscriptEvent::Retry)
        .await
        .unwrap_err();

    assert!(matches!(error, TransitionError::NotFound(u) if u == id.as_uuid()));
}

#[tokio::test]
async fn given_committed_transition_when_listening_on_bus_then_change_is_published() {
    let (repository, machine, changes) = transcript_machine();
    let transcript = transcript_with_status(TranscriptStatus::Raw);
    repository.create(&transcript).await.unwrap();

    machine
        .transition(
            transcript.id,
            TranscriptEvent::StartProcessing {
                queue_job_id: "job-1".to_string(),
            },
        )
        .await
        .unwrap();

    let published = changes.take();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].entity, EntityKind::Transcript);
    assert_eq!(published[0].id, transcript.id.as_uuid());
    assert_eq!(published[0].event, "START_PROCESSING");
    assert_eq!(published[0].from, "RAW");
    assert_eq!(published[0].to, "PROCESSING");
}

#[tokio::test]
async fn given_rejected_transition_when_listening_on_bus_then_nothing_is_published() {
    let (repository, machine, changes) = transcript_machine();
    let transcript = transcript_with_status(TranscriptStatus::Published);
    repository.create(&transcript).await.unwrap();

    machine
        .transition(transcript.id, TranscriptEvent::Retry)
        .await
        .unwrap_err();

    assert!(changes.take().is_empty());
}

#[tokio::test]
async fn given_mixed_statuses_when_listing_by_status_then_newest_first() {
    let (repository, machine, _) = transcript_machine();

    let mut older = transcript_with_status(TranscriptStatus::Raw);
    older.created_at = older.created_at - chrono::Duration::hours(1);
    let newer = transcript_with_status(TranscriptStatus::Raw);
    let unrelated = transcript_with_status(TranscriptStatus::Cleaned);

    repository.create(&older).await.unwrap();
    repository.create(&newer).await.unwrap();
    repository.create(&unrelated).await.unwrap();

    let listed = machine.list_by_status(TranscriptStatus::Raw).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);
}

#[test]
fn given_introspection_queries_when_asked_then_they_mirror_the_table() {
    use turnstile::application::services::TranscriptStateMachine;

    assert!(TranscriptStateMachine::can_transition(
        TranscriptStatus::Raw,
        TranscriptEventKind::StartProcessing
    ));
    assert!(!TranscriptStateMachine::can_transition(
        TranscriptStatus::Raw,
        TranscriptEventKind::Retry
    ));
    assert_eq!(
        TranscriptStateMachine::available_transitions(TranscriptStatus::Processing),
        &[
            TranscriptEventKind::MarkCleaned,
            TranscriptEventKind::MarkFailed
        ][..]
    );
    assert!(
        TranscriptStateMachine::available_transitions(TranscriptStatus::Archived).is_empty()
    );
}
