//! Fail-fast barriers and all-or-nothing commits

use crate::integration::test_utils::*;
use std::sync::Arc;
use stylemix::credentials::CredentialResolver;
use stylemix::error::{ApiError, PipelineError};
use stylemix::pipeline::{PipelineEvent, PipelineOrchestrator, PipelineRequest, PipelineStage};
use stylemix::types::AspectRatio;
use tokio::sync::mpsc;

fn drain(rx: &mut mpsc::UnboundedReceiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn test_analysis_failure_stops_before_synthesis() {
    let client = Arc::new(ScriptedClient::new().failing_analysis_of("b"));
    let orchestrator = orchestrator_for(&client);
    let (store, id) = seeded_store(&["a", "b", "c"], "a lighthouse");
    let before = store.project(&id).unwrap();

    let err = orchestrator
        .run_pipeline(&store, PipelineRequest::new(2, AspectRatio::Square))
        .await
        .unwrap_err();

    assert_eq!(err.failed_stage(), Some(PipelineStage::StyleAnalysis));
    assert_eq!(
        err.user_message(),
        "Failed to analyze the style of the reference images."
    );
    assert_eq!(client.syntheses.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(client.generations.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(store.project(&id).unwrap(), before);
}

#[tokio::test]
async fn test_synthesis_failure_leaves_project_untouched() {
    let client = Arc::new(ScriptedClient::new().failing_synthesis());
    let orchestrator = orchestrator_for(&client);
    let (store, id) = seeded_store(&["a", "b"], "a lighthouse");
    let before = store.project(&id).unwrap();

    let err = orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.failed_stage(), Some(PipelineStage::StyleSynthesis));
    assert!(matches!(
        err,
        PipelineError::StageFailed {
            source: ApiError::ProviderRateLimit(_),
            ..
        }
    ));
    assert_eq!(client.counts(), (2, 1, 0));
    assert_eq!(store.project(&id).unwrap(), before);
}

#[tokio::test]
async fn test_single_generation_failure_discards_batch() {
    // The first run uses generation call 1; call 3 is in the second batch.
    let client = Arc::new(ScriptedClient::new().failing_generation_on(3));
    let orchestrator = orchestrator_for(&client);
    let (store, id) = seeded_store(&["a", "b", "c"], "a lighthouse");

    orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap();
    let before = store.project(&id).unwrap();
    assert_eq!(before.history.len(), 1);

    let err = orchestrator
        .run_pipeline(&store, PipelineRequest::new(4, AspectRatio::Portrait))
        .await
        .unwrap_err();

    assert_eq!(err.failed_stage(), Some(PipelineStage::ImageGeneration));
    assert_eq!(err.user_message(), "Failed to generate the images.");
    let after = store.project(&id).unwrap();
    assert_eq!(after.history, before.history);
    assert_eq!(after.cached_style, before.cached_style);
}

#[tokio::test]
async fn test_failed_miss_keeps_previous_cached_style() {
    let client = Arc::new(ScriptedClient::new().failing_analysis_of("new"));
    let orchestrator = orchestrator_for(&client);
    let (store, id) = seeded_store(&["a"], "a lighthouse");

    orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap();
    let cached = store.project(&id).unwrap().cached_style;

    store
        .add_reference_images(
            &id,
            vec![stylemix::types::ReferenceImage::new(payload("new"))],
        )
        .unwrap();
    orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap_err();

    let project = store.project(&id).unwrap();
    assert_eq!(project.cached_style, cached);
    assert!(!project.has_valid_cache());
}

#[tokio::test]
async fn test_missing_image_data_is_a_generation_failure() {
    let client = Arc::new(ScriptedClient::new().omitting_image_data());
    let orchestrator = orchestrator_for(&client);
    let (store, id) = seeded_store(&["a"], "a lighthouse");

    let err = orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::StageFailed {
            stage: PipelineStage::ImageGeneration,
            source: ApiError::MissingImageData,
        }
    ));
    let project = store.project(&id).unwrap();
    assert!(project.history.is_empty());
    assert!(project.cached_style.is_none());
}

#[tokio::test]
async fn test_failed_run_releases_project() {
    let client = Arc::new(ScriptedClient::new().failing_synthesis());
    let orchestrator = orchestrator_for(&client);
    let (store, id) = seeded_store(&["a"], "a lighthouse");

    orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap_err();
    assert!(!store.is_running(&id));
    assert!(store.begin_run(&id).is_ok());
}

#[tokio::test]
async fn test_missing_credential_makes_no_calls() {
    let client = Arc::new(ScriptedClient::new());
    let factory = Arc::new(ScriptedFactory::new(client.clone()));
    let orchestrator = PipelineOrchestrator::new(factory.clone(), CredentialResolver::none());
    let (store, _) = seeded_store(&["a"], "a lighthouse");

    let err = orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::MissingCredential));
    assert!(err.is_precondition());
    assert_eq!(client.total_calls(), 0);
    assert!(factory.keys_seen.lock().is_empty());
}

#[tokio::test]
async fn test_credential_reaches_factory() {
    let client = Arc::new(ScriptedClient::new());
    let factory = Arc::new(ScriptedFactory::new(client.clone()));
    let orchestrator =
        PipelineOrchestrator::new(factory.clone(), CredentialResolver::fixed("  key-123  "));
    let (store, _) = seeded_store(&["a"], "a lighthouse");

    orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap();
    assert_eq!(*factory.keys_seen.lock(), vec!["key-123".to_string()]);
}

#[tokio::test]
async fn test_progress_events_on_success_and_failure() {
    let client = Arc::new(ScriptedClient::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = orchestrator_for(&client).with_progress(Arc::new(tx));
    let (store, id) = seeded_store(&["a", "b"], "a lighthouse");

    orchestrator
        .run_pipeline(&store, PipelineRequest::new(2, AspectRatio::Square))
        .await
        .unwrap();
    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            PipelineEvent::Started {
                project_id: id.clone(),
                image_count: 2,
            },
            PipelineEvent::AnalyzingReferences { total: 2 },
            PipelineEvent::SynthesizingStyle { descriptions: 2 },
            PipelineEvent::GeneratingImages { count: 2 },
            PipelineEvent::Completed { images: 2 },
        ]
    );

    orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap();
    let events = drain(&mut rx);
    assert!(matches!(events[1], PipelineEvent::UsingCachedStyle { .. }));
    assert_eq!(events.len(), 4);

    let failing = Arc::new(ScriptedClient::new().failing_synthesis());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let orchestrator = orchestrator_for(&failing).with_progress(Arc::new(tx));
    let (store, _) = seeded_store(&["a"], "a lighthouse");
    orchestrator
        .run_pipeline(&store, PipelineRequest::default())
        .await
        .unwrap_err();
    let events = drain(&mut rx);
    assert_eq!(
        events.last(),
        Some(&PipelineEvent::Failed {
            stage: Some(PipelineStage::StyleSynthesis),
        })
    );
}
