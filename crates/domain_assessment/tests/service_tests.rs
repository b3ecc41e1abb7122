//! Assessment service against the in-process adapters

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{DomainPort, OperationMetadata, PortError};
use domain_assessment::{
    AssessmentError, AssessmentService, Decision, DecisionAction, DecisionSink,
    FixtureAssessmentProvider, InMemoryDecisionSink, RoutingOutcome, Scenario,
};
use test_utils::{assert_routed, ImageFixtures, StringFixtures};

/// Sink that always fails
struct OfflineSink;

impl DomainPort for OfflineSink {}

#[async_trait]
impl DecisionSink for OfflineSink {
    async fn record(&self, _: &Decision, _: Option<OperationMetadata>) -> Result<(), PortError> {
        Err(PortError::internal("claims records offline"))
    }
}

fn service(sink: Arc<dyn DecisionSink>) -> AssessmentService {
    AssessmentService::new(Arc::new(FixtureAssessmentProvider::instant()), sink)
}

#[tokio::test]
async fn full_reassessment_flow_is_recorded() {
    let sink = InMemoryDecisionSink::new();
    let service = service(Arc::new(sink.clone()));
    let mut session = service.open_claim(StringFixtures::claim_number());

    service
        .analyze(&mut session, &ImageFixtures::photo(), Some(Scenario::AgentReassessment))
        .await
        .unwrap();
    assert_routed(&session, RoutingOutcome::AgentReassessment);

    session
        .set_cost_input(StringFixtures::flagged_detection(), "1200")
        .unwrap();
    session
        .set_item_note(StringFixtures::flagged_detection(), "bracket cracked behind bumper")
        .unwrap();
    service
        .finalize(&mut session, DecisionAction::Escalated, "over threshold after review")
        .await
        .unwrap();

    let recorded = sink.find(session.id()).await.unwrap();
    assert_eq!(recorded.action, DecisionAction::Escalated);
    assert_eq!(recorded.corrections.len(), 1);
    assert_eq!(recorded.confirmed.len(), 3);
    assert_eq!(
        recorded.item_note(StringFixtures::flagged_detection()),
        Some("bracket cracked behind bumper")
    );
}

#[tokio::test]
async fn sink_failure_does_not_undo_decision() {
    let service = service(Arc::new(OfflineSink));
    let mut session = service.open_claim(StringFixtures::claim_number());

    service
        .analyze(&mut session, &ImageFixtures::photo(), Some(Scenario::AutoApprove))
        .await
        .unwrap();
    let decision = service
        .finalize(&mut session, DecisionAction::Approved, "")
        .await
        .unwrap();

    assert_eq!(decision.action, DecisionAction::Approved);
    assert!(session.state().is_terminal());
}

#[tokio::test]
async fn empty_image_fails_analysis() {
    let service = service(Arc::new(InMemoryDecisionSink::new()));
    let mut session = service.open_claim(StringFixtures::claim_number());

    let result = service.analyze(&mut session, &ImageFixtures::empty(), None).await;
    match result {
        Err(AssessmentError::Analysis(PortError::Validation { field, .. })) => {
            assert_eq!(field.as_deref(), Some("image"));
        }
        other => panic!("expected analysis validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn analyzing_twice_is_rejected() {
    let service = service(Arc::new(InMemoryDecisionSink::new()));
    let mut session = service.open_claim(StringFixtures::claim_number());

    service
        .analyze(&mut session, &ImageFixtures::photo(), Some(Scenario::AutoApprove))
        .await
        .unwrap();
    let again = service
        .analyze(&mut session, &ImageFixtures::photo(), Some(Scenario::AutoApprove))
        .await;
    assert!(matches!(again, Err(AssessmentError::InvalidTransition { .. })));
}
