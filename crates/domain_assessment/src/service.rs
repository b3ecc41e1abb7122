//! Assessment service
//!
//! Wires the claim session to its ports: fetches the assessment for a
//! submitted claim and hands finalized decisions to the sink.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use core_kernel::OperationMetadata;
use crate::decision::{Decision, DecisionAction};
use crate::error::AssessmentError;
use crate::fixtures::Scenario;
use crate::ports::{AssessmentProvider, ClaimImage, DecisionSink};
use crate::routing::{RoutingOutcome, RoutingThresholds};
use crate::session::ClaimSession;

/// Application service for claim triage
#[derive(Clone)]
pub struct AssessmentService {
    provider: Arc<dyn AssessmentProvider>,
    sink: Arc<dyn DecisionSink>,
    thresholds: RoutingThresholds,
}

impl AssessmentService {
    pub fn new(provider: Arc<dyn AssessmentProvider>, sink: Arc<dyn DecisionSink>) -> Self {
        Self::with_thresholds(provider, sink, RoutingThresholds::STANDARD)
    }

    pub fn with_thresholds(
        provider: Arc<dyn AssessmentProvider>,
        sink: Arc<dyn DecisionSink>,
        thresholds: RoutingThresholds,
    ) -> Self {
        Self {
            provider,
            sink,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &RoutingThresholds {
        &self.thresholds
    }

    /// Opens a session for a newly submitted claim
    pub fn open_claim(&self, claim_number: impl Into<String>) -> ClaimSession {
        ClaimSession::with_thresholds(claim_number, self.thresholds)
    }

    /// Runs the image through the provider and attaches the result
    ///
    /// A provider failure leaves the session in `Submitted` so the agent can retry.
    #[instrument(skip(self, session, image), fields(claim_number = %session.claim_number()))]
    pub async fn analyze(
        &self,
        session: &mut ClaimSession,
        image: &ClaimImage,
        scenario: Option<Scenario>,
    ) -> Result<RoutingOutcome, AssessmentError> {
        let metadata = OperationMetadata::with_correlation_id(session.id().to_string())
            .with_context("claim_number", session.claim_number());

        let assessment = self.provider.assess(image, scenario, Some(metadata)).await?;
        let routing = session.attach_assessment(assessment)?;

        info!(routing = %routing, "claim analyzed");
        Ok(routing)
    }

    /// Finalizes the claim and forwards the decision to the sink
    ///
    /// Sink failures are logged and do not undo the decision.
    #[instrument(skip(self, session, action, notes), fields(claim_number = %session.claim_number(), action = %action))]
    pub async fn finalize(
        &self,
        session: &mut ClaimSession,
        action: DecisionAction,
        notes: impl Into<String> + Send,
    ) -> Result<Decision, AssessmentError> {
        let decision = session.finalize(action, notes)?;

        let metadata = OperationMetadata::with_correlation_id(session.id().to_string());
        if let Err(error) = self.sink.record(&decision, Some(metadata)).await {
            warn!(error = %error, decision_id = %decision.id, "failed to record decision");
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixtureAssessmentProvider, InMemoryDecisionSink};

    fn photo() -> ClaimImage {
        ClaimImage::new("rear.jpg", "image/jpeg", vec![1, 2, 3])
    }

    #[tokio::test]
    async fn test_analyze_then_finalize_records_decision() {
        let sink = InMemoryDecisionSink::new();
        let service = AssessmentService::new(
            Arc::new(FixtureAssessmentProvider::instant()),
            Arc::new(sink.clone()),
        );

        let mut session = service.open_claim("CLM-SVC");
        let routing = service
            .analyze(&mut session, &photo(), Some(Scenario::AutoApprove))
            .await
            .unwrap();
        assert_eq!(routing, RoutingOutcome::AutoApprove);

        let decision = service
            .finalize(&mut session, DecisionAction::Approved, "")
            .await
            .unwrap();
        assert_eq!(sink.find(session.id()).await.unwrap().id, decision.id);
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_session_submitted() {
        let service = AssessmentService::new(
            Arc::new(FixtureAssessmentProvider::instant()),
            Arc::new(InMemoryDecisionSink::new()),
        );
        let mut session = service.open_claim("CLM-SVC");

        let empty = ClaimImage::new("none.jpg", "image/jpeg", Vec::new());
        let result = service.analyze(&mut session, &empty, None).await;

        assert!(matches!(result, Err(AssessmentError::Analysis(_))));
        assert_eq!(session.state(), crate::session::ClaimState::Submitted);
    }
}
