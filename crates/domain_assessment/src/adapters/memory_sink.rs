//! In-memory decision sink

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, DomainPort, OperationMetadata, PortError};
use crate::decision::Decision;
use crate::ports::DecisionSink;

/// Keeps finalized decisions in memory, in arrival order
///
/// Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDecisionSink {
    decisions: Arc<RwLock<Vec<Decision>>>,
}

impl InMemoryDecisionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded decision
    pub async fn decisions(&self) -> Vec<Decision> {
        self.decisions.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.decisions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.decisions.read().await.is_empty()
    }

    /// The decision recorded for a claim
    pub async fn find(&self, claim_id: ClaimId) -> Result<Decision, PortError> {
        self.decisions
            .read()
            .await
            .iter()
            .find(|d| d.claim_id == claim_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Decision", claim_id))
    }
}

impl DomainPort for InMemoryDecisionSink {}

#[async_trait]
impl DecisionSink for InMemoryDecisionSink {
    #[instrument(skip(self, decision, metadata), fields(claim_number = %decision.claim_number, action = %decision.action))]
    async fn record(
        &self,
        decision: &Decision,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        let mut decisions = self.decisions.write().await;
        if decisions.iter().any(|d| d.claim_id == decision.claim_id) {
            return Err(PortError::validation_field(
                format!("claim {} already has a decision", decision.claim_id),
                "claim_id",
            ));
        }

        decisions.push(decision.clone());
        debug!(
            recorded = decisions.len(),
            initiated_by = metadata.as_ref().and_then(|m| m.initiated_by.as_deref()),
            "decision recorded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionAction;
    use crate::fixtures::Scenario;
    use crate::session::ClaimSession;

    fn decision() -> Decision {
        let mut session = ClaimSession::new("CLM-SINK");
        session
            .attach_assessment(Scenario::AutoApprove.assessment().unwrap())
            .unwrap();
        session.finalize(DecisionAction::Approved, "ok").unwrap()
    }

    #[tokio::test]
    async fn test_record_and_find() {
        let sink = InMemoryDecisionSink::new();
        let decision = decision();

        sink.record(&decision, None).await.unwrap();
        assert_eq!(sink.len().await, 1);
        assert_eq!(sink.find(decision.claim_id).await.unwrap(), decision);
    }

    #[tokio::test]
    async fn test_second_decision_for_claim_rejected() {
        let sink = InMemoryDecisionSink::new();
        let decision = decision();

        sink.record(&decision, None).await.unwrap();
        let result = sink.record(&decision, None).await;
        assert!(matches!(result, Err(PortError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_find_unknown_claim() {
        let sink = InMemoryDecisionSink::new();
        let result = sink.find(ClaimId::new_v7()).await;
        assert!(result.unwrap_err().is_not_found());
    }
}
