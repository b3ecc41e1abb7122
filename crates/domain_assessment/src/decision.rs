//! Final agent decisions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use core_kernel::{ClaimId, DecisionId, Money};
use crate::adjustment::{AdjustmentTracker, Correction};
use crate::claim::ClaimDetails;
use crate::detection::DetectionId;
use crate::error::AssessmentError;
use crate::routing::RoutingOutcome;

/// Terminal action taken by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    /// Claim approved for payment
    Approved,
    /// Referred to a senior adjuster
    Escalated,
}

impl DecisionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionAction::Approved => "approved",
            DecisionAction::Escalated => "escalated",
        }
    }

    /// True when this action may close a claim routed to `outcome`
    pub fn is_permitted_for(&self, outcome: RoutingOutcome) -> bool {
        permitted_actions(outcome).contains(self)
    }
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionAction {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approved" | "approve" => Ok(DecisionAction::Approved),
            "escalated" | "escalate" => Ok(DecisionAction::Escalated),
            other => Err(AssessmentError::validation(format!(
                "unknown decision action '{other}'"
            ))),
        }
    }
}

/// Actions that can close a claim in each routing branch
///
/// Low-cost branches approve, high-cost branches escalate.
pub fn permitted_actions(outcome: RoutingOutcome) -> &'static [DecisionAction] {
    match outcome {
        RoutingOutcome::AutoApprove | RoutingOutcome::AgentReassessment => &[DecisionAction::Approved],
        RoutingOutcome::DirectEscalation | RoutingOutcome::ReviewAndEscalate => {
            &[DecisionAction::Escalated]
        }
    }
}

/// Record of a finalized claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    pub claim_id: ClaimId,
    pub claim_number: String,
    pub details: Option<ClaimDetails>,
    pub action: DecisionAction,
    pub notes: String,
    pub adjusted_total: Money,
    pub routing: RoutingOutcome,
    /// Items the agent changed, kept as feedback on the detection stage
    pub corrections: Vec<Correction>,
    /// Detections the agent confirmed as real damage, ordered by id
    pub confirmed: Vec<DetectionId>,
    pub item_notes: BTreeMap<DetectionId, String>,
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    /// Returns true if the agent changed any item before deciding
    pub fn has_corrections(&self) -> bool {
        !self.corrections.is_empty()
    }

    pub fn item_note(&self, id: DetectionId) -> Option<&str> {
        self.item_notes.get(&id).map(String::as_str)
    }
}

/// Inputs the recorder needs from an open claim
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub claim_id: ClaimId,
    pub claim_number: &'a str,
    pub details: Option<&'a ClaimDetails>,
    pub routing: RoutingOutcome,
    pub tracker: &'a AdjustmentTracker,
    pub confirmed: &'a BTreeSet<DetectionId>,
    pub item_notes: &'a BTreeMap<DetectionId, String>,
}

/// Records the agent's decision against the claim's current routing
///
/// Notes are free text and may be empty. The total and corrections are
/// taken from the tracker at the moment of the call, together with the
/// agent's confirmed selection and per-item notes.
pub fn finalize(
    context: DecisionContext<'_>,
    action: DecisionAction,
    notes: impl Into<String>,
) -> Result<Decision, AssessmentError> {
    if !action.is_permitted_for(context.routing) {
        return Err(AssessmentError::invalid_transition(context.routing, action));
    }

    let decision = Decision {
        id: DecisionId::new_v7(),
        claim_id: context.claim_id,
        claim_number: context.claim_number.to_string(),
        details: context.details.cloned(),
        action,
        notes: notes.into(),
        adjusted_total: context.tracker.current_total()?,
        routing: context.routing,
        corrections: context.tracker.corrections(),
        confirmed: context.confirmed.iter().copied().collect(),
        item_notes: context.item_notes.clone(),
        decided_at: Utc::now(),
    };

    info!(
        claim_number = %decision.claim_number,
        action = %decision.action,
        routing = %decision.routing,
        total = %decision.adjusted_total,
        confirmed = decision.confirmed.len(),
        "claim finalized"
    );
    Ok(decision)
}
