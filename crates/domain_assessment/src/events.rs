//! Domain events for the claim session
//!
//! The session accumulates these as the agent works the claim; callers drain
//! them with [`crate::session::ClaimSession::take_events`] to refresh any
//! view of the total and the routing branch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AssessmentId, ClaimId, DecisionId, Money};
use crate::adjustment::AdjustmentEvent;
use crate::decision::DecisionAction;
use crate::routing::RoutingOutcome;

/// Domain events emitted by a claim session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClaimEvent {
    /// The assessment arrived and the claim was routed
    AssessmentAttached {
        claim_id: ClaimId,
        assessment_id: AssessmentId,
        total: Money,
        routing: RoutingOutcome,
        timestamp: DateTime<Utc>,
    },

    /// The agent changed an item's severity or cost
    AdjustmentApplied {
        claim_id: ClaimId,
        adjustment: AdjustmentEvent,
        total: Money,
        routing: RoutingOutcome,
        timestamp: DateTime<Utc>,
    },

    /// An adjustment moved the claim into another branch
    RoutingChanged {
        claim_id: ClaimId,
        from: RoutingOutcome,
        to: RoutingOutcome,
        timestamp: DateTime<Utc>,
    },

    /// The agent approved or escalated the claim
    ClaimFinalized {
        claim_id: ClaimId,
        decision_id: DecisionId,
        action: DecisionAction,
        timestamp: DateTime<Utc>,
    },
}

impl ClaimEvent {
    /// Returns the claim ID associated with this event
    pub fn claim_id(&self) -> ClaimId {
        match self {
            ClaimEvent::AssessmentAttached { claim_id, .. } => *claim_id,
            ClaimEvent::AdjustmentApplied { claim_id, .. } => *claim_id,
            ClaimEvent::RoutingChanged { claim_id, .. } => *claim_id,
            ClaimEvent::ClaimFinalized { claim_id, .. } => *claim_id,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ClaimEvent::AssessmentAttached { timestamp, .. } => *timestamp,
            ClaimEvent::AdjustmentApplied { timestamp, .. } => *timestamp,
            ClaimEvent::RoutingChanged { timestamp, .. } => *timestamp,
            ClaimEvent::ClaimFinalized { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ClaimEvent::AssessmentAttached { .. } => "AssessmentAttached",
            ClaimEvent::AdjustmentApplied { .. } => "AdjustmentApplied",
            ClaimEvent::RoutingChanged { .. } => "RoutingChanged",
            ClaimEvent::ClaimFinalized { .. } => "ClaimFinalized",
        }
    }
}
