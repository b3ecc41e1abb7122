//! Claim session
//!
//! One session per claim, owned by a single agent. The session holds the
//! state machine, the adjustment tracker and the per-item review state, and
//! re-routes the claim after every cost or severity change.
//!
//! ```text
//! Submitted ──attach_assessment──► AwaitingAgentAction{routing} ──finalize──► Finalized{action}
//!                                      │        ▲
//!                                      └────────┘ set_severity / set_cost
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

use core_kernel::{ClaimId, Money};
use crate::adjustment::{AdjustmentEvent, AdjustmentTracker};
use crate::assessment::Assessment;
use crate::claim::ClaimDetails;
use crate::decision::{self, Decision, DecisionAction, DecisionContext};
use crate::detection::{DetectionId, Severity};
use crate::error::AssessmentError;
use crate::events::ClaimEvent;
use crate::routing::{self, RoutingAnalysis, RoutingOutcome, RoutingThresholds};

/// Longest per-item note an agent may leave
pub const MAX_ITEM_NOTE_CHARS: usize = 300;

/// Claim lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ClaimState {
    /// Photo submitted, assessment not yet attached
    Submitted,
    /// Assessment attached, waiting for the agent
    AwaitingAgentAction { routing: RoutingOutcome },
    /// Approved or escalated
    Finalized { action: DecisionAction },
}

impl ClaimState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimState::Finalized { .. })
    }
}

impl fmt::Display for ClaimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimState::Submitted => f.write_str("submitted"),
            ClaimState::AwaitingAgentAction { routing } => {
                write!(f, "awaiting_agent_action({routing})")
            }
            ClaimState::Finalized { action } => write!(f, "finalized({action})"),
        }
    }
}

/// An open claim being worked by an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSession {
    id: ClaimId,
    claim_number: String,
    details: Option<ClaimDetails>,
    thresholds: RoutingThresholds,
    state: ClaimState,
    assessment: Option<Assessment>,
    tracker: Option<AdjustmentTracker>,
    confirmed: BTreeSet<DetectionId>,
    item_notes: BTreeMap<DetectionId, String>,
    decision: Option<Decision>,
    /// Domain events to be published
    #[serde(skip)]
    events: Vec<ClaimEvent>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClaimSession {
    /// Opens a session for a submitted claim using the standard thresholds
    pub fn new(claim_number: impl Into<String>) -> Self {
        Self::with_thresholds(claim_number, RoutingThresholds::STANDARD)
    }

    /// Opens a session with explicit thresholds
    pub fn with_thresholds(claim_number: impl Into<String>, thresholds: RoutingThresholds) -> Self {
        let now = Utc::now();
        Self {
            id: ClaimId::new_v7(),
            claim_number: claim_number.into(),
            details: None,
            thresholds,
            state: ClaimState::Submitted,
            assessment: None,
            tracker: None,
            confirmed: BTreeSet::new(),
            item_notes: BTreeMap::new(),
            decision: None,
            events: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> ClaimId {
        self.id
    }

    pub fn claim_number(&self) -> &str {
        &self.claim_number
    }

    pub fn details(&self) -> Option<&ClaimDetails> {
        self.details.as_ref()
    }

    /// Records policy and vehicle details; allowed until the claim is finalized
    pub fn set_details(&mut self, details: ClaimDetails) -> Result<(), AssessmentError> {
        if self.state.is_terminal() {
            return Err(AssessmentError::ClaimFinalized);
        }
        self.details = Some(details);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn state(&self) -> ClaimState {
        self.state
    }

    pub fn thresholds(&self) -> &RoutingThresholds {
        &self.thresholds
    }

    pub fn assessment(&self) -> Option<&Assessment> {
        self.assessment.as_ref()
    }

    pub fn tracker(&self) -> Option<&AdjustmentTracker> {
        self.tracker.as_ref()
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Current routing branch, once an assessment is attached
    pub fn routing(&self) -> Option<RoutingOutcome> {
        match self.state {
            ClaimState::AwaitingAgentAction { routing } => Some(routing),
            ClaimState::Finalized { .. } => self.decision.as_ref().map(|d| d.routing),
            ClaimState::Submitted => None,
        }
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<ClaimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Attaches the assessment and routes the claim
    pub fn attach_assessment(&mut self, assessment: Assessment) -> Result<RoutingOutcome, AssessmentError> {
        match self.state {
            ClaimState::Submitted => {}
            ClaimState::Finalized { .. } => return Err(AssessmentError::ClaimFinalized),
            state @ ClaimState::AwaitingAgentAction { .. } => {
                return Err(AssessmentError::invalid_transition(state, "awaiting_agent_action"));
            }
        }

        let tracker = AdjustmentTracker::initialize(assessment.detections());
        let total = tracker.current_total()?;
        let routing = routing::classify(&total, &assessment.confidences(), &self.thresholds)?;

        info!(
            claim_number = %self.claim_number,
            assessment_claim = %assessment.claim_number(),
            total = %total,
            routing = %routing,
            "assessment attached"
        );

        self.confirmed = assessment.detections().iter().map(|d| d.id).collect();
        self.events.push(ClaimEvent::AssessmentAttached {
            claim_id: self.id,
            assessment_id: assessment.id(),
            total,
            routing,
            timestamp: Utc::now(),
        });
        self.tracker = Some(tracker);
        self.assessment = Some(assessment);
        self.state = ClaimState::AwaitingAgentAction { routing };
        self.updated_at = Utc::now();
        Ok(routing)
    }

    /// Overrides an item's severity and re-routes the claim
    pub fn set_severity(&mut self, id: DetectionId, severity: Severity) -> Result<RoutingOutcome, AssessmentError> {
        let event = self.open_tracker_mut("adjust severity")?.set_severity(id, severity)?;
        self.apply(event)
    }

    /// Overrides an item's cost and re-routes the claim
    pub fn set_cost(&mut self, id: DetectionId, cost: Money) -> Result<RoutingOutcome, AssessmentError> {
        let event = self.open_tracker_mut("adjust cost")?.set_cost(id, cost)?;
        self.apply(event)
    }

    /// Overrides an item's cost from raw agent input and re-routes the claim
    pub fn set_cost_input(&mut self, id: DetectionId, input: &str) -> Result<RoutingOutcome, AssessmentError> {
        let event = self.open_tracker_mut("adjust cost")?.set_cost_input(id, input)?;
        self.apply(event)
    }

    /// Flips whether the agent confirms a detected damage, returning the new state
    pub fn toggle_confirmed(&mut self, id: DetectionId) -> Result<bool, AssessmentError> {
        self.open_tracker_mut("confirm damage")?;
        self.ensure_detection(id)?;

        let confirmed = if self.confirmed.remove(&id) {
            false
        } else {
            self.confirmed.insert(id);
            true
        };
        self.updated_at = Utc::now();
        Ok(confirmed)
    }

    pub fn is_confirmed(&self, id: DetectionId) -> bool {
        self.confirmed.contains(&id)
    }

    /// Confirmed detections, ordered by id
    pub fn confirmed(&self) -> impl Iterator<Item = DetectionId> + '_ {
        self.confirmed.iter().copied()
    }

    /// Stores the agent's note for one item; an empty note clears it
    pub fn set_item_note(&mut self, id: DetectionId, note: impl Into<String>) -> Result<(), AssessmentError> {
        self.open_tracker_mut("annotate item")?;
        self.ensure_detection(id)?;

        let note = note.into();
        let length = note.chars().count();
        if length > MAX_ITEM_NOTE_CHARS {
            return Err(AssessmentError::validation(format!(
                "note is {length} characters, limit is {MAX_ITEM_NOTE_CHARS}"
            )));
        }

        if note.trim().is_empty() {
            self.item_notes.remove(&id);
        } else {
            self.item_notes.insert(id, note);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn item_note(&self, id: DetectionId) -> Option<&str> {
        self.item_notes.get(&id).map(String::as_str)
    }

    /// `(reviewed, needing_review)` over the items flagged for review
    ///
    /// A flagged item counts as reviewed once the agent has changed it.
    pub fn review_progress(&self) -> (usize, usize) {
        let (Some(assessment), Some(tracker)) = (&self.assessment, &self.tracker) else {
            return (0, 0);
        };

        let flagged: Vec<DetectionId> = assessment.items_needing_review().map(|d| d.id).collect();
        let reviewed = flagged
            .iter()
            .filter(|id| tracker.is_changed(**id).unwrap_or(false))
            .count();
        (reviewed, flagged.len())
    }

    /// Current total of the adjusted costs
    pub fn current_total(&self) -> Result<Money, AssessmentError> {
        self.attached_tracker()?.current_total()
    }

    /// Current total minus the assessment's most likely estimate
    pub fn cost_delta(&self) -> Result<Money, AssessmentError> {
        let assessment = self.attached_assessment()?;
        let total = self.current_total()?;
        Ok(total.checked_sub(&assessment.cost_estimate().most_likely)?)
    }

    /// Explains the current routing branch
    pub fn analysis(&self) -> Result<RoutingAnalysis, AssessmentError> {
        let assessment = self.attached_assessment()?;
        routing::analyze(&self.current_total()?, &assessment.confidences(), &self.thresholds)
    }

    /// Closes the claim with the agent's decision
    pub fn finalize(&mut self, action: DecisionAction, notes: impl Into<String>) -> Result<Decision, AssessmentError> {
        let routing = match self.state {
            ClaimState::AwaitingAgentAction { routing } => routing,
            ClaimState::Finalized { .. } => return Err(AssessmentError::ClaimFinalized),
            state @ ClaimState::Submitted => {
                return Err(AssessmentError::invalid_transition(state, action));
            }
        };

        let decision = decision::finalize(
            DecisionContext {
                claim_id: self.id,
                claim_number: &self.claim_number,
                details: self.details.as_ref(),
                routing,
                tracker: self.attached_tracker()?,
                confirmed: &self.confirmed,
                item_notes: &self.item_notes,
            },
            action,
            notes,
        )?;

        self.events.push(ClaimEvent::ClaimFinalized {
            claim_id: self.id,
            decision_id: decision.id,
            action,
            timestamp: decision.decided_at,
        });
        self.state = ClaimState::Finalized { action };
        self.decision = Some(decision.clone());
        self.updated_at = Utc::now();
        Ok(decision)
    }

    /// Recomputes total and routing after a tracker mutation
    fn apply(&mut self, adjustment: AdjustmentEvent) -> Result<RoutingOutcome, AssessmentError> {
        let previous = match self.state {
            ClaimState::AwaitingAgentAction { routing } => routing,
            state => return Err(AssessmentError::invalid_transition(state, "adjustment")),
        };
        let total = self.current_total()?;
        let routing = routing::classify(&total, &self.attached_assessment()?.confidences(), &self.thresholds)?;
        let now = Utc::now();

        debug!(
            claim_number = %self.claim_number,
            detection_id = %adjustment.detection_id,
            total = %total,
            "adjustment applied"
        );
        self.events.push(ClaimEvent::AdjustmentApplied {
            claim_id: self.id,
            adjustment,
            total,
            routing,
            timestamp: now,
        });

        if routing != previous {
            info!(
                claim_number = %self.claim_number,
                from = %previous,
                to = %routing,
                total = %total,
                "claim re-routed"
            );
            self.events.push(ClaimEvent::RoutingChanged {
                claim_id: self.id,
                from: previous,
                to: routing,
                timestamp: now,
            });
        }

        self.state = ClaimState::AwaitingAgentAction { routing };
        self.updated_at = now;
        Ok(routing)
    }

    fn open_tracker_mut(&mut self, operation: &str) -> Result<&mut AdjustmentTracker, AssessmentError> {
        match self.state {
            ClaimState::AwaitingAgentAction { .. } => {}
            ClaimState::Finalized { .. } => return Err(AssessmentError::ClaimFinalized),
            state @ ClaimState::Submitted => {
                return Err(AssessmentError::invalid_transition(state, operation));
            }
        }
        self.tracker
            .as_mut()
            .ok_or_else(|| AssessmentError::invalid_transition(ClaimState::Submitted, operation))
    }

    fn attached_tracker(&self) -> Result<&AdjustmentTracker, AssessmentError> {
        self.tracker
            .as_ref()
            .ok_or_else(|| AssessmentError::invalid_transition(self.state, "read total"))
    }

    fn attached_assessment(&self) -> Result<&Assessment, AssessmentError> {
        self.assessment
            .as_ref()
            .ok_or_else(|| AssessmentError::invalid_transition(self.state, "read assessment"))
    }

    fn ensure_detection(&self, id: DetectionId) -> Result<(), AssessmentError> {
        self.attached_assessment()?
            .detection(id)
            .map(|_| ())
            .ok_or(AssessmentError::DetectionNotFound(id))
    }
}
