//! Damage Assessment Triage Domain
//!
//! This crate implements the triage core for vehicle-damage claims: a
//! simulated detection stage produces an assessment, an agent reviews and
//! adjusts the detected items, and the claim is routed and finalized.
//!
//! # Architecture
//!
//! - **Routing**: two signals (total cost, weakest confidence) against two
//!   fixed thresholds decide one of four workflow branches
//! - **Adjustments**: per-item severity and cost overrides; every change
//!   recomputes the total and re-routes the claim
//! - **Session**: per-claim state machine emitting [`ClaimEvent`]s
//! - **Ports**: [`AssessmentProvider`] and [`DecisionSink`], with in-process adapters
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> AwaitingAgentAction{routing} -> Finalized{Approved | Escalated}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_assessment::{ClaimSession, DecisionAction, DetectionId, Scenario};
//!
//! let mut session = ClaimSession::new("CLM-2024-003");
//! session.attach_assessment(Scenario::AgentReassessment.assessment()?)?;
//! session.set_cost_input(DetectionId::new(1), "1200")?;
//! session.finalize(DecisionAction::Escalated, "bumper bracket cracked")?;
//! ```

pub mod adapters;
pub mod adjustment;
pub mod aggregator;
pub mod assessment;
pub mod claim;
pub mod decision;
pub mod detection;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod ports;
pub mod routing;
pub mod service;
pub mod session;

pub use adapters::{FixtureAssessmentProvider, InMemoryDecisionSink};
pub use adjustment::{AdjustedField, Adjustment, AdjustmentEvent, AdjustmentTracker, Correction};
pub use assessment::{Assessment, AssessmentBuilder, CostEstimate, Recommendation, RepairEstimate};
pub use claim::{ClaimDetails, Vehicle};
pub use decision::{permitted_actions, Decision, DecisionAction};
pub use detection::{Confidence, DamageDetection, DetectionId, RepairLine, Severity};
pub use error::AssessmentError;
pub use events::ClaimEvent;
pub use fixtures::{
    Scenario, AGENT_REASSESSMENT_FIXTURE, AUTO_APPROVE_FIXTURE, DIRECT_ESCALATION_FIXTURE,
};
pub use ports::{AssessmentProvider, ClaimImage, DecisionSink};
pub use routing::{classify, RoutingAnalysis, RoutingOutcome, RoutingThresholds, ThresholdCheck};
pub use service::AssessmentService;
pub use session::{ClaimSession, ClaimState, MAX_ITEM_NOTE_CHARS};
