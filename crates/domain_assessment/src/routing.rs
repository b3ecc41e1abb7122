//! Claim routing
//!
//! Two signals decide which workflow branch a claim takes:
//!
//! ```text
//!                    cost < threshold     cost >= threshold
//! min conf >= thr    AutoApprove          DirectEscalation
//! min conf <  thr    AgentReassessment    ReviewAndEscalate
//! ```
//!
//! The confidence signal is the weakest detection, never an average. The
//! cost comparison is strict and the confidence comparison inclusive, so a
//! $2,000 claim is not cheap enough and a 90% detection is confident enough.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Money;
use crate::detection::Confidence;
use crate::error::AssessmentError;

/// Process-wide routing thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingThresholds {
    /// Claims must total strictly less than this to avoid escalation
    pub cost_threshold: Decimal,
    /// Every detection must be at least this confident to skip agent review
    pub confidence_threshold: Decimal,
}

impl RoutingThresholds {
    /// $2,000 and 90%
    pub const STANDARD: RoutingThresholds = RoutingThresholds {
        cost_threshold: dec!(2000),
        confidence_threshold: dec!(0.90),
    };

    /// Creates thresholds, rejecting a negative cost or a confidence outside [0, 1]
    pub fn new(cost_threshold: Decimal, confidence_threshold: Decimal) -> Result<Self, AssessmentError> {
        if cost_threshold.is_sign_negative() && !cost_threshold.is_zero() {
            return Err(AssessmentError::validation("cost threshold cannot be negative"));
        }
        Confidence::new(confidence_threshold)?;
        Ok(Self {
            cost_threshold,
            confidence_threshold,
        })
    }

    /// True when `total` is low enough for approval without escalation
    pub fn cost_ok(&self, total: &Money) -> bool {
        total.amount() < self.cost_threshold
    }

    /// True when `lowest` is confident enough to skip agent review
    pub fn confidence_ok(&self, lowest: Confidence) -> bool {
        lowest.value() >= self.confidence_threshold
    }
}

impl Default for RoutingThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Workflow branch a claim currently falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingOutcome {
    /// High confidence, low cost
    AutoApprove,
    /// High confidence, high cost
    DirectEscalation,
    /// Low confidence, low cost
    AgentReassessment,
    /// Low confidence, high cost. No dedicated review workflow exists for
    /// this quadrant; the only way out is escalation.
    ReviewAndEscalate,
}

impl RoutingOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingOutcome::AutoApprove => "auto_approve",
            RoutingOutcome::DirectEscalation => "direct_escalation",
            RoutingOutcome::AgentReassessment => "agent_reassessment",
            RoutingOutcome::ReviewAndEscalate => "review_and_escalate",
        }
    }

    /// Position in the decision matrix
    pub fn matrix_position(&self) -> &'static str {
        match self {
            RoutingOutcome::AutoApprove => "high_confidence_low_cost",
            RoutingOutcome::DirectEscalation => "high_confidence_high_cost",
            RoutingOutcome::AgentReassessment => "low_confidence_low_cost",
            RoutingOutcome::ReviewAndEscalate => "low_confidence_high_cost",
        }
    }

    /// Human-readable decision path
    pub fn decision_path(&self) -> &'static str {
        match self {
            RoutingOutcome::AutoApprove => "PATH 1: Auto-Approve (High Confidence + Low Cost)",
            RoutingOutcome::AgentReassessment => "PATH 2: Agent Re-Assessment",
            RoutingOutcome::DirectEscalation => {
                "PATH 3: Direct Escalation (High Confidence + High Cost)"
            }
            RoutingOutcome::ReviewAndEscalate => {
                "PATH 4: Review + Escalate (Low Confidence + High Cost)"
            }
        }
    }

    /// False for the quadrant that has no workflow of its own
    pub fn has_dedicated_workflow(&self) -> bool {
        !matches!(self, RoutingOutcome::ReviewAndEscalate)
    }

    /// True when the claim can only leave the queue through a senior adjuster
    pub fn requires_escalation(&self) -> bool {
        matches!(
            self,
            RoutingOutcome::DirectEscalation | RoutingOutcome::ReviewAndEscalate
        )
    }
}

impl fmt::Display for RoutingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of the routing comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCheck<T> {
    pub actual: T,
    pub threshold: Decimal,
    pub passed: bool,
}

/// Full explanation of a routing result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingAnalysis {
    pub outcome: RoutingOutcome,
    pub cost_check: ThresholdCheck<Money>,
    pub confidence_check: ThresholdCheck<Confidence>,
}

impl RoutingAnalysis {
    /// True only for the auto-approve quadrant
    pub fn eligible_for_auto_approval(&self) -> bool {
        self.cost_check.passed && self.confidence_check.passed
    }
}

/// Classifies a claim into its workflow branch
///
/// Pure; callers re-run it after every cost change. An empty confidence
/// list is rejected since every assessment carries at least one detection.
pub fn classify(
    total_cost: &Money,
    confidences: &[Confidence],
    thresholds: &RoutingThresholds,
) -> Result<RoutingOutcome, AssessmentError> {
    analyze(total_cost, confidences, thresholds).map(|analysis| analysis.outcome)
}

/// Classifies a claim and reports both threshold checks
pub fn analyze(
    total_cost: &Money,
    confidences: &[Confidence],
    thresholds: &RoutingThresholds,
) -> Result<RoutingAnalysis, AssessmentError> {
    let lowest = confidences
        .iter()
        .copied()
        .min()
        .ok_or_else(|| AssessmentError::validation("cannot route a claim without detections"))?;

    let cost_ok = thresholds.cost_ok(total_cost);
    let confidence_ok = thresholds.confidence_ok(lowest);

    let outcome = match (cost_ok, confidence_ok) {
        (true, true) => RoutingOutcome::AutoApprove,
        (false, true) => RoutingOutcome::DirectEscalation,
        (true, false) => RoutingOutcome::AgentReassessment,
        (false, false) => RoutingOutcome::ReviewAndEscalate,
    };

    Ok(RoutingAnalysis {
        outcome,
        cost_check: ThresholdCheck {
            actual: *total_cost,
            threshold: thresholds.cost_threshold,
            passed: cost_ok,
        },
        confidence_check: ThresholdCheck {
            actual: lowest,
            threshold: thresholds.confidence_threshold,
            passed: confidence_ok,
        },
    })
}
