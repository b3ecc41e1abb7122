//! Canned assessments for the three demo scenarios
//!
//! The detection stage is simulated: every analysis returns one of these
//! records, either the scenario the agent picked or a random one.

use once_cell::sync::Lazy;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, Money};
use crate::assessment::{Assessment, CostEstimate, Recommendation, RepairEstimate};
use crate::detection::{Confidence, DamageDetection, RepairLine, Severity};
use crate::error::AssessmentError;

/// Demo scenario selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Low cost, high confidence
    AutoApprove,
    /// High cost, high confidence
    DirectEscalation,
    /// Low cost, low confidence
    AgentReassessment,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::AutoApprove,
        Scenario::DirectEscalation,
        Scenario::AgentReassessment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::AutoApprove => "auto_approve",
            Scenario::DirectEscalation => "direct_escalation",
            Scenario::AgentReassessment => "agent_reassessment",
        }
    }

    /// Label shown by the scenario switcher
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::AutoApprove => "Low Cost + High Confidence (Auto-Approve)",
            Scenario::DirectEscalation => "High Cost + High Confidence (Direct Escalation)",
            Scenario::AgentReassessment => "Low Cost + Low Confidence (Agent Re-Assessment)",
        }
    }

    /// Picks a scenario uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Builds a fresh copy of the scenario's assessment
    pub fn assessment(&self) -> Result<Assessment, AssessmentError> {
        match self {
            Scenario::AutoApprove => auto_approve_assessment(),
            Scenario::DirectEscalation => direct_escalation_assessment(),
            Scenario::AgentReassessment => agent_reassessment_assessment(),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == s.trim())
            .ok_or_else(|| AssessmentError::validation(format!("unknown scenario '{s}'")))
    }
}

/// Fixture 1: three minor items totalling $1,820, every confidence >= 90%
pub static AUTO_APPROVE_FIXTURE: Lazy<Assessment> = Lazy::new(|| {
    auto_approve_assessment().expect("auto-approve fixture is well-formed")
});

/// Fixture 2: structural damage totalling $4,650
pub static DIRECT_ESCALATION_FIXTURE: Lazy<Assessment> = Lazy::new(|| {
    direct_escalation_assessment().expect("direct-escalation fixture is well-formed")
});

/// Fixture 3: $1,950 with a 68% rear-bumper detection flagged for review
pub static AGENT_REASSESSMENT_FIXTURE: Lazy<Assessment> = Lazy::new(|| {
    agent_reassessment_assessment().expect("agent-reassessment fixture is well-formed")
});

fn usd(units: i64) -> Money {
    Money::whole(units, Currency::USD)
}

fn confidence(value: Decimal) -> Result<Confidence, AssessmentError> {
    Confidence::new(value)
}

fn repair(parts: i64, labor: i64, hours: Decimal, description: &str) -> RepairLine {
    RepairLine {
        parts_cost: usd(parts),
        labor_cost: usd(labor),
        labor_hours: hours,
        labor_description: description.to_string(),
    }
}

fn auto_approve_assessment() -> Result<Assessment, AssessmentError> {
    Assessment::builder("CLM-2024-001")
        .detection(
            DamageDetection::new(1, "Front Bumper", "Dent", Severity::Minor, confidence(dec!(0.94))?, usd(850))
                .with_repair(repair(450, 400, dec!(3), "Remove and repair bumper dent, refinish")),
        )
        .detection(
            DamageDetection::new(2, "Passenger Door", "Scratches", Severity::Minor, confidence(dec!(0.91))?, usd(520))
                .with_repair(repair(180, 340, dec!(2.5), "Sand, fill, and repaint door panel")),
        )
        .detection(
            DamageDetection::new(3, "Hood", "Paint Damage", Severity::Minor, confidence(dec!(0.92))?, usd(450))
                .with_repair(repair(150, 300, dec!(2), "Prep and paint hood panel")),
        )
        .cost_estimate(CostEstimate {
            min: usd(1620),
            max: usd(2020),
            most_likely: usd(1820),
            confidence: confidence(dec!(0.92))?,
        })
        .repair_estimate(RepairEstimate {
            total_parts: usd(780),
            total_labor: usd(1040),
            total_hours: dec!(7.5),
            estimated_repair_days: 2,
        })
        .recommendation(Recommendation::AutoApprove)
        .processing_time("2.3 seconds")
        .similar_claims_analyzed(847)
        .build()
}

fn direct_escalation_assessment() -> Result<Assessment, AssessmentError> {
    Assessment::builder("CLM-2024-002")
        .detection(
            DamageDetection::new(1, "Front Bumper", "Structural Damage", Severity::Severe, confidence(dec!(0.91))?, usd(2800))
                .with_repair(repair(1500, 1300, dec!(8), "Remove and replace bumper reinforcement, frame straightening")),
        )
        .detection(
            DamageDetection::new(2, "Front Right Fender", "Dent", Severity::Moderate, confidence(dec!(0.88))?, usd(1200))
                .with_repair(repair(650, 550, dec!(4), "Replace fender panel, blend paint")),
        )
        .detection(
            DamageDetection::new(3, "Hood", "Paint Damage", Severity::Minor, confidence(dec!(0.93))?, usd(650))
                .with_repair(repair(200, 450, dec!(3), "Sand, prep, and repaint hood")),
        )
        .cost_estimate(CostEstimate {
            min: usd(4200),
            max: usd(5100),
            most_likely: usd(4650),
            confidence: confidence(dec!(0.91))?,
        })
        .repair_estimate(RepairEstimate {
            total_parts: usd(2350),
            total_labor: usd(2300),
            total_hours: dec!(15),
            estimated_repair_days: 4,
        })
        .recommendation(Recommendation::DirectEscalation)
        .processing_time("2.8 seconds")
        .similar_claims_analyzed(623)
        .build()
}

fn agent_reassessment_assessment() -> Result<Assessment, AssessmentError> {
    Assessment::builder("CLM-2024-003")
        .detection(
            DamageDetection::new(1, "Rear Bumper", "Dent", Severity::Moderate, confidence(dec!(0.68))?, usd(950))
                .flag_for_review("Low confidence (68%) - Please verify severity")
                .with_repair(repair(520, 430, dec!(3), "Repair or replace rear bumper, refinish")),
        )
        .detection(
            DamageDetection::new(2, "Rear Right Quarter Panel", "Scratches", Severity::Minor, confidence(dec!(0.82))?, usd(520))
                .with_repair(repair(180, 340, dec!(2.5), "Sand, fill, and repaint quarter panel")),
        )
        .detection(
            DamageDetection::new(3, "Tail Light", "Broken", Severity::Minor, confidence(dec!(0.76))?, usd(480))
                .with_repair(repair(320, 160, dec!(1), "Replace tail light assembly")),
        )
        .cost_estimate(CostEstimate {
            min: usd(1750),
            max: usd(2150),
            most_likely: usd(1950),
            confidence: confidence(dec!(0.75))?,
        })
        .repair_estimate(RepairEstimate {
            total_parts: usd(1020),
            total_labor: usd(930),
            total_hours: dec!(6.5),
            estimated_repair_days: 2,
        })
        .recommendation(Recommendation::AgentReassessment)
        .processing_time("2.1 seconds")
        .similar_claims_analyzed(412)
        .agent_instructions(
            "Review flagged items carefully. Adjust severity levels and costs as needed. \
             If adjusted total remains below $2,000, you can approve. \
             If adjustments exceed $2,000, escalate to senior adjuster.",
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fixture_totals_match_most_likely() {
        for scenario in Scenario::ALL {
            let assessment = scenario.assessment().unwrap();
            assert_eq!(
                assessment.detected_total().unwrap(),
                assessment.cost_estimate().most_likely,
                "{scenario}"
            );
        }
    }

    #[test]
    fn test_named_fixtures() {
        assert_eq!(AUTO_APPROVE_FIXTURE.claim_number(), "CLM-2024-001");
        assert_eq!(DIRECT_ESCALATION_FIXTURE.claim_number(), "CLM-2024-002");
        assert_eq!(AGENT_REASSESSMENT_FIXTURE.items_needing_review().count(), 1);
    }

    #[test]
    fn test_scenario_parse() {
        assert_eq!("direct_escalation".parse::<Scenario>().unwrap(), Scenario::DirectEscalation);
        assert!("review_and_escalate".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_random_scenario_is_one_of_all() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert!(Scenario::ALL.contains(&Scenario::random(&mut rng)));
        }
    }
}
