//! Assessment records produced once per claim submission

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use core_kernel::{AssessmentId, Currency, Money};
use crate::detection::{Confidence, DamageDetection, DetectionId};
use crate::error::AssessmentError;

/// Workflow branch suggested by the detection stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    AutoApprove,
    DirectEscalation,
    AgentReassessment,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::AutoApprove => "auto_approve",
            Recommendation::DirectEscalation => "direct_escalation",
            Recommendation::AgentReassessment => "agent_reassessment",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto_approve" => Ok(Recommendation::AutoApprove),
            "direct_escalation" => Ok(Recommendation::DirectEscalation),
            "agent_reassessment" => Ok(Recommendation::AgentReassessment),
            other => Err(AssessmentError::validation(format!(
                "unknown recommendation '{other}'"
            ))),
        }
    }
}

/// Overall cost range predicted for the claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub min: Money,
    pub max: Money,
    pub most_likely: Money,
    pub confidence: Confidence,
}

/// Aggregated repair figures across all detections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairEstimate {
    pub total_parts: Money,
    pub total_labor: Money,
    pub total_hours: Decimal,
    pub estimated_repair_days: u32,
}

/// The damage assessment for one claim
///
/// Immutable once built. Construction goes through [`AssessmentBuilder`],
/// which guarantees at least one detection, unique detection ids, a single
/// currency and non-negative costs. Deserialized records are held to the
/// same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AssessmentRecord")]
pub struct Assessment {
    id: AssessmentId,
    claim_number: String,
    detections: Vec<DamageDetection>,
    cost_estimate: CostEstimate,
    recommendation: Recommendation,
    repair_estimate: Option<RepairEstimate>,
    processing_time: Option<String>,
    similar_claims_analyzed: u32,
    agent_instructions: Option<String>,
}

impl Assessment {
    /// Starts building an assessment for `claim_number`
    pub fn builder(claim_number: impl Into<String>) -> AssessmentBuilder {
        AssessmentBuilder::new(claim_number)
    }

    pub fn id(&self) -> AssessmentId {
        self.id
    }

    pub fn claim_number(&self) -> &str {
        &self.claim_number
    }

    pub fn detections(&self) -> &[DamageDetection] {
        &self.detections
    }

    pub fn detection(&self, id: DetectionId) -> Option<&DamageDetection> {
        self.detections.iter().find(|d| d.id == id)
    }

    pub fn cost_estimate(&self) -> &CostEstimate {
        &self.cost_estimate
    }

    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    pub fn repair_estimate(&self) -> Option<&RepairEstimate> {
        self.repair_estimate.as_ref()
    }

    pub fn processing_time(&self) -> Option<&str> {
        self.processing_time.as_deref()
    }

    pub fn similar_claims_analyzed(&self) -> u32 {
        self.similar_claims_analyzed
    }

    pub fn agent_instructions(&self) -> Option<&str> {
        self.agent_instructions.as_deref()
    }

    /// Currency shared by every cost on the assessment
    pub fn currency(&self) -> Currency {
        self.cost_estimate.most_likely.currency()
    }

    /// Per-detection confidences, in detection order
    pub fn confidences(&self) -> Vec<Confidence> {
        self.detections.iter().map(|d| d.confidence).collect()
    }

    /// The weakest detection confidence
    pub fn lowest_confidence(&self) -> Confidence {
        self.detections
            .iter()
            .map(|d| d.confidence)
            .min()
            .unwrap_or(self.cost_estimate.confidence)
    }

    /// Sum of the detections' original estimates
    pub fn detected_total(&self) -> Result<Money, AssessmentError> {
        let costs: Vec<Money> = self.detections.iter().map(|d| d.estimated_cost).collect();
        Ok(Money::sum(&costs, self.currency())?)
    }

    /// Detections flagged for agent review
    pub fn items_needing_review(&self) -> impl Iterator<Item = &DamageDetection> {
        self.detections.iter().filter(|d| d.needs_review)
    }
}

/// Wire shape of an [`Assessment`], checked before it becomes one
#[derive(Deserialize)]
struct AssessmentRecord {
    id: AssessmentId,
    claim_number: String,
    detections: Vec<DamageDetection>,
    cost_estimate: CostEstimate,
    recommendation: Recommendation,
    repair_estimate: Option<RepairEstimate>,
    processing_time: Option<String>,
    #[serde(default)]
    similar_claims_analyzed: u32,
    agent_instructions: Option<String>,
}

impl TryFrom<AssessmentRecord> for Assessment {
    type Error = AssessmentError;

    fn try_from(record: AssessmentRecord) -> Result<Self, Self::Error> {
        let built = AssessmentBuilder {
            claim_number: record.claim_number,
            detections: record.detections,
            cost_estimate: Some(record.cost_estimate),
            recommendation: Some(record.recommendation),
            repair_estimate: record.repair_estimate,
            processing_time: record.processing_time,
            similar_claims_analyzed: record.similar_claims_analyzed,
            agent_instructions: record.agent_instructions,
        }
        .build()?;

        Ok(Assessment {
            id: record.id,
            ..built
        })
    }
}

/// Builder for [`Assessment`]
#[derive(Debug, Clone)]
pub struct AssessmentBuilder {
    claim_number: String,
    detections: Vec<DamageDetection>,
    cost_estimate: Option<CostEstimate>,
    recommendation: Option<Recommendation>,
    repair_estimate: Option<RepairEstimate>,
    processing_time: Option<String>,
    similar_claims_analyzed: u32,
    agent_instructions: Option<String>,
}

impl AssessmentBuilder {
    pub fn new(claim_number: impl Into<String>) -> Self {
        Self {
            claim_number: claim_number.into(),
            detections: Vec::new(),
            cost_estimate: None,
            recommendation: None,
            repair_estimate: None,
            processing_time: None,
            similar_claims_analyzed: 0,
            agent_instructions: None,
        }
    }

    pub fn detection(mut self, detection: DamageDetection) -> Self {
        self.detections.push(detection);
        self
    }

    pub fn cost_estimate(mut self, estimate: CostEstimate) -> Self {
        self.cost_estimate = Some(estimate);
        self
    }

    pub fn recommendation(mut self, recommendation: Recommendation) -> Self {
        self.recommendation = Some(recommendation);
        self
    }

    pub fn repair_estimate(mut self, estimate: RepairEstimate) -> Self {
        self.repair_estimate = Some(estimate);
        self
    }

    pub fn processing_time(mut self, processing_time: impl Into<String>) -> Self {
        self.processing_time = Some(processing_time.into());
        self
    }

    pub fn similar_claims_analyzed(mut self, count: u32) -> Self {
        self.similar_claims_analyzed = count;
        self
    }

    pub fn agent_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.agent_instructions = Some(instructions.into());
        self
    }

    /// Validates and builds the assessment
    pub fn build(self) -> Result<Assessment, AssessmentError> {
        if self.claim_number.trim().is_empty() {
            return Err(AssessmentError::validation("claim number is required"));
        }
        if self.detections.is_empty() {
            return Err(AssessmentError::validation(
                "an assessment needs at least one detection",
            ));
        }

        let cost_estimate = self
            .cost_estimate
            .ok_or_else(|| AssessmentError::validation("cost estimate is required"))?;
        let recommendation = self
            .recommendation
            .ok_or_else(|| AssessmentError::validation("recommendation is required"))?;

        let currency = cost_estimate.most_likely.currency();
        let mut seen = HashSet::new();
        for detection in &self.detections {
            if !seen.insert(detection.id) {
                return Err(AssessmentError::validation(format!(
                    "duplicate detection id {}",
                    detection.id
                )));
            }
            if detection.estimated_cost.currency() != currency {
                return Err(AssessmentError::validation(format!(
                    "detection {} is priced in {}, assessment in {}",
                    detection.id,
                    detection.estimated_cost.currency(),
                    currency
                )));
            }
            if detection.estimated_cost.is_negative() {
                return Err(AssessmentError::validation(format!(
                    "detection {} has a negative estimate",
                    detection.id
                )));
            }
        }

        let costs: Vec<Money> = self.detections.iter().map(|d| d.estimated_cost).collect();
        Money::sum(&costs, currency).map_err(|e| {
            AssessmentError::validation(format!("detection estimates cannot be totalled: {e}"))
        })?;

        if cost_estimate.min.amount() > cost_estimate.max.amount() {
            return Err(AssessmentError::validation(
                "cost estimate minimum exceeds maximum",
            ));
        }

        Ok(Assessment {
            id: AssessmentId::new_v7(),
            claim_number: self.claim_number,
            detections: self.detections,
            cost_estimate,
            recommendation,
            repair_estimate: self.repair_estimate,
            processing_time: self.processing_time,
            similar_claims_analyzed: self.similar_claims_analyzed,
            agent_instructions: self.agent_instructions,
        })
    }
}
