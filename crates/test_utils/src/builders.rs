//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::Money;
use domain_assessment::{
    Assessment, AssessmentError, Confidence, CostEstimate, DamageDetection, DetectionId,
    Recommendation, Severity,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{ConfidenceFixtures, MoneyFixtures, StringFixtures};

/// Builder for constructing test detections
pub struct TestDetectionBuilder {
    id: DetectionId,
    location: String,
    damage_type: String,
    severity: Severity,
    confidence: Confidence,
    estimated_cost: Money,
    review_reason: Option<String>,
}

impl Default for TestDetectionBuilder {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TestDetectionBuilder {
    /// Creates a new builder with default values
    pub fn new(id: u32) -> Self {
        Self {
            id: DetectionId::new(id),
            location: "Front Bumper".to_string(),
            damage_type: "Dent".to_string(),
            severity: Severity::Minor,
            confidence: ConfidenceFixtures::high(),
            estimated_cost: MoneyFixtures::usd(500),
            review_reason: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the confidence from a raw decimal
    pub fn with_confidence(mut self, confidence: Decimal) -> Self {
        self.confidence = ConfidenceFixtures::of(confidence);
        self
    }

    pub fn with_cost(mut self, cost: Money) -> Self {
        self.estimated_cost = cost;
        self
    }

    /// Flags the detection for review
    pub fn needing_review(mut self, reason: impl Into<String>) -> Self {
        self.review_reason = Some(reason.into());
        self
    }

    /// Builds the detection
    pub fn build(self) -> DamageDetection {
        let detection = DamageDetection::new(
            self.id,
            self.location,
            self.damage_type,
            self.severity,
            self.confidence,
            self.estimated_cost,
        );
        match self.review_reason {
            Some(reason) => detection.flag_for_review(reason),
            None => detection,
        }
    }
}

/// Builder for constructing test assessments
///
/// The cost estimate defaults to the sum of the detections' costs.
pub struct TestAssessmentBuilder {
    claim_number: String,
    detections: Vec<DamageDetection>,
    recommendation: Recommendation,
    estimate_confidence: Decimal,
}

impl Default for TestAssessmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAssessmentBuilder {
    pub fn new() -> Self {
        Self {
            claim_number: StringFixtures::claim_number().to_string(),
            detections: Vec::new(),
            recommendation: Recommendation::AutoApprove,
            estimate_confidence: dec!(0.90),
        }
    }

    pub fn with_claim_number(mut self, claim_number: impl Into<String>) -> Self {
        self.claim_number = claim_number.into();
        self
    }

    pub fn with_detection(mut self, detection: DamageDetection) -> Self {
        self.detections.push(detection);
        self
    }

    /// Adds one detection per `(confidence, cost)` pair, numbered from 1
    pub fn with_items(mut self, items: &[(Decimal, i64)]) -> Self {
        let start = self.detections.len() as u32 + 1;
        for (offset, (confidence, cost)) in items.iter().enumerate() {
            self.detections.push(
                TestDetectionBuilder::new(start + offset as u32)
                    .with_confidence(*confidence)
                    .with_cost(MoneyFixtures::usd(*cost))
                    .build(),
            );
        }
        self
    }

    pub fn with_recommendation(mut self, recommendation: Recommendation) -> Self {
        self.recommendation = recommendation;
        self
    }

    /// Builds the assessment, surfacing validation errors
    pub fn try_build(self) -> Result<Assessment, AssessmentError> {
        let currency = self
            .detections
            .first()
            .map(|d| d.estimated_cost.currency())
            .unwrap_or(core_kernel::Currency::USD);
        let costs: Vec<Money> = self.detections.iter().map(|d| d.estimated_cost).collect();
        let total = Money::sum(&costs, currency)?;

        self.detections
            .into_iter()
            .fold(Assessment::builder(self.claim_number), |builder, d| builder.detection(d))
            .cost_estimate(CostEstimate {
                min: total,
                max: total,
                most_likely: total,
                confidence: Confidence::new(self.estimate_confidence)?,
            })
            .recommendation(self.recommendation)
            .build()
    }

    /// Builds the assessment, panicking on invalid test data
    pub fn build(self) -> Assessment {
        self.try_build().expect("test assessment must be valid")
    }
}
