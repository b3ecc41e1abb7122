//! Damage detections reported by the assessment stage

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::Money;
use crate::error::AssessmentError;

/// Identifier of a detection, unique within one assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionId(u32);

impl DetectionId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DetectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for DetectionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Damage severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "Minor",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = AssessmentError;

    /// Case-insensitive; anything else is rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minor" => Ok(Severity::Minor),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            other => Err(AssessmentError::validation(format!(
                "unknown severity '{other}'"
            ))),
        }
    }
}

/// Detection confidence in the closed interval [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Confidence(Decimal);

impl Confidence {
    pub fn new(value: Decimal) -> Result<Self, AssessmentError> {
        if value < Decimal::ZERO || value > dec!(1) {
            return Err(AssessmentError::validation(format!(
                "confidence {value} is outside [0, 1]"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Whole-number percentage, e.g. 68 for 0.68
    pub fn as_percent(&self) -> Decimal {
        (self.0 * dec!(100)).round()
    }
}

impl TryFrom<Decimal> for Confidence {
    type Error = AssessmentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for Decimal {
    fn from(confidence: Confidence) -> Decimal {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

/// Parts and labour breakdown behind a detection's estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairLine {
    pub parts_cost: Money,
    pub labor_cost: Money,
    pub labor_hours: Decimal,
    pub labor_description: String,
}

/// One AI finding on a claim
///
/// Produced once by the detection stage and never mutated afterwards;
/// agent edits live in [`crate::adjustment::Adjustment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageDetection {
    pub id: DetectionId,
    pub location: String,
    pub damage_type: String,
    pub severity: Severity,
    pub confidence: Confidence,
    pub estimated_cost: Money,
    pub needs_review: bool,
    pub review_reason: Option<String>,
    pub repair: Option<RepairLine>,
}

impl DamageDetection {
    /// Creates a detection that does not need review
    pub fn new(
        id: impl Into<DetectionId>,
        location: impl Into<String>,
        damage_type: impl Into<String>,
        severity: Severity,
        confidence: Confidence,
        estimated_cost: Money,
    ) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            damage_type: damage_type.into(),
            severity,
            confidence,
            estimated_cost,
            needs_review: false,
            review_reason: None,
            repair: None,
        }
    }

    /// Flags the detection for agent review
    pub fn flag_for_review(mut self, reason: impl Into<String>) -> Self {
        self.needs_review = true;
        self.review_reason = Some(reason.into());
        self
    }

    /// Attaches the parts/labour breakdown
    pub fn with_repair(mut self, repair: RepairLine) -> Self {
        self.repair = Some(repair);
        self
    }

    /// "Rear Bumper - Dent"
    pub fn label(&self) -> String {
        format!("{} - {}", self.location, self.damage_type)
    }
}
