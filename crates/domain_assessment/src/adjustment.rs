//! Agent adjustments to AI-reported severity and cost
//!
//! The tracker keeps one [`Adjustment`] per detection, seeded from the
//! detection's own values. The original detections are kept alongside so
//! that "has the agent changed this item" never depends on mutation history:
//! editing a value and then editing it back leaves the item unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use core_kernel::{Currency, Money};
use crate::aggregator;
use crate::detection::{DamageDetection, DetectionId, Severity};
use crate::error::AssessmentError;
use crate::routing::RoutingThresholds;

/// Current agent-editable values for one detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub detection_id: DetectionId,
    pub severity: Severity,
    pub cost: Money,
}

impl Adjustment {
    fn seeded_from(detection: &DamageDetection) -> Self {
        Self {
            detection_id: detection.id,
            severity: detection.severity,
            cost: detection.estimated_cost,
        }
    }
}

/// Which field an agent edit touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustedField {
    Severity,
    Cost,
}

/// Emitted by every successful tracker mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentEvent {
    pub detection_id: DetectionId,
    pub field: AdjustedField,
    pub severity: Severity,
    pub cost: Money,
    /// Whether the item now differs from the AI's original values
    pub changed: bool,
}

/// Original (AI) and current (agent) values of one changed item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub detection_id: DetectionId,
    pub original_severity: Severity,
    pub adjusted_severity: Severity,
    pub original_cost: Money,
    pub adjusted_cost: Money,
}

/// Per-detection overrides for one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentTracker {
    currency: Currency,
    originals: BTreeMap<DetectionId, DamageDetection>,
    adjustments: BTreeMap<DetectionId, Adjustment>,
}

impl AdjustmentTracker {
    /// Seeds one adjustment per detection from the detection's own values
    ///
    /// An empty slice yields an empty tracker priced in US dollars.
    pub fn initialize(detections: &[DamageDetection]) -> Self {
        let currency = detections
            .first()
            .map(|d| d.estimated_cost.currency())
            .unwrap_or(Currency::USD);

        let originals = detections
            .iter()
            .map(|d| (d.id, d.clone()))
            .collect::<BTreeMap<_, _>>();
        let adjustments = detections
            .iter()
            .map(|d| (d.id, Adjustment::seeded_from(d)))
            .collect::<BTreeMap<_, _>>();

        Self {
            currency,
            originals,
            adjustments,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Parses agent-entered severity text, ignoring case
    pub fn parse_severity(input: &str) -> Result<Severity, AssessmentError> {
        input.parse()
    }

    /// Overrides the severity of one item
    pub fn set_severity(
        &mut self,
        id: DetectionId,
        severity: Severity,
    ) -> Result<AdjustmentEvent, AssessmentError> {
        let adjustment = self
            .adjustments
            .get_mut(&id)
            .ok_or(AssessmentError::DetectionNotFound(id))?;
        adjustment.severity = severity;

        debug!(detection_id = %id, severity = %severity, "severity adjusted");
        self.event_for(id, AdjustedField::Severity)
    }

    /// Overrides the repair cost of one item
    pub fn set_cost(&mut self, id: DetectionId, cost: Money) -> Result<AdjustmentEvent, AssessmentError> {
        if cost.currency() != self.currency {
            return Err(AssessmentError::validation(format!(
                "cost must be in {}, got {}",
                self.currency,
                cost.currency()
            )));
        }
        if cost.is_negative() {
            return Err(AssessmentError::validation(format!(
                "cost cannot be negative: {cost}"
            )));
        }

        if !self.adjustments.contains_key(&id) {
            return Err(AssessmentError::DetectionNotFound(id));
        }

        // The claim total must stay computable once the new value lands.
        let others = self
            .adjustments
            .values()
            .filter(|a| a.detection_id != id)
            .map(|a| &a.cost);
        Money::sum(others, self.currency)
            .and_then(|rest| rest.checked_add(&cost))
            .map_err(|e| AssessmentError::validation(format!("cost {cost} cannot be totalled: {e}")))?;

        if let Some(adjustment) = self.adjustments.get_mut(&id) {
            adjustment.cost = cost;
        }

        debug!(detection_id = %id, cost = %cost, "cost adjusted");
        self.event_for(id, AdjustedField::Cost)
    }

    /// Overrides the repair cost from raw agent input such as `"1,200"`
    pub fn set_cost_input(&mut self, id: DetectionId, input: &str) -> Result<AdjustmentEvent, AssessmentError> {
        let cost = Money::parse(input, self.currency)
            .map_err(|e| AssessmentError::validation(format!("invalid cost '{input}': {e}")))?;
        self.set_cost(id, cost)
    }

    /// True when the item's severity or cost differs from the AI's values
    pub fn is_changed(&self, id: DetectionId) -> Result<bool, AssessmentError> {
        let original = self
            .originals
            .get(&id)
            .ok_or(AssessmentError::DetectionNotFound(id))?;
        let current = self
            .adjustments
            .get(&id)
            .ok_or(AssessmentError::DetectionNotFound(id))?;

        Ok(current.severity != original.severity || current.cost != original.estimated_cost)
    }

    /// Sum of the current costs
    pub fn current_total(&self) -> Result<Money, AssessmentError> {
        aggregator::total(self.adjustments.values(), self.currency)
    }

    /// True when the current total is at or above the cost threshold
    pub fn exceeds_threshold(&self, thresholds: &RoutingThresholds) -> Result<bool, AssessmentError> {
        Ok(!thresholds.cost_ok(&self.current_total()?))
    }

    /// Current adjustments, ordered by detection id
    pub fn adjustments(&self) -> impl Iterator<Item = &Adjustment> {
        self.adjustments.values()
    }

    pub fn adjustment(&self, id: DetectionId) -> Option<&Adjustment> {
        self.adjustments.get(&id)
    }

    /// Every item the agent changed, as original/adjusted pairs
    pub fn corrections(&self) -> Vec<Correction> {
        self.adjustments
            .values()
            .filter_map(|current| {
                let original = self.originals.get(&current.detection_id)?;
                let changed = current.severity != original.severity
                    || current.cost != original.estimated_cost;
                changed.then(|| Correction {
                    detection_id: current.detection_id,
                    original_severity: original.severity,
                    adjusted_severity: current.severity,
                    original_cost: original.estimated_cost,
                    adjusted_cost: current.cost,
                })
            })
            .collect()
    }

    fn event_for(&self, id: DetectionId, field: AdjustedField) -> Result<AdjustmentEvent, AssessmentError> {
        let adjustment = self
            .adjustments
            .get(&id)
            .ok_or(AssessmentError::DetectionNotFound(id))?;

        Ok(AdjustmentEvent {
            detection_id: id,
            field,
            severity: adjustment.severity,
            cost: adjustment.cost,
            changed: self.is_changed(id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Confidence;
    use rust_decimal_macros::dec;

    fn usd(units: i64) -> Money {
        Money::whole(units, Currency::USD)
    }

    fn detections() -> Vec<DamageDetection> {
        vec![
            DamageDetection::new(1, "Rear Bumper", "Dent", Severity::Moderate, Confidence::new(dec!(0.68)).unwrap(), usd(950)),
            DamageDetection::new(2, "Quarter Panel", "Scratches", Severity::Minor, Confidence::new(dec!(0.82)).unwrap(), usd(520)),
            DamageDetection::new(3, "Tail Light", "Broken", Severity::Minor, Confidence::new(dec!(0.76)).unwrap(), usd(480)),
        ]
    }

    #[test]
    fn test_initialize_seeds_from_detections() {
        let tracker = AdjustmentTracker::initialize(&detections());

        assert_eq!(tracker.adjustments().count(), 3);
        assert_eq!(tracker.current_total().unwrap(), usd(1950));
        assert!(!tracker.is_changed(DetectionId::new(1)).unwrap());
        assert!(tracker.corrections().is_empty());
    }

    #[test]
    fn test_set_cost_updates_total() {
        let mut tracker = AdjustmentTracker::initialize(&detections());
        let event = tracker.set_cost(DetectionId::new(1), usd(1200)).unwrap();

        assert!(event.changed);
        assert_eq!(event.field, AdjustedField::Cost);
        assert_eq!(tracker.current_total().unwrap(), usd(2200));
        assert!(tracker.exceeds_threshold(&RoutingThresholds::STANDARD).unwrap());
    }

    #[test]
    fn test_changed_flag_clears_when_value_restored() {
        let mut tracker = AdjustmentTracker::initialize(&detections());
        let id = DetectionId::new(2);

        tracker.set_severity(id, Severity::Severe).unwrap();
        assert!(tracker.is_changed(id).unwrap());

        let event = tracker.set_severity(id, Severity::Minor).unwrap();
        assert!(!event.changed);
        assert!(!tracker.is_changed(id).unwrap());
    }

    #[test]
    fn test_unknown_detection() {
        let mut tracker = AdjustmentTracker::initialize(&detections());
        let missing = DetectionId::new(99);

        assert!(matches!(
            tracker.set_severity(missing, Severity::Minor),
            Err(AssessmentError::DetectionNotFound(_))
        ));
        assert!(tracker.is_changed(missing).is_err());
    }

    #[test]
    fn test_cost_input_validation() {
        let mut tracker = AdjustmentTracker::initialize(&detections());
        let id = DetectionId::new(1);

        for bad in ["", "abc", "NaN", "-5"] {
            let result = tracker.set_cost_input(id, bad);
            assert!(matches!(result, Err(AssessmentError::Validation(_))), "{bad:?}");
        }
        // Rejected input leaves the previous value in place.
        assert_eq!(tracker.adjustment(id).unwrap().cost, usd(950));

        tracker.set_cost_input(id, "1,200").unwrap();
        assert_eq!(tracker.adjustment(id).unwrap().cost, usd(1200));
    }

    #[test]
    fn test_overflowing_cost_is_rejected_before_commit() {
        let mut tracker = AdjustmentTracker::initialize(&detections());
        let id = DetectionId::new(1);

        let result = tracker.set_cost_input(id, "79228162514264337593543950335");
        assert!(matches!(result, Err(AssessmentError::Validation(_))));

        assert_eq!(tracker.adjustment(id).unwrap().cost, usd(950));
        assert_eq!(tracker.current_total().unwrap(), usd(1950));
        assert!(!tracker.is_changed(id).unwrap());
    }

    #[test]
    fn test_set_cost_rejects_foreign_currency() {
        let mut tracker = AdjustmentTracker::initialize(&detections());
        let result = tracker.set_cost(DetectionId::new(1), Money::whole(10, Currency::EUR));
        assert!(matches!(result, Err(AssessmentError::Validation(_))));
    }

    #[test]
    fn test_corrections_capture_original_values() {
        let mut tracker = AdjustmentTracker::initialize(&detections());
        tracker.set_severity(DetectionId::new(1), Severity::Severe).unwrap();

        let corrections = tracker.corrections();
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].original_severity, Severity::Moderate);
        assert_eq!(corrections[0].adjusted_severity, Severity::Severe);
        assert_eq!(corrections[0].adjusted_cost, usd(950));
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(AdjustmentTracker::parse_severity("SEVERE").unwrap(), Severity::Severe);
        assert!(AdjustmentTracker::parse_severity("total loss").is_err());
    }
}
