//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for claims, detections, claim details and images.
//! These fixtures are consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_assessment::{
    Assessment, ClaimDetails, ClaimImage, ClaimSession, Confidence, DetectionId, Scenario, Vehicle,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Whole US dollars
    pub fn usd(units: i64) -> Money {
        Money::whole(units, Currency::USD)
    }

    /// Exactly the standard cost threshold
    pub fn usd_threshold() -> Money {
        Money::new(dec!(2000.00), Currency::USD)
    }

    /// One cent below the standard cost threshold
    pub fn usd_below_threshold() -> Money {
        Money::new(dec!(1999.99), Currency::USD)
    }

    /// Creates a zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }
}

/// Fixture for confidence values
pub struct ConfidenceFixtures;

impl ConfidenceFixtures {
    /// Creates a confidence, panicking on out-of-range test input
    pub fn of(value: Decimal) -> Confidence {
        Confidence::new(value).expect("test confidence must be in [0, 1]")
    }

    /// Exactly the standard confidence threshold
    pub fn at_threshold() -> Confidence {
        Self::of(dec!(0.90))
    }

    /// Comfortably above the threshold
    pub fn high() -> Confidence {
        Self::of(dec!(0.95))
    }

    /// Well below the threshold
    pub fn low() -> Confidence {
        Self::of(dec!(0.68))
    }
}

/// Fixture for the canned scenario assessments
pub struct ScenarioFixtures;

impl ScenarioFixtures {
    /// $1,820, all detections confident
    pub fn auto_approve() -> Assessment {
        Self::build(Scenario::AutoApprove)
    }

    /// $4,650 with structural damage
    pub fn direct_escalation() -> Assessment {
        Self::build(Scenario::DirectEscalation)
    }

    /// $1,950 with one low-confidence detection
    pub fn agent_reassessment() -> Assessment {
        Self::build(Scenario::AgentReassessment)
    }

    /// Session with the scenario's assessment already attached
    pub fn session(scenario: Scenario) -> ClaimSession {
        let mut session = ClaimSession::new(StringFixtures::claim_number());
        session
            .attach_assessment(Self::build(scenario))
            .expect("fixture assessment attaches to a new session");
        session
    }

    fn build(scenario: Scenario) -> Assessment {
        scenario.assessment().expect("scenario fixture is well-formed")
    }
}

/// Fixture for policy and vehicle details
pub struct ClaimDetailsFixtures;

impl ClaimDetailsFixtures {
    /// A mid-size sedan with a spring incident date
    pub fn sedan() -> ClaimDetails {
        ClaimDetails::new(
            "POL-2024-77810",
            "Jordan Reyes",
            "78704",
            Vehicle::new("Toyota", "Camry", 2021),
            NaiveDate::from_ymd_opt(2024, 4, 18).expect("valid calendar date"),
        )
    }
}

/// Fixture for uploaded images
pub struct ImageFixtures;

impl ImageFixtures {
    /// A small JPEG-looking payload
    pub fn photo() -> ClaimImage {
        ClaimImage::new("damage.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    /// An upload with no content
    pub fn empty() -> ClaimImage {
        ClaimImage::new("empty.jpg", "image/jpeg", Vec::new())
    }
}

/// Fixture for string data
pub struct StringFixtures;

impl StringFixtures {
    pub fn claim_number() -> &'static str {
        "CLM-TEST-0001"
    }

    /// The rear bumper item on the agent-reassessment fixture
    pub fn flagged_detection() -> DetectionId {
        DetectionId::new(1)
    }
}
