//! Claim details captured at submission

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Insured vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    pub year: u16,
}

impl Vehicle {
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: u16) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.year, self.make, self.model)
    }
}

/// Policy and incident information entered with the claim
///
/// Carried through the session onto the final [`Decision`](crate::Decision)
/// so the recorded outcome identifies the policy and vehicle it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDetails {
    pub policy_number: String,
    pub policyholder: String,
    pub zip_code: String,
    pub vehicle: Vehicle,
    pub incident_date: NaiveDate,
}

impl ClaimDetails {
    pub fn new(
        policy_number: impl Into<String>,
        policyholder: impl Into<String>,
        zip_code: impl Into<String>,
        vehicle: Vehicle,
        incident_date: NaiveDate,
    ) -> Self {
        Self {
            policy_number: policy_number.into(),
            policyholder: policyholder.into(),
            zip_code: zip_code.into(),
            vehicle,
            incident_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_display() {
        let vehicle = Vehicle::new("Toyota", "Camry", 2021);
        assert_eq!(vehicle.to_string(), "2021 Toyota Camry");
    }

    #[test]
    fn test_details_serialize_incident_date_as_iso() {
        let details = ClaimDetails::new(
            "POL-88213",
            "Dana Whitfield",
            "60614",
            Vehicle::new("Honda", "Civic", 2019),
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
        );

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["incident_date"], "2024-03-14");
        assert_eq!(json["vehicle"]["year"], 2019);
    }
}
