//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{ClaimId, Currency, Money};
use domain_assessment::{Confidence, Scenario, Severity};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::CAD),
        Just(Currency::AUD),
    ]
}

/// Strategy for generating non-negative USD costs in cents, up to $10,000
pub fn usd_cost_strategy() -> impl Strategy<Value = Money> {
    (0i64..1_000_000i64).prop_map(|cents| Money::new(Decimal::new(cents, 2), Currency::USD))
}

/// Strategy for generating costs near the $2,000 threshold
pub fn threshold_cost_strategy() -> impl Strategy<Value = Money> {
    (199_000i64..201_000i64).prop_map(|cents| Money::new(Decimal::new(cents, 2), Currency::USD))
}

/// Strategy for generating confidence values with two decimal places
pub fn confidence_strategy() -> impl Strategy<Value = Confidence> {
    (0i64..=100i64).prop_map(|n| {
        Confidence::new(Decimal::new(n, 2)).expect("generated confidence is in range")
    })
}

/// Strategy for generating non-empty confidence lists
pub fn confidences_strategy(max_len: usize) -> impl Strategy<Value = Vec<Confidence>> {
    proptest::collection::vec(confidence_strategy(), 1..=max_len.max(1))
}

/// Strategy for generating severities
pub fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Minor),
        Just(Severity::Moderate),
        Just(Severity::Severe),
    ]
}

/// Strategy for generating demo scenarios
pub fn scenario_strategy() -> impl Strategy<Value = Scenario> {
    prop_oneof![
        Just(Scenario::AutoApprove),
        Just(Scenario::DirectEscalation),
        Just(Scenario::AgentReassessment),
    ]
}

/// Strategy for generating ClaimId
pub fn claim_id_strategy() -> impl Strategy<Value = ClaimId> {
    any::<[u8; 16]>().prop_map(|bytes| {
        ClaimId::from_uuid(uuid::Uuid::from_bytes(bytes))
    })
}

/// Strategy for generating cost text an agent might type, valid or not
pub fn cost_input_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..100_000u32).prop_map(|n| n.to_string()),
        (0u32..100_000u32).prop_map(|n| format!("-{}", n + 1)),
        Just(String::new()),
        Just("NaN".to_string()),
        "[a-z]{1,6}",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn usd_cost_is_never_negative(cost in usd_cost_strategy()) {
            prop_assert!(!cost.is_negative());
        }

        #[test]
        fn confidences_are_never_empty(list in confidences_strategy(5)) {
            prop_assert!(!list.is_empty());
            prop_assert!(list.len() <= 5);
        }

        #[test]
        fn threshold_costs_straddle_2000(cost in threshold_cost_strategy()) {
            prop_assert!(cost.amount() >= Decimal::from(1990));
            prop_assert!(cost.amount() < Decimal::from(2010));
        }
    }
}
