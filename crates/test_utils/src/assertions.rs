//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_assessment::{AssessmentError, ClaimEvent, ClaimSession, RoutingOutcome};
use rust_decimal::Decimal;

/// Asserts that two Money values are equal in currency and amount
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );
    assert_eq!(
        actual.amount(),
        expected.amount(),
        "Money mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that a Money value has the given whole-dollar amount
pub fn assert_total_is(money: &Money, expected: i64) {
    assert_eq!(
        money.amount(),
        Decimal::from(expected),
        "Expected total of {}, got {}",
        expected,
        money
    );
}

/// Asserts the session's current routing branch
pub fn assert_routed(session: &ClaimSession, expected: RoutingOutcome) {
    assert_eq!(
        session.routing(),
        Some(expected),
        "Claim {} routed to {:?}, expected {}",
        session.claim_number(),
        session.routing(),
        expected
    );
}

/// Asserts that an operation failed with a validation error
pub fn assert_validation_error<T: std::fmt::Debug>(result: Result<T, AssessmentError>) {
    match result {
        Err(e) if e.is_validation() => {}
        other => panic!("Expected validation error, got {:?}", other),
    }
}

/// Asserts that an operation was rejected as an invalid transition
pub fn assert_invalid_transition<T: std::fmt::Debug>(result: Result<T, AssessmentError>) {
    match result {
        Err(e) if e.is_invalid_transition() => {}
        other => panic!("Expected invalid transition, got {:?}", other),
    }
}

/// Asserts that an operation was rejected because the claim is closed
pub fn assert_claim_finalized<T: std::fmt::Debug>(result: Result<T, AssessmentError>) {
    match result {
        Err(AssessmentError::ClaimFinalized) => {}
        other => panic!("Expected finalized-claim error, got {:?}", other),
    }
}

/// Asserts that the event list contains an event of the given type
pub fn assert_has_event(events: &[ClaimEvent], event_type: &str) {
    assert!(
        events.iter().any(|e| e.event_type() == event_type),
        "No {} event in {:?}",
        event_type,
        events.iter().map(ClaimEvent::event_type).collect::<Vec<_>>()
    );
}
