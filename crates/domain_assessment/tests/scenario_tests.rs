//! End-to-end tests for the three canned claims

use domain_assessment::{
    AssessmentError, ClaimEvent, DecisionAction, DetectionId, RoutingOutcome, Scenario, Severity,
};
use rust_decimal_macros::dec;
use test_utils::{
    assert_claim_finalized, assert_has_event, assert_invalid_transition, assert_routed,
    assert_total_is, assert_validation_error, ClaimDetailsFixtures, MoneyFixtures,
    ScenarioFixtures, StringFixtures,
};

#[test]
fn auto_approve_claim_is_approved_unchanged() {
    let mut session = ScenarioFixtures::session(Scenario::AutoApprove);

    assert_routed(&session, RoutingOutcome::AutoApprove);
    assert_total_is(&session.current_total().unwrap(), 1820);

    let decision = session.finalize(DecisionAction::Approved, "").unwrap();
    assert_eq!(decision.action, DecisionAction::Approved);
    assert_total_is(&decision.adjusted_total, 1820);
    assert!(!decision.has_corrections());
}

#[test]
fn direct_escalation_claim_only_escalates() {
    let mut session = ScenarioFixtures::session(Scenario::DirectEscalation);

    // The fender detection sits at 88%, so the weakest-confidence rule places
    // this claim in the low-confidence, high-cost quadrant.
    assert_routed(&session, RoutingOutcome::ReviewAndEscalate);
    assert!(session.routing().unwrap().requires_escalation());
    assert_total_is(&session.current_total().unwrap(), 4650);

    assert_invalid_transition(session.finalize(DecisionAction::Approved, ""));
    let decision = session
        .finalize(DecisionAction::Escalated, "structural damage")
        .unwrap();
    assert_eq!(decision.action, DecisionAction::Escalated);
}

#[test]
fn reassessment_over_threshold_forces_escalation() {
    let mut session = ScenarioFixtures::session(Scenario::AgentReassessment);
    let bumper = StringFixtures::flagged_detection();

    assert_routed(&session, RoutingOutcome::AgentReassessment);
    assert_total_is(&session.current_total().unwrap(), 1950);
    assert_eq!(session.review_progress(), (0, 1));

    let routing = session.set_cost_input(bumper, "1200").unwrap();
    assert_eq!(routing, RoutingOutcome::ReviewAndEscalate);
    assert_total_is(&session.current_total().unwrap(), 2200);
    assert!(session.tracker().unwrap().is_changed(bumper).unwrap());
    assert_eq!(session.review_progress(), (1, 1));

    let events = session.take_events();
    assert_has_event(&events, "AdjustmentApplied");
    assert_has_event(&events, "RoutingChanged");

    assert_invalid_transition(session.finalize(DecisionAction::Approved, ""));
    let decision = session
        .finalize(DecisionAction::Escalated, "bumper bracket also cracked")
        .unwrap();

    assert_total_is(&decision.adjusted_total, 2200);
    assert_eq!(decision.routing, RoutingOutcome::ReviewAndEscalate);
    assert_eq!(decision.corrections.len(), 1);
    assert_eq!(decision.corrections[0].detection_id, bumper);
    assert_total_is(&decision.corrections[0].original_cost, 950);
}

#[test]
fn reassessment_below_threshold_can_be_approved() {
    let mut session = ScenarioFixtures::session(Scenario::AgentReassessment);
    let bumper = StringFixtures::flagged_detection();

    session.set_severity(bumper, Severity::Minor).unwrap();
    let routing = session.set_cost(bumper, MoneyFixtures::usd(700)).unwrap();

    assert_eq!(routing, RoutingOutcome::AgentReassessment);
    assert_total_is(&session.current_total().unwrap(), 1700);
    assert!(session.finalize(DecisionAction::Approved, "minor dent only").is_ok());
}

#[test]
fn cost_moving_back_under_threshold_restores_branch() {
    let mut session = ScenarioFixtures::session(Scenario::AgentReassessment);
    let bumper = StringFixtures::flagged_detection();

    session.set_cost(bumper, MoneyFixtures::usd(1200)).unwrap();
    let routing = session.set_cost(bumper, MoneyFixtures::usd(950)).unwrap();

    assert_eq!(routing, RoutingOutcome::AgentReassessment);
    assert!(!session.tracker().unwrap().is_changed(bumper).unwrap());
    let changes: Vec<_> = session
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, ClaimEvent::RoutingChanged { .. }))
        .collect();
    assert_eq!(changes.len(), 2);
}

#[test]
fn auto_approve_claim_pushed_to_threshold_escalates() {
    let mut session = ScenarioFixtures::session(Scenario::AutoApprove);

    // 1820 - 450 + 630 = 2000, which is not below the threshold.
    let routing = session.set_cost(DetectionId::new(3), MoneyFixtures::usd(630)).unwrap();
    assert_eq!(routing, RoutingOutcome::DirectEscalation);
    assert_eq!(session.current_total().unwrap().amount(), dec!(2000));
}

#[test]
fn invalid_agent_input_is_rejected() {
    let mut session = ScenarioFixtures::session(Scenario::AgentReassessment);
    let bumper = StringFixtures::flagged_detection();

    assert_validation_error(session.set_cost_input(bumper, "abc"));
    assert_validation_error(session.set_cost_input(bumper, "-100"));
    assert_validation_error(session.set_cost_input(bumper, ""));
    assert_validation_error(session.set_cost(DetectionId::new(9), MoneyFixtures::usd(10)));
    assert_validation_error(session.set_cost(bumper, MoneyFixtures::eur_100()));

    assert_total_is(&session.current_total().unwrap(), 1950);
}

#[test]
fn cost_too_large_to_total_is_rejected() {
    let mut session = ScenarioFixtures::session(Scenario::AgentReassessment);
    let bumper = StringFixtures::flagged_detection();
    session.take_events();

    assert_validation_error(session.set_cost_input(bumper, "79228162514264337593543950335"));

    assert_total_is(&session.tracker().unwrap().adjustment(bumper).unwrap().cost, 950);
    assert_total_is(&session.current_total().unwrap(), 1950);
    assert_routed(&session, RoutingOutcome::AgentReassessment);
    assert!(session.take_events().is_empty());
}

#[test]
fn agent_review_state_is_recorded_on_decision() {
    let mut session = ScenarioFixtures::session(Scenario::AgentReassessment);
    let bumper = StringFixtures::flagged_detection();
    let tail_light = DetectionId::new(3);

    session.set_details(ClaimDetailsFixtures::sedan()).unwrap();
    assert!(!session.toggle_confirmed(tail_light).unwrap());
    session.set_item_note(bumper, "Dent is shallower than reported").unwrap();
    session.set_cost(bumper, MoneyFixtures::usd(700)).unwrap();

    let decision = session.finalize(DecisionAction::Approved, "").unwrap();

    assert_eq!(decision.confirmed, vec![DetectionId::new(1), DetectionId::new(2)]);
    assert_eq!(decision.item_note(bumper), Some("Dent is shallower than reported"));
    assert_eq!(decision.item_notes.len(), 1);
    let details = decision.details.as_ref().unwrap();
    assert_eq!(details.policy_number, "POL-2024-77810");
    assert_eq!(details.vehicle.to_string(), "2021 Toyota Camry");
}

#[test]
fn finalized_claim_rejects_everything() {
    let mut session = ScenarioFixtures::session(Scenario::AutoApprove);
    session.finalize(DecisionAction::Approved, "").unwrap();

    assert_claim_finalized(session.set_severity(DetectionId::new(1), Severity::Severe));
    assert_claim_finalized(session.set_cost_input(DetectionId::new(1), "10"));
    assert_claim_finalized(session.set_item_note(DetectionId::new(1), "late note"));
    assert_claim_finalized(session.finalize(DecisionAction::Escalated, ""));
    assert!(matches!(
        session.attach_assessment(ScenarioFixtures::auto_approve()),
        Err(AssessmentError::ClaimFinalized)
    ));
}
