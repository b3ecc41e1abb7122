use domain_assessment::{DecisionAction, RoutingOutcome, Scenario};
use interface_demo::{build_service, run_all, run_scenario, DemoConfig};
use test_utils::{assert_total_is, ImageFixtures};

fn instant_config() -> DemoConfig {
    DemoConfig {
        analysis_delay_ms: 0,
        ..DemoConfig::default()
    }
}

#[tokio::test]
async fn walkthrough_covers_every_scenario() {
    let (service, sink) = build_service(&instant_config()).unwrap();

    let reports = run_all(&service, &Scenario::ALL, &ImageFixtures::photo())
        .await
        .unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(sink.len().await, 3);

    let actions: Vec<DecisionAction> = reports.iter().map(|r| r.decision.action).collect();
    assert_eq!(
        actions,
        vec![DecisionAction::Approved, DecisionAction::Escalated, DecisionAction::Escalated]
    );
}

#[tokio::test]
async fn reassessment_walkthrough_crosses_threshold() {
    let (service, _) = build_service(&instant_config()).unwrap();

    let report = run_scenario(&service, Scenario::AgentReassessment, &ImageFixtures::photo())
        .await
        .unwrap();

    assert_eq!(report.initial_routing, RoutingOutcome::AgentReassessment);
    assert_eq!(report.final_routing, RoutingOutcome::ReviewAndEscalate);
    assert_total_is(&report.initial_total, 1950);
    assert_total_is(&report.decision.adjusted_total, 2200);
    assert!(report.to_string().starts_with("agent_reassessment"));
}

#[tokio::test]
async fn weak_detection_on_costly_claim_takes_fourth_path() {
    let (service, _) = build_service(&instant_config()).unwrap();

    let report = run_scenario(&service, Scenario::DirectEscalation, &ImageFixtures::photo())
        .await
        .unwrap();

    assert_eq!(report.final_routing, RoutingOutcome::ReviewAndEscalate);
    assert!(report.final_routing.decision_path().starts_with("PATH 4"));
    assert_eq!(report.decision.action, DecisionAction::Escalated);
}

#[tokio::test]
async fn raised_threshold_lets_reassessment_approve() {
    let config = DemoConfig {
        cost_threshold: rust_decimal::Decimal::from(5000),
        ..instant_config()
    };
    let (service, _) = build_service(&config).unwrap();

    let report = run_scenario(&service, Scenario::AgentReassessment, &ImageFixtures::photo())
        .await
        .unwrap();
    assert_eq!(report.final_routing, RoutingOutcome::AgentReassessment);
    assert_eq!(report.decision.action, DecisionAction::Approved);
}
