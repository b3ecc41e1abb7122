//! Scripted agent walkthrough
//!
//! Plays one claim per scenario through the service the way an agent would:
//! submit a photo, review the routing, adjust flagged items, then take the
//! action the final branch allows.

use std::fmt;
use tracing::info;

use core_kernel::Money;
use domain_assessment::{
    permitted_actions, AssessmentError, AssessmentService, ClaimImage, Decision, RoutingOutcome,
    Scenario,
};

/// Cost the scripted agent enters for each flagged item
///
/// Matches the rear-bumper correction agents typically make on the
/// reassessment claim, which is enough to push it over the threshold.
pub const FLAGGED_ITEM_CORRECTION: &str = "1200";

/// Outcome of one scripted claim
#[derive(Debug, Clone)]
pub struct WalkthroughReport {
    pub scenario: Scenario,
    pub initial_routing: RoutingOutcome,
    pub final_routing: RoutingOutcome,
    pub initial_total: Money,
    pub decision: Decision,
    pub events: usize,
}

impl fmt::Display for WalkthroughReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} | {} -> {} | {}",
            self.scenario,
            self.initial_routing,
            self.final_routing,
            self.initial_total,
            self.decision.adjusted_total,
            self.decision.action
        )
    }
}

/// Runs one scenario end to end
pub async fn run_scenario(
    service: &AssessmentService,
    scenario: Scenario,
    image: &ClaimImage,
) -> Result<WalkthroughReport, AssessmentError> {
    let mut session = service.open_claim(format!("DEMO-{}", scenario.as_str().to_uppercase()));
    let initial_routing = service.analyze(&mut session, image, Some(scenario)).await?;
    let initial_total = session.current_total()?;

    let flagged: Vec<_> = session
        .assessment()
        .map(|a| a.items_needing_review().map(|d| d.id).collect())
        .unwrap_or_default();
    for id in flagged {
        session.set_cost_input(id, FLAGGED_ITEM_CORRECTION)?;
        session.set_item_note(id, "Verified on photo; repair cost corrected")?;
    }

    let analysis = session.analysis()?;
    info!(
        scenario = %scenario,
        path = analysis.outcome.decision_path(),
        dedicated_workflow = analysis.outcome.has_dedicated_workflow(),
        lowest_confidence = %analysis.confidence_check.actual,
        total = %analysis.cost_check.actual,
        "claim reviewed"
    );

    let final_routing = analysis.outcome;
    let action = permitted_actions(final_routing)
        .first()
        .copied()
        .ok_or_else(|| AssessmentError::invalid_transition(final_routing, "any action"))?;

    let events = session.take_events().len();
    let decision = service
        .finalize(&mut session, action, format!("scripted walkthrough: {}", scenario.label()))
        .await?;

    Ok(WalkthroughReport {
        scenario,
        initial_routing,
        final_routing,
        initial_total,
        decision,
        events,
    })
}

/// Runs every scenario in order, stopping at the first failure
pub async fn run_all(
    service: &AssessmentService,
    scenarios: &[Scenario],
    image: &ClaimImage,
) -> Result<Vec<WalkthroughReport>, AssessmentError> {
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let report = run_scenario(service, *scenario, image).await?;
        info!(report = %report, "scenario complete");
        reports.push(report);
    }
    Ok(reports)
}
