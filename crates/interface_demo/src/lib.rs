//! Claims Triage Demo
//!
//! Command-line front end for the triage core: loads configuration, wires
//! the fixture provider and in-memory sink into the assessment service, and
//! walks the canned claims through their workflows.

pub mod config;
pub mod walkthrough;

use std::sync::Arc;

use domain_assessment::{AssessmentError, AssessmentService, FixtureAssessmentProvider, InMemoryDecisionSink};

pub use crate::config::{DemoConfig, DemoConfigError};
pub use crate::walkthrough::{run_all, run_scenario, WalkthroughReport};

/// Builds the service from configuration, returning the sink for inspection
pub fn build_service(config: &DemoConfig) -> Result<(AssessmentService, InMemoryDecisionSink), AssessmentError> {
    let sink = InMemoryDecisionSink::new();
    let service = AssessmentService::with_thresholds(
        Arc::new(FixtureAssessmentProvider::new(config.analysis_delay())),
        Arc::new(sink.clone()),
        config.thresholds()?,
    );
    Ok((service, sink))
}
