//! In-process adapters for the assessment ports
//!
//! - **FixtureAssessmentProvider**: simulated detection stage serving the canned scenarios
//! - **InMemoryDecisionSink**: keeps finalized decisions in memory

pub mod fixture_provider;
pub mod memory_sink;

pub use fixture_provider::{FixtureAssessmentProvider, DEFAULT_ANALYSIS_DELAY};
pub use memory_sink::InMemoryDecisionSink;
