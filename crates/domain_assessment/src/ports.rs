//! Assessment Domain Ports
//!
//! The triage core depends on two external collaborators, both behind
//! port traits so the fixture-backed adapters used today can be swapped for
//! a real detection service and a claims system of record:
//!
//! - [`AssessmentProvider`]: turns a claim photo into an [`Assessment`]
//! - [`DecisionSink`]: receives every finalized [`Decision`]
//!
//! # Usage
//!
//! ```rust,ignore
//! let provider: Arc<dyn AssessmentProvider> = Arc::new(FixtureAssessmentProvider::default());
//! let sink: Arc<dyn DecisionSink> = Arc::new(InMemoryDecisionSink::new());
//! let service = AssessmentService::new(provider, sink);
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, OperationMetadata, PortError};
use crate::assessment::Assessment;
use crate::decision::Decision;
use crate::fixtures::Scenario;

/// An uploaded claim photo
///
/// Opaque to the triage core; only emptiness is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ClaimImage {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Produces the damage assessment for a claim photo
#[async_trait]
pub trait AssessmentProvider: DomainPort {
    /// Analyzes the image
    ///
    /// # Arguments
    ///
    /// * `image` - The uploaded photo
    /// * `scenario` - Forces a specific canned outcome where the provider supports it
    /// * `metadata` - Optional operation metadata for tracing/auditing
    ///
    /// # Returns
    ///
    /// The assessment, or `PortError::Validation` for an unusable image
    async fn assess(
        &self,
        image: &ClaimImage,
        scenario: Option<Scenario>,
        metadata: Option<OperationMetadata>,
    ) -> Result<Assessment, PortError>;
}

/// Accepts finalized decisions
#[async_trait]
pub trait DecisionSink: DomainPort {
    /// Records a decision
    ///
    /// # Arguments
    ///
    /// * `decision` - The finalized decision
    /// * `metadata` - Optional operation metadata
    async fn record(
        &self,
        decision: &Decision,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;
}
