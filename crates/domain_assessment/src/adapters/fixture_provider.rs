//! Fixture-backed assessment provider
//!
//! Stands in for the damage-detection service. After a simulated analysis
//! delay it returns the requested scenario's assessment, or a random one when
//! no scenario is given.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, OperationMetadata, PortError};
use crate::assessment::Assessment;
use crate::fixtures::Scenario;
use crate::ports::{AssessmentProvider, ClaimImage};

/// Simulated analysis time
pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(800);

/// Assessment provider serving the canned scenarios
#[derive(Debug)]
pub struct FixtureAssessmentProvider {
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl FixtureAssessmentProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Provider whose random scenario picks are reproducible
    pub fn seeded(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Provider that answers immediately
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn pick_scenario(&self) -> Result<Scenario, PortError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| PortError::internal("scenario picker lock poisoned"))?;
        Ok(Scenario::random(&mut *rng))
    }
}

impl Default for FixtureAssessmentProvider {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_DELAY)
    }
}

impl DomainPort for FixtureAssessmentProvider {}

#[async_trait]
impl AssessmentProvider for FixtureAssessmentProvider {
    #[instrument(skip(self, image, metadata), fields(file_name = %image.file_name, bytes = image.len()))]
    async fn assess(
        &self,
        image: &ClaimImage,
        scenario: Option<Scenario>,
        metadata: Option<OperationMetadata>,
    ) -> Result<Assessment, PortError> {
        if image.is_empty() {
            return Err(PortError::validation_field("image is empty", "image"));
        }

        let scenario = match scenario {
            Some(scenario) => scenario,
            None => self.pick_scenario()?,
        };
        debug!(
            scenario = %scenario,
            correlation_id = metadata.as_ref().and_then(|m| m.correlation_id.as_deref()),
            "analyzing claim image"
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        scenario
            .assessment()
            .map_err(|e| PortError::internal(format!("fixture {scenario} is invalid: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::Recommendation;

    fn photo() -> ClaimImage {
        ClaimImage::new("front.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    #[tokio::test]
    async fn test_requested_scenario_is_served() {
        let provider = FixtureAssessmentProvider::instant();
        let assessment = provider
            .assess(&photo(), Some(Scenario::DirectEscalation), None)
            .await
            .unwrap();

        assert_eq!(assessment.claim_number(), "CLM-2024-002");
        assert_eq!(assessment.recommendation(), Recommendation::DirectEscalation);
    }

    #[tokio::test]
    async fn test_empty_image_rejected() {
        let provider = FixtureAssessmentProvider::instant();
        let empty = ClaimImage::new("blank.png", "image/png", Vec::new());

        let result = provider.assess(&empty, None, None).await;
        assert!(matches!(result, Err(PortError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_random_pick_is_a_known_fixture() {
        let provider = FixtureAssessmentProvider::seeded(Duration::ZERO, 11);
        let known = ["CLM-2024-001", "CLM-2024-002", "CLM-2024-003"];

        for _ in 0..5 {
            let assessment = provider.assess(&photo(), None, None).await.unwrap();
            assert!(known.contains(&assessment.claim_number()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_delay_elapses() {
        let provider = FixtureAssessmentProvider::default();
        let started = tokio::time::Instant::now();

        provider
            .assess(&photo(), Some(Scenario::AutoApprove), None)
            .await
            .unwrap();
        assert!(started.elapsed() >= DEFAULT_ANALYSIS_DELAY);
    }
}
