//! Claims Triage - Demo Binary
//!
//! Walks the three canned claims through analysis, agent review and
//! finalization, logging each routing decision.
//!
//! # Usage
//!
//! ```bash
//! # Run all scenarios
//! cargo run --bin claims-demo
//!
//! # Run one scenario without the simulated delay
//! CLAIMS_SCENARIO=agent_reassessment CLAIMS_ANALYSIS_DELAY_MS=0 cargo run --bin claims-demo
//! ```
//!
//! # Environment Variables
//!
//! * `CLAIMS_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `CLAIMS_ANALYSIS_DELAY_MS` - Simulated analysis time (default: 800)
//! * `CLAIMS_COST_THRESHOLD` - Escalation cost threshold (default: 2000)
//! * `CLAIMS_CONFIDENCE_THRESHOLD` - Minimum detection confidence (default: 0.90)
//! * `CLAIMS_SCENARIO` - auto_approve, direct_escalation or agent_reassessment (default: all)

use anyhow::Context;
use domain_assessment::ClaimImage;
use interface_demo::{build_service, run_all, DemoConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = DemoConfig::from_env().context("failed to load CLAIMS_* configuration")?;

    init_tracing(&config.log_level);

    let thresholds = config.thresholds()?;
    tracing::info!(
        cost_threshold = %thresholds.cost_threshold,
        confidence_threshold = %thresholds.confidence_threshold,
        delay_ms = config.analysis_delay_ms,
        "Starting claims triage demo"
    );

    let (service, sink) = build_service(&config)?;
    let scenarios = config.scenarios()?;
    let image = ClaimImage::new("vehicle.jpg", "image/jpeg", b"demo-photo".to_vec());

    let reports = run_all(&service, &scenarios, &image)
        .await
        .context("walkthrough failed")?;

    for report in &reports {
        println!("{report}");
    }
    tracing::info!(recorded = sink.len().await, "Demo complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
