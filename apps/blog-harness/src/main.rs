//! # Blog Harness
//!
//! Checks publication behaviour of a running server through its HTTP API:
//!
//! - `visibility`: one published, one scheduled (+10 min) and one draft
//!   post; only the published one may appear in the public listing.
//! - `scheduling`: two posts scheduled one and two minutes ahead; polls the
//!   public listing until both appear or the timeout passes.
//!
//! Configuration comes from the environment (`HARNESS_*`). The scenario can
//! also be given as the first argument.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use quill_core::ports::{Clock, PostRepository, SystemClock};
use quill_harness::{
    GenerationPlan, PollConfig, PollOutcome, TestDataGenerator, VisibilityReport,
    cleanup_test_data, verify_visibility, wait_for_publication,
};
use quill_infra::{HttpPostRepository, HttpStoreConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scenario {
    Visibility,
    Scheduling,
    All,
}

impl FromStr for Scenario {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visibility" | "a" => Ok(Scenario::Visibility),
            "scheduling" | "b" => Ok(Scenario::Scheduling),
            "all" | "" => Ok(Scenario::All),
            other => bail!("unknown scenario `{other}` (expected visibility, scheduling or all)"),
        }
    }
}

struct HarnessConfig {
    store: HttpStoreConfig,
    poll: PollConfig,
    scenario: Scenario,
    cleanup: bool,
}

impl HarnessConfig {
    fn from_env() -> anyhow::Result<Self> {
        let scenario = std::env::args()
            .nth(1)
            .or_else(|| std::env::var("HARNESS_SCENARIO").ok())
            .unwrap_or_default()
            .parse::<Scenario>()?;

        Ok(Self {
            store: HttpStoreConfig::from_env(),
            poll: PollConfig::from_env(),
            scenario,
            cleanup: std::env::var("HARNESS_CLEANUP")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = HarnessConfig::from_env()?;
    if config.store.admin_token.is_none() {
        tracing::warn!("HARNESS_ADMIN_TOKEN not set; admin calls will be rejected");
    }

    tracing::info!(
        base_url = %config.store.base_url,
        scenario = ?config.scenario,
        "Starting blog harness"
    );

    let repo: Arc<dyn PostRepository> = Arc::new(
        HttpPostRepository::new(config.store.clone()).context("failed to build HTTP client")?,
    );
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let mut failures = Vec::new();

    if matches!(config.scenario, Scenario::Visibility | Scenario::All) {
        if let Err(e) = visibility_scenario(repo.clone(), clock.clone()).await {
            tracing::error!(error = %format!("{e:#}"), "Visibility scenario failed");
            failures.push("visibility");
        }
    }

    if matches!(config.scenario, Scenario::Scheduling | Scenario::All) {
        if let Err(e) = scheduling_scenario(repo.clone(), clock.clone(), config.poll).await {
            tracing::error!(error = %format!("{e:#}"), "Scheduling scenario failed");
            failures.push("scheduling");
        }
    }

    if config.cleanup {
        match cleanup_test_data(repo.as_ref()).await {
            Ok(report) => tracing::info!(deleted = report.deleted, failed = report.failed, "Cleanup done"),
            Err(e) => tracing::warn!(error = %e, "Cleanup failed"),
        }
    }

    if !failures.is_empty() {
        bail!("scenario(s) failed: {}", failures.join(", "));
    }

    tracing::info!("All scenarios passed");
    Ok(())
}

async fn visibility_scenario(
    repo: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<()> {
    let plan = GenerationPlan::new()
        .published(1)
        .scheduled_in_minutes(10)
        .drafts(1);
    let posts = TestDataGenerator::new(repo.clone(), clock.clone())
        .generate(&plan)
        .await?
        .into_result()
        .context("creating visibility posts")?;

    let report =
        VisibilityReport::from_checks(verify_visibility(repo.as_ref(), clock.as_ref(), &posts).await);

    for check in &report.checks {
        tracing::info!(
            post_id = %check.post_id,
            title = %check.title,
            expected_visible = check.expected_visible,
            actual = %check.actual_status,
            passed = check.passed,
            "Visibility check"
        );
    }

    if !report.all_passed() {
        bail!("{} of {} visibility checks failed", report.failed, report.checks.len());
    }
    Ok(())
}

async fn scheduling_scenario(
    repo: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
    poll: PollConfig,
) -> anyhow::Result<()> {
    let plan = GenerationPlan::new()
        .scheduled_in_minutes(1)
        .scheduled_in_minutes(2);
    let posts = TestDataGenerator::new(repo.clone(), clock.clone())
        .generate(&plan)
        .await?
        .into_result()
        .context("creating scheduled posts")?;

    let ids: Vec<_> = posts.iter().map(|p| p.id).collect();
    match wait_for_publication(repo.as_ref(), clock.as_ref(), &ids, poll).await {
        PollOutcome::Published { elapsed, checks } => {
            tracing::info!(elapsed_secs = elapsed.as_secs(), checks, "Scheduled posts published");
            Ok(())
        }
        PollOutcome::TimedOut { elapsed, checks, .. } => {
            bail!("posts not published after {}s ({checks} checks)", elapsed.as_secs())
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blog_harness=debug,quill_harness=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_names() {
        assert_eq!("b".parse::<Scenario>().unwrap(), Scenario::Scheduling);
        assert_eq!("Visibility".parse::<Scenario>().unwrap(), Scenario::Visibility);
        assert_eq!("".parse::<Scenario>().unwrap(), Scenario::All);
        assert!("publish".parse::<Scenario>().is_err());
    }
}
