//! # Pipeline Orchestrator
//!
//! Sequences one discovery run: queries → raw hits → classified candidates →
//! deduplicated candidates → (compliance, availability) → scored, persisted
//! sources. Per source and per run, the status transition is
//! `new → {valid | blocked | error}`, exactly once; re-detection on a later
//! run re-evaluates and overwrites the same identity key.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tokio::sync::Semaphore;

use crate::config::DiscoveryConfig;
use crate::detect::{self, Detection};
use crate::probe::AvailabilityProber;
use crate::providers::{SearchHit, SearchProvider};
use crate::robots::ComplianceChecker;
use crate::source::{AtsVendor, Source, SourceStatus};
use crate::store::SourceStore;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "discovery_provider_errors_total",
            "Search queries that failed at the provider."
        );
        describe_counter!(
            "discovery_unclassified_total",
            "Search hits matching no vendor signature."
        );
        describe_counter!(
            "discovery_classified_total",
            "Search hits classified to an ATS vendor."
        );
        describe_counter!("discovery_valid_total", "Sources validated as crawlable.");
        describe_counter!("discovery_blocked_total", "Sources blocked by robots or 403.");
        describe_counter!("discovery_error_total", "Sources that failed validation.");
        describe_counter!("discovery_persisted_total", "Upserted source records.");
        describe_gauge!(
            "discovery_last_run_ts",
            "Unix ts when the discovery pipeline last ran."
        );
    });
}

/// Aggregate counts for one run. `persisted` < `deduplicated` together with a
/// returned error means the store failed mid-run; committed upserts stay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub queried: usize,
    pub hits: usize,
    pub classified: usize,
    pub deduplicated: usize,
    pub valid: usize,
    pub blocked: usize,
    pub error: usize,
    pub persisted: usize,
}

/// Discovery pipeline over explicit collaborators; no ambient configuration.
pub struct Discovery {
    cfg: DiscoveryConfig,
    provider: Arc<dyn SearchProvider>,
    compliance: Arc<dyn ComplianceChecker>,
    prober: Arc<dyn AvailabilityProber>,
    store: Arc<dyn SourceStore>,
}

impl Discovery {
    pub fn new(
        cfg: DiscoveryConfig,
        provider: Arc<dyn SearchProvider>,
        compliance: Arc<dyn ComplianceChecker>,
        prober: Arc<dyn AvailabilityProber>,
        store: Arc<dyn SourceStore>,
    ) -> Self {
        Self {
            cfg,
            provider,
            compliance,
            prober,
            store,
        }
    }

    /// Run the pipeline once. Idempotent: identical search results and
    /// network responses yield an identical persisted catalog.
    pub async fn run_once(&self) -> Result<RunReport> {
        ensure_metrics_described();
        let mut report = RunReport::default();

        // 1. Run the discovery queries; a failed query degrades coverage for
        //    that query only.
        let mut candidates: Vec<Source> = Vec::new();
        for query in &self.cfg.queries {
            report.queried += 1;
            let results = match self
                .provider
                .search(query, self.cfg.per_query_limit)
                .await
            {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(
                        error = ?e,
                        provider = self.provider.name(),
                        query = query.as_str(),
                        "search provider error"
                    );
                    counter!("discovery_provider_errors_total").increment(1);
                    continue;
                }
            };
            report.hits += results.len();
            for hit in &results {
                let Some(det) = detect::classify(&hit.url) else {
                    // Expected majority case, not a failure.
                    counter!("discovery_unclassified_total").increment(1);
                    tracing::debug!(url = hit.url.as_str(), "no vendor match");
                    continue;
                };
                candidates.push(build_source(det, hit));
            }
        }
        report.classified = candidates.len();
        counter!("discovery_classified_total").increment(report.classified as u64);

        // 2. Canonicalize to one candidate per identity key; this is the only
        //    place concurrent detections of the same key are resolved.
        let unique = crate::dedupe::dedupe(candidates, self.cfg.max_batch);
        report.deduplicated = unique.len();

        // 3. Compliance + availability with a bounded number of in-flight
        //    checks.
        let validated = self.validate(unique).await;
        for src in &validated {
            match src.status {
                SourceStatus::Valid => report.valid += 1,
                SourceStatus::Blocked => report.blocked += 1,
                _ => report.error += 1,
            }
        }
        counter!("discovery_valid_total").increment(report.valid as u64);
        counter!("discovery_blocked_total").increment(report.blocked as u64);
        counter!("discovery_error_total").increment(report.error as u64);

        // 4. Persist. Upserts commit independently; a store failure stops the
        //    run cleanly and reports what was left unpersisted.
        let total = validated.len();
        for src in validated {
            if let Err(e) = self.store.upsert(&src).await {
                return Err(e).with_context(|| {
                    format!(
                        "persisting {} source ({} of {} persisted, {} not persisted)",
                        src.vendor,
                        report.persisted,
                        total,
                        total - report.persisted
                    )
                });
            }
            report.persisted += 1;
        }
        counter!("discovery_persisted_total").increment(report.persisted as u64);
        gauge!("discovery_last_run_ts").set(Utc::now().timestamp().max(0) as f64);

        tracing::info!(
            target: "discovery",
            queried = report.queried,
            hits = report.hits,
            classified = report.classified,
            deduplicated = report.deduplicated,
            valid = report.valid,
            blocked = report.blocked,
            error = report.error,
            persisted = report.persisted,
            "discovery run complete"
        );
        Ok(report)
    }

    /// Validate a deduplicated batch with at most `probe_concurrency`
    /// checks in flight; results are joined at a single aggregation point.
    async fn validate(&self, batch: Vec<Source>) -> Vec<Source> {
        let semaphore = Arc::new(Semaphore::new(self.cfg.probe_concurrency.max(1)));
        let mut handles = Vec::with_capacity(batch.len());
        for src in batch {
            let semaphore = semaphore.clone();
            let compliance = self.compliance.clone();
            let prober = self.prober.clone();
            let user_agent = self.cfg.user_agent.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("validation semaphore closed");
                validate_one(src, &*compliance, &*prober, &user_agent).await
            }));
        }

        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(src) => out.push(src),
                Err(e) => tracing::warn!(error = ?e, "validation task failed"),
            }
        }
        out
    }
}

/// Apply the per-source state machine: token-only sources are inherently
/// reachable; URL sources go through robots then the probe.
async fn validate_one(
    mut src: Source,
    compliance: &dyn ComplianceChecker,
    prober: &dyn AvailabilityProber,
    user_agent: &str,
) -> Source {
    src.updated_at = Utc::now();

    let Some(url) = src.url.clone() else {
        // Identity fully carried by the token: a documented, stable API
        // contract, so no compliance or availability checks.
        src.robots_allowed = Some(true);
        src.status = SourceStatus::Valid;
        src.score = 1.0;
        return src;
    };

    let allowed = compliance.robots_allowed(&url, user_agent).await;
    src.robots_allowed = Some(allowed);
    if !allowed {
        src.status = SourceStatus::Blocked;
        src.score = 0.0;
        return src;
    }

    let outcome = prober.probe(&url, user_agent).await;
    src.status = if outcome.reachable {
        SourceStatus::Valid
    } else if outcome.status == Some(403) {
        SourceStatus::Blocked
    } else {
        SourceStatus::Error
    };
    src.score = if src.status == SourceStatus::Valid {
        1.0
    } else {
        0.0
    };
    src
}

/// Build an unvalidated source from a classified hit. Token vendors get a
/// canonical URL rebuilt from the slug so batch dedup converges on the slug;
/// the Greenhouse API is token-only (the crawler reconstructs its URL).
fn build_source(det: Detection, hit: &SearchHit) -> Source {
    let company = Some(hit.name.trim().to_string()).filter(|s| !s.is_empty());
    let (board_token, url) = match det.vendor {
        AtsVendor::GreenhouseApi => (Some(det.token), None),
        AtsVendor::Lever | AtsVendor::Workday | AtsVendor::Ashby | AtsVendor::Smartrecruiters => {
            let url = det.vendor.canonical_url(&det.token);
            (Some(det.token), url)
        }
        // Token surrogate is the raw URL.
        AtsVendor::GreenhouseEmbed | AtsVendor::Successfactors => (None, Some(det.token)),
    };
    Source {
        vendor: det.vendor,
        company,
        url,
        board_token,
        status: SourceStatus::New,
        robots_allowed: None,
        score: 0.0,
        updated_at: Utc::now(),
    }
}
