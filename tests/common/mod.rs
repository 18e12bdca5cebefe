#![allow(dead_code)]
// Shared test doubles for the pipeline tests. Hand-written stubs so each
// test controls exactly what the network "did".

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use ats_discovery::probe::{AvailabilityProber, ProbeOutcome};
use ats_discovery::providers::{SearchHit, SearchProvider};
use ats_discovery::robots::ComplianceChecker;

/// Compliance checker with a fixed answer and a call counter.
pub struct StubCompliance {
    allow: bool,
    calls: AtomicUsize,
}

impl StubCompliance {
    pub fn allowing() -> Self {
        Self {
            allow: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn denying() -> Self {
        Self {
            allow: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ComplianceChecker for StubCompliance {
    async fn robots_allowed(&self, _url: &str, _user_agent: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.allow
    }
}

/// Prober with per-URL scripted outcomes and a call counter.
pub struct ScriptedProber {
    outcomes: HashMap<String, ProbeOutcome>,
    default: ProbeOutcome,
    calls: AtomicUsize,
}

impl ScriptedProber {
    /// Everything reachable unless scripted otherwise.
    pub fn reachable() -> Self {
        Self {
            outcomes: HashMap::new(),
            default: ProbeOutcome::reachable(200),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_outcome(mut self, url: &str, outcome: ProbeOutcome) -> Self {
        self.outcomes.insert(url.to_string(), outcome);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvailabilityProber for ScriptedProber {
    async fn probe(&self, url: &str, _user_agent: &str) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes.get(url).copied().unwrap_or(self.default)
    }
}

/// Provider that is down for every query.
pub struct FailingProvider;

#[async_trait]
impl SearchProvider for FailingProvider {
    async fn search(&self, _query: &str, _limit: usize) -> anyhow::Result<Vec<SearchHit>> {
        anyhow::bail!("provider outage")
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
