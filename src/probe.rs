//! # Availability Prober
//!
//! One bounded-timeout GET per candidate URL. The outcome keeps a three-way
//! distinction the export/ranking layer relies on: reachable with a 2xx code,
//! refused with the observed status code (403 means an access block, 429/5xx
//! are transient), or a transport failure with no code at all (DNS, TLS,
//! timeout, reset).

use std::time::Duration;

use async_trait::async_trait;

/// Result of a reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub reachable: bool,
    pub status: Option<u16>,
}

impl ProbeOutcome {
    pub fn reachable(code: u16) -> Self {
        Self {
            reachable: true,
            status: Some(code),
        }
    }

    pub fn refused(code: u16) -> Self {
        Self {
            reachable: false,
            status: Some(code),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            status: None,
        }
    }
}

#[async_trait]
pub trait AvailabilityProber: Send + Sync {
    async fn probe(&self, url: &str, user_agent: &str) -> ProbeOutcome;
}

/// Plain HTTP prober.
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl AvailabilityProber for HttpProber {
    async fn probe(&self, url: &str, user_agent: &str) -> ProbeOutcome {
        match self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(resp) => {
                let code = resp.status().as_u16();
                if resp.status().is_success() {
                    ProbeOutcome::reachable(code)
                } else {
                    ProbeOutcome::refused(code)
                }
            }
            Err(e) => {
                tracing::debug!(error = ?e, url, "probe transport failure");
                ProbeOutcome::unreachable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_constructors_keep_the_three_way_distinction() {
        let ok = ProbeOutcome::reachable(200);
        assert!(ok.reachable);
        assert_eq!(ok.status, Some(200));

        let forbidden = ProbeOutcome::refused(403);
        assert!(!forbidden.reachable);
        assert_eq!(forbidden.status, Some(403));

        let dead = ProbeOutcome::unreachable();
        assert!(!dead.reachable);
        assert_eq!(dead.status, None);
    }
}
