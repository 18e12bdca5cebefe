//! # Compliance Checker
//!
//! Robots-policy evaluation for candidate job boards. The policy URL is
//! derived from the target's scheme and host, fetched with a bounded timeout,
//! and evaluated for the configured client identity.
//!
//! Fail-open: when the policy cannot be fetched or parsed, the answer is
//! `true`. A temporarily unreachable policy host must not block discovery of
//! an otherwise valid source.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

/// Answers whether a client identity may fetch a URL.
#[async_trait]
pub trait ComplianceChecker: Send + Sync {
    async fn robots_allowed(&self, url: &str, user_agent: &str) -> bool;
}

/// Allow/disallow prefixes for one user-agent group.
#[derive(Debug, Clone, Default)]
struct Group {
    allow: Vec<String>,
    disallow: Vec<String>,
}

/// Parsed robots.txt rules.
#[derive(Debug, Clone, Default)]
pub struct RobotsPolicy {
    /// Rules per user-agent (lowercase), `*` kept separately.
    groups: HashMap<String, Group>,
    wildcard: Group,
}

impl RobotsPolicy {
    pub fn parse(content: &str) -> Self {
        let mut policy = RobotsPolicy::default();
        let mut agents: Vec<String> = Vec::new();
        let mut group = Group::default();
        let mut in_rules = false;

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match directive.trim().to_ascii_lowercase().as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group.
                    if in_rules {
                        policy.store(&agents, group);
                        agents = Vec::new();
                        group = Group::default();
                        in_rules = false;
                    }
                    agents.push(value.to_ascii_lowercase());
                }
                "allow" => {
                    in_rules = true;
                    if !value.is_empty() {
                        group.allow.push(value.to_string());
                    }
                }
                "disallow" => {
                    // An empty Disallow means everything is permitted.
                    in_rules = true;
                    if !value.is_empty() {
                        group.disallow.push(value.to_string());
                    }
                }
                _ => {}
            }
        }
        policy.store(&agents, group);
        policy
    }

    fn store(&mut self, agents: &[String], group: Group) {
        for agent in agents {
            if agent == "*" {
                self.wildcard = group.clone();
            } else {
                self.groups.insert(agent.clone(), group.clone());
            }
        }
    }

    /// Whether `user_agent` may fetch `path`. Allow rules take precedence
    /// over disallow rules, per the de-facto standard.
    pub fn allows(&self, user_agent: &str, path: &str) -> bool {
        let ua = user_agent.to_ascii_lowercase();
        let group = self
            .groups
            .get(&ua)
            .or_else(|| {
                // Product tokens match on substring ("FooBot/1.0" vs "foobot").
                self.groups
                    .iter()
                    .find(|(token, _)| ua.contains(token.as_str()))
                    .map(|(_, group)| group)
            })
            .unwrap_or(&self.wildcard);

        if group.allow.iter().any(|prefix| path.starts_with(prefix)) {
            return true;
        }
        !group
            .disallow
            .iter()
            .any(|prefix| path.starts_with(prefix))
    }
}

/// Fetches and evaluates robots.txt over HTTP. Any fetch or parse problem
/// resolves to "allowed".
pub struct HttpComplianceChecker {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpComplianceChecker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl ComplianceChecker for HttpComplianceChecker {
    async fn robots_allowed(&self, url: &str, user_agent: &str) -> bool {
        let Ok(target) = Url::parse(url) else {
            return true;
        };
        let Some(host) = target.host_str() else {
            return true;
        };
        let robots_url = match target.port() {
            Some(port) => format!("{}://{host}:{port}/robots.txt", target.scheme()),
            None => format!("{}://{host}/robots.txt", target.scheme()),
        };

        let body = match self
            .client
            .get(&robots_url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(error = ?e, url = robots_url.as_str(), "robots body unreadable");
                    return true;
                }
            },
            Ok(_) | Err(_) => return true,
        };

        RobotsPolicy::parse(&body).allows(user_agent, &request_path(&target))
    }
}

/// Path the robots rules are matched against. The query string is part of
/// the request target, so `Disallow: /embed/job_board?for=` style rules can
/// match.
fn request_path(target: &Url) -> String {
    match target.query() {
        Some(query) => format!("{}?{}", target.path(), query),
        None => target.path().to_string(),
    }
}
