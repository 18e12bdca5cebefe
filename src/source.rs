//! # Source Model
//!
//! A `Source` is one discovered job board: which ATS vendor hosts it, how to
//! reach it (canonical URL and/or vendor-assigned board token), and the latest
//! validation outcome. Its identity key is `(vendor, token-or-"", url-or-"")`;
//! persistence merges on that key so repeated discovery runs converge instead
//! of accumulating duplicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ATS vendors the classifier knows about. The serialized tags are stable;
/// adding a variant must never change an existing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsVendor {
    GreenhouseApi,
    GreenhouseEmbed,
    Lever,
    Workday,
    Ashby,
    Smartrecruiters,
    Successfactors,
}

impl AtsVendor {
    pub fn as_str(&self) -> &'static str {
        match self {
            AtsVendor::GreenhouseApi => "greenhouse_api",
            AtsVendor::GreenhouseEmbed => "greenhouse_embed",
            AtsVendor::Lever => "lever",
            AtsVendor::Workday => "workday",
            AtsVendor::Ashby => "ashby",
            AtsVendor::Smartrecruiters => "smartrecruiters",
            AtsVendor::Successfactors => "successfactors",
        }
    }

    /// Whether the board token alone identifies a source of this vendor.
    /// Token-identified sources carry no URL and skip compliance/probing:
    /// their access pattern is a documented API contract, not a scraped page.
    pub fn token_identified(&self) -> bool {
        matches!(self, AtsVendor::GreenhouseApi)
    }

    /// Rebuild the canonical board URL from a vendor token, for vendors whose
    /// tokens are structured (tenant slugs). `None` where only a raw URL
    /// identifies the board.
    pub fn canonical_url(&self, token: &str) -> Option<String> {
        match self {
            AtsVendor::GreenhouseApi => Some(format!(
                "https://boards-api.greenhouse.io/v1/boards/{token}/jobs"
            )),
            AtsVendor::Lever => Some(format!("https://jobs.lever.co/{token}")),
            AtsVendor::Workday => Some(format!("https://{token}.myworkdayjobs.com")),
            AtsVendor::Ashby => Some(format!("https://jobs.ashbyhq.com/{token}")),
            AtsVendor::Smartrecruiters => {
                Some(format!("https://careers.smartrecruiters.com/{token}"))
            }
            AtsVendor::GreenhouseEmbed | AtsVendor::Successfactors => None,
        }
    }
}

impl std::fmt::Display for AtsVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AtsVendor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greenhouse_api" => Ok(AtsVendor::GreenhouseApi),
            "greenhouse_embed" => Ok(AtsVendor::GreenhouseEmbed),
            "lever" => Ok(AtsVendor::Lever),
            "workday" => Ok(AtsVendor::Workday),
            "ashby" => Ok(AtsVendor::Ashby),
            "smartrecruiters" => Ok(AtsVendor::Smartrecruiters),
            "successfactors" => Ok(AtsVendor::Successfactors),
            other => Err(anyhow::anyhow!("unknown ATS vendor tag: {other}")),
        }
    }
}

/// Lifecycle status of a source within and across runs.
/// `new → {valid | blocked | error}`, exactly once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    New,
    Valid,
    Blocked,
    Error,
}

impl SourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceStatus::New => "new",
            SourceStatus::Valid => "valid",
            SourceStatus::Blocked => "blocked",
            SourceStatus::Error => "error",
        }
    }
}

/// Identity key for deduplication and persistence. Absent fields coalesce to
/// empty strings so the in-memory dedup and the store's conflict target agree
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub vendor: AtsVendor,
    pub token: String,
    pub url: String,
}

/// A discovered job-board entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub vendor: AtsVendor,
    pub company: Option<String>,
    pub url: Option<String>,
    pub board_token: Option<String>,
    pub status: SourceStatus,
    pub robots_allowed: Option<bool>,
    pub score: f64,
    pub updated_at: DateTime<Utc>,
}

impl Source {
    /// Fresh, unvalidated source as produced by classification.
    pub fn new(vendor: AtsVendor) -> Self {
        Self {
            vendor,
            company: None,
            url: None,
            board_token: None,
            status: SourceStatus::New,
            robots_allowed: None,
            score: 0.0,
            updated_at: Utc::now(),
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.board_token = Some(token.into());
        self
    }

    /// Identity key, shared by the batch dedup and the store's merge target.
    pub fn key(&self) -> SourceKey {
        SourceKey {
            vendor: self.vendor,
            token: self.board_token.clone().unwrap_or_default(),
            url: self.url.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_tags_are_stable() {
        for (vendor, tag) in [
            (AtsVendor::GreenhouseApi, "greenhouse_api"),
            (AtsVendor::GreenhouseEmbed, "greenhouse_embed"),
            (AtsVendor::Lever, "lever"),
            (AtsVendor::Workday, "workday"),
            (AtsVendor::Ashby, "ashby"),
            (AtsVendor::Smartrecruiters, "smartrecruiters"),
            (AtsVendor::Successfactors, "successfactors"),
        ] {
            assert_eq!(vendor.as_str(), tag);
            assert_eq!(tag.parse::<AtsVendor>().unwrap(), vendor);
            // serde uses the same tags as as_str/FromStr
            assert_eq!(
                serde_json::to_string(&vendor).unwrap(),
                format!("\"{tag}\"")
            );
        }
    }

    #[test]
    fn key_coalesces_absent_fields_to_empty() {
        let token_only = Source::new(AtsVendor::GreenhouseApi).with_token("acme");
        let key = token_only.key();
        assert_eq!(key.token, "acme");
        assert_eq!(key.url, "");

        let url_only = Source::new(AtsVendor::Successfactors)
            .with_url("https://career5.successfactors.com/widgetco");
        let key = url_only.key();
        assert_eq!(key.token, "");
        assert_eq!(key.url, "https://career5.successfactors.com/widgetco");
    }

    #[test]
    fn same_identity_same_key() {
        let a = Source::new(AtsVendor::Lever)
            .with_token("acme")
            .with_url("https://jobs.lever.co/acme")
            .with_company("Acme");
        let b = Source::new(AtsVendor::Lever)
            .with_token("acme")
            .with_url("https://jobs.lever.co/acme")
            .with_company("Acme Inc.");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn canonical_urls_rebuild_from_tokens() {
        assert_eq!(
            AtsVendor::GreenhouseApi.canonical_url("acme").unwrap(),
            "https://boards-api.greenhouse.io/v1/boards/acme/jobs"
        );
        assert_eq!(
            AtsVendor::Lever.canonical_url("acme").unwrap(),
            "https://jobs.lever.co/acme"
        );
        assert_eq!(
            AtsVendor::Workday.canonical_url("acme").unwrap(),
            "https://acme.myworkdayjobs.com"
        );
        assert!(AtsVendor::Successfactors.canonical_url("x").is_none());
    }
}
