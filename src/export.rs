//! # Export / Ranking
//!
//! The filtered, ranked projection of valid sources handed to the downstream
//! crawler. The crawler never sees `new`, `blocked`, or `error` sources.
//! Token-identified vendors are exported by token (the crawler reconstructs
//! the canonical URL); everything else by URL.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::source::{AtsVendor, Source};
use crate::store::SourceStore;

/// One row of the crawler-facing catalog. List order is rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    #[serde(rename = "type")]
    pub vendor: AtsVendor,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ExportRecord {
    fn from_source(src: &Source) -> Self {
        let company = src
            .company
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        if src.vendor.token_identified() && src.board_token.is_some() {
            Self {
                vendor: src.vendor,
                company,
                board_token: src.board_token.clone(),
                url: None,
            }
        } else {
            Self {
                vendor: src.vendor,
                company,
                board_token: None,
                url: src.url.clone(),
            }
        }
    }
}

/// Ranked catalog of crawlable sources, capped at `limit`.
pub async fn catalog(store: &dyn SourceStore, limit: usize) -> Result<Vec<ExportRecord>> {
    let rows = store.exportable(limit).await?;
    Ok(rows.iter().map(ExportRecord::from_source).collect())
}

/// Write the ranked catalog to `dest` as YAML; returns the exported count.
pub async fn write_catalog(
    store: &dyn SourceStore,
    dest: &Path,
    limit: usize,
) -> Result<usize> {
    let records = catalog(store, limit).await?;
    let yaml = serde_yaml::to_string(&records).context("serializing export catalog")?;
    std::fs::write(dest, yaml)
        .with_context(|| format!("writing export catalog to {}", dest.display()))?;
    tracing::info!(
        count = records.len(),
        path = %dest.display(),
        "exported source catalog"
    );
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceStatus;

    #[test]
    fn token_vendor_projects_token_and_no_url() {
        let mut src = Source::new(AtsVendor::GreenhouseApi)
            .with_token("acme")
            .with_company("Acme");
        src.status = SourceStatus::Valid;
        let rec = ExportRecord::from_source(&src);
        assert_eq!(rec.board_token.as_deref(), Some("acme"));
        assert!(rec.url.is_none());
        assert_eq!(rec.company, "Acme");
    }

    #[test]
    fn url_vendor_projects_url_and_unknown_company() {
        let mut src = Source::new(AtsVendor::Lever)
            .with_token("acme")
            .with_url("https://jobs.lever.co/acme");
        src.status = SourceStatus::Valid;
        let rec = ExportRecord::from_source(&src);
        assert!(rec.board_token.is_none());
        assert_eq!(rec.url.as_deref(), Some("https://jobs.lever.co/acme"));
        assert_eq!(rec.company, "Unknown");
    }

    #[test]
    fn yaml_omits_absent_fields() {
        let rec = ExportRecord {
            vendor: AtsVendor::GreenhouseApi,
            company: "Acme".into(),
            board_token: Some("acme".into()),
            url: None,
        };
        let yaml = serde_yaml::to_string(&vec![rec]).unwrap();
        assert!(yaml.contains("type: greenhouse_api"));
        assert!(yaml.contains("board_token: acme"));
        assert!(!yaml.contains("url:"));
    }
}
