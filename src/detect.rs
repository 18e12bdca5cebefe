//! # ATS Classifier
//!
//! Pure URL → vendor classification. Rules run in a fixed order and the first
//! match wins; a URL not matching any vendor signature returns `None`, which
//! is the expected majority case for raw search hits (not a failure).
//!
//! Each rule extracts a structured token where the vendor assigns one (board
//! slug, tenant subdomain). Where no stable token exists, the full URL stands
//! in as the token surrogate. Adding a vendor means adding one detector and
//! registering it at the end of `DETECTORS`; existing rules never change.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::source::AtsVendor;

/// Outcome of classifying a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub vendor: AtsVendor,
    /// Vendor token, or the raw URL where the vendor has no structured token.
    pub token: String,
}

/// Try all detectors in registration order; first match wins.
pub fn classify(url: &str) -> Option<Detection> {
    const DETECTORS: [fn(&str) -> Option<Detection>; 6] = [
        detect_greenhouse,
        detect_lever,
        detect_workday,
        detect_ashby,
        detect_smartrecruiters,
        detect_successfactors,
    ];
    DETECTORS.iter().find_map(|detect| detect(url))
}

fn detect_greenhouse(url: &str) -> Option<Detection> {
    // Prefer the API token (stable & structured) over the embed widget.
    static RE_API: OnceCell<Regex> = OnceCell::new();
    let re_api = RE_API.get_or_init(|| {
        Regex::new(r"boards-api\.greenhouse\.io/v1/boards/([^/]+)/jobs").unwrap()
    });
    if let Some(caps) = re_api.captures(url) {
        return Some(Detection {
            vendor: AtsVendor::GreenhouseApi,
            token: caps[1].to_string(),
        });
    }

    static RE_EMBED: OnceCell<Regex> = OnceCell::new();
    let re_embed = RE_EMBED.get_or_init(|| {
        Regex::new(r"boards\.greenhouse\.io/embed/job_board\?for=([A-Za-z0-9\-_]+)").unwrap()
    });
    if re_embed.is_match(url) {
        return Some(Detection {
            vendor: AtsVendor::GreenhouseEmbed,
            token: url.to_string(),
        });
    }
    None
}

fn detect_lever(url: &str) -> Option<Detection> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"jobs\.lever\.co/([A-Za-z0-9\-_]+)").unwrap());
    re.captures(url).map(|caps| Detection {
        vendor: AtsVendor::Lever,
        token: caps[1].to_string(),
    })
}

fn detect_workday(url: &str) -> Option<Detection> {
    // Workday tenants are subdomains on myworkdayjobs.com.
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"([A-Za-z0-9\-_]+)\.myworkdayjobs\.com").unwrap());
    re.captures(url).map(|caps| Detection {
        vendor: AtsVendor::Workday,
        token: caps[1].to_string(),
    })
}

fn detect_ashby(url: &str) -> Option<Detection> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"jobs\.ashbyhq\.com/([A-Za-z0-9\-_]+)").unwrap());
    re.captures(url).map(|caps| Detection {
        vendor: AtsVendor::Ashby,
        token: caps[1].to_string(),
    })
}

fn detect_smartrecruiters(url: &str) -> Option<Detection> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re =
        RE.get_or_init(|| Regex::new(r"careers\.smartrecruiters\.com/([A-Za-z0-9\-_]+)").unwrap());
    re.captures(url).map(|caps| Detection {
        vendor: AtsVendor::Smartrecruiters,
        token: caps[1].to_string(),
    })
}

fn detect_successfactors(url: &str) -> Option<Detection> {
    // SuccessFactors URLs vary too widely for a token; keep the raw URL.
    if url.contains("successfactors.com") {
        return Some(Detection {
            vendor: AtsVendor::Successfactors,
            token: url.to_string(),
        });
    }
    None
}
