//! Per-domain behavior overrides.
//!
//! Two tables keyed by hostname live here instead of on the summarizer's
//! critical path:
//!
//! - header overrides, e.g. a search-engine `Referer` for sites that only
//!   serve full content to visitors arriving from search;
//! - the known-difficult-domain table, which turns an extraction failure on
//!   a listed host into an error carrying host-specific guidance.
//!
//! Rules can be loaded from JSON:
//!
//! ```json
//! {
//!   "headers": [{ "host": "example.com", "headers": { "Referer": "https://www.google.com/" } }],
//!   "difficult": [{ "host": "paywalled.example", "guidance": "Try the site's RSS feed." }]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{PrecisError, Result};

const SEARCH_REFERER: &str = "https://www.google.com/";

const REFERER_HOSTS: &[&str] = &["nytimes.com", "wsj.com", "ft.com", "bloomberg.com", "washingtonpost.com"];

/// Extra request headers sent to a host and its subdomains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderOverride {
    pub host: String,
    pub headers: BTreeMap<String, String>,
}

/// Host whose pages routinely defeat extraction, with guidance for the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultDomain {
    pub host: String,
    pub guidance: String,
}

/// Hostname-keyed override tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRules {
    #[serde(default)]
    pub headers: Vec<HeaderOverride>,
    #[serde(default)]
    pub difficult: Vec<DifficultDomain>,
}

impl Default for DomainRules {
    fn default() -> Self {
        let headers = REFERER_HOSTS
            .iter()
            .map(|host| HeaderOverride {
                host: host.to_string(),
                headers: BTreeMap::from([("Referer".to_string(), SEARCH_REFERER.to_string())]),
            })
            .collect();

        Self { headers, difficult: Vec::new() }
    }
}

impl DomainRules {
    /// Rules with no overrides at all.
    pub fn empty() -> Self {
        Self { headers: Vec::new(), difficult: Vec::new() }
    }

    /// Parses rules from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PrecisError::ConfigError(format!("invalid domain rules: {}", e)))
    }

    /// Reads rules from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PrecisError::FileNotFound(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Default rules file location, `<config_dir>/precis/domains.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("precis").join("domains.json"))
    }

    /// Built-in rules merged with the user's rules file, when one exists.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading domain rules");
                Ok(Self::from_file(&path)?.merge(Self::default()))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Combines two rule sets; entries in `self` take precedence over `other`.
    pub fn merge(mut self, other: DomainRules) -> Self {
        self.headers.extend(other.headers);
        self.difficult.extend(other.difficult);
        self
    }

    /// Headers to add for `host`, in rule order. Later duplicates do not override earlier ones.
    pub fn headers_for(&self, host: &str) -> Vec<(String, String)> {
        let mut seen = std::collections::HashSet::new();
        self.headers
            .iter()
            .filter(|rule| host_matches(host, &rule.host))
            .flat_map(|rule| rule.headers.iter())
            .filter(|(name, _)| seen.insert(name.to_ascii_lowercase()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Known-difficult entry for `host`, if listed.
    pub fn difficult_for(&self, host: &str) -> Option<&DifficultDomain> {
        self.difficult.iter().find(|rule| host_matches(host, &rule.host))
    }
}

/// `host` equals `rule_host` or is one of its subdomains.
fn host_matches(host: &str, rule_host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let rule_host = rule_host.trim_end_matches('.').to_ascii_lowercase();
    host == rule_host || host.ends_with(&format!(".{}", rule_host))
}
