//! Sites blocked while a study phase runs

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

/// Written to a missing blocklist file and used when none is configured
pub const DEFAULT_BLOCKED_DOMAINS: &[&str] = &[
    "instagram.com",
    "youtube.com",
    "facebook.com",
    "whatsapp.com",
    "tiktok.com",
];

/// Used when an existing blocklist file cannot be read
const FALLBACK_BLOCKED_DOMAINS: &[&str] = &["instagram.com", "youtube.com"];

/// Normalised list of blocked domains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocklist {
    domains: Vec<String>,
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::from_domains(DEFAULT_BLOCKED_DOMAINS.iter().copied())
    }
}

impl Blocklist {
    /// Build a list, dropping blanks and lowercasing entries
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| strip_www(&d.as_ref().trim().to_lowercase()).to_string())
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }

    /// Load a JSON array of domains from `path`.
    ///
    /// A missing file is created with the default domains. An unreadable or
    /// malformed file falls back to a short built-in list.
    pub fn load_or_create(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match Self::parse(&text) {
                Ok(list) => {
                    info!("Loaded {} blocked domains from {}", list.domains.len(), path.display());
                    list
                }
                Err(e) => {
                    error!("Error parsing blocklist {}: {}", path.display(), e);
                    Self::from_domains(FALLBACK_BLOCKED_DOMAINS.iter().copied())
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let list = Self::default();
                match serde_json::to_string_pretty(&list.domains) {
                    Ok(json) => {
                        if let Err(e) = fs::write(path, json) {
                            warn!("Failed to write default blocklist {}: {}", path.display(), e);
                        } else {
                            info!("Created default blocklist at {}", path.display());
                        }
                    }
                    Err(e) => warn!("Failed to serialise default blocklist: {}", e),
                }
                list
            }
            Err(e) => {
                error!("Error loading blocklist {}: {}", path.display(), e);
                Self::from_domains(FALLBACK_BLOCKED_DOMAINS.iter().copied())
            }
        }
    }

    /// Parse a JSON array, keeping only string entries
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<Value> = serde_json::from_str(text)?;
        Ok(Self::from_domains(
            entries.iter().filter_map(Value::as_str),
        ))
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// Whether the host of `url` is a listed domain or one of its subdomains
    pub fn matches(&self, url: &str) -> bool {
        let Some(host) = host_of(url) else {
            return false;
        };
        self.domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Lowercased host of a URL with any `www.` prefix removed.
/// A URL without a scheme is read as `https://`.
fn host_of(url: &str) -> Option<String> {
    let url = url.trim();
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = host_port.split(':').next().unwrap_or_default().to_lowercase();

    let host = strip_www(host.trim_end_matches('.')).to_string();
    (!host.is_empty()).then_some(host)
}
