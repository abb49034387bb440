//! Maven repository client.

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::{debug, warn};

use super::cache::MetadataCache;
use crate::version::{ModuleKey, Version};

/// Reads published versions from a Maven repository.
///
/// ```no_run
/// use muzzle::repository::MavenRepository;
/// use muzzle::version::ModuleKey;
///
/// let repo = MavenRepository::new("https://repo1.maven.org/maven2").unwrap();
/// let key = ModuleKey::parse("com.amazonaws:aws-lambda-java-core").unwrap();
/// let versions = repo.fetch_versions(&key).unwrap();
/// ```
pub struct MavenRepository {
    base_url: String,
    client: reqwest::blocking::Client,
    cache: Option<MetadataCache>,
}

impl MavenRepository {
    /// Create a client for the repository at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a client with a request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            cache: None,
        })
    }

    /// Keep fetched listings in `cache`.
    pub fn with_cache(mut self, cache: MetadataCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the metadata file for `key`.
    pub fn metadata_url(&self, key: &ModuleKey) -> String {
        format!(
            "{}/{}/maven-metadata.xml",
            self.base_url,
            key.repository_path()
        )
    }

    /// Published versions of `key`, ascending.
    ///
    /// A fresh cache entry is returned without a request. When the request
    /// fails and a stale entry exists, the stale entry is returned. An
    /// unreadable or unwritable cache only costs a request.
    pub fn fetch_versions(&self, key: &ModuleKey) -> Result<Vec<Version>> {
        let Some(cache) = &self.cache else {
            return self.fetch_remote(key);
        };

        match cache.load_fresh(key) {
            Ok(Some(entry)) => {
                debug!("Using cached versions for {}", key);
                return Ok(entry.versions);
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable cache entry for {}: {:#}", key, e),
        }

        match self.fetch_remote(key) {
            Ok(versions) => {
                if let Err(e) = cache.store(key, &versions) {
                    warn!("Failed to cache versions of {}: {:#}", key, e);
                }
                Ok(versions)
            }
            Err(e) => match cache.load(key).ok().flatten() {
                Some(stale) => {
                    warn!("Fetching versions of {} failed, using cached copy: {}", key, e);
                    Ok(stale.versions)
                }
                None => Err(e),
            },
        }
    }

    fn fetch_remote(&self, key: &ModuleKey) -> Result<Vec<Version>> {
        let url = self.metadata_url(key);
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {} fetching {}", response.status(), url));
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response from {}", url))?;
        Ok(parse_metadata(&body))
    }
}

/// Versions listed in a `maven-metadata.xml` document, ascending.
///
/// Entries that are not valid versions are skipped with a warning.
pub fn parse_metadata(xml: &str) -> Vec<Version> {
    let Ok(pattern) = Regex::new(r"<version>\s*([^<\s]+)\s*</version>") else {
        return Vec::new();
    };

    let mut versions = BTreeSet::new();
    for captures in pattern.captures_iter(xml) {
        let text = &captures[1];
        match Version::parse(text) {
            Ok(version) => {
                versions.insert(version);
            }
            Err(e) => warn!("Skipping unparsable version '{}': {}", text, e),
        }
    }
    versions.into_iter().collect()
}
