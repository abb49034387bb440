//! On-disk cache of fetched version listings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::version::{ModuleKey, Version};

/// A cached listing for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedVersions {
    /// `group:module` the listing belongs to.
    pub module: String,
    /// When the listing was fetched.
    pub cached_at: DateTime<Utc>,
    /// Published versions, ascending.
    pub versions: Vec<Version>,
}

impl CachedVersions {
    pub fn new(key: &ModuleKey, versions: Vec<Version>) -> Self {
        Self {
            module: key.to_string(),
            cached_at: Utc::now(),
            versions,
        }
    }

    /// Time since the listing was fetched.
    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.cached_at)
    }

    /// Whether the listing is older than `ttl_secs`.
    pub fn is_stale(&self, ttl_secs: u64) -> bool {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX);
        self.age() >= ttl
    }
}

/// Directory of cached listings, one JSON file per module.
pub struct MetadataCache {
    root: PathBuf,
    ttl_secs: u64,
}

impl MetadataCache {
    pub fn new(root: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            root: root.into(),
            ttl_secs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// File holding the listing for `key`, named by the SHA-256 of the key.
    pub fn entry_path(&self, key: &ModuleKey) -> PathBuf {
        let hash = Sha256::digest(key.to_string().as_bytes());
        self.root.join(format!("{}.json", hex::encode(hash)))
    }

    /// Load the listing for `key`, fresh or not.
    pub fn load(&self, key: &ModuleKey) -> Result<Option<CachedVersions>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry {}", path.display()))?;
        let entry = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt cache entry {}", path.display()))?;
        Ok(Some(entry))
    }

    /// Load the listing for `key` only if it is within the TTL.
    pub fn load_fresh(&self, key: &ModuleKey) -> Result<Option<CachedVersions>> {
        Ok(self.load(key)?.filter(|entry| !entry.is_stale(self.ttl_secs)))
    }

    /// Store a listing, replacing any previous one.
    pub fn store(&self, key: &ModuleKey, versions: &[Version]) -> Result<CachedVersions> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create cache directory {}", self.root.display()))?;
        let entry = CachedVersions::new(key, versions.to_vec());
        let path = self.entry_path(key);
        fs::write(&path, serde_json::to_string_pretty(&entry)?)
            .with_context(|| format!("Failed to write cache entry {}", path.display()))?;
        Ok(entry)
    }

    /// Remove every cached listing.
    pub fn clear(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }
}
