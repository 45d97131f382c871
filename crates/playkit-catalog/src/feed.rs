//! Catalog feed document.
//!
//! The external catalog system publishes parts as a versioned JSON
//! document fetched once per session. Only `published` entries survive
//! into the repository.

use anyhow::{Context, Result};
use playkit_core::CatalogError;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::CatalogPart;

/// Feed format version this engine reads.
pub const FEED_FORMAT_VERSION: &str = "1.0";

/// The published catalog as delivered by the catalog system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFeed {
    pub version: String,
    #[serde(default)]
    pub parts: Vec<CatalogPart>,
}

impl CatalogFeed {
    /// Create an empty feed at the current format version.
    pub fn new() -> Self {
        Self {
            version: FEED_FORMAT_VERSION.to_string(),
            parts: Vec::new(),
        }
    }

    /// Parse a feed from its JSON form.
    pub fn from_json(json: &str) -> std::result::Result<Self, CatalogError> {
        let feed: CatalogFeed =
            serde_json::from_str(json).map_err(|err| CatalogError::InvalidFeed {
                reason: err.to_string(),
            })?;
        if feed.version != FEED_FORMAT_VERSION {
            return Err(CatalogError::UnsupportedFeedVersion {
                version: feed.version,
            });
        }
        Ok(feed)
    }

    /// Serialize the feed to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize catalog feed")
    }

    /// Load a feed from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read catalog feed file")?;
        Ok(Self::from_json(&content)?)
    }
}

impl Default for CatalogFeed {
    fn default() -> Self {
        Self::new()
    }
}
