//! Published-parts repository.
//!
//! Read-only index over the catalog feed, injected into the design
//! engine. Unpublished parts are dropped at construction but remembered
//! so lookups can distinguish "never existed" from "not published".

use playkit_core::CatalogError;
use std::collections::{HashMap, HashSet};

use crate::feed::CatalogFeed;
use crate::model::CatalogPart;

/// Read-only access to published catalog parts, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct CatalogRepository {
    parts: HashMap<String, CatalogPart>,
    unpublished: HashSet<String>,
}

impl CatalogRepository {
    /// Build a repository from a catalog feed, keeping only published parts.
    pub fn from_feed(feed: CatalogFeed) -> Self {
        let mut parts = HashMap::new();
        let mut unpublished = HashSet::new();
        for part in feed.parts {
            if part.published {
                parts.insert(part.id.clone(), part);
            } else {
                tracing::debug!(part_id = %part.id, "Skipping unpublished catalog part");
                unpublished.insert(part.id);
            }
        }
        Self { parts, unpublished }
    }

    /// Build a repository directly from parts (test and fixture use).
    pub fn from_parts(parts: Vec<CatalogPart>) -> Self {
        Self::from_feed(CatalogFeed {
            version: crate::feed::FEED_FORMAT_VERSION.to_string(),
            parts,
        })
    }

    /// Resolve a published part by id.
    pub fn get(&self, part_id: &str) -> Result<&CatalogPart, CatalogError> {
        if let Some(part) = self.parts.get(part_id) {
            return Ok(part);
        }
        if self.unpublished.contains(part_id) {
            Err(CatalogError::PartUnpublished {
                part_id: part_id.to_string(),
            })
        } else {
            Err(CatalogError::PartNotFound {
                part_id: part_id.to_string(),
            })
        }
    }

    /// Whether a published part with this id exists.
    pub fn contains(&self, part_id: &str) -> bool {
        self.parts.contains_key(part_id)
    }

    /// Iterate over all published parts in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogPart> {
        self.parts.values()
    }

    /// Number of published parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Distinct categories among published parts, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self
            .parts
            .values()
            .map(|p| p.category.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        cats.sort();
        cats
    }
}
