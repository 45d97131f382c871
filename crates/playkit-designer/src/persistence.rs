//! Design snapshots and the persistence adapter interface.
//!
//! The engine serializes a design into a versioned JSON document and
//! hands it to an external store through [`PersistenceAdapter`]; it
//! implements none of the storage itself. [`MemoryStore`] is a reference
//! adapter used by tests.

use crate::design::{Design, DerivedMetadata, InstanceId, PlacedInstance};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use playkit_core::{PersistenceError, Position, Rotation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use uuid::Uuid;

/// Design document format version.
pub const DESIGN_FORMAT_VERSION: &str = "1.0";

/// Suffix appended to the name of a duplicated design.
pub const DUPLICATE_NAME_SUFFIX: &str = " (Copy)";

/// One placed instance as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: InstanceId,
    pub part_id: String,
    pub position: Position,
    pub rotation: Rotation,
    #[serde(default)]
    pub customizations: BTreeMap<String, String>,
}

/// Complete serialized design state.
///
/// Derived metadata is stored for display in listings, but is always
/// recomputed against the live catalog after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    pub version: String,
    pub id: Option<String>,
    pub name: String,
    pub instances: Vec<InstanceRecord>,
    #[serde(default)]
    pub derived: DerivedMetadata,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl DesignSnapshot {
    /// Capture the current design state.
    pub fn from_design(design: &Design) -> Self {
        let now = Utc::now();
        Self {
            version: DESIGN_FORMAT_VERSION.to_string(),
            id: design.id.clone(),
            name: design.name.clone(),
            instances: design
                .instances()
                .iter()
                .map(|i| InstanceRecord {
                    id: i.id,
                    part_id: i.part_id.clone(),
                    position: i.position,
                    rotation: i.rotation,
                    customizations: i.customizations.clone(),
                })
                .collect(),
            derived: design.metadata().clone(),
            created: now,
            modified: now,
        }
    }

    /// Rebuild the design. The caller recomputes metadata against its
    /// catalog afterwards.
    pub fn into_design(self) -> Design {
        let instances = self
            .instances
            .into_iter()
            .map(|r| {
                let mut instance = PlacedInstance::new(r.id, r.part_id, r.position, r.rotation);
                instance.customizations = r.customizations;
                instance
            })
            .collect();
        Design::from_parts(self.id, self.name, instances)
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A stored design as shown in the user's design list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub id: String,
    pub name: String,
    pub instance_count: usize,
    pub total_price: f64,
    pub modified: DateTime<Utc>,
}

/// External storage interface for designs, scoped to an owning user by
/// the implementation.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Persist a snapshot, assigning an id if it has none. Returns the id.
    async fn save(&self, snapshot: &DesignSnapshot) -> Result<String, PersistenceError>;

    /// Load a stored snapshot by id.
    async fn load(&self, design_id: &str) -> Result<DesignSnapshot, PersistenceError>;

    /// Summaries of the owner's stored designs, most recent first.
    async fn list(&self, owner_id: &str) -> Result<Vec<DesignSummary>, PersistenceError>;

    /// Delete a stored design.
    async fn delete(&self, design_id: &str) -> Result<(), PersistenceError>;

    /// Clone a stored design under a new id with a "(Copy)" name suffix.
    async fn duplicate(&self, design_id: &str) -> Result<String, PersistenceError>;
}

#[derive(Debug, Clone)]
struct StoredDesign {
    owner_id: String,
    snapshot: DesignSnapshot,
}

/// In-memory adapter for tests and examples.
pub struct MemoryStore {
    owner_id: String,
    designs: RwLock<HashMap<String, StoredDesign>>,
    /// When set, every operation fails with this storage reason.
    failure: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            designs: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
        }
    }

    /// Make subsequent operations fail (for failure-path tests).
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.write() = Some(reason.into());
    }

    /// Clear an injected failure.
    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    fn check_failure(&self) -> Result<(), PersistenceError> {
        if let Some(reason) = self.failure.read().clone() {
            return Err(PersistenceError::Storage { reason });
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryStore {
    async fn save(&self, snapshot: &DesignSnapshot) -> Result<String, PersistenceError> {
        self.check_failure()?;
        let id = snapshot
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut stored = snapshot.clone();
        stored.id = Some(id.clone());
        stored.modified = Utc::now();
        self.designs.write().insert(
            id.clone(),
            StoredDesign {
                owner_id: self.owner_id.clone(),
                snapshot: stored,
            },
        );
        Ok(id)
    }

    async fn load(&self, design_id: &str) -> Result<DesignSnapshot, PersistenceError> {
        self.check_failure()?;
        self.designs
            .read()
            .get(design_id)
            .map(|d| d.snapshot.clone())
            .ok_or_else(|| PersistenceError::NotFound {
                design_id: design_id.to_string(),
            })
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<DesignSummary>, PersistenceError> {
        self.check_failure()?;
        let mut summaries: Vec<DesignSummary> = self
            .designs
            .read()
            .values()
            .filter(|d| d.owner_id == owner_id)
            .map(|d| DesignSummary {
                id: d.snapshot.id.clone().unwrap_or_default(),
                name: d.snapshot.name.clone(),
                instance_count: d.snapshot.instances.len(),
                total_price: d.snapshot.derived.total_price,
                modified: d.snapshot.modified,
            })
            .collect();
        summaries.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(summaries)
    }

    async fn delete(&self, design_id: &str) -> Result<(), PersistenceError> {
        self.check_failure()?;
        self.designs
            .write()
            .remove(design_id)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::NotFound {
                design_id: design_id.to_string(),
            })
    }

    async fn duplicate(&self, design_id: &str) -> Result<String, PersistenceError> {
        self.check_failure()?;
        let mut copy = self.load(design_id).await?;
        let new_id = Uuid::new_v4().to_string();
        copy.id = Some(new_id.clone());
        copy.name.push_str(DUPLICATE_NAME_SUFFIX);
        copy.modified = Utc::now();
        self.designs.write().insert(
            new_id.clone(),
            StoredDesign {
                owner_id: self.owner_id.clone(),
                snapshot: copy,
            },
        );
        Ok(new_id)
    }
}
