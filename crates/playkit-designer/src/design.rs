//! Design model: placed part instances and derived metadata.
//!
//! A design holds an ordered list of placed instances (order matters for
//! stacking and visual layering and is preserved across undo/redo) plus
//! metadata derived from the catalog. Instances reference catalog parts
//! by id only; user customizations are explicit override keys, never
//! cached catalog fields.

use playkit_catalog::{AgeRange, CatalogRepository};
use playkit_core::{BoundingBox, Dimensions, Position, Rotation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a placed instance, unique within one design.
pub type InstanceId = u64;

/// One occurrence of a catalog part positioned within a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedInstance {
    pub id: InstanceId,
    pub part_id: String,
    pub position: Position,
    pub rotation: Rotation,
    /// User override fields (color, label). Keys are sorted for
    /// deterministic serialization.
    #[serde(default)]
    pub customizations: BTreeMap<String, String>,
}

impl PlacedInstance {
    pub fn new(id: InstanceId, part_id: impl Into<String>, position: Position, rotation: Rotation) -> Self {
        Self {
            id,
            part_id: part_id.into(),
            position,
            rotation: rotation.normalized(),
            customizations: BTreeMap::new(),
        }
    }
}

/// Metadata derived from the instance list and resolved catalog data.
///
/// Recomputed synchronously after every mutation; never observable stale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedMetadata {
    /// Sum of unit prices over all instances.
    pub total_price: f64,
    /// Union of the transformed extents of all instances, in feet.
    pub bounding: Dimensions,
    /// Sum of part weights, in kilograms.
    pub estimated_weight_kg: f64,
    /// Envelope of the parts' recommended age ranges.
    pub age_range: Option<AgeRange>,
    /// Sum of the parts' capacity contributions.
    pub capacity: u32,
    pub instance_count: usize,
}

/// The complete ordered set of placed instances for one structure.
#[derive(Debug, Clone)]
pub struct Design {
    /// Absent until the first successful save.
    pub id: Option<String>,
    pub name: String,
    instances: Vec<PlacedInstance>,
    metadata: DerivedMetadata,
    next_instance_id: InstanceId,
}

/// Equality is over the design's observable state. `next_instance_id`
/// is generator bookkeeping, not snapshot state: an add followed by its
/// exact inverse leaves the counter advanced but the design unchanged.
impl PartialEq for Design {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.instances == other.instances
            && self.metadata == other.metadata
    }
}

impl Design {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            instances: Vec::new(),
            metadata: DerivedMetadata::default(),
            next_instance_id: 1,
        }
    }

    /// Rebuild a design from persisted state. The caller recomputes
    /// metadata against its catalog afterwards.
    pub fn from_parts(id: Option<String>, name: String, instances: Vec<PlacedInstance>) -> Self {
        let next_instance_id = instances.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        Self {
            id,
            name,
            instances,
            metadata: DerivedMetadata::default(),
            next_instance_id,
        }
    }

    /// Hand out the next instance id.
    pub fn generate_id(&mut self) -> InstanceId {
        let id = self.next_instance_id;
        self.next_instance_id += 1;
        id
    }

    /// Ordered placed instances.
    pub fn instances(&self) -> &[PlacedInstance] {
        &self.instances
    }

    pub fn instance(&self, id: InstanceId) -> Option<&PlacedInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut PlacedInstance> {
        self.instances.iter_mut().find(|i| i.id == id)
    }

    pub fn contains_instance(&self, id: InstanceId) -> bool {
        self.instance(id).is_some()
    }

    /// Append an instance (used by command application).
    pub fn push_instance(&mut self, instance: PlacedInstance) {
        self.instances.push(instance);
    }

    /// Re-insert an instance at its original position in the ordering.
    pub fn insert_instance(&mut self, index: usize, instance: PlacedInstance) {
        let index = index.min(self.instances.len());
        self.instances.insert(index, instance);
    }

    /// Remove an instance, returning it together with its list index so
    /// undo can restore the ordering exactly.
    pub fn remove_instance(&mut self, id: InstanceId) -> Option<(usize, PlacedInstance)> {
        let index = self.instances.iter().position(|i| i.id == id)?;
        Some((index, self.instances.remove(index)))
    }

    pub fn metadata(&self) -> &DerivedMetadata {
        &self.metadata
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// World-space extent of one instance, resolved against the catalog.
    pub fn instance_bounds(
        instance: &PlacedInstance,
        catalog: &CatalogRepository,
    ) -> Option<BoundingBox> {
        let part = catalog.get(&instance.part_id).ok()?;
        Some(BoundingBox::from_instance(
            &instance.position,
            &instance.rotation,
            &part.dimensions_ft(),
        ))
    }

    /// Recompute derived metadata as a pure fold over the current
    /// instances and their resolved catalog data.
    ///
    /// Instances whose part id no longer resolves contribute nothing
    /// here; the validation engine reports them.
    pub fn recompute_metadata(&mut self, catalog: &CatalogRepository) {
        let mut meta = DerivedMetadata {
            instance_count: self.instances.len(),
            ..Default::default()
        };
        let mut bounds: Option<BoundingBox> = None;

        for instance in &self.instances {
            let part = match catalog.get(&instance.part_id) {
                Ok(part) => part,
                Err(err) => {
                    tracing::warn!(
                        instance_id = instance.id,
                        part_id = %instance.part_id,
                        %err,
                        "Skipping unresolvable part in metadata fold"
                    );
                    continue;
                }
            };

            meta.total_price += part.unit_price;
            meta.estimated_weight_kg += part.weight_kg;
            meta.capacity += part.metadata.capacity;
            if let Some(range) = &part.metadata.age_range {
                meta.age_range = Some(match meta.age_range {
                    Some(acc) => acc.envelope(range),
                    None => *range,
                });
            }

            let bb = BoundingBox::from_instance(
                &instance.position,
                &instance.rotation,
                &part.dimensions_ft(),
            );
            bounds = Some(match bounds {
                Some(acc) => acc.union(&bb),
                None => bb,
            });
        }

        meta.bounding = bounds.map(|b| b.size()).unwrap_or_default();
        self.metadata = meta;
    }
}
