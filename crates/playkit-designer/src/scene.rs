//! Read-only projection of a design for rendering.
//!
//! A frontend draws from a flat list of resolved instances rather than
//! walking the design and catalog itself. Everything here is derived on
//! demand and carries no state.

use crate::design::{Design, InstanceId};
use crate::validation::ValidationResult;
use playkit_catalog::CatalogRepository;
use playkit_core::{Dimensions, Position, Rotation};
use std::collections::HashSet;

/// One renderable instance: placement plus the part's resolved size in
/// feet.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneInstance {
    pub instance_id: InstanceId,
    pub part_id: String,
    pub position: Position,
    pub rotation: Rotation,
    pub dimensions: Dimensions,
}

/// Resolve every instance against the catalog, in placement order.
/// Instances whose part cannot be resolved are skipped; validation
/// reports them separately.
pub fn scene_instances(design: &Design, catalog: &CatalogRepository) -> Vec<SceneInstance> {
    design
        .instances()
        .iter()
        .filter_map(|instance| {
            let part = match catalog.get(&instance.part_id) {
                Ok(part) => part,
                Err(_) => {
                    tracing::warn!(part_id = %instance.part_id, "Skipping unresolved instance in scene");
                    return None;
                }
            };
            Some(SceneInstance {
                instance_id: instance.id,
                part_id: instance.part_id.clone(),
                position: instance.position,
                rotation: instance.rotation,
                dimensions: part.dimensions_ft(),
            })
        })
        .collect()
}

/// Instance ids that should be highlighted as problematic: every
/// instance referenced by a blocking validation error.
pub fn highlighted_instance_ids(validation: &ValidationResult) -> HashSet<InstanceId> {
    validation
        .errors
        .iter()
        .flat_map(|issue| issue.instance_ids.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::PlacedInstance;
    use crate::validation::{Severity, ValidationIssue};
    use playkit_catalog::CatalogPart;
    use playkit_core::Unit;

    fn panel(id: &str, width_m: f64) -> CatalogPart {
        CatalogPart {
            id: id.to_string(),
            name: id.to_string(),
            category: "panels".to_string(),
            dimensions: Dimensions {
                width: width_m,
                depth: 0.1,
                height: 1.0,
            },
            unit: Unit::Meters,
            ..CatalogPart::default()
        }
    }

    #[test]
    fn instances_resolve_in_placement_order() {
        let catalog = CatalogRepository::from_parts(vec![panel("a", 1.0), panel("b", 2.0)]);
        let mut design = Design::new("Scene");
        for part in ["b", "a", "b"] {
            let id = design.generate_id();
            design.push_instance(PlacedInstance::new(
                id,
                part,
                Position::default(),
                Rotation::default(),
            ));
        }

        let scene = scene_instances(&design, &catalog);
        let order: Vec<&str> = scene.iter().map(|s| s.part_id.as_str()).collect();
        assert_eq!(order, ["b", "a", "b"]);
        // Meter-published dimensions come back in feet.
        assert!((scene[1].dimensions.width - 3.28084).abs() < 1e-9);
    }

    #[test]
    fn unresolved_instances_are_skipped() {
        let catalog = CatalogRepository::from_parts(vec![panel("a", 1.0)]);
        let mut design = Design::new("Scene");
        for part in ["a", "ghost"] {
            let id = design.generate_id();
            design.push_instance(PlacedInstance::new(
                id,
                part,
                Position::default(),
                Rotation::default(),
            ));
        }

        let scene = scene_instances(&design, &catalog);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene[0].part_id, "a");
    }

    #[test]
    fn highlights_collect_error_instances_only() {
        let validation = ValidationResult {
            errors: vec![ValidationIssue {
                id: "spatial.overlap".to_string(),
                severity: Severity::Error,
                message: "overlap".to_string(),
                instance_ids: vec![1, 2],
            }],
            warnings: vec![ValidationIssue {
                id: "rule.min_clearance".to_string(),
                severity: Severity::Warning,
                message: "clearance".to_string(),
                instance_ids: vec![3],
            }],
        };

        let highlighted = highlighted_instance_ids(&validation);
        assert_eq!(highlighted, HashSet::from([1, 2]));
    }
}
