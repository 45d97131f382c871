//! Constraint/validation engine.
//!
//! A pure, deterministic function of (design, catalog): identical inputs
//! always produce an identical result, so the same pass can be re-run
//! server-side on a client-submitted design. Outcomes are data, never
//! errors: blocking issues go in `errors`, informational ones in
//! `warnings`.

use crate::design::{Design, InstanceId, PlacedInstance};
use playkit_catalog::{CatalogPart, CatalogRepository, CompatibilityRule};
use playkit_core::{BoundingBox, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Issue severity. Errors block quote submission; warnings do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One violated rule, with the placed instances it implicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Stable machine-readable id, e.g. `connection.mismatch`.
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub instance_ids: Vec<InstanceId>,
}

impl ValidationIssue {
    fn error(id: &str, message: String, instance_ids: Vec<InstanceId>) -> Self {
        Self {
            id: id.to_string(),
            severity: Severity::Error,
            message,
            instance_ids,
        }
    }

    fn warning(id: &str, message: String, instance_ids: Vec<InstanceId>) -> Self {
        Self {
            id: id.to_string(),
            severity: Severity::Warning,
            message,
            instance_ids,
        }
    }
}

/// Outcome of one validation pass over a design snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// A design is submittable only when it has no blocking errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }
}

/// Safety limits implied by ground-anchor and structural metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyLimits {
    /// Maximum total estimated weight in kilograms.
    pub max_total_weight_kg: f64,
    /// Maximum total child capacity.
    pub max_total_capacity: u32,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_total_weight_kg: 2500.0,
            max_total_capacity: 50,
        }
    }
}

/// Validation engine configuration: geometric tolerances plus safety
/// limits. The engine holds no mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationEngine {
    /// Two connection points within this distance are treated as mated.
    pub connection_tolerance_ft: f64,
    /// Penetration below this depth does not count as an overlap.
    pub overlap_tolerance_ft: f64,
    /// Vertical slack when checking ground contact / stacking support.
    pub support_tolerance_ft: f64,
    pub limits: SafetyLimits,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self {
            connection_tolerance_ft: 0.5,
            overlap_tolerance_ft: 0.25,
            support_tolerance_ft: 0.25,
            limits: SafetyLimits::default(),
        }
    }
}

/// A placed instance with its catalog part resolved, as used by one pass.
struct Resolved<'a> {
    instance: &'a PlacedInstance,
    part: &'a CatalogPart,
    bounds: BoundingBox,
}

impl Resolved<'_> {
    /// World position of a connection point, yaw-rotated about the
    /// instance origin.
    fn point_position(&self, offset: &Position) -> Position {
        let (rx, ry) = self.instance.rotation.apply_yaw(offset.x, offset.y);
        self.instance.position.translated(rx, ry, offset.z)
    }
}

impl ValidationEngine {
    pub fn new(limits: SafetyLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    /// Run a full validation pass over the design snapshot.
    pub fn validate(&self, design: &Design, catalog: &CatalogRepository) -> ValidationResult {
        let mut result = ValidationResult::default();

        if design.is_empty() {
            result.push(ValidationIssue::error(
                "design.empty",
                "A design must contain at least one part before it can be submitted".to_string(),
                Vec::new(),
            ));
            return result;
        }

        // Resolve every instance once; unresolved references are reported
        // and excluded from the geometric checks.
        let mut resolved: Vec<Resolved> = Vec::with_capacity(design.instances().len());
        for instance in design.instances() {
            match catalog.get(&instance.part_id) {
                Ok(part) => resolved.push(Resolved {
                    instance,
                    part,
                    bounds: BoundingBox::from_instance(
                        &instance.position,
                        &instance.rotation,
                        &part.dimensions_ft(),
                    ),
                }),
                Err(err) => result.push(ValidationIssue::error(
                    "catalog.unresolved",
                    format!("Part '{}' cannot be resolved: {}", instance.part_id, err),
                    vec![instance.id],
                )),
            }
        }

        self.check_connections(&resolved, &mut result);
        self.check_spatial(&resolved, &mut result);
        self.check_aggregates(design, &mut result);
        self.check_rules(&resolved, &mut result);

        tracing::debug!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Validation pass complete"
        );
        result
    }

    /// Check 2: attachment kinds of touching connection points must be
    /// mutually compatible.
    fn check_connections(&self, resolved: &[Resolved], result: &mut ValidationResult) {
        for (i, a) in resolved.iter().enumerate() {
            for b in &resolved[i + 1..] {
                for cp_a in &a.part.connection_points {
                    let pos_a = a.point_position(&a.part.offset_ft(cp_a));
                    for cp_b in &b.part.connection_points {
                        let pos_b = b.point_position(&b.part.offset_ft(cp_b));
                        if pos_a.distance_to(&pos_b) > self.connection_tolerance_ft {
                            continue;
                        }
                        let mated = cp_a.accepts(cp_b.kind) && cp_b.accepts(cp_a.kind);
                        if !mated {
                            result.push(ValidationIssue::error(
                                "connection.mismatch",
                                format!(
                                    "'{}' ({}) cannot attach to '{}' ({})",
                                    a.part.name, cp_a.kind, b.part.name, cp_b.kind
                                ),
                                vec![a.instance.id, b.instance.id],
                            ));
                        }
                    }
                }
            }
        }
    }

    /// Check 3: no deep overlap unless stackable, and ground support.
    fn check_spatial(&self, resolved: &[Resolved], result: &mut ValidationResult) {
        for (i, a) in resolved.iter().enumerate() {
            for b in &resolved[i + 1..] {
                let stackable = a.part.metadata.stackable || b.part.metadata.stackable;
                if stackable {
                    continue;
                }
                if let Some(overlap) = a.bounds.overlap(&b.bounds) {
                    let penetration = overlap.width.min(overlap.depth).min(overlap.height);
                    if penetration > self.overlap_tolerance_ft {
                        result.push(ValidationIssue::error(
                            "spatial.overlap",
                            format!("'{}' overlaps '{}'", a.part.name, b.part.name),
                            vec![a.instance.id, b.instance.id],
                        ));
                    }
                }
            }
        }

        for a in resolved {
            if !a.part.metadata.requires_ground_support {
                continue;
            }
            if a.bounds.min.z.abs() <= self.support_tolerance_ft {
                continue;
            }
            let supported = resolved.iter().any(|b| {
                b.instance.id != a.instance.id
                    && b.part.metadata.stackable
                    && (b.bounds.max.z - a.bounds.min.z).abs() <= self.support_tolerance_ft
                    && a.bounds.footprint_overlaps(&b.bounds)
            });
            if !supported {
                result.push(ValidationIssue::error(
                    "support.missing",
                    format!(
                        "'{}' must sit at ground level or on a supporting part",
                        a.part.name
                    ),
                    vec![a.instance.id],
                ));
            }
        }
    }

    /// Check 4: aggregate weight and capacity against the safety limits.
    fn check_aggregates(&self, design: &Design, result: &mut ValidationResult) {
        let meta = design.metadata();
        if meta.estimated_weight_kg > self.limits.max_total_weight_kg {
            result.push(ValidationIssue::error(
                "capacity.weight",
                format!(
                    "Total weight {:.0} kg exceeds the {:.0} kg limit",
                    meta.estimated_weight_kg, self.limits.max_total_weight_kg
                ),
                Vec::new(),
            ));
        }
        if meta.capacity > self.limits.max_total_capacity {
            result.push(ValidationIssue::error(
                "capacity.occupancy",
                format!(
                    "Total capacity {} exceeds the {} child limit",
                    meta.capacity, self.limits.max_total_capacity
                ),
                Vec::new(),
            ));
        }
    }

    /// Check 5: declarative compatibility rules, evaluated exhaustively
    /// over the closed rule set.
    fn check_rules(&self, resolved: &[Resolved], result: &mut ValidationResult) {
        // Max-count violations are reported once per (part, category).
        let mut reported_max_counts: HashSet<(String, String)> = HashSet::new();

        for a in resolved {
            for rule in &a.part.rules {
                match rule {
                    CompatibilityRule::Requires { attachment } => {
                        let satisfied = resolved.iter().any(|b| {
                            b.instance.id != a.instance.id
                                && b.part
                                    .connection_points
                                    .iter()
                                    .any(|cp| cp.kind == *attachment)
                        });
                        if !satisfied {
                            result.push(ValidationIssue::error(
                                "rule.requires",
                                format!("'{}' requires a {} in the design", a.part.name, attachment),
                                vec![a.instance.id],
                            ));
                        }
                    }
                    CompatibilityRule::Excludes { category } => {
                        for b in resolved {
                            if b.instance.id != a.instance.id && &b.part.category == category {
                                result.push(ValidationIssue::error(
                                    "rule.excludes",
                                    format!(
                                        "'{}' cannot be combined with {} parts",
                                        a.part.name, category
                                    ),
                                    vec![a.instance.id, b.instance.id],
                                ));
                            }
                        }
                    }
                    CompatibilityRule::MaxCount { category, max } => {
                        let key = (a.part.id.clone(), category.clone());
                        if reported_max_counts.contains(&key) {
                            continue;
                        }
                        let implicated: Vec<InstanceId> = resolved
                            .iter()
                            .filter(|b| &b.part.category == category)
                            .map(|b| b.instance.id)
                            .collect();
                        if implicated.len() > *max {
                            reported_max_counts.insert(key);
                            result.push(ValidationIssue::error(
                                "rule.max_count",
                                format!(
                                    "At most {} {} part(s) allowed, found {}",
                                    max,
                                    category,
                                    implicated.len()
                                ),
                                implicated,
                            ));
                        }
                    }
                    CompatibilityRule::MinClearance { distance } => {
                        for b in resolved {
                            if b.instance.id == a.instance.id {
                                continue;
                            }
                            let gap = a
                                .instance
                                .position
                                .horizontal_distance_to(&b.instance.position);
                            if gap < *distance {
                                result.push(ValidationIssue::warning(
                                    "rule.min_clearance",
                                    format!(
                                        "'{}' should keep {:.1} ft clearance, '{}' is {:.1} ft away",
                                        a.part.name, distance, b.part.name, gap
                                    ),
                                    vec![a.instance.id, b.instance.id],
                                ));
                            }
                        }
                    }
                }
            }
        }
    }
}
