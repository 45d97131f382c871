//! Pricing engine.
//!
//! Pure functions over (design, catalog, location, options). The same
//! functions run on the editing client and at the quote boundary, so a
//! client-computed price can always be reproduced server-side from the
//! same design snapshot.
//!
//! All currency values are rounded to two decimal places at the edges.

use crate::design::Design;
use playkit_catalog::CatalogRepository;
use playkit_core::PricingError;
use serde::{Deserialize, Serialize};

/// Flat reference shipping rate applied to every order.
pub const BASE_SHIPPING_RATE: f64 = 150.0;
/// Distance rate for locations in the low-cost locality list.
pub const LOW_DISTANCE_RATE: f64 = 50.0;
/// Distance rate everywhere else.
pub const HIGH_DISTANCE_RATE: f64 = 150.0;
/// Linear shipping rate per kilogram of estimated weight.
pub const PER_KG_RATE: f64 = 0.5;

/// Base installation charge.
pub const INSTALL_BASE_RATE: f64 = 500.0;
/// Installation charge per placed part.
pub const INSTALL_PER_PART_RATE: f64 = 35.0;
/// Additive complexity increment per threshold crossed.
pub const COMPLEXITY_INCREMENT: f64 = 0.1;

/// Bounding-height thresholds (feet) that raise install complexity.
pub const HEIGHT_THRESHOLDS_FT: [f64; 2] = [8.0, 12.0];
/// Footprint-area thresholds (square feet).
pub const FOOTPRINT_THRESHOLDS_SQFT: [f64; 2] = [200.0, 400.0];
/// Instance-count thresholds.
pub const COUNT_THRESHOLDS: [usize; 2] = [15, 25];

/// Localities served by a nearby distribution center.
const LOW_COST_LOCALITIES: &[&str] = &[
    "springfield",
    "riverton",
    "cedar grove",
    "maplewood",
    "lakeside",
];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Delivery destination used for the shipping estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryLocation {
    pub city: String,
    pub region: String,
}

impl DeliveryLocation {
    pub fn new(city: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            region: region.into(),
        }
    }

    fn is_low_cost(&self) -> bool {
        let city = self.city.trim().to_lowercase();
        LOW_COST_LOCALITIES.contains(&city.as_str())
    }
}

/// One priced component line: quantity times unit price for one part id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    pub part_id: String,
    pub name: String,
    pub quantity: usize,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Per-part pricing grouped by catalog id, in first-placed order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentPricing {
    pub lines: Vec<PriceLine>,
    pub subtotal: f64,
}

/// Shipping estimate: base + distance + weight components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingEstimate {
    pub base: f64,
    pub distance: f64,
    pub weight: f64,
    pub total: f64,
}

/// Optional installation estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationEstimate {
    pub base: f64,
    pub per_part: f64,
    pub complexity_multiplier: f64,
    pub total: f64,
}

/// The full price breakdown for a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub components: ComponentPricing,
    pub shipping: ShippingEstimate,
    #[serde(default)]
    pub installation: Option<InstallationEstimate>,
    pub total: f64,
}

/// Group instances by catalog id, computing quantity x unit price per
/// group. Unresolvable part ids contribute nothing (the validation
/// engine reports them).
pub fn component_pricing(design: &Design, catalog: &CatalogRepository) -> ComponentPricing {
    let mut lines: Vec<PriceLine> = Vec::new();

    for instance in design.instances() {
        let part = match catalog.get(&instance.part_id) {
            Ok(part) => part,
            Err(err) => {
                tracing::warn!(part_id = %instance.part_id, %err, "Skipping unpriceable part");
                continue;
            }
        };
        if let Some(line) = lines.iter_mut().find(|l| l.part_id == part.id) {
            line.quantity += 1;
            line.line_total = round2(line.quantity as f64 * line.unit_price);
        } else {
            lines.push(PriceLine {
                part_id: part.id.clone(),
                name: part.name.clone(),
                quantity: 1,
                unit_price: part.unit_price,
                line_total: round2(part.unit_price),
            });
        }
    }

    let subtotal = round2(lines.iter().map(|l| l.line_total).sum());
    ComponentPricing { lines, subtotal }
}

/// Shipping = base rate + tiered distance rate + linear weight rate.
pub fn shipping_estimate(design: &Design, location: &DeliveryLocation) -> ShippingEstimate {
    let distance = if location.is_low_cost() {
        LOW_DISTANCE_RATE
    } else {
        HIGH_DISTANCE_RATE
    };
    let weight = round2(PER_KG_RATE * design.metadata().estimated_weight_kg);
    ShippingEstimate {
        base: BASE_SHIPPING_RATE,
        distance,
        weight,
        total: round2(BASE_SHIPPING_RATE + distance + weight),
    }
}

/// Complexity multiplier: starts at 1.0 and gains a fixed increment for
/// each height, footprint, or count threshold the design exceeds.
/// Rounded to two decimals before being applied.
pub fn complexity_multiplier(design: &Design) -> f64 {
    let meta = design.metadata();
    let mut multiplier = 1.0;

    for threshold in HEIGHT_THRESHOLDS_FT {
        if meta.bounding.height > threshold {
            multiplier += COMPLEXITY_INCREMENT;
        }
    }
    for threshold in FOOTPRINT_THRESHOLDS_SQFT {
        if meta.bounding.footprint_area() > threshold {
            multiplier += COMPLEXITY_INCREMENT;
        }
    }
    for threshold in COUNT_THRESHOLDS {
        if meta.instance_count > threshold {
            multiplier += COMPLEXITY_INCREMENT;
        }
    }

    round2(multiplier)
}

/// Installation = (base + per-part x count) x complexity multiplier.
pub fn installation_estimate(design: &Design) -> InstallationEstimate {
    let per_part = round2(INSTALL_PER_PART_RATE * design.metadata().instance_count as f64);
    let multiplier = complexity_multiplier(design);
    InstallationEstimate {
        base: INSTALL_BASE_RATE,
        per_part,
        complexity_multiplier: multiplier,
        total: round2((INSTALL_BASE_RATE + per_part) * multiplier),
    }
}

/// Compose the full breakdown: subtotal + shipping + optional install.
pub fn pricing_breakdown(
    design: &Design,
    catalog: &CatalogRepository,
    location: &DeliveryLocation,
    include_installation: bool,
) -> PricingBreakdown {
    let components = component_pricing(design, catalog);
    let shipping = shipping_estimate(design, location);
    let installation = include_installation.then(|| installation_estimate(design));

    let total = round2(
        components.subtotal
            + shipping.total
            + installation.as_ref().map(|i| i.total).unwrap_or(0.0),
    );

    PricingBreakdown {
        components,
        shipping,
        installation,
        total,
    }
}

/// Defensive sanity check over a computed breakdown.
///
/// A failure here is a pricing-engine bug, not a design problem; it is
/// logged as such and reported via [`PricingError`].
pub fn validate_pricing(breakdown: &PricingBreakdown) -> Result<(), PricingError> {
    let result = check_breakdown(breakdown);
    if let Err(err) = &result {
        tracing::error!(%err, "Pricing engine produced an inconsistent breakdown");
    }
    result
}

fn check_breakdown(breakdown: &PricingBreakdown) -> Result<(), PricingError> {
    if breakdown.components.lines.is_empty() {
        return Err(PricingError::EmptyComponents);
    }
    if breakdown.components.subtotal <= 0.0 {
        return Err(PricingError::NonPositiveSubtotal {
            subtotal: breakdown.components.subtotal,
        });
    }
    for (component, value) in [
        ("base", breakdown.shipping.base),
        ("distance", breakdown.shipping.distance),
        ("weight", breakdown.shipping.weight),
        ("total", breakdown.shipping.total),
    ] {
        if value < 0.0 {
            return Err(PricingError::NegativeShipping {
                component: component.to_string(),
                value,
            });
        }
    }
    let expected = round2(
        breakdown.components.subtotal
            + breakdown.shipping.total
            + breakdown
                .installation
                .as_ref()
                .map(|i| i.total)
                .unwrap_or(0.0),
    );
    if (breakdown.total - expected).abs() > 0.005 {
        return Err(PricingError::TotalMismatch {
            total: breakdown.total,
            expected,
        });
    }
    Ok(())
}
