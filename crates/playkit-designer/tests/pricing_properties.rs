//! Property-based tests for the pricing engine.

mod common;

use proptest::prelude::*;

use playkit_core::{Position, Rotation};
use playkit_designer::pricing::{
    self, DeliveryLocation, BASE_SHIPPING_RATE, HIGH_DISTANCE_RATE, LOW_DISTANCE_RATE,
    PER_KG_RATE,
};
use playkit_designer::{Design, PlacedInstance};

const FIXTURE_PARTS: [&str; 3] = ["deck-4x4", "swing-single", "beam-10"];

/// Arbitrary placement of fixture parts on a spread-out grid.
fn arb_design() -> impl Strategy<Value = Design> {
    proptest::collection::vec((0usize..3, -20i32..20, -20i32..20, 0u16..360), 1..24).prop_map(
        |placements| {
            let mut design = Design::new("Generated");
            for (part, gx, gy, yaw) in placements {
                let id = design.generate_id();
                design.push_instance(PlacedInstance::new(
                    id,
                    FIXTURE_PARTS[part],
                    Position::new(gx as f64 * 15.0, gy as f64 * 15.0, 0.0),
                    Rotation::yaw(yaw as f64),
                ));
            }
            design
        },
    )
}

fn arb_location() -> impl Strategy<Value = DeliveryLocation> {
    prop_oneof![
        Just(DeliveryLocation::new("Springfield", "IL")),
        Just(DeliveryLocation::new("Riverton", "UT")),
        Just(DeliveryLocation::new("Metropolis", "NY")),
        Just(DeliveryLocation::new("Gotham", "NJ")),
    ]
}

proptest! {
    /// The same inputs always produce the identical breakdown.
    #[test]
    fn pricing_is_deterministic(design in arb_design(), location in arb_location()) {
        let catalog = common::catalog();
        let mut design = design;
        design.recompute_metadata(&catalog);

        let first = pricing::pricing_breakdown(&design, &catalog, &location, true);
        let second = pricing::pricing_breakdown(&design, &catalog, &location, true);
        prop_assert_eq!(first, second);
    }

    /// Distance rate is a two-tier function of the locality list, and
    /// the weight rate is linear in estimated weight.
    #[test]
    fn shipping_follows_locality_tier(design in arb_design(), location in arb_location()) {
        let catalog = common::catalog();
        let mut design = design;
        design.recompute_metadata(&catalog);

        let estimate = pricing::shipping_estimate(&design, &location);
        let low = ["springfield", "riverton"].contains(&location.city.to_lowercase().as_str());
        let expected_distance = if low { LOW_DISTANCE_RATE } else { HIGH_DISTANCE_RATE };
        prop_assert_eq!(estimate.base, BASE_SHIPPING_RATE);
        prop_assert_eq!(estimate.distance, expected_distance);

        let expected_weight =
            (PER_KG_RATE * design.metadata().estimated_weight_kg * 100.0).round() / 100.0;
        prop_assert!((estimate.weight - expected_weight).abs() < 1e-9);
        let expected_total = ((estimate.base + estimate.distance + estimate.weight) * 100.0)
            .round() / 100.0;
        prop_assert!((estimate.total - expected_total).abs() < 1e-9);
    }

    /// Component lines group by part id and sum to the subtotal.
    #[test]
    fn component_lines_sum_to_subtotal(design in arb_design()) {
        let catalog = common::catalog();
        let components = pricing::component_pricing(&design, &catalog);

        let quantity: usize = components.lines.iter().map(|l| l.quantity).sum();
        prop_assert_eq!(quantity, design.instances().len());
        prop_assert!(components.lines.len() <= FIXTURE_PARTS.len());

        let sum: f64 = components.lines.iter().map(|l| l.line_total).sum();
        prop_assert!((components.subtotal - (sum * 100.0).round() / 100.0).abs() < 1e-9);
    }

    /// A priced breakdown from real catalog data always passes the
    /// consistency check.
    #[test]
    fn breakdown_is_internally_consistent(
        design in arb_design(),
        location in arb_location(),
        install in proptest::bool::ANY,
    ) {
        let catalog = common::catalog();
        let mut design = design;
        design.recompute_metadata(&catalog);

        let breakdown = pricing::pricing_breakdown(&design, &catalog, &location, install);
        prop_assert!(pricing::validate_pricing(&breakdown).is_ok());
    }
}
