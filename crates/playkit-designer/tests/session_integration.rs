//! End-to-end session behavior: mutations, derived state, validation,
//! pricing, and history working together.

mod common;

use playkit_catalog::{CatalogPart, CatalogRepository};
use playkit_core::{Dimensions, Position, Rotation};
use playkit_designer::pricing::{
    self, DeliveryLocation, INSTALL_BASE_RATE, INSTALL_PER_PART_RATE,
};
use playkit_designer::{DesignSession, QuoteContact, QuoteError, QuoteRequest};
use std::sync::Arc;

fn session() -> DesignSession {
    let mut session = DesignSession::new(common::catalog());
    session.set_pricing_context(DeliveryLocation::new("Springfield", "IL"), false);
    session
}

#[test]
fn test_single_deck_design_is_valid_and_priced() {
    let mut session = session();
    session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();

    assert!(session.is_valid());
    let meta = session.design().metadata();
    assert_eq!(meta.instance_count, 1);
    assert_eq!(meta.total_price, 299.0);
}

#[test]
fn test_unanchored_swing_blocks_quote() {
    let mut session = session();
    session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();
    let swing_id = session
        .add_part("swing-single", Position::new(10.0, 0.0, 0.0), Rotation::default())
        .unwrap();

    assert!(!session.is_valid());
    let issue = session
        .validation()
        .errors
        .iter()
        .find(|e| e.id == "rule.requires")
        .unwrap();
    assert_eq!(issue.instance_ids, vec![swing_id]);

    let err = QuoteRequest::prepare(&session, QuoteContact::default()).unwrap_err();
    assert!(matches!(err, QuoteError::DesignInvalid { .. }));
}

#[test]
fn test_adding_beam_satisfies_swing_and_reprices() {
    let mut session = session();
    session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();
    session
        .add_part("swing-single", Position::new(10.0, 0.0, 0.0), Rotation::default())
        .unwrap();
    assert!(!session.is_valid());

    session
        .add_part("beam-10", Position::new(20.0, 0.0, 0.0), Rotation::default())
        .unwrap();

    assert!(session.is_valid());
    let breakdown = session.pricing().unwrap();
    assert_eq!(breakdown.components.subtotal, 299.0 + 189.0 + 229.0);
    // Springfield is in the low-cost locality list: 150 base + 50
    // distance + 0.5/kg over 88 kg.
    assert_eq!(breakdown.shipping.total, 150.0 + 50.0 + 44.0);
    assert_eq!(breakdown.total, breakdown.components.subtotal + breakdown.shipping.total);
}

#[test]
fn test_installation_uses_single_height_threshold() {
    let tower = CatalogPart {
        id: "tower-9".to_string(),
        name: "9ft Tower".to_string(),
        category: "tower".to_string(),
        unit_price: 120.0,
        dimensions: Dimensions::new(2.0, 2.0, 9.0),
        weight_kg: 25.0,
        ..Default::default()
    };
    let catalog = Arc::new(CatalogRepository::from_parts(vec![tower]));
    let mut session = DesignSession::new(catalog);
    session.set_pricing_context(DeliveryLocation::new("Springfield", "IL"), true);

    for i in 0..12 {
        session
            .add_part(
                "tower-9",
                Position::new(i as f64 * 3.0, 0.0, 0.0),
                Rotation::default(),
            )
            .unwrap();
    }

    let meta = session.design().metadata();
    assert_eq!(meta.instance_count, 12);
    assert_eq!(meta.bounding.height, 9.0);

    let install = session.pricing().unwrap().installation.as_ref().unwrap();
    assert!((install.complexity_multiplier - 1.1).abs() < 1e-9);
    let expected = ((INSTALL_BASE_RATE + 12.0 * INSTALL_PER_PART_RATE) * 1.1 * 100.0).round() / 100.0;
    assert_eq!(install.total, expected);
    assert_eq!(expected, 1012.0);
}

#[test]
fn test_undo_redo_restore_exact_state() {
    let mut session = session();
    session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();
    let swing_id = session
        .add_part("swing-single", Position::new(10.0, 0.0, 0.0), Rotation::default())
        .unwrap();
    let before = session.design().clone();

    session.move_part(swing_id, Position::new(12.0, 3.0, 0.0)).unwrap();
    session
        .set_customization(swing_id, "seat_color", "red")
        .unwrap();
    assert_ne!(session.design(), &before);

    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(session.design(), &before);

    assert!(session.redo());
    assert!(session.redo());
    assert_eq!(
        session.design().instance(swing_id).unwrap().position,
        Position::new(12.0, 3.0, 0.0)
    );
    assert_eq!(
        session
            .design()
            .instance(swing_id)
            .unwrap()
            .customizations
            .get("seat_color")
            .map(String::as_str),
        Some("red")
    );
}

#[test]
fn test_add_remove_restores_exact_snapshot() {
    let mut session = session();
    session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();
    let before = session.design().clone();

    let beam_id = session
        .add_part("beam-10", Position::new(20.0, 0.0, 0.0), Rotation::default())
        .unwrap();
    session.remove_part(beam_id).unwrap();
    assert_eq!(session.design(), &before);

    // Unwinding back through the remove/add pair lands on it again.
    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(session.design(), &before);
}

#[test]
fn test_removing_last_instance_zeroes_derived_state() {
    let mut session = session();
    let deck_id = session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();
    session.remove_part(deck_id).unwrap();

    let meta = session.design().metadata();
    assert_eq!(meta.total_price, 0.0);
    assert_eq!(meta.estimated_weight_kg, 0.0);
    assert_eq!(meta.instance_count, 0);
    assert!(session
        .validation()
        .errors
        .iter()
        .any(|e| e.id == "design.empty"));
}

#[test]
fn test_remove_undo_preserves_instance_order() {
    let mut session = session();
    let a = session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();
    let b = session
        .add_part("beam-10", Position::new(20.0, 0.0, 0.0), Rotation::default())
        .unwrap();
    let c = session
        .add_part("deck-4x4", Position::new(40.0, 0.0, 0.0), Rotation::default())
        .unwrap();

    session.remove_part(b).unwrap();
    assert!(session.undo());

    let order: Vec<_> = session.design().instances().iter().map(|i| i.id).collect();
    assert_eq!(order, vec![a, b, c]);
}

#[test]
fn test_add_unknown_part_changes_nothing() {
    let mut session = session();
    session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();

    let err = session.add_part("ghost", Position::origin(), Rotation::default());
    assert!(err.is_err());
    assert_eq!(session.design().metadata().instance_count, 1);
    assert!(!session.can_redo());
    assert_eq!(session.undo_depth(), 1);
}

#[test]
fn test_quote_round_trip_on_valid_design() {
    let mut session = session();
    session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();
    session
        .add_part("swing-single", Position::new(10.0, 0.0, 0.0), Rotation::default())
        .unwrap();
    session
        .add_part("beam-10", Position::new(20.0, 0.0, 0.0), Rotation::default())
        .unwrap();
    assert!(session.is_valid());

    let contact = QuoteContact {
        name: "Jo Fenwick".to_string(),
        email: "jo@example.com".to_string(),
        ..Default::default()
    };
    let request = QuoteRequest::prepare(&session, contact).unwrap();
    let verified = playkit_designer::verify_quote(&request, session.catalog()).unwrap();
    assert_eq!(verified.total, request.claimed.total);
}

#[test]
fn test_pricing_matches_pure_functions() {
    let mut session = session();
    session
        .add_part("deck-4x4", Position::origin(), Rotation::default())
        .unwrap();
    session
        .add_part("beam-10", Position::new(20.0, 0.0, 0.0), Rotation::default())
        .unwrap();

    let location = DeliveryLocation::new("Springfield", "IL");
    let expected = pricing::pricing_breakdown(session.design(), session.catalog(), &location, false);
    assert_eq!(session.pricing().unwrap(), &expected);
}
