//! Shared catalog fixture for integration tests.
#![allow(dead_code)]

use playkit_catalog::{
    AttachmentKind, CatalogPart, CatalogRepository, CompatibilityRule, ConnectionPoint,
    PartMetadata,
};
use playkit_core::{Dimensions, Position};
use std::sync::Arc;

pub fn deck() -> CatalogPart {
    CatalogPart {
        id: "deck-4x4".to_string(),
        name: "4x4 Deck".to_string(),
        category: "deck".to_string(),
        unit_price: 299.0,
        dimensions: Dimensions::new(4.0, 4.0, 1.0),
        weight_kg: 40.0,
        metadata: PartMetadata {
            stackable: true,
            capacity: 4,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn swing() -> CatalogPart {
    CatalogPart {
        id: "swing-single".to_string(),
        name: "Single Swing".to_string(),
        category: "swing".to_string(),
        unit_price: 189.0,
        dimensions: Dimensions::new(3.0, 2.0, 7.0),
        weight_kg: 18.0,
        connection_points: vec![ConnectionPoint {
            id: "hanger".to_string(),
            offset: Position::new(0.0, 0.0, 7.0),
            kind: AttachmentKind::SlideMount,
            mates_with: vec![AttachmentKind::BeamHanger],
        }],
        rules: vec![CompatibilityRule::Requires {
            attachment: AttachmentKind::BeamHanger,
        }],
        ..Default::default()
    }
}

pub fn beam() -> CatalogPart {
    CatalogPart {
        id: "beam-10".to_string(),
        name: "10ft Beam".to_string(),
        category: "beam".to_string(),
        unit_price: 229.0,
        dimensions: Dimensions::new(10.0, 1.0, 8.0),
        weight_kg: 30.0,
        connection_points: vec![ConnectionPoint {
            id: "hanger-a".to_string(),
            offset: Position::new(0.0, 0.0, 7.0),
            kind: AttachmentKind::BeamHanger,
            mates_with: vec![AttachmentKind::SlideMount],
        }],
        ..Default::default()
    }
}

pub fn catalog() -> Arc<CatalogRepository> {
    Arc::new(CatalogRepository::from_parts(vec![deck(), swing(), beam()]))
}
