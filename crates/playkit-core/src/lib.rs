//! # PlayKit Core
//!
//! Core types shared across the PlayKit design composition engine:
//! geometry primitives, measurement units, and the unified error taxonomy.

pub mod error;
pub mod geometry;
pub mod units;

pub use error::{
    CatalogError, DesignError, Error, PersistenceError, PricingError, Result,
};
pub use geometry::{BoundingBox, Dimensions, Position, Rotation};
pub use units::Unit;
