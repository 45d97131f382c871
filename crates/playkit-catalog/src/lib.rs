//! # PlayKit Catalog
//!
//! Read-only access to the published parts catalog. The catalog is owned
//! by an external management system; this crate models its feed and
//! resolves part data by id for the design engine.
//!
//! The repository is an explicit, injected dependency of the engine.
//! Nothing here is an ambient singleton.

pub mod feed;
pub mod model;
pub mod repository;

pub use feed::CatalogFeed;
pub use model::{
    AgeRange, AttachmentKind, CatalogPart, CompatibilityRule, ConnectionPoint, PartMetadata,
};
pub use repository::CatalogRepository;
