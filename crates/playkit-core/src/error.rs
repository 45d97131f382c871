//! Error handling for PlayKit
//!
//! Provides error types for all layers of the engine:
//! - Catalog errors (missing/unpublished parts, feed problems)
//! - Design errors (mutation-level failures)
//! - Persistence errors (save/load/duplicate/delete)
//! - Pricing errors (defensive consistency checks)
//!
//! All error types use `thiserror` for ergonomic error handling.
//! Validation outcomes are deliberately *not* errors: the validation
//! engine returns them as data (see the designer crate).

use thiserror::Error;

/// Catalog error type
///
/// A mutation referencing a catalog id that cannot be resolved is
/// rejected with one of these; the design is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// No part with this id exists in the catalog.
    #[error("Catalog part not found: {part_id}")]
    PartNotFound {
        /// The catalog part id that failed to resolve.
        part_id: String,
    },

    /// The part exists but is not published.
    #[error("Catalog part not published: {part_id}")]
    PartUnpublished {
        /// The unpublished catalog part id.
        part_id: String,
    },

    /// The catalog feed could not be parsed.
    #[error("Invalid catalog feed: {reason}")]
    InvalidFeed {
        /// Why the feed was rejected.
        reason: String,
    },

    /// The feed declares a format version this engine does not read.
    #[error("Unsupported catalog feed version: {version}")]
    UnsupportedFeedVersion {
        /// The version string from the feed.
        version: String,
    },
}

/// Design mutation error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignError {
    /// The referenced placed instance does not exist in the design.
    #[error("Instance not found in design: {instance_id}")]
    InstanceNotFound {
        /// The missing instance id.
        instance_id: u64,
    },
}

/// Persistence error type
///
/// I/O failures against the external store. These are recoverable:
/// in-memory state and unsaved edits are never discarded because of one.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// No stored design with this id.
    #[error("Design not found: {design_id}")]
    NotFound {
        /// The design id that was not found.
        design_id: String,
    },

    /// The backing store failed.
    #[error("Storage failure: {reason}")]
    Storage {
        /// Backend-reported reason.
        reason: String,
    },

    /// The stored document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A newer request for the same design completed first.
    #[error("Request superseded by sequence {newer_seq} (this was {seq})")]
    Superseded {
        /// Sequence number of the discarded request.
        seq: u64,
        /// Sequence number of the request that won.
        newer_seq: u64,
    },
}

/// Pricing consistency error type
///
/// A failure here indicates a bug in the pricing engine, not a problem
/// with the user's design.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// A breakdown for a non-empty design had no component lines.
    #[error("Pricing breakdown has no component lines")]
    EmptyComponents,

    /// Subtotal must be strictly positive for a non-empty design.
    #[error("Non-positive subtotal: {subtotal}")]
    NonPositiveSubtotal {
        /// The offending subtotal.
        subtotal: f64,
    },

    /// Shipping components may never be negative.
    #[error("Negative shipping component: {component} = {value}")]
    NegativeShipping {
        /// Which shipping component was negative.
        component: String,
        /// Its value.
        value: f64,
    },

    /// The composed total does not match its parts.
    #[error("Total {total} does not match components (expected {expected})")]
    TotalMismatch {
        /// The reported total.
        total: f64,
        /// The recomputed total.
        expected: f64,
    },
}

/// Main error type for PlayKit
///
/// A unified error type that can represent any failure from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Design mutation error
    #[error(transparent)]
    Design(#[from] DesignError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Pricing consistency error
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a catalog-miss error
    pub fn is_catalog_miss(&self) -> bool {
        matches!(
            self,
            Error::Catalog(CatalogError::PartNotFound { .. })
                | Error::Catalog(CatalogError::PartUnpublished { .. })
        )
    }

    /// Check if this is a persistence error
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }

    /// Check if this is a pricing consistency error
    pub fn is_pricing_error(&self) -> bool {
        matches!(self, Error::Pricing(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
