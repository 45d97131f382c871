//! Design composition engine for modular play structures.
//!
//! A design is an ordered list of catalog part instances with positions,
//! rotations, and per-instance customizations. This crate owns the
//! design model and everything derived from it:
//!
//! - [`design`]: the model plus derived metadata (price, bounds, weight,
//!   age range, capacity)
//! - [`commands`] and [`history`]: invertible mutations and bounded
//!   undo/redo
//! - [`validation`]: structural and safety checks producing stable issue
//!   ids
//! - [`pricing`]: pure pricing functions, reproducible on both sides of
//!   the quote boundary
//! - [`session`]: the single-user editing session tying it together
//! - [`persistence`]: serialized snapshots and the storage adapter trait
//! - [`quote`]: quote preparation and server-side verification
//! - [`scene`]: the flat render projection

pub mod commands;
pub mod design;
pub mod history;
pub mod persistence;
pub mod pricing;
pub mod quote;
pub mod scene;
pub mod session;
pub mod validation;

pub use commands::DesignCommand;
pub use design::{Design, DerivedMetadata, InstanceId, PlacedInstance};
pub use history::{HistoryManager, DEFAULT_HISTORY_DEPTH};
pub use persistence::{
    DesignSnapshot, DesignSummary, MemoryStore, PersistenceAdapter, DESIGN_FORMAT_VERSION,
};
pub use pricing::{DeliveryLocation, PricingBreakdown};
pub use quote::{verify_quote, QuoteContact, QuoteError, QuoteRequest};
pub use scene::{highlighted_instance_ids, scene_instances, SceneInstance};
pub use session::{DesignSession, PricingContext, SaveRequest};
pub use validation::{SafetyLimits, Severity, ValidationEngine, ValidationIssue, ValidationResult};
