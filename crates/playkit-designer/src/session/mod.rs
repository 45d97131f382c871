//! Editing session for one design.
//!
//! Owns the mutable design, the undo/redo history, and the eagerly
//! refreshed validation and pricing results. All mutations are
//! synchronous on the session; persistence is asynchronous and sequenced
//! (see `persistence`).
//!
//! This module is split into submodules:
//! - `mutations`: the design mutation API
//! - `persistence`: save/load sequencing and the dirty flag

mod mutations;
mod persistence;

pub use persistence::SaveRequest;

use crate::commands::DesignCommand;
use crate::design::Design;
use crate::history::HistoryManager;
use crate::pricing::{self, DeliveryLocation, PricingBreakdown};
use crate::validation::{ValidationEngine, ValidationResult};
use playkit_catalog::CatalogRepository;
use std::sync::Arc;

/// Pricing inputs the session keeps current between mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingContext {
    pub location: DeliveryLocation,
    pub include_installation: bool,
}

/// Single-user editing session around one design.
pub struct DesignSession {
    design: Design,
    catalog: Arc<CatalogRepository>,
    history: HistoryManager,
    validator: ValidationEngine,
    validation: ValidationResult,
    pricing_context: Option<PricingContext>,
    pricing: Option<PricingBreakdown>,
    dirty: bool,
    /// Bumped on every applied mutation, undo, and redo.
    mutation_counter: u64,
    next_request_seq: u64,
    last_completed_seq: u64,
}

impl DesignSession {
    /// Start a session on a fresh, unnamed design.
    pub fn new(catalog: Arc<CatalogRepository>) -> Self {
        Self::with_design(catalog, Design::new("Untitled"))
    }

    /// Start a session on an existing design.
    pub fn with_design(catalog: Arc<CatalogRepository>, mut design: Design) -> Self {
        design.recompute_metadata(&catalog);
        let validator = ValidationEngine::default();
        let validation = validator.validate(&design, &catalog);
        Self {
            design,
            catalog,
            history: HistoryManager::new(),
            validator,
            validation,
            pricing_context: None,
            pricing: None,
            dirty: false,
            mutation_counter: 0,
            next_request_seq: 1,
            last_completed_seq: 0,
        }
    }

    /// Replace the validation engine configuration (tolerances, limits).
    pub fn set_validator(&mut self, validator: ValidationEngine) {
        self.validator = validator;
        self.refresh_results();
    }

    /// Set the delivery location and installation option used for the
    /// session's cached pricing.
    pub fn set_pricing_context(&mut self, location: DeliveryLocation, include_installation: bool) {
        self.pricing_context = Some(PricingContext {
            location,
            include_installation,
        });
        self.refresh_results();
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn catalog(&self) -> &CatalogRepository {
        &self.catalog
    }

    /// Validation result for the current snapshot. Never stale.
    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    /// Whether the design has no blocking errors.
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    /// Cached pricing breakdown; `None` until a pricing context is set.
    pub fn pricing(&self) -> Option<&PricingBreakdown> {
        self.pricing.as_ref()
    }

    pub fn pricing_context(&self) -> Option<&PricingContext> {
        self.pricing_context.as_ref()
    }

    /// Whether in-memory state has diverged from the last persisted state.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Design name with a trailing `*` when there are unsaved edits.
    pub fn display_name(&self) -> String {
        if self.dirty {
            format!("{}*", self.design.name)
        } else {
            self.design.name.clone()
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.design.name = name.into();
        self.mark_modified();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Undo the most recent mutation. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.design) {
            Some(name) => {
                tracing::debug!(command = %name, "Undid command");
                self.mark_modified();
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone mutation.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.design) {
            Some(name) => {
                tracing::debug!(command = %name, "Redid command");
                self.mark_modified();
                true
            }
            None => false,
        }
    }

    /// Apply a command, record it, and refresh derived state.
    pub(crate) fn push_command(&mut self, mut command: DesignCommand) {
        command.apply(&mut self.design);
        self.history.record(command);
        self.mark_modified();
    }

    /// Bump the mutation counter, set the dirty flag, and recompute all
    /// derived state for the new snapshot.
    fn mark_modified(&mut self) {
        self.dirty = true;
        self.mutation_counter += 1;
        self.refresh_results();
    }

    /// Synchronous full recomputation of metadata, validation, and
    /// pricing. Derived state is never observable stale.
    fn refresh_results(&mut self) {
        self.design.recompute_metadata(&self.catalog);
        self.validation = self.validator.validate(&self.design, &self.catalog);
        self.pricing = self.pricing_context.as_ref().map(|ctx| {
            let breakdown = pricing::pricing_breakdown(
                &self.design,
                &self.catalog,
                &ctx.location,
                ctx.include_installation,
            );
            if !self.design.is_empty() {
                // A failure here is an engine bug; it is logged inside.
                let _ = pricing::validate_pricing(&breakdown);
            }
            breakdown
        });
    }

    pub(crate) fn mutation_counter(&self) -> u64 {
        self.mutation_counter
    }

    pub(crate) fn design_mut(&mut self) -> &mut Design {
        &mut self.design
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub(crate) fn replace_design(&mut self, design: Design) {
        self.design = design;
        self.history.clear();
        self.refresh_results();
    }

    pub(crate) fn take_request_seq(&mut self) -> u64 {
        let seq = self.next_request_seq;
        self.next_request_seq += 1;
        seq
    }

    pub(crate) fn last_completed_seq(&self) -> u64 {
        self.last_completed_seq
    }

    pub(crate) fn set_last_completed_seq(&mut self, seq: u64) {
        self.last_completed_seq = seq;
    }
}
