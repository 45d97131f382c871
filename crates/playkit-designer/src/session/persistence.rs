//! Save/load sequencing for the session.
//!
//! Persistence is asynchronous I/O against an external store and must
//! not block local edits. Requests carry a monotonically increasing
//! sequence number; a request that completes after a newer one has
//! already completed is discarded, regardless of arrival order. Failures
//! never touch in-memory state: unsaved edits and the dirty flag
//! survive, and the caller may retry.

use super::DesignSession;
use crate::persistence::{DesignSnapshot, PersistenceAdapter};
use playkit_core::PersistenceError;

/// An in-flight save: the sequence number and the snapshot captured when
/// the request began.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub seq: u64,
    pub snapshot: DesignSnapshot,
    /// Session mutation counter at capture time, used to decide whether
    /// the design is still clean once the save completes.
    mutation_counter: u64,
}

impl DesignSession {
    /// Capture a snapshot and hand out the next request sequence number.
    pub fn begin_save(&mut self) -> SaveRequest {
        SaveRequest {
            seq: self.take_request_seq(),
            snapshot: DesignSnapshot::from_design(self.design()),
            mutation_counter: self.mutation_counter(),
        }
    }

    /// Apply the outcome of a save request.
    ///
    /// A request older than the newest completed one is discarded with
    /// [`PersistenceError::Superseded`]. On success the design takes the
    /// assigned id, and the dirty flag clears only if no mutation
    /// happened while the save was in flight.
    pub fn complete_save(
        &mut self,
        request: &SaveRequest,
        outcome: Result<String, PersistenceError>,
    ) -> Result<String, PersistenceError> {
        if request.seq <= self.last_completed_seq() {
            tracing::debug!(
                seq = request.seq,
                newer_seq = self.last_completed_seq(),
                "Discarding superseded save"
            );
            return Err(PersistenceError::Superseded {
                seq: request.seq,
                newer_seq: self.last_completed_seq(),
            });
        }
        let id = outcome?;
        self.set_last_completed_seq(request.seq);
        self.design_mut().id = Some(id.clone());
        self.set_dirty(self.mutation_counter() != request.mutation_counter);
        tracing::debug!(design_id = %id, seq = request.seq, "Save completed");
        Ok(id)
    }

    /// Save the current design through the adapter.
    pub async fn save_with(
        &mut self,
        adapter: &dyn PersistenceAdapter,
    ) -> Result<String, PersistenceError> {
        let request = self.begin_save();
        let outcome = adapter.save(&request.snapshot).await;
        self.complete_save(&request, outcome)
    }

    /// Load a stored design into the session, replacing the current one
    /// and clearing history. A load that would roll back past a newer
    /// completed request is discarded.
    pub async fn load_from(
        &mut self,
        adapter: &dyn PersistenceAdapter,
        design_id: &str,
    ) -> Result<(), PersistenceError> {
        let seq = self.take_request_seq();
        let snapshot = adapter.load(design_id).await?;
        if seq <= self.last_completed_seq() {
            return Err(PersistenceError::Superseded {
                seq,
                newer_seq: self.last_completed_seq(),
            });
        }
        self.set_last_completed_seq(seq);
        self.replace_design(snapshot.into_design());
        self.set_dirty(false);
        tracing::debug!(design_id, "Design loaded");
        Ok(())
    }
}
