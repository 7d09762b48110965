use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::allocator::{Allocator, AllocatorConfig};
use super::audit::{Actor, AuditAction, AuditEntry, AuditError, AuditSink};
use super::domain::{
    Applicant, ApplicantId, ApprovalStatus, EnrollmentSubmission, Lrn, Section, SectionId, Track,
};
use super::lifecycle;
use super::repository::{EnrollmentRegistry, StoreError};
use super::synchronizer::{self, SyncReport, WRITE_CHUNK_SIZE};
use super::transition;

/// System-enforced floor for the global enrollment limit.
pub const MIN_GLOBAL_CAPACITY: u32 = 50;

/// Facade composing the registry, the audit sink, and the packer configuration.
/// Request handlers and the CLI demo drive everything through this type.
pub struct EnrollmentService<R, A> {
    registry: Arc<R>,
    audit: Arc<A>,
    allocator: Allocator,
    config: AllocatorConfig,
}

impl<R, A> EnrollmentService<R, A>
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    pub fn new(registry: Arc<R>, audit: Arc<A>, config: AllocatorConfig) -> Self {
        Self {
            registry,
            audit,
            allocator: Allocator::new(config),
            config,
        }
    }

    /// Form submission landing: creates a Pending, unseated applicant. The LRN is
    /// already shape-checked by the `Lrn` type; uniqueness surfaces as Conflict.
    pub fn register(
        &self,
        submission: EnrollmentSubmission,
    ) -> Result<Applicant, EnrollmentError> {
        let applicant = self.registry.insert_applicant(submission)?;
        info!(lrn = %applicant.lrn, track = applicant.track.strand(), "applicant registered");
        Ok(applicant)
    }

    /// Lookup backing the public status-tracking page.
    pub fn status_by_lrn(&self, lrn: &Lrn) -> Result<Applicant, EnrollmentError> {
        let applicant = self
            .registry
            .applicant_by_lrn(lrn)?
            .ok_or(StoreError::NotFound)?;
        Ok(applicant)
    }

    /// Single-applicant transition: approve seats greedily, reject/revert clears
    /// the seat. Every transition lands in the activity log.
    pub fn set_status(
        &self,
        actor: &Actor,
        id: ApplicantId,
        new_status: ApprovalStatus,
        feedback: Option<String>,
    ) -> Result<Applicant, EnrollmentError> {
        let before = self.registry.applicant(id)?.ok_or(StoreError::NotFound)?;
        let updated = transition::set_status(&*self.registry, self.config, id, new_status, feedback)?;

        self.audit.record(AuditEntry::new(
            actor,
            AuditAction::StatusChanged,
            format!("{} {}", updated.first_name, updated.last_name),
            Some(id),
            format!(
                "{} -> {}; section {}",
                before.status.label(),
                updated.status.label(),
                updated.section_label()
            ),
        ))?;
        Ok(updated)
    }

    /// Bulk transition, processed in chunks of [`WRITE_CHUNK_SIZE`]. Per-record
    /// failures are collected and reported, never silently dropped; a not-found id
    /// does not abort the rest of the batch.
    pub fn bulk_set_status(
        &self,
        actor: &Actor,
        ids: &[ApplicantId],
        new_status: ApprovalStatus,
    ) -> Result<BulkOutcome, EnrollmentError> {
        let mut outcome = BulkOutcome::default();
        for chunk in ids.chunks(WRITE_CHUNK_SIZE) {
            for &id in chunk {
                match self.set_status(actor, id, new_status, None) {
                    Ok(_) => outcome.applied += 1,
                    Err(err) => {
                        warn!(applicant = id.0, error = %err, "bulk status change failed");
                        outcome.failed.push(BulkFailure {
                            id,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }
        Ok(outcome)
    }

    /// Administrative purge, chunked like every other bulk write. Ids that are
    /// already gone count as applied.
    pub fn bulk_delete(
        &self,
        actor: &Actor,
        ids: &[ApplicantId],
    ) -> Result<BulkOutcome, EnrollmentError> {
        let mut outcome = BulkOutcome::default();
        for chunk in ids.chunks(WRITE_CHUNK_SIZE) {
            for &id in chunk {
                match self.registry.delete_applicant(id) {
                    Ok(()) | Err(StoreError::NotFound) => outcome.applied += 1,
                    Err(err) => {
                        warn!(applicant = id.0, error = %err, "bulk delete failed");
                        outcome.failed.push(BulkFailure {
                            id,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }
        self.audit.record(AuditEntry::new(
            actor,
            AuditAction::StatusChanged,
            "bulk purge",
            None,
            format!("{} applicant(s) deleted", outcome.applied),
        ))?;
        Ok(outcome)
    }

    /// Validates and stores the global enrollment limit, then rebalances
    /// everything. Rejected before any write when below the minimum.
    pub fn set_global_capacity(
        &self,
        actor: &Actor,
        capacity: u32,
    ) -> Result<SyncReport, EnrollmentError> {
        if capacity < MIN_GLOBAL_CAPACITY {
            return Err(EnrollmentError::CapacityBelowMinimum {
                requested: capacity,
                minimum: MIN_GLOBAL_CAPACITY,
            });
        }
        self.registry.set_global_capacity(capacity)?;
        let report = self.synchronize()?;
        self.audit.record(AuditEntry::new(
            actor,
            AuditAction::CapacityChanged,
            "global capacity",
            None,
            format!("set to {capacity}"),
        ))?;
        Ok(report)
    }

    /// Appends the next section letter for `track` and rebalances. Returns the new
    /// section's label.
    pub fn add_section(&self, actor: &Actor, track: Track) -> Result<String, EnrollmentError> {
        let label = lifecycle::add_section(&*self.registry, &self.allocator, track)?;
        self.audit.record(AuditEntry::new(
            actor,
            AuditAction::SectionAdded,
            label.clone(),
            None,
            format!("section added to {}", track.strand()),
        ))?;
        Ok(label)
    }

    /// Collapses the targeted letter out of `track` and rebalances.
    pub fn delete_section(
        &self,
        actor: &Actor,
        id: SectionId,
        track: Track,
    ) -> Result<(), EnrollmentError> {
        lifecycle::delete_section(&*self.registry, &self.allocator, id, track)?;
        self.audit.record(AuditEntry::new(
            actor,
            AuditAction::SectionDeleted,
            track.strand(),
            None,
            "section deleted and letters collapsed",
        ))?;
        Ok(())
    }

    /// Full idempotent resync; the recovery mechanism for any partial failure.
    pub fn synchronize(&self) -> Result<SyncReport, EnrollmentError> {
        let report = synchronizer::synchronize(&*self.registry, &self.allocator)?;
        Ok(report)
    }

    /// Track sections in letter order, for rosters and admin views.
    pub fn sections(&self, track: Track) -> Result<Vec<Section>, EnrollmentError> {
        Ok(self.registry.sections_for(track)?)
    }

    /// Seated roster of one track.
    pub fn roster(&self, track: Track) -> Result<Vec<Applicant>, EnrollmentError> {
        Ok(self.registry.assigned_for_track(track)?)
    }
}

/// Per-batch result of a bulk operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkOutcome {
    pub applied: usize,
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkFailure {
    pub id: ApplicantId,
    pub reason: String,
}

/// Error raised by the enrollment service.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error("global capacity {requested} is below the enforced minimum {minimum}")]
    CapacityBelowMinimum { requested: u32, minimum: u32 },
    #[error("track {0} has no section letters left")]
    SectionLettersExhausted(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}
