//! Enrollment intake, section allocation, and lifecycle bookkeeping.
//!
//! The allocator packs one track at a time, sequentially: a section is filled
//! until its capacity or gender cap closes it, then the next letter is opened.
//! The synchronizer re-derives every capacity from the global limit and repacks
//! the whole population; it is idempotent and is the recovery path for any
//! partial failure elsewhere.

pub mod allocator;
pub mod audit;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;

pub(crate) mod lifecycle;
pub mod synchronizer;
pub(crate) mod transition;

#[cfg(test)]
mod tests;

pub use allocator::{
    AllocationPlan, Allocator, AllocatorConfig, SeatAssignment, DEFAULT_ODD_SEAT_PREFERENCE,
};
pub use audit::{Actor, AuditAction, AuditEntry, AuditError, AuditSink};
pub use domain::{
    Applicant, ApplicantId, ApprovalStatus, EnrollmentSubmission, Gender, InvalidLrn, Lrn, Seat,
    Section, SectionId, Track, UNASSIGNED_LABEL,
};
pub use memory::{MemoryAuditLog, MemoryRegistry};
pub use repository::{EnrollmentRegistry, StoreError};
pub use router::{enrollment_router, ApplicantStatusView};
pub use service::{
    BulkFailure, BulkOutcome, EnrollmentError, EnrollmentService, MIN_GLOBAL_CAPACITY,
};
pub use synchronizer::{SyncReport, TrackSyncSummary, WRITE_CHUNK_SIZE};
