use super::domain::{
    Applicant, ApplicantId, ApprovalStatus, EnrollmentSubmission, Lrn, Seat, Section, SectionId,
    Track,
};

/// Storage abstraction over the three persisted relations (`sections`, `students`,
/// `system_config`) so the allocation components can be exercised against an
/// in-memory registry in tests and the demo.
///
/// Rows are parsed into the strongly-typed domain values at this boundary; nothing
/// above it ever sees a loosely-typed record.
pub trait EnrollmentRegistry: Send + Sync {
    /// Sections of one track, ordered by letter ascending.
    fn sections_for(&self, track: Track) -> Result<Vec<Section>, StoreError>;

    /// Every section across all tracks, ordered by name (lexicographic label
    /// order, which the synchronizer uses to spread the capacity remainder).
    fn sections(&self) -> Result<Vec<Section>, StoreError>;

    fn insert_section(
        &self,
        track: Track,
        letter: u8,
        capacity: u32,
    ) -> Result<Section, StoreError>;

    fn set_section_capacity(&self, id: SectionId, capacity: u32) -> Result<(), StoreError>;

    fn delete_section(&self, id: SectionId) -> Result<(), StoreError>;

    /// Creates a Pending, unseated applicant. Fails with [`StoreError::Conflict`]
    /// when the LRN is already registered.
    fn insert_applicant(&self, submission: EnrollmentSubmission) -> Result<Applicant, StoreError>;

    fn applicant(&self, id: ApplicantId) -> Result<Option<Applicant>, StoreError>;

    fn applicant_by_lrn(&self, lrn: &Lrn) -> Result<Option<Applicant>, StoreError>;

    /// Approved applicants of a track, seated or not. The allocator's pool.
    fn approved_for_track(&self, track: Track) -> Result<Vec<Applicant>, StoreError>;

    /// Approved applicants of a track that currently hold a seat. The lighter read
    /// backing single-approval placement.
    fn assigned_for_track(&self, track: Track) -> Result<Vec<Applicant>, StoreError>;

    /// Applicants currently seated in one section.
    fn occupants_of(&self, section: SectionId) -> Result<Vec<Applicant>, StoreError>;

    fn update_status(
        &self,
        id: ApplicantId,
        status: ApprovalStatus,
        feedback: Option<String>,
    ) -> Result<(), StoreError>;

    /// Writes a batch of seat changes. Ids that no longer exist are skipped rather
    /// than failing the batch; the next full synchronize converges any drift.
    fn update_seats(&self, changes: &[(ApplicantId, Option<Seat>)]) -> Result<(), StoreError>;

    fn delete_applicant(&self, id: ApplicantId) -> Result<(), StoreError>;

    /// Global enrollment limit from the single config row.
    fn global_capacity(&self) -> Result<u32, StoreError>;

    fn set_global_capacity(&self, capacity: u32) -> Result<(), StoreError>;
}

/// Error enumeration for registry failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
