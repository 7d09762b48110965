//! In-memory registry and audit sink backing tests and the CLI demo.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::audit::{AuditEntry, AuditError, AuditSink};
use super::domain::{
    Applicant, ApplicantId, ApprovalStatus, EnrollmentSubmission, Lrn, Seat, Section, SectionId,
    Track,
};
use super::repository::{EnrollmentRegistry, StoreError};

const DEFAULT_GLOBAL_CAPACITY: u32 = 200;

#[derive(Debug, Default)]
struct RegistryState {
    next_section_id: u64,
    next_applicant_id: u64,
    sections: HashMap<SectionId, Section>,
    applicants: HashMap<ApplicantId, Applicant>,
    global_capacity: u32,
}

/// Hash-map registry guarded by a single mutex, mirroring the shape of the
/// persisted relations.
#[derive(Debug, Clone)]
pub struct MemoryRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_GLOBAL_CAPACITY)
    }
}

impl MemoryRegistry {
    pub fn with_capacity(global_capacity: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState {
                global_capacity,
                ..RegistryState::default()
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.state.lock().expect("registry mutex poisoned")
    }
}

impl EnrollmentRegistry for MemoryRegistry {
    fn sections_for(&self, track: Track) -> Result<Vec<Section>, StoreError> {
        let state = self.lock();
        let mut sections: Vec<Section> = state
            .sections
            .values()
            .filter(|section| section.track == track)
            .cloned()
            .collect();
        sections.sort_by_key(|section| section.letter);
        Ok(sections)
    }

    fn sections(&self) -> Result<Vec<Section>, StoreError> {
        let state = self.lock();
        let mut sections: Vec<Section> = state.sections.values().cloned().collect();
        sections.sort_by_key(|section| section.name());
        Ok(sections)
    }

    fn insert_section(
        &self,
        track: Track,
        letter: u8,
        capacity: u32,
    ) -> Result<Section, StoreError> {
        let mut state = self.lock();
        if state
            .sections
            .values()
            .any(|section| section.track == track && section.letter == letter)
        {
            return Err(StoreError::Conflict);
        }
        state.next_section_id += 1;
        let section = Section {
            id: SectionId(state.next_section_id),
            track,
            letter,
            capacity,
        };
        state.sections.insert(section.id, section.clone());
        Ok(section)
    }

    fn set_section_capacity(&self, id: SectionId, capacity: u32) -> Result<(), StoreError> {
        let mut state = self.lock();
        let section = state.sections.get_mut(&id).ok_or(StoreError::NotFound)?;
        section.capacity = capacity;
        Ok(())
    }

    fn delete_section(&self, id: SectionId) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.sections.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    fn insert_applicant(&self, submission: EnrollmentSubmission) -> Result<Applicant, StoreError> {
        let mut state = self.lock();
        if state
            .applicants
            .values()
            .any(|applicant| applicant.lrn == submission.lrn)
        {
            return Err(StoreError::Conflict);
        }
        state.next_applicant_id += 1;
        let applicant = Applicant {
            id: ApplicantId(state.next_applicant_id),
            lrn: submission.lrn,
            last_name: submission.last_name,
            first_name: submission.first_name,
            track: submission.track,
            gender: submission.gender,
            status: ApprovalStatus::Pending,
            registrar_feedback: None,
            seat: None,
        };
        state.applicants.insert(applicant.id, applicant.clone());
        Ok(applicant)
    }

    fn applicant(&self, id: ApplicantId) -> Result<Option<Applicant>, StoreError> {
        Ok(self.lock().applicants.get(&id).cloned())
    }

    fn applicant_by_lrn(&self, lrn: &Lrn) -> Result<Option<Applicant>, StoreError> {
        Ok(self
            .lock()
            .applicants
            .values()
            .find(|applicant| &applicant.lrn == lrn)
            .cloned())
    }

    fn approved_for_track(&self, track: Track) -> Result<Vec<Applicant>, StoreError> {
        let state = self.lock();
        let mut pool: Vec<Applicant> = state
            .applicants
            .values()
            .filter(|applicant| {
                applicant.track == track && applicant.status == ApprovalStatus::Approved
            })
            .cloned()
            .collect();
        pool.sort_by_key(|applicant| applicant.roster_key());
        Ok(pool)
    }

    fn assigned_for_track(&self, track: Track) -> Result<Vec<Applicant>, StoreError> {
        let state = self.lock();
        let mut pool: Vec<Applicant> = state
            .applicants
            .values()
            .filter(|applicant| {
                applicant.track == track
                    && applicant.status == ApprovalStatus::Approved
                    && applicant.seat.is_some()
            })
            .cloned()
            .collect();
        pool.sort_by_key(|applicant| applicant.roster_key());
        Ok(pool)
    }

    fn occupants_of(&self, section: SectionId) -> Result<Vec<Applicant>, StoreError> {
        let state = self.lock();
        let mut occupants: Vec<Applicant> = state
            .applicants
            .values()
            .filter(|applicant| {
                applicant
                    .seat
                    .as_ref()
                    .is_some_and(|seat| seat.section_id == section)
            })
            .cloned()
            .collect();
        occupants.sort_by_key(|applicant| applicant.roster_key());
        Ok(occupants)
    }

    fn update_status(
        &self,
        id: ApplicantId,
        status: ApprovalStatus,
        feedback: Option<String>,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        let applicant = state.applicants.get_mut(&id).ok_or(StoreError::NotFound)?;
        applicant.status = status;
        applicant.registrar_feedback = feedback;
        Ok(())
    }

    fn update_seats(&self, changes: &[(ApplicantId, Option<Seat>)]) -> Result<(), StoreError> {
        let mut state = self.lock();
        for (id, seat) in changes {
            // Vanished rows are skipped; the next resync converges any drift.
            if let Some(applicant) = state.applicants.get_mut(id) {
                applicant.seat = seat.clone();
            }
        }
        Ok(())
    }

    fn delete_applicant(&self, id: ApplicantId) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.applicants.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    fn global_capacity(&self) -> Result<u32, StoreError> {
        Ok(self.lock().global_capacity)
    }

    fn set_global_capacity(&self, capacity: u32) -> Result<(), StoreError> {
        self.lock().global_capacity = capacity;
        Ok(())
    }
}

/// Audit sink capturing entries for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAuditLog {
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}
