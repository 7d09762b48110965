use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::enrollment::allocator::{AllocationPlan, AllocatorConfig};
use crate::workflows::enrollment::domain::{
    Applicant, ApplicantId, ApprovalStatus, EnrollmentSubmission, Gender, Lrn, Section, SectionId,
    Track,
};
use crate::workflows::enrollment::memory::{MemoryAuditLog, MemoryRegistry};
use crate::workflows::enrollment::repository::EnrollmentRegistry;
use crate::workflows::enrollment::router::enrollment_router;
use crate::workflows::enrollment::service::EnrollmentService;

pub(super) fn lrn_for(n: u64) -> Lrn {
    Lrn::new(&format!("2015{n:08}")).expect("valid LRN")
}

pub(super) fn section(id: u64, track: Track, letter: u8, capacity: u32) -> Section {
    Section {
        id: SectionId(id),
        track,
        letter,
        capacity,
    }
}

pub(super) fn applicant(
    id: u64,
    last: &str,
    first: &str,
    track: Track,
    gender: Gender,
) -> Applicant {
    Applicant {
        id: ApplicantId(id),
        lrn: lrn_for(id),
        last_name: last.to_string(),
        first_name: first.to_string(),
        track,
        gender,
        status: ApprovalStatus::Approved,
        registrar_feedback: None,
        seat: None,
    }
}

/// Approved pool with generated, deterministic names: males sort before females
/// within each index because of the surname prefix.
pub(super) fn pool(track: Track, males: usize, females: usize) -> Vec<Applicant> {
    let mut applicants = Vec::new();
    for index in 0..males {
        applicants.push(applicant(
            (index + 1) as u64,
            &format!("Mercado{index:02}"),
            "Marco",
            track,
            Gender::Male,
        ));
    }
    for index in 0..females {
        applicants.push(applicant(
            (males + index + 1) as u64,
            &format!("Salazar{index:02}"),
            "Fe",
            track,
            Gender::Female,
        ));
    }
    applicants
}

/// Male/female occupant counts a plan produced for one section.
pub(super) fn plan_gender_counts(
    plan: &AllocationPlan,
    pool: &[Applicant],
    section: SectionId,
) -> (usize, usize) {
    let mut males = 0;
    let mut females = 0;
    for assignment in &plan.seats {
        if assignment.seat.section_id != section {
            continue;
        }
        let seated = pool
            .iter()
            .find(|applicant| applicant.id == assignment.applicant)
            .expect("assignment refers to pool member");
        match seated.gender {
            Gender::Male => males += 1,
            Gender::Female => females += 1,
        }
    }
    (males, females)
}

pub(super) fn build_service() -> (
    EnrollmentService<MemoryRegistry, MemoryAuditLog>,
    Arc<MemoryRegistry>,
    Arc<MemoryAuditLog>,
) {
    build_service_with_capacity(200)
}

pub(super) fn build_service_with_capacity(
    global_capacity: u32,
) -> (
    EnrollmentService<MemoryRegistry, MemoryAuditLog>,
    Arc<MemoryRegistry>,
    Arc<MemoryAuditLog>,
) {
    let registry = Arc::new(MemoryRegistry::with_capacity(global_capacity));
    let audit = Arc::new(MemoryAuditLog::default());
    let service = EnrollmentService::new(registry.clone(), audit.clone(), AllocatorConfig::default());
    (service, registry, audit)
}

/// Registers a Pending pool through the service and returns the new ids.
pub(super) fn register_pool(
    service: &EnrollmentService<MemoryRegistry, MemoryAuditLog>,
    track: Track,
    males: usize,
    females: usize,
    lrn_offset: u64,
) -> Vec<ApplicantId> {
    let mut ids = Vec::new();
    for index in 0..males {
        let applicant = service
            .register(EnrollmentSubmission {
                lrn: lrn_for(lrn_offset + index as u64),
                last_name: format!("Mercado{index:02}"),
                first_name: "Marco".to_string(),
                track,
                gender: Gender::Male,
            })
            .expect("registration succeeds");
        ids.push(applicant.id);
    }
    for index in 0..females {
        let applicant = service
            .register(EnrollmentSubmission {
                lrn: lrn_for(lrn_offset + (males + index) as u64),
                last_name: format!("Salazar{index:02}"),
                first_name: "Fe".to_string(),
                track,
                gender: Gender::Female,
            })
            .expect("registration succeeds");
        ids.push(applicant.id);
    }
    ids
}

/// Male/female counts currently seated in `section` according to the registry.
pub(super) fn seated_gender_counts(registry: &MemoryRegistry, section: SectionId) -> (usize, usize) {
    let occupants = registry.occupants_of(section).expect("occupants readable");
    let males = occupants
        .iter()
        .filter(|applicant| applicant.gender == Gender::Male)
        .count();
    (males, occupants.len() - males)
}

pub(super) fn router_with_service(
    service: EnrollmentService<MemoryRegistry, MemoryAuditLog>,
) -> axum::Router {
    enrollment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
