//! Single-applicant status transitions.
//!
//! Approving one applicant does a greedy single-pass placement against live
//! occupancy counts instead of a full re-pack, so individual approvals stay cheap.
//! The placement is not globally optimal; the periodic full synchronize restores
//! global correctness. Leaving Approved clears the seat and never backfills the
//! vacancy.

use std::collections::HashMap;

use super::allocator::{gender_cap, AllocatorConfig};
use super::domain::{
    Applicant, ApplicantId, ApprovalStatus, Gender, Seat, SectionId,
};
use super::repository::{EnrollmentRegistry, StoreError};

/// Applies `new_status` to one applicant and returns the updated row.
pub(crate) fn set_status<R: EnrollmentRegistry>(
    registry: &R,
    config: AllocatorConfig,
    id: ApplicantId,
    new_status: ApprovalStatus,
    feedback: Option<String>,
) -> Result<Applicant, StoreError> {
    let applicant = registry.applicant(id)?.ok_or(StoreError::NotFound)?;

    let seat = match new_status {
        // A seated applicant re-approved keeps their seat; only the unseated
        // get placed.
        ApprovalStatus::Approved
            if applicant.status == ApprovalStatus::Approved && applicant.seat.is_some() =>
        {
            applicant.seat.clone()
        }
        ApprovalStatus::Approved => place_single(registry, config, &applicant)?,
        ApprovalStatus::Rejected | ApprovalStatus::Pending => None,
    };
    // Rejection feedback only survives a transition to Rejected.
    let feedback = match new_status {
        ApprovalStatus::Rejected => feedback,
        _ => None,
    };

    registry.update_status(id, new_status, feedback.clone())?;
    registry.update_seats(&[(id, seat.clone())])?;

    Ok(Applicant {
        status: new_status,
        registrar_feedback: feedback,
        seat,
        ..applicant
    })
}

/// Finds the first section in the applicant's track with room for their gender,
/// using the same odd/even cap formula as the full packer. `None` when every
/// section is closed to them; that is not an error.
fn place_single<R: EnrollmentRegistry>(
    registry: &R,
    config: AllocatorConfig,
    applicant: &Applicant,
) -> Result<Option<Seat>, StoreError> {
    let mut sections = registry.sections_for(applicant.track)?;
    sections.sort_by_key(|section| section.letter);

    let assigned = registry.assigned_for_track(applicant.track)?;
    let mut occupancy: HashMap<SectionId, (u32, u32)> = HashMap::new();
    for seated in &assigned {
        // The applicant's own current seat must not count against them.
        if seated.id == applicant.id {
            continue;
        }
        if let Some(seat) = &seated.seat {
            let entry = occupancy.entry(seat.section_id).or_default();
            match seated.gender {
                Gender::Male => entry.0 += 1,
                Gender::Female => entry.1 += 1,
            }
        }
    }

    let male_waiting = applicant.gender == Gender::Male;
    let female_waiting = applicant.gender == Gender::Female;

    for section in &sections {
        let (seated_male, seated_female) =
            occupancy.get(&section.id).copied().unwrap_or_default();
        if seated_male + seated_female >= section.capacity {
            continue;
        }

        let cap = gender_cap(
            section.capacity,
            seated_male,
            seated_female,
            male_waiting,
            female_waiting,
            config.odd_seat_preference,
            applicant.gender,
        );
        let seated_of_gender = match applicant.gender {
            Gender::Male => seated_male,
            Gender::Female => seated_female,
        };
        if seated_of_gender < cap {
            return Ok(Some(Seat::of(section)));
        }
    }

    Ok(None)
}
