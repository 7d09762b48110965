//! Section add/delete bookkeeping.
//!
//! Letters within a track stay contiguous from A: adding appends the next unused
//! letter, deleting shifts every higher section's occupants down one slot and drops
//! the now-redundant last section. Both operations finish with a full synchronize
//! so capacities and the gender constraint are re-derived.

use tracing::warn;

use super::allocator::Allocator;
use super::domain::{ApplicantId, Seat, Section, SectionId, Track};
use super::repository::{EnrollmentRegistry, StoreError};
use super::service::EnrollmentError;
use super::synchronizer::{synchronize, write_seats_chunked};

const LETTER_LIMIT: u8 = 26;

/// Creates the next section for `track` (empty track starts at A), capacity 0
/// until the synchronize that follows derives the real value. Returns the new
/// label.
pub(crate) fn add_section<R: EnrollmentRegistry>(
    registry: &R,
    allocator: &Allocator,
    track: Track,
) -> Result<String, EnrollmentError> {
    let existing = registry.sections_for(track)?;
    let letter = existing
        .iter()
        .map(|section| section.letter + 1)
        .max()
        .unwrap_or(0);
    if letter >= LETTER_LIMIT {
        return Err(EnrollmentError::SectionLettersExhausted(track.strand()));
    }

    let section = registry.insert_section(track, letter, 0)?;
    let label = section.name();
    synchronize(registry, allocator)?;
    Ok(label)
}

/// Deletes a section by collapsing the letters above it.
///
/// Occupants of each higher-lettered section move down one slot (seat id and label
/// rewritten together), then the last section in the ordered list is removed, so
/// the targeted letter disappears and lettering stays contiguous. A single failed
/// move is logged and skipped; the synchronize that follows is the safety net.
pub(crate) fn delete_section<R: EnrollmentRegistry>(
    registry: &R,
    allocator: &Allocator,
    id: SectionId,
    track: Track,
) -> Result<(), EnrollmentError> {
    let sections = registry.sections_for(track)?;
    let index = sections
        .iter()
        .position(|section| section.id == id)
        .ok_or(StoreError::NotFound)?;

    shift_occupants_down(registry, &sections, index);

    let Some(last) = sections.last() else {
        return Err(EnrollmentError::Store(StoreError::NotFound));
    };
    registry.delete_section(last.id)?;

    synchronize(registry, allocator)?;
    Ok(())
}

/// Moves each higher section's occupants into the section one slot below, starting
/// at `index`. Best-effort per section pair.
pub(crate) fn shift_occupants_down<R: EnrollmentRegistry>(
    registry: &R,
    sections: &[Section],
    index: usize,
) {
    for position in index..sections.len().saturating_sub(1) {
        let target = &sections[position];
        let source = &sections[position + 1];

        let occupants = match registry.occupants_of(source.id) {
            Ok(occupants) => occupants,
            Err(err) => {
                warn!(
                    section = %source.name(),
                    error = %err,
                    "could not read occupants while collapsing; resync will correct"
                );
                continue;
            }
        };

        let moves: Vec<(ApplicantId, Option<Seat>)> = occupants
            .iter()
            .map(|applicant| (applicant.id, Some(Seat::of(target))))
            .collect();
        if let Err(err) = write_seats_chunked(registry, &moves) {
            warn!(
                from = %source.name(),
                to = %target.name(),
                error = %err,
                "occupant shift failed; resync will correct"
            );
        }
    }
}
