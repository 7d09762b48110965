//! Full capacity re-derivation and population re-pack.
//!
//! This is the one place where every approved applicant in a track is unseated and
//! packed again from scratch. The whole pass is a pure function of the config row
//! and the section list, so re-invoking it after any partial failure converges the
//! store to the same final state.

use serde::Serialize;
use tracing::info;

use super::allocator::Allocator;
use super::domain::{ApplicantId, Seat, Track};
use super::repository::{EnrollmentRegistry, StoreError};

/// Batch size for seat writes; bounds the blast radius of a mid-batch failure.
pub const WRITE_CHUNK_SIZE: usize = 50;

/// Outcome of one synchronize pass, per track, for operator visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackSyncSummary {
    pub track: Track,
    pub seated: usize,
    pub pool: usize,
}

impl TrackSyncSummary {
    pub fn ratio(&self) -> String {
        format!("{}/{} seated", self.seated, self.pool)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SyncReport {
    pub tracks: Vec<TrackSyncSummary>,
}

/// Recomputes every section's capacity from the global enrollment limit, then
/// re-runs the packer for each track.
///
/// Capacities are even division with the remainder spread over the earliest
/// sections in label order, so the per-section sum always equals the global limit
/// exactly. Any section change invalidates all prior placements, so each track's
/// approved applicants are cleared back to unseated before the fresh pack — also
/// when the track has no sections left, so no seat ever outlives its section.
pub(crate) fn synchronize<R: EnrollmentRegistry>(
    registry: &R,
    allocator: &Allocator,
) -> Result<SyncReport, StoreError> {
    let global_capacity = registry.global_capacity()?;
    let mut sections = registry.sections()?;
    sections.sort_by_key(|section| section.name());

    if !sections.is_empty() {
        let count = sections.len() as u32;
        let base = global_capacity / count;
        let remainder = (global_capacity % count) as usize;

        for (index, section) in sections.iter_mut().enumerate() {
            let capacity = if index < remainder { base + 1 } else { base };
            section.capacity = capacity;
            registry.set_section_capacity(section.id, capacity)?;
        }
    }

    let mut report = SyncReport::default();
    for track in Track::ALL {
        let track_sections: Vec<_> = sections
            .iter()
            .filter(|section| section.track == track)
            .cloned()
            .collect();

        let pool = registry.approved_for_track(track)?;
        let clears: Vec<(ApplicantId, Option<Seat>)> =
            pool.iter().map(|applicant| (applicant.id, None)).collect();
        write_seats_chunked(registry, &clears)?;

        if track_sections.is_empty() {
            if !pool.is_empty() {
                info!(
                    track = track.strand(),
                    pool = pool.len(),
                    "track has no sections; approved applicants left unseated"
                );
            }
            continue;
        }

        let plan = allocator.allocate(&track_sections, &pool);
        let writes: Vec<(ApplicantId, Option<Seat>)> = plan
            .seats
            .iter()
            .map(|assignment| (assignment.applicant, Some(assignment.seat.clone())))
            .collect();
        write_seats_chunked(registry, &writes)?;

        info!(
            track = track.strand(),
            seated = plan.seats.len(),
            pool = pool.len(),
            "track repacked"
        );

        report.tracks.push(TrackSyncSummary {
            track,
            seated: plan.seats.len(),
            pool: pool.len(),
        });
    }

    Ok(report)
}

/// Applies seat changes in fixed-size chunks. A failed chunk surfaces immediately;
/// already-written chunks stay put and the next full synchronize corrects them.
pub(crate) fn write_seats_chunked<R: EnrollmentRegistry>(
    registry: &R,
    changes: &[(ApplicantId, Option<Seat>)],
) -> Result<(), StoreError> {
    for chunk in changes.chunks(WRITE_CHUNK_SIZE) {
        registry.update_seats(chunk)?;
    }
    Ok(())
}
