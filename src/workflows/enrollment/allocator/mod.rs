//! Gender-balanced sequential packer.
//!
//! Given one track's sections and its pool of approved applicants, seats each
//! applicant in exactly one section, filling sections strictly in letter order and
//! honoring each section's capacity and per-gender cap. The packer is pure: it
//! reads nothing and writes nothing, so its output is always safe to recompute from
//! scratch and a caller can batch-persist the plan as its own last step.

mod policy;

pub use policy::{AllocatorConfig, DEFAULT_ODD_SEAT_PREFERENCE};

pub(crate) use policy::gender_cap;

use std::collections::VecDeque;

use super::domain::{Applicant, ApplicantId, Gender, Seat, Section};

/// Stateless packer parameterized by the odd-seat tie-break policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Allocator {
    config: AllocatorConfig,
}

/// One applicant's place in an [`AllocationPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAssignment {
    pub applicant: ApplicantId,
    pub seat: Seat,
}

/// Pure output of one packer run over one track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllocationPlan {
    pub seats: Vec<SeatAssignment>,
    /// Applicants left over once every section closed. Not an error; surfaced so
    /// operators can see the shortfall.
    pub unseated: Vec<ApplicantId>,
}

impl AllocationPlan {
    pub fn pool_size(&self) -> usize {
        self.seats.len() + self.unseated.len()
    }

    /// Operator-facing fill ratio, e.g. `42/50 seated`.
    pub fn summary(&self) -> String {
        format!("{}/{} seated", self.seats.len(), self.pool_size())
    }
}

impl Allocator {
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    /// Packs `pool` into `sections`. Sections are re-ordered by (track, letter)
    /// here rather than trusting the caller's row order; applicants are queued per
    /// gender in roster-key order so re-runs are reproducible.
    pub fn allocate(&self, sections: &[Section], pool: &[Applicant]) -> AllocationPlan {
        let mut ordered: Vec<&Section> = sections.iter().collect();
        ordered.sort_by_key(|section| (section.track, section.letter));

        let mut males = gender_queue(pool, Gender::Male);
        let mut females = gender_queue(pool, Gender::Female);

        let mut plan = AllocationPlan::default();

        for section in ordered {
            let mut seated_male = 0u32;
            let mut seated_female = 0u32;

            loop {
                if seated_male + seated_female >= section.capacity {
                    break;
                }
                let Some(pick) = self.next_admission(
                    section.capacity,
                    seated_male,
                    seated_female,
                    &males,
                    &females,
                ) else {
                    break;
                };
                let admitted = match pick {
                    Gender::Male => males.pop_front(),
                    Gender::Female => females.pop_front(),
                };
                let Some(applicant) = admitted else {
                    break;
                };
                match pick {
                    Gender::Male => seated_male += 1,
                    Gender::Female => seated_female += 1,
                }
                plan.seats.push(SeatAssignment {
                    applicant: applicant.id,
                    seat: Seat::of(section),
                });
            }
        }

        let mut leftover: Vec<&Applicant> = males.into_iter().chain(females).collect();
        leftover.sort_by_key(|applicant| applicant.roster_key());
        plan.unseated = leftover.into_iter().map(|applicant| applicant.id).collect();

        plan
    }

    /// Next gender to admit into a partially filled section, or `None` once the
    /// section is closed. The under-represented gender goes first so the internal
    /// composition never drifts; a tie falls to the configured preference.
    fn next_admission(
        &self,
        capacity: u32,
        seated_male: u32,
        seated_female: u32,
        males: &VecDeque<&Applicant>,
        females: &VecDeque<&Applicant>,
    ) -> Option<Gender> {
        let male_waiting = !males.is_empty();
        let female_waiting = !females.is_empty();
        let preference = self.config.odd_seat_preference;

        let male_open = male_waiting
            && seated_male
                < gender_cap(
                    capacity,
                    seated_male,
                    seated_female,
                    male_waiting,
                    female_waiting,
                    preference,
                    Gender::Male,
                );
        let female_open = female_waiting
            && seated_female
                < gender_cap(
                    capacity,
                    seated_male,
                    seated_female,
                    male_waiting,
                    female_waiting,
                    preference,
                    Gender::Female,
                );

        match (male_open, female_open) {
            (true, true) => {
                if seated_male < seated_female {
                    Some(Gender::Male)
                } else if seated_female < seated_male {
                    Some(Gender::Female)
                } else {
                    Some(preference)
                }
            }
            (true, false) => Some(Gender::Male),
            (false, true) => Some(Gender::Female),
            (false, false) => None,
        }
    }
}

fn gender_queue(pool: &[Applicant], gender: Gender) -> VecDeque<&Applicant> {
    let mut queue: Vec<&Applicant> = pool
        .iter()
        .filter(|applicant| applicant.gender == gender)
        .collect();
    queue.sort_by_key(|applicant| applicant.roster_key());
    queue.into()
}
