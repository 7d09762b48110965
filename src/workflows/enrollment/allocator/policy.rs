use super::super::domain::Gender;

/// Holder of the extra seat in an odd-capacity section when both gender queues are
/// non-empty and seated counts are tied. Carried over from the original deployment;
/// the choice is arbitrary policy, so it stays a named, overridable setting instead
/// of a buried literal.
pub const DEFAULT_ODD_SEAT_PREFERENCE: Gender = Gender::Male;

/// Knobs for the gender-balanced packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    pub odd_seat_preference: Gender,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            odd_seat_preference: DEFAULT_ODD_SEAT_PREFERENCE,
        }
    }
}

/// Admission cap for `gender` in a section of `capacity` given who is already
/// seated there.
///
/// `half = capacity / 2`; even capacities cap both genders at `half`. For odd
/// capacities the extra seat goes to whichever gender has more occupants already
/// (letting it finish first), then to the gender that still has applicants waiting
/// while the other queue is exhausted, and finally to the configured preference.
///
/// The same formula backs both the full packer and single-approval placement, where
/// the "waiting" flags describe the one incoming applicant.
pub(crate) fn gender_cap(
    capacity: u32,
    seated_male: u32,
    seated_female: u32,
    male_waiting: bool,
    female_waiting: bool,
    preference: Gender,
    gender: Gender,
) -> u32 {
    let half = capacity / 2;
    if capacity % 2 == 0 {
        return half;
    }

    let extra = if seated_male > seated_female {
        Gender::Male
    } else if seated_female > seated_male {
        Gender::Female
    } else if male_waiting && !female_waiting {
        Gender::Male
    } else if female_waiting && !male_waiting {
        Gender::Female
    } else {
        preference
    };

    if gender == extra {
        half + 1
    } else {
        half
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_capacity_caps_both_genders_at_half() {
        for gender in [Gender::Male, Gender::Female] {
            assert_eq!(
                gender_cap(10, 0, 0, true, true, Gender::Male, gender),
                5
            );
        }
    }

    #[test]
    fn odd_capacity_extra_seat_follows_the_leading_gender() {
        assert_eq!(gender_cap(5, 2, 1, true, true, Gender::Male, Gender::Male), 3);
        assert_eq!(
            gender_cap(5, 2, 1, true, true, Gender::Male, Gender::Female),
            2
        );
        assert_eq!(
            gender_cap(5, 1, 2, true, true, Gender::Male, Gender::Female),
            3
        );
    }

    #[test]
    fn odd_capacity_tie_goes_to_the_waiting_queue() {
        assert_eq!(
            gender_cap(7, 1, 1, false, true, Gender::Male, Gender::Female),
            4
        );
        assert_eq!(
            gender_cap(7, 1, 1, false, true, Gender::Male, Gender::Male),
            3
        );
    }

    #[test]
    fn odd_capacity_full_tie_falls_back_to_preference() {
        assert_eq!(gender_cap(5, 0, 0, true, true, Gender::Male, Gender::Male), 3);
        assert_eq!(
            gender_cap(5, 0, 0, true, true, Gender::Female, Gender::Female),
            3
        );
        assert_eq!(
            gender_cap(5, 0, 0, true, true, Gender::Female, Gender::Male),
            2
        );
    }
}
