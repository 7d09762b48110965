use serde::{Deserialize, Serialize};
use std::fmt;

/// Academic tracks ("strands") the portal enrolls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Track {
    Ict,
    Gas,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Ict, Track::Gas];

    /// Strand tag as stored on applicant rows.
    pub const fn strand(self) -> &'static str {
        match self {
            Track::Ict => "ICT",
            Track::Gas => "GAS",
        }
    }

    /// Section-name prefix, e.g. `ICT11` in `ICT11-A`.
    pub const fn code(self) -> &'static str {
        match self {
            Track::Ict => "ICT11",
            Track::Gas => "GAS11",
        }
    }

    pub fn from_strand(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ICT" | "ICT11" => Some(Track::Ict),
            "GAS" | "GAS11" => Some(Track::Gas),
            _ => None,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strand())
    }
}

/// Gender is a closed two-valued attribute in this system; the balance rule in the
/// allocator is written against exactly these two buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn other(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Review status tracked for every submitted application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Pending",
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::Rejected => "Rejected",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

/// Identifier wrapper for section rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SectionId(pub u64);

/// Identifier wrapper for applicant rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ApplicantId(pub u64);

/// Learner reference number, the applicant's natural key. Always exactly twelve
/// digits; construction is the only place the shape is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lrn(String);

impl Lrn {
    pub fn new(raw: &str) -> Result<Self, InvalidLrn> {
        let trimmed = raw.trim();
        if trimmed.len() == 12 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidLrn(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Lrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("'{0}' is not a valid LRN: expected exactly 12 digits")]
pub struct InvalidLrn(String);

/// A section within a track. The `letter` field is the zero-based ordinal; within a
/// track letters are contiguous from A with no gaps, which the lifecycle manager
/// enforces on every add and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub track: Track,
    pub letter: u8,
    pub capacity: u32,
}

impl Section {
    pub fn letter_char(&self) -> char {
        (b'A' + self.letter) as char
    }

    /// Human key, e.g. `ICT11-A`. Ordering by name equals ordering by
    /// (track, letter) for single-letter suffixes, which the synchronizer relies on
    /// when spreading the capacity remainder.
    pub fn name(&self) -> String {
        format!("{}-{}", self.track.code(), self.letter_char())
    }
}

/// Denormalized assignment pair written to applicant rows: the section id plus its
/// display label, kept together so the status page never joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub section_id: SectionId,
    pub label: String,
}

impl Seat {
    pub fn of(section: &Section) -> Self {
        Self {
            section_id: section.id,
            label: section.name(),
        }
    }
}

/// Label shown for applicants without a seat.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// An enrollment applicant as read from and written to the store.
///
/// Invariants: `seat` is `Some` only when `status` is `Approved`, and the seat's
/// section always belongs to the applicant's own track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub lrn: Lrn,
    pub last_name: String,
    pub first_name: String,
    pub track: Track,
    pub gender: Gender,
    pub status: ApprovalStatus,
    pub registrar_feedback: Option<String>,
    pub seat: Option<Seat>,
}

impl Applicant {
    pub fn section_label(&self) -> &str {
        self.seat
            .as_ref()
            .map(|seat| seat.label.as_str())
            .unwrap_or(UNASSIGNED_LABEL)
    }

    /// Stable ordering key used wherever applicants are queued deterministically.
    /// The LRN suffix makes the key total so re-runs reproduce identical plans.
    pub fn roster_key(&self) -> (String, String, String) {
        (
            self.last_name.to_ascii_lowercase(),
            self.first_name.to_ascii_lowercase(),
            self.lrn.as_str().to_string(),
        )
    }
}

/// Payload captured from the public application form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentSubmission {
    pub lrn: Lrn,
    pub last_name: String,
    pub first_name: String,
    pub track: Track,
    pub gender: Gender,
}
