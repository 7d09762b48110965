use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::ApplicantId;

/// Admin identity attached to audit records. Session handling lives outside this
/// core; callers pass whatever identity their auth layer resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn system() -> Self {
        Self {
            id: "system".to_string(),
            name: "System".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    StatusChanged,
    SectionAdded,
    SectionDeleted,
    CapacityChanged,
    Synchronized,
}

impl AuditAction {
    pub const fn label(self) -> &'static str {
        match self {
            AuditAction::StatusChanged => "status_changed",
            AuditAction::SectionAdded => "section_added",
            AuditAction::SectionDeleted => "section_deleted",
            AuditAction::CapacityChanged => "capacity_changed",
            AuditAction::Synchronized => "synchronized",
        }
    }
}

/// One activity-log row: who did what to whom, when, with free-text detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor_id: String,
    pub actor_name: String,
    pub action: AuditAction,
    pub subject_name: String,
    pub subject_id: Option<ApplicantId>,
    pub detail: String,
    pub at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        actor: &Actor,
        action: AuditAction,
        subject_name: impl Into<String>,
        subject_id: Option<ApplicantId>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            action,
            subject_name: subject_name.into(),
            subject_id,
            detail: detail.into(),
            at: Utc::now(),
        }
    }
}

/// Outbound activity-log hook. The concrete transport (store table, queue) is an
/// external collaborator.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit transport unavailable: {0}")]
    Transport(String),
}
