use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use wardboard_core::{CallingId, MemberId, TaskId};

/// What kind of manual LCR update a task asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LcrTaskKind {
    CallingSustained,
    CallingSetApart,
    NewMember,
    ReleasedFromCalling,
    Other,
}

impl LcrTaskKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            LcrTaskKind::CallingSustained => "Calling Sustained",
            LcrTaskKind::CallingSetApart => "Calling Set Apart",
            LcrTaskKind::NewMember => "New Member",
            LcrTaskKind::ReleasedFromCalling => "Released from Calling",
            LcrTaskKind::Other => "Other",
        }
    }
}

/// Structured detail payload, stored as JSON alongside the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaskDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<MemberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calling_id: Option<CallingId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calling_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A task as produced by a workflow rule, before the actor/created-at stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub kind: LcrTaskKind,
    pub description: String,
    pub details: TaskDetails,
}

/// Persisted follow-up task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcrTask {
    pub id: TaskId,
    #[serde(rename = "type")]
    pub kind: LcrTaskKind,
    pub description: String,
    pub details: TaskDetails,
    pub created_at: DateTime<Utc>,
    /// Display name of the operator whose action triggered the rule.
    pub created_by: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl LcrTask {
    pub fn from_draft(draft: TaskDraft, created_by: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::new(),
            kind: draft.kind,
            description: draft.description,
            details: draft.details,
            created_at: now,
            created_by: created_by.into(),
            completed: false,
            completed_at: None,
            completed_by: None,
            updated_at: now,
        }
    }

    /// pending → completed. Stamps the completer and timestamp. Completing
    /// an already completed task just refreshes the stamp.
    pub fn complete(&mut self, by: impl Into<String>, now: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(now);
        self.completed_by = Some(by.into());
        self.updated_at = now;
    }

    /// completed → pending. Clears the completion metadata; the task goes
    /// back into the pending queue.
    pub fn reopen(&mut self, now: DateTime<Utc>) {
        self.completed = false;
        self.completed_at = None;
        self.completed_by = None;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TaskDraft {
        TaskDraft {
            kind: LcrTaskKind::CallingSustained,
            description: "Jane Doe was sustained as Primary Teacher".to_string(),
            details: TaskDetails {
                member_name: Some("Jane Doe".to_string()),
                calling_title: Some("Primary Teacher".to_string()),
                notes: Some("Sustained in Sacrament Meeting".to_string()),
                ..TaskDetails::default()
            },
        }
    }

    #[test]
    fn draft_starts_pending() {
        let task = LcrTask::from_draft(draft(), "Bishop Allred", Utc::now());
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert!(task.completed_by.is_none());
        assert_eq!(task.created_by, "Bishop Allred");
    }

    #[test]
    fn complete_then_reopen() {
        let mut task = LcrTask::from_draft(draft(), "System", Utc::now());

        let when = Utc::now();
        task.complete("Ward Clerk", when);
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(when));
        assert_eq!(task.completed_by.as_deref(), Some("Ward Clerk"));

        task.reopen(Utc::now());
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert!(task.completed_by.is_none());
    }
}
