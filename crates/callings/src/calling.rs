use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use wardboard_core::{CallingId, DomainError, DomainResult, MemberId};
use wardboard_tasks::{LcrTaskKind, TaskDetails, TaskDraft};

/// Whether a calling currently has a holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CallingStatus {
    Filled,
    #[default]
    Vacant,
}

/// Submitted calling form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CallingDraft {
    pub title: String,
    pub organization: String,
    #[serde(default)]
    pub status: CallingStatus,
    #[serde(default)]
    pub member: Option<MemberId>,
    #[serde(default)]
    pub sustained_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_set_apart: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A volunteer role slot.
///
/// Invariant: status = filled iff a member link is present; a vacant calling
/// carries no sustained date and no set-apart flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calling {
    pub id: CallingId,
    pub title: String,
    pub organization: String,
    pub status: CallingStatus,
    pub member: Option<MemberId>,
    pub sustained_date: Option<NaiveDate>,
    pub is_set_apart: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Calling {
    /// No rule fires on creation; a freshly created calling is a plain write.
    pub fn create(id: CallingId, draft: CallingDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let draft = normalize(draft)?;
        Ok(Self {
            id,
            title: draft.title,
            organization: draft.organization,
            status: draft.status,
            member: draft.member,
            sustained_date: draft.sustained_date,
            is_set_apart: draft.is_set_apart,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a full-record form submission.
    ///
    /// This is the plain write half of an edit; callers snapshot the record
    /// beforehand and feed (prev, next) through [`crate::rules::side_effects`].
    pub fn apply(&mut self, draft: CallingDraft, now: DateTime<Utc>) -> DomainResult<()> {
        let draft = normalize(draft)?;
        self.title = draft.title;
        self.organization = draft.organization;
        self.status = draft.status;
        self.member = draft.member;
        self.sustained_date = draft.sustained_date;
        self.is_set_apart = draft.is_set_apart;
        self.notes = draft.notes;
        self.updated_at = now;
        Ok(())
    }

    /// Assign a member through the dedicated assignment flow.
    ///
    /// Only valid on a vacant calling; sets it filled with sustained date =
    /// today and unconditionally yields a "calling sustained" draft —
    /// assignment implies sustaining, and the vacant precondition guarantees
    /// the transition is new.
    pub fn assign(
        &mut self,
        member: MemberId,
        member_name: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<TaskDraft> {
        if self.status != CallingStatus::Vacant {
            return Err(DomainError::invariant("calling is not vacant"));
        }

        let today = now.date_naive();
        self.status = CallingStatus::Filled;
        self.member = Some(member);
        self.sustained_date = Some(today);
        self.updated_at = now;

        Ok(TaskDraft {
            kind: LcrTaskKind::CallingSustained,
            description: format!("{member_name} was sustained as {}", self.title),
            details: TaskDetails {
                member_id: Some(member),
                member_name: Some(member_name.to_string()),
                calling_id: Some(self.id),
                calling_title: Some(self.title.clone()),
                date: Some(today),
                notes: Some("Sustained in Sacrament Meeting".to_string()),
            },
        })
    }

    /// Release the current holder.
    ///
    /// Resets the calling to vacant (member link, sustained date, and
    /// set-apart flag all cleared) and yields a "released from calling"
    /// draft for the released member.
    pub fn release(&mut self, member_name: &str, now: DateTime<Utc>) -> DomainResult<TaskDraft> {
        let Some(member) = self.member else {
            return Err(DomainError::invariant("calling has no member to release"));
        };

        let draft = TaskDraft {
            kind: LcrTaskKind::ReleasedFromCalling,
            description: format!("{member_name} was released from {}", self.title),
            details: TaskDetails {
                member_id: Some(member),
                member_name: Some(member_name.to_string()),
                calling_id: Some(self.id),
                calling_title: Some(self.title.clone()),
                date: Some(now.date_naive()),
                notes: Some("Released in Sacrament Meeting".to_string()),
            },
        };

        self.vacate(now);
        Ok(draft)
    }

    /// Reset to vacant without a follow-up task. Used by the member-delete
    /// cascade, which removes the holder rather than releasing them.
    pub fn vacate(&mut self, now: DateTime<Utc>) {
        self.status = CallingStatus::Vacant;
        self.member = None;
        self.sustained_date = None;
        self.is_set_apart = false;
        self.updated_at = now;
    }
}

/// Enforce the filled⇔member invariant on submitted data, the way the edit
/// form did: a vacant submission drops holder fields, a filled submission
/// without a member is rejected.
fn normalize(mut draft: CallingDraft) -> DomainResult<CallingDraft> {
    draft.title = draft.title.trim().to_string();
    draft.organization = draft.organization.trim().to_string();
    if draft.title.is_empty() {
        return Err(DomainError::validation("calling title cannot be empty"));
    }
    if draft.organization.is_empty() {
        return Err(DomainError::validation("organization cannot be empty"));
    }

    match draft.status {
        CallingStatus::Vacant => {
            draft.member = None;
            draft.sustained_date = None;
            draft.is_set_apart = false;
        }
        CallingStatus::Filled => {
            if draft.member.is_none() {
                return Err(DomainError::validation(
                    "a filled calling requires an assigned member",
                ));
            }
        }
    }

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vacant() -> Calling {
        Calling::create(
            CallingId::new(),
            CallingDraft {
                title: "Primary Teacher".to_string(),
                organization: "Primary".to_string(),
                ..CallingDraft::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn vacant_submission_clears_holder_fields() {
        let mut calling = vacant();
        calling
            .apply(
                CallingDraft {
                    title: "Primary Teacher".to_string(),
                    organization: "Primary".to_string(),
                    status: CallingStatus::Vacant,
                    member: Some(MemberId::new()),
                    sustained_date: Some(Utc::now().date_naive()),
                    is_set_apart: true,
                    ..CallingDraft::default()
                },
                Utc::now(),
            )
            .unwrap();

        assert_eq!(calling.status, CallingStatus::Vacant);
        assert!(calling.member.is_none());
        assert!(calling.sustained_date.is_none());
        assert!(!calling.is_set_apart);
    }

    #[test]
    fn filled_requires_member() {
        let mut calling = vacant();
        let err = calling
            .apply(
                CallingDraft {
                    title: "Primary Teacher".to_string(),
                    organization: "Primary".to_string(),
                    status: CallingStatus::Filled,
                    ..CallingDraft::default()
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn assign_fills_and_sustains_today() {
        let mut calling = vacant();
        let member = MemberId::new();
        let now = Utc::now();

        let draft = calling.assign(member, "Edna Marsh", now).unwrap();

        assert_eq!(calling.status, CallingStatus::Filled);
        assert_eq!(calling.member, Some(member));
        assert_eq!(calling.sustained_date, Some(now.date_naive()));
        assert!(!calling.is_set_apart);

        assert_eq!(draft.kind, LcrTaskKind::CallingSustained);
        assert_eq!(draft.description, "Edna Marsh was sustained as Primary Teacher");
        assert_eq!(draft.details.member_id, Some(member));
        assert_eq!(draft.details.date, Some(now.date_naive()));
    }

    #[test]
    fn assign_rejects_filled_calling() {
        let mut calling = vacant();
        calling.assign(MemberId::new(), "A", Utc::now()).unwrap();
        let err = calling.assign(MemberId::new(), "B", Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn release_clears_everything_and_names_member() {
        let mut calling = vacant();
        let member = MemberId::new();
        calling.assign(member, "Edna Marsh", Utc::now()).unwrap();
        calling.is_set_apart = true;

        let draft = calling.release("Edna Marsh", Utc::now()).unwrap();

        assert_eq!(calling.status, CallingStatus::Vacant);
        assert!(calling.member.is_none());
        assert!(calling.sustained_date.is_none());
        assert!(!calling.is_set_apart);

        assert_eq!(draft.kind, LcrTaskKind::ReleasedFromCalling);
        assert_eq!(
            draft.description,
            "Edna Marsh was released from Primary Teacher"
        );
        assert_eq!(draft.details.member_id, Some(member));
    }

    #[test]
    fn release_requires_holder() {
        let mut calling = vacant();
        assert!(calling.release("X", Utc::now()).is_err());
    }
}
