use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wardboard_core::{DomainError, DomainResult, GroupId, MemberId};

/// Activity status of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MemberStatus {
    #[default]
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "less-active")]
    LessActive,
}

/// Submitted member form data (create and full-record update share a shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MemberDraft {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub fhe_group: Option<GroupId>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A congregant's directory entry.
///
/// A member may hold zero or more callings concurrently (links live on the
/// calling side) and belongs to at most one FHE group at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: MemberStatus,
    pub skills: Vec<String>,
    pub fhe_group: Option<GroupId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn create(id: MemberId, draft: MemberDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let draft = validate(draft)?;
        Ok(Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            address: draft.address,
            status: draft.status,
            skills: draft.skills,
            fhe_group: draft.fhe_group,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a full-record form submission. Plain write, no side effects.
    pub fn apply(&mut self, draft: MemberDraft, now: DateTime<Utc>) -> DomainResult<()> {
        let draft = validate(draft)?;
        self.name = draft.name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.address = draft.address;
        self.status = draft.status;
        self.skills = draft.skills;
        self.fhe_group = draft.fhe_group;
        self.notes = draft.notes;
        self.updated_at = now;
        Ok(())
    }

    /// Move the member into a group (or out of all groups with `None`).
    /// Membership is exclusive by construction: the link lives here.
    pub fn set_group(&mut self, group: Option<GroupId>, now: DateTime<Utc>) {
        self.fhe_group = group;
        self.updated_at = now;
    }
}

fn validate(mut draft: MemberDraft) -> DomainResult<MemberDraft> {
    draft.name = draft.name.trim().to_string();
    if draft.name.is_empty() {
        return Err(DomainError::validation("member name cannot be empty"));
    }
    draft.skills.retain(|s| !s.trim().is_empty());
    for s in &mut draft.skills {
        *s = s.trim().to_string();
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_trims_and_validates() {
        let member = Member::create(
            MemberId::new(),
            MemberDraft {
                name: "  Amos Whitfield ".to_string(),
                skills: vec!["piano ".to_string(), "  ".to_string()],
                ..MemberDraft::default()
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(member.name, "Amos Whitfield");
        assert_eq!(member.skills, vec!["piano".to_string()]);
        assert_eq!(member.status, MemberStatus::Active);
    }

    #[test]
    fn empty_name_rejected() {
        let err = Member::create(
            MemberId::new(),
            MemberDraft {
                name: "   ".to_string(),
                ..MemberDraft::default()
            },
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn set_group_is_exclusive() {
        let mut member = Member::create(
            MemberId::new(),
            MemberDraft {
                name: "Amos".to_string(),
                ..MemberDraft::default()
            },
            Utc::now(),
        )
        .unwrap();

        let first = GroupId::new();
        let second = GroupId::new();
        member.set_group(Some(first), Utc::now());
        member.set_group(Some(second), Utc::now());
        assert_eq!(member.fhe_group, Some(second));
    }
}
