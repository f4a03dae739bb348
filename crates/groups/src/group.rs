use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wardboard_core::{DomainError, DomainResult, GroupId, MemberId};

/// Submitted group form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GroupDraft {
    pub name: String,
    #[serde(default)]
    pub leader: Option<MemberId>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meeting_time: Option<String>,
    #[serde(default)]
    pub activity_image: Option<String>,
}

/// A small recurring meeting roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FheGroup {
    pub id: GroupId,
    pub name: String,
    pub leader: Option<MemberId>,
    pub location: Option<String>,
    pub meeting_time: Option<String>,
    /// Stored object key of the uploaded group photo, if any.
    pub activity_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FheGroup {
    pub fn create(id: GroupId, draft: GroupDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let draft = validate(draft)?;
        Ok(Self {
            id,
            name: draft.name,
            leader: draft.leader,
            location: draft.location,
            meeting_time: draft.meeting_time,
            activity_image: draft.activity_image,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, draft: GroupDraft, now: DateTime<Utc>) -> DomainResult<()> {
        let draft = validate(draft)?;
        self.name = draft.name;
        self.leader = draft.leader;
        self.location = draft.location;
        self.meeting_time = draft.meeting_time;
        self.activity_image = draft.activity_image;
        self.updated_at = now;
        Ok(())
    }
}

fn validate(mut draft: GroupDraft) -> DomainResult<GroupDraft> {
    draft.name = draft.name.trim().to_string();
    if draft.name.is_empty() {
        return Err(DomainError::validation("group name cannot be empty"));
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_update() {
        let mut group = FheGroup::create(
            GroupId::new(),
            GroupDraft {
                name: "North Hills".to_string(),
                location: Some("Miller home".to_string()),
                meeting_time: Some("Monday 7pm".to_string()),
                ..GroupDraft::default()
            },
            Utc::now(),
        )
        .unwrap();

        let leader = MemberId::new();
        group
            .apply(
                GroupDraft {
                    name: "North Hills".to_string(),
                    leader: Some(leader),
                    location: Some("Miller home".to_string()),
                    meeting_time: Some("Monday 7:30pm".to_string()),
                    ..GroupDraft::default()
                },
                Utc::now(),
            )
            .unwrap();

        assert_eq!(group.leader, Some(leader));
        assert_eq!(group.meeting_time.as_deref(), Some("Monday 7:30pm"));
    }

    #[test]
    fn empty_name_rejected() {
        assert!(FheGroup::create(GroupId::new(), GroupDraft::default(), Utc::now()).is_err());
    }
}
