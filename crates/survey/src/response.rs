use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use wardboard_core::{DomainError, DomainResult, ResponseId};
use wardboard_directory::{MemberDraft, MemberStatus};

/// Raw survey form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SurveySubmission {
    pub full_name: String,
    #[serde(default)]
    pub record_number: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub family_members: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub previous_ward: Option<String>,
    #[serde(default)]
    pub previous_stake: Option<String>,
    #[serde(default)]
    pub move_in_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_homeowner: bool,
    #[serde(default)]
    pub is_renting: bool,
    /// Free text; comma-separated by convention.
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub calling_preferences: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

/// Stored intake survey response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: ResponseId,
    #[serde(flatten)]
    pub submission: SurveySubmission,
    pub submitted_at: DateTime<Utc>,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SurveyResponse {
    pub fn create(
        id: ResponseId,
        mut submission: SurveySubmission,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        submission.full_name = submission.full_name.trim().to_string();
        if submission.full_name.is_empty() {
            return Err(DomainError::validation("full name is required"));
        }

        Ok(Self {
            id,
            submission,
            submitted_at: now,
            processed: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Flip the processed flag. One-directional in the normal flow
    /// (false→true when a member is created), but an operator may revert.
    pub fn set_processed(&mut self, processed: bool, now: DateTime<Utc>) {
        self.processed = processed;
        self.updated_at = now;
    }
}

/// Build a directory entry from a survey response.
///
/// Contact fields are copied verbatim, the member starts active, the
/// free-text skills field is comma-split, and additional info lands in the
/// member notes.
pub fn member_draft_from_response(response: &SurveyResponse) -> MemberDraft {
    let s = &response.submission;
    MemberDraft {
        name: s.full_name.clone(),
        email: s.email.clone(),
        phone: s.phone.clone(),
        address: s.address.clone(),
        status: MemberStatus::Active,
        skills: s
            .skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        fhe_group: None,
        notes: s.additional_info.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> SurveySubmission {
        SurveySubmission {
            full_name: "Hal Jenson".to_string(),
            email: Some("hal@example.com".to_string()),
            phone: Some("555-0142".to_string()),
            address: Some("14 Birch Ln".to_string()),
            skills: Some("piano, carpentry , ".to_string()),
            additional_info: Some("recently moved from Mesa".to_string()),
            ..SurveySubmission::default()
        }
    }

    #[test]
    fn starts_unprocessed() {
        let response = SurveyResponse::create(ResponseId::new(), submission(), Utc::now()).unwrap();
        assert!(!response.processed);
    }

    #[test]
    fn member_draft_copies_contact_fields() {
        let response = SurveyResponse::create(ResponseId::new(), submission(), Utc::now()).unwrap();
        let draft = member_draft_from_response(&response);

        assert_eq!(draft.name, "Hal Jenson");
        assert_eq!(draft.email.as_deref(), Some("hal@example.com"));
        assert_eq!(draft.phone.as_deref(), Some("555-0142"));
        assert_eq!(draft.address.as_deref(), Some("14 Birch Ln"));
        assert_eq!(draft.status, MemberStatus::Active);
        assert_eq!(draft.skills, vec!["piano".to_string(), "carpentry".to_string()]);
        assert_eq!(draft.notes.as_deref(), Some("recently moved from Mesa"));
    }

    #[test]
    fn processed_flag_is_reversible() {
        let mut response =
            SurveyResponse::create(ResponseId::new(), submission(), Utc::now()).unwrap();
        response.set_processed(true, Utc::now());
        assert!(response.processed);
        response.set_processed(false, Utc::now());
        assert!(!response.processed);
    }

    #[test]
    fn blank_name_rejected() {
        let mut s = submission();
        s.full_name = " ".to_string();
        assert!(SurveyResponse::create(ResponseId::new(), s, Utc::now()).is_err());
    }
}
