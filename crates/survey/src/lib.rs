//! New-member intake survey.
//!
//! Responses are raw submissions from the public (but authenticated) survey
//! form. They are never deleted; "create member" copies the contact fields
//! into the directory and flips the processed flag, keeping the response as
//! the audit record.

pub mod response;

pub use response::{member_draft_from_response, SurveyResponse, SurveySubmission};
