use serde::{Deserialize, Serialize};

use wardboard_auth::{AccountStatus, Grant, Identity, Role};
use wardboard_core::MemberId;
use wardboard_infra::SessionToken;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignCallingRequest {
    pub member_id: MemberId,
}

#[derive(Debug, Deserialize)]
pub struct GroupMemberRequest {
    pub member_id: MemberId,
}

#[derive(Debug, Deserialize)]
pub struct SetProcessedRequest {
    pub processed: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub password: Option<String>,
}

/// `permissions: null` resets the account to its role defaults.
#[derive(Debug, Deserialize)]
pub struct SetPermissionsRequest {
    pub permissions: Option<Vec<Grant>>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: SessionToken,
    pub user: Identity,
}

#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub members: u64,
    pub callings: u64,
    pub vacant_callings: u64,
    pub fhe_groups: u64,
    pub events: u64,
    pub pending_tasks: u64,
    pub unprocessed_responses: u64,
}
