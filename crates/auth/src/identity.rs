//! Operator identity and the stored account record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wardboard_core::{DomainError, DomainResult, UserId};

use crate::permissions::{default_grants, grants_equal, Grant};
use crate::roles::Role;

/// The signed-in operator, as seen by permission checks and audit stamps.
///
/// This is passed explicitly through request handling (no ambient session
/// global), so permission evaluation is testable without a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    /// Explicit per-account grant override. `None` means the role default
    /// applies.
    pub permissions: Option<Vec<Grant>>,
}

/// Account status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

/// Stored operator account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Explicit grant override; `None` means the role default applies.
    pub permissions: Option<Vec<Grant>>,
    pub status: AccountStatus,
    pub last_login: Option<DateTime<Utc>>,
    /// Argon2 PHC string. Never serialized out to API responses.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Create a new active account.
    ///
    /// Accounts are seeded with their role's default grants left implicit
    /// (`permissions = None`); an explicit set is only stored once an
    /// operator customizes it.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        password_hash: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let email = email.into().trim().to_lowercase();
        let name = name.into().trim().to_string();

        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        if name.is_empty() {
            return Err(DomainError::validation("display name cannot be empty"));
        }

        Ok(Self {
            id,
            email,
            name,
            role,
            permissions: None,
            status: AccountStatus::Active,
            last_login: None,
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Identity view used for permission checks and audit stamps.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            email: self.email.clone(),
            display_name: self.name.clone(),
            role: self.role,
            permissions: self.permissions.clone(),
        }
    }

    /// Whether this account's stored grants differ from its role default.
    ///
    /// Comparison is order-independent; storing the defaults in a different
    /// order is not "custom".
    pub fn has_custom_grants(&self) -> bool {
        match &self.permissions {
            None => false,
            Some(stored) => !grants_equal(stored, &default_grants(self.role)),
        }
    }

    /// Replace the explicit grant set. Passing the role defaults (in any
    /// order) clears the override instead of storing a redundant copy.
    pub fn set_grants(&mut self, grants: Option<Vec<Grant>>, now: DateTime<Utc>) {
        self.permissions = match grants {
            Some(g) if grants_equal(&g, &default_grants(self.role)) => None,
            other => other,
        };
        self.updated_at = now;
    }

    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login = Some(now);
        self.updated_at = now;
    }
}
