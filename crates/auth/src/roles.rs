//! Operator roles.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use wardboard_core::DomainError;

/// Role held by an operator account.
///
/// The enumeration is closed: every account has exactly one role, and the
/// role→grant mapping in [`crate::permissions`] is total over it. A role
/// string that does not parse is treated by callers as "no grants"
/// (fail closed), not as a runtime panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Bishopric,
    WardClerk,
    EldersQuorum,
    ReliefSociety,
    Member,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Bishopric,
        Role::WardClerk,
        Role::EldersQuorum,
        Role::ReliefSociety,
        Role::Member,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Bishopric => "bishopric",
            Role::WardClerk => "ward_clerk",
            Role::EldersQuorum => "elders_quorum",
            Role::ReliefSociety => "relief_society",
            Role::Member => "member",
        }
    }

    /// Human-readable name for lists and badges.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Bishopric => "Bishopric",
            Role::WardClerk => "Ward Clerk",
            Role::EldersQuorum => "Elders Quorum",
            Role::ReliefSociety => "Relief Society",
            Role::Member => "Member",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "bishopric" => Ok(Role::Bishopric),
            "ward_clerk" => Ok(Role::WardClerk),
            "elders_quorum" => Ok(Role::EldersQuorum),
            "relief_society" => Ok(Role::ReliefSociety),
            "member" => Ok(Role::Member),
            other => Err(DomainError::validation(format!("unknown role: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_fails_closed() {
        assert!("stake_president".parse::<Role>().is_err());
    }
}
