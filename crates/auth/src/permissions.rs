//! Role→grant mapping and permission evaluation.
//!
//! All functions here are deterministic and side-effect-free: the default
//! table is used both to seed new accounts and to show "what would the
//! default be" when an operator toggles custom permissions off.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;
use crate::roles::Role;

/// A permission-gated area of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Dashboard,
    Members,
    Callings,
    FheGroups,
    Calendar,
    Survey,
    SurveyResponses,
    Users,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Dashboard,
        Resource::Members,
        Resource::Callings,
        Resource::FheGroups,
        Resource::Calendar,
        Resource::Survey,
        Resource::SurveyResponses,
        Resource::Users,
    ];
}

/// What an operator may do with a resource.
///
/// `Edit` does not imply `View`; both must be granted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Edit,
}

/// An allowed (resource, action) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub resource: Resource,
    pub action: Action,
}

impl Grant {
    pub fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    fn view(resource: Resource) -> Self {
        Self::new(resource, Action::View)
    }

    fn edit(resource: Resource) -> Self {
        Self::new(resource, Action::Edit)
    }
}

/// Default grant set for a role.
///
/// Total over [`Role`]; the admin set is every (resource, action) pair.
pub fn default_grants(role: Role) -> Vec<Grant> {
    use Resource::*;

    match role {
        Role::Admin => Resource::ALL
            .iter()
            .flat_map(|&r| [Grant::view(r), Grant::edit(r)])
            .collect(),

        // Bishopric sees everything and edits everything except user accounts.
        Role::Bishopric => Resource::ALL
            .iter()
            .flat_map(|&r| {
                let edit = (r != Users).then(|| Grant::edit(r));
                [Some(Grant::view(r)), edit].into_iter().flatten()
            })
            .collect(),

        Role::WardClerk => vec![
            Grant::view(Dashboard),
            Grant::view(Members),
            Grant::edit(Members),
            Grant::view(Callings),
            Grant::edit(Callings),
            Grant::view(FheGroups),
            Grant::view(Calendar),
            Grant::edit(Calendar),
            Grant::view(Survey),
            Grant::view(SurveyResponses),
            Grant::edit(SurveyResponses),
        ],

        Role::EldersQuorum | Role::ReliefSociety => vec![
            Grant::view(Dashboard),
            Grant::view(Members),
            Grant::view(Callings),
            Grant::view(FheGroups),
            Grant::edit(FheGroups),
            Grant::view(Calendar),
            Grant::edit(Calendar),
            Grant::view(Survey),
        ],

        Role::Member => vec![
            Grant::view(Dashboard),
            Grant::view(Calendar),
            Grant::view(FheGroups),
            Grant::view(Survey),
            Grant::edit(Survey),
        ],
    }
}

/// The grant set that currently applies to an identity: the explicit
/// per-account override if present, else the role default.
pub fn effective_grants(identity: &Identity) -> Cow<'_, [Grant]> {
    match &identity.permissions {
        Some(custom) => Cow::Borrowed(custom.as_slice()),
        None => Cow::Owned(default_grants(identity.role)),
    }
}

/// Decide whether `identity` may perform `action` on `resource`.
///
/// Unauthenticated (`None`) is always denied. Admin is always allowed,
/// regardless of any stored custom grants.
pub fn is_granted(identity: Option<&Identity>, resource: Resource, action: Action) -> bool {
    let Some(identity) = identity else {
        return false;
    };

    if identity.role == Role::Admin {
        return true;
    }

    effective_grants(identity)
        .iter()
        .any(|g| g.resource == resource && g.action == action)
}

/// Order-independent multiset equality over (resource, action) pairs.
///
/// Used to decide whether an account's stored grants are "custom": any
/// difference from the freshly computed role default, including a different
/// cardinality, counts.
pub fn grants_equal(a: &[Grant], b: &[Grant]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut counts: HashMap<Grant, i64> = HashMap::new();
    for g in a {
        *counts.entry(*g).or_insert(0) += 1;
    }
    for g in b {
        *counts.entry(*g).or_insert(0) -= 1;
    }

    counts.values().all(|&c| c == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wardboard_core::UserId;

    fn identity(role: Role, permissions: Option<Vec<Grant>>) -> Identity {
        Identity {
            user_id: UserId::new(),
            email: "clerk@ward.example".to_string(),
            display_name: "Test Operator".to_string(),
            role,
            permissions,
        }
    }

    fn grant_count(role: Role) -> usize {
        default_grants(role).len()
    }

    #[test]
    fn default_table_matches_design() {
        // admin: every pair
        assert_eq!(grant_count(Role::Admin), Resource::ALL.len() * 2);

        // bishopric: view everywhere, edit everywhere but users
        let bishopric = default_grants(Role::Bishopric);
        assert_eq!(bishopric.len(), Resource::ALL.len() * 2 - 1);
        assert!(bishopric.contains(&Grant::view(Resource::Users)));
        assert!(!bishopric.contains(&Grant::edit(Resource::Users)));

        // ward clerk: edit on members, callings, calendar, survey_responses only
        let clerk = default_grants(Role::WardClerk);
        for r in [
            Resource::Members,
            Resource::Callings,
            Resource::Calendar,
            Resource::SurveyResponses,
        ] {
            assert!(clerk.contains(&Grant::edit(r)), "clerk should edit {r:?}");
        }
        for r in [Resource::Dashboard, Resource::FheGroups, Resource::Survey] {
            assert!(clerk.contains(&Grant::view(r)));
            assert!(!clerk.contains(&Grant::edit(r)), "clerk must not edit {r:?}");
        }
        assert!(!clerk.contains(&Grant::view(Resource::Users)));

        // EQ and RS share a table
        assert_eq!(
            default_grants(Role::EldersQuorum),
            default_grants(Role::ReliefSociety)
        );
        let eq = default_grants(Role::EldersQuorum);
        assert!(eq.contains(&Grant::edit(Resource::FheGroups)));
        assert!(eq.contains(&Grant::edit(Resource::Calendar)));
        assert!(!eq.contains(&Grant::edit(Resource::Members)));

        // member: survey is the only editable resource
        let member = default_grants(Role::Member);
        assert!(member.contains(&Grant::edit(Resource::Survey)));
        assert_eq!(
            member.iter().filter(|g| g.action == Action::Edit).count(),
            1
        );
    }

    #[test]
    fn default_table_has_no_duplicates() {
        for role in Role::ALL {
            let grants = default_grants(role);
            for (i, g) in grants.iter().enumerate() {
                assert!(
                    !grants[i + 1..].contains(g),
                    "{role:?} default contains duplicate {g:?}"
                );
            }
        }
    }

    #[test]
    fn admin_is_always_granted() {
        // Even with a stored custom set that grants nothing.
        let admin = identity(Role::Admin, Some(vec![]));
        for resource in Resource::ALL {
            for action in [Action::View, Action::Edit] {
                assert!(is_granted(Some(&admin), resource, action));
            }
        }
    }

    #[test]
    fn member_role_grants() {
        let member = identity(Role::Member, None);
        assert!(!is_granted(Some(&member), Resource::Users, Action::Edit));
        assert!(is_granted(Some(&member), Resource::Survey, Action::Edit));
    }

    #[test]
    fn unauthenticated_is_denied() {
        assert!(!is_granted(None, Resource::Dashboard, Action::View));
    }

    #[test]
    fn edit_does_not_imply_view() {
        // A custom set with edit-only on members must not grant view.
        let ident = identity(
            Role::WardClerk,
            Some(vec![Grant::edit(Resource::Members)]),
        );
        assert!(is_granted(Some(&ident), Resource::Members, Action::Edit));
        assert!(!is_granted(Some(&ident), Resource::Members, Action::View));
    }

    #[test]
    fn custom_override_replaces_role_default() {
        let ident = identity(Role::Member, Some(vec![Grant::view(Resource::Members)]));
        assert!(is_granted(Some(&ident), Resource::Members, Action::View));
        // The role default would have granted this; the override does not.
        assert!(!is_granted(Some(&ident), Resource::Survey, Action::Edit));
    }

    #[test]
    fn grants_equal_is_order_independent() {
        let mut shuffled = default_grants(Role::WardClerk);
        shuffled.reverse();
        assert!(grants_equal(&shuffled, &default_grants(Role::WardClerk)));
    }

    #[test]
    fn one_extra_grant_is_custom() {
        let mut grants = default_grants(Role::Member);
        grants.push(Grant::edit(Resource::Users));
        assert!(!grants_equal(&grants, &default_grants(Role::Member)));
    }

    #[test]
    fn cardinality_difference_is_custom() {
        let mut grants = default_grants(Role::Member);
        grants.pop();
        assert!(!grants_equal(&grants, &default_grants(Role::Member)));
    }

    proptest! {
        /// Any permutation of a role's defaults compares equal; appending any
        /// grant breaks equality (defaults are duplicate-free).
        #[test]
        fn permutation_invariance(
            role_idx in 0usize..Role::ALL.len(),
            seed in proptest::collection::vec(any::<u64>(), 0..32),
            extra_resource in 0usize..Resource::ALL.len(),
            extra_edit in any::<bool>(),
        ) {
            let role = Role::ALL[role_idx];
            let defaults = default_grants(role);

            let mut shuffled = defaults.clone();
            for (i, s) in seed.iter().enumerate() {
                if shuffled.len() > 1 {
                    let len = shuffled.len();
                    let j = (*s as usize) % len;
                    shuffled.swap(i % len, j);
                }
            }
            prop_assert!(grants_equal(&shuffled, &defaults));

            let extra = Grant::new(
                Resource::ALL[extra_resource],
                if extra_edit { Action::Edit } else { Action::View },
            );
            shuffled.push(extra);
            prop_assert!(!grants_equal(&shuffled, &defaults));
        }
    }
}
