//! `wardboard-auth` — identity and permission evaluation (pure).
//!
//! This crate is intentionally decoupled from HTTP and storage: it decides,
//! for a given identity, whether a (resource, action) pair is allowed, and
//! nothing else. Session plumbing lives in infra; enforcement lives in api.

pub mod identity;
pub mod permissions;
pub mod roles;

pub use identity::{AccountStatus, Identity, UserAccount};
pub use permissions::{
    default_grants, effective_grants, grants_equal, is_granted, Action, Grant, Resource,
};
pub use roles::Role;
