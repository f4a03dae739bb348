//! Ward member directory entities.
//!
//! Pure domain types and validation; storage and the delete-cascade over
//! callings live in the service layer.

pub mod member;

pub use member::{Member, MemberDraft, MemberStatus};
