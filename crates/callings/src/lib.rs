//! Calling records and the workflow rules layered on top of them.
//!
//! Editing a calling is the one place where "edit a record" is not just a
//! direct write: specific field transitions enqueue an LCR follow-up task
//! for the clerk. The rules are pure functions here; the service layer owns
//! the two-call write sequence.

pub mod calling;
pub mod rules;

pub use calling::{Calling, CallingDraft, CallingStatus};
pub use rules::{side_effects, RuleContext};
