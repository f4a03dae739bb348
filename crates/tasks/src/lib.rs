//! LCR follow-up tasks.
//!
//! The external membership system (LCR) is never called programmatically;
//! this queue of reminder records is the entire integration surface. Tasks
//! are created by workflow rules, worked by a human, and toggled complete —
//! never deleted, never reconciled automatically.

pub mod task;

pub use task::{LcrTask, LcrTaskKind, TaskDetails, TaskDraft};
