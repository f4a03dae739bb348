//! Ward calendar events.

pub mod event;

pub use event::{EventCategory, EventDraft, WardEvent};
