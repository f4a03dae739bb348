//! FHE group rosters.
//!
//! A group stores its own details and leader; roster membership lives on the
//! member record (one group link per member), which keeps membership
//! exclusive without cross-record bookkeeping.

pub mod group;

pub use group::{FheGroup, GroupDraft};
