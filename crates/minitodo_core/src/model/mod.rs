//! Domain model for tasks and signed-in identities.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted task document shape in one place.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` and has exactly one owner.
//! - Deletion is permanent; there are no tombstones.

pub mod session;
pub mod task;
