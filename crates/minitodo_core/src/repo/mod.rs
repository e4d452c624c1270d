//! Task store contracts and implementations.
//!
//! # Responsibility
//! - Define the `TaskStore` capability the controller and analytics depend on.
//! - Provide a SQLite-backed store and an in-memory store.
//!
//! # Invariants
//! - Writes validate task fields before persistence.
//! - `update` on a missing id reports `NotFound`; `delete` on a missing id
//!   succeeds without effect.

pub mod memory_store;
pub mod sqlite_store;
pub mod task_store;
