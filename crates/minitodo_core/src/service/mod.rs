//! Use-case services over the task store and auth session.
//!
//! # Responsibility
//! - Keep the in-memory task collection in step with the store.
//! - Derive analytics from owner-scoped loads.
//! - Compose session and task operations behind one facade.
//!
//! # Invariants
//! - Every mutation is a store write followed by a fresh owner-scoped read.

pub mod analytics;
pub mod clock;
pub mod task_list;
pub mod todo_app;
