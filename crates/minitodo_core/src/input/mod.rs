//! New-task text input: keyboard draft and optional dictation.
//!
//! # Responsibility
//! - Hold the pending new-task text and priority.
//! - Bridge an optional speech-recognition capability into that draft.
//!
//! # Invariants
//! - Missing platform support is the `Keyboard` input source, never a
//!   half-initialized dictation bridge.
//! - A dictation source is stopped before its bridge is dropped.

pub mod dictation;
pub mod draft;
pub mod source;
