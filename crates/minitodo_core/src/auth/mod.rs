//! Authentication capability and session state.
//!
//! # Responsibility
//! - Define the `AuthProvider` capability wrapping an external sign-in flow.
//! - Track the signed-in identity that gates every task operation.
//!
//! # Invariants
//! - The session starts signed out.
//! - A failed sign-in never leaves a partially signed-in session.

pub mod provider;
pub mod session;
