//! Flutter-facing bindings for minitodo core.

pub mod api;
