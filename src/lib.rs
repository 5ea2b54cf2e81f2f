//! Purpose: Shared core library crate used by the `solmsg` CLI and driver embedders.
//! Exports: `core` (path codec, tree build/flatten, errors) and `api` (context, templates).
//! Role: Internal library backing the binary; not yet a stable public SDK.
//! Invariants: Treat the crate API as internal until a dedicated library release.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
