//! JSON-RPC method implementations, organized by domain.
//!
//! Each sub-module exposes typed param/result structs and one async
//! function per method taking `AppState` + params.

pub mod installs;
pub mod workflows;
