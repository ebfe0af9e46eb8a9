//! Library half of the `rigger` binary, shared with the integration tests.

pub mod commands;
