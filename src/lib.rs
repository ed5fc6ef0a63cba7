//! This is the library of the buildkite-relay service.
pub mod azdo;
pub mod buildkite;
pub mod relay;
pub mod server;
