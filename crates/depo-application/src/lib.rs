//! Application layer for depo.
//!
//! This crate provides the session use case that coordinates the backend
//! gateway with the client-side state the presentation layer reads.

pub mod dependency_session;
pub mod session;

#[cfg(test)]
mod test_support;

pub use dependency_session::DependencySession;
pub use session::SearchPhase;
