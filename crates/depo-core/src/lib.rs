//! Domain layer for depo.
//!
//! Holds the types shared by every other crate: project identity, dependency
//! records and snapshots, the backend gateway contract, session failures and
//! the configuration model.

pub mod config;
pub mod dependency;
pub mod error;
pub mod project;
pub mod session;

// Re-export common types
pub use dependency::{DependencyGateway, DependencyRecord, DependencySet, SearchResult};
pub use error::{DepoError, ErrorKind, Result};
pub use project::ProjectPath;
pub use session::{OperationKind, SessionError};
