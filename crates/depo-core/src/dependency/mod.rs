//! Dependency records, snapshots and the backend gateway contract.

pub mod gateway;
pub mod model;

pub use gateway::DependencyGateway;
pub use model::{DependencyRecord, DependencySet, SearchResult};
