//! Remote command gateway trait definition.

use async_trait::async_trait;

use crate::dependency::{DependencyRecord, DependencySet, SearchResult};
use crate::error::Result;
use crate::project::ProjectPath;

/// Typed request/response boundary to the manifest/build backend.
///
/// Every query and mutation the client issues passes through this trait.
/// Implementations report any failure as an error carrying a human-readable
/// message; callers treat all such failures uniformly.
///
/// # Implementation Notes
///
/// Implementations must be safe to call concurrently: two intents issued
/// before either resolves reach the backend independently.
#[async_trait]
pub trait DependencyGateway: Send + Sync {
    /// Establishes or registers a project at `project`.
    async fn init(&self, project: &ProjectPath) -> Result<()>;

    /// Returns the full dependency snapshot of `project`.
    async fn get_project_dependencies(&self, project: &ProjectPath) -> Result<DependencySet>;

    /// Searches the registry for candidates matching a name fragment.
    async fn find_dependency(&self, project: &ProjectPath, query: &str) -> Result<SearchResult>;

    /// Adds `record` (name plus optional constraint) to the manifest.
    async fn add_dependency(&self, project: &ProjectPath, record: &DependencyRecord) -> Result<()>;

    /// Removes the dependency called `name`.
    async fn delete_dependency(&self, project: &ProjectPath, name: &str) -> Result<()>;

    /// Updates the dependency called `name` to its latest allowed version.
    async fn update_dependency(&self, project: &ProjectPath, name: &str) -> Result<()>;

    /// Replaces the version constraint of `name`.
    async fn modify_dependency_constraint(
        &self,
        project: &ProjectPath,
        name: &str,
        new_constraint: &str,
    ) -> Result<()>;

    /// Removes the version constraint of `name`.
    async fn remove_dependency_constraint(&self, project: &ProjectPath, name: &str) -> Result<()>;

    /// Builds every dependency of the project.
    async fn build_dependencies(&self, project: &ProjectPath) -> Result<()>;

    /// Installs every dependency of the project.
    async fn install_dependencies(&self, project: &ProjectPath) -> Result<()>;
}
