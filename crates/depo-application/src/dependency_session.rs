//! Dependency session use case.
//!
//! This module provides `DependencySession`, which keeps the client's view of
//! a project's dependencies consistent with the backend across a sequence of
//! user-triggered, possibly failing remote operations.

use crate::session::{
    ActiveProject, DependencyStore, ErrorSurface, ProjectState, SearchPhase, SearchWorkflow,
};
use depo_core::dependency::{DependencyGateway, DependencyRecord, DependencySet, SearchResult};
use depo_core::error::{DepoError, Result};
use depo_core::project::ProjectPath;
use depo_core::session::{OperationKind, SessionError};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Use case owning one editing session against the backend.
///
/// # Responsibilities
///
/// - Tracking the active project and refreshing on every activation
/// - Holding the dependency snapshot, replaced wholesale by each refresh
/// - Running mutation intents: one backend call, then a refresh on success
/// - Driving the search/selection flow that feeds the add intent
/// - Recording the most recent failure for display
///
/// The snapshot is never edited from a mutation's own response; after a
/// successful mutation it is re-queried, so it always reflects what the
/// backend last reported.
///
/// # Concurrency
///
/// All methods take `&self`; share the session in an `Arc` and issue intents
/// from independent tasks. Intents are not serialized: each one triggers its
/// own refresh and the last refresh to complete wins.
pub struct DependencySession {
    gateway: Arc<dyn DependencyGateway>,
    project: ProjectState,
    store: DependencyStore,
    search: SearchWorkflow,
    errors: ErrorSurface,
}

impl DependencySession {
    /// Creates a session with no project open.
    pub fn new(gateway: Arc<dyn DependencyGateway>) -> Self {
        Self {
            gateway,
            project: ProjectState::new(),
            store: DependencyStore::new(),
            search: SearchWorkflow::new(),
            errors: ErrorSurface::new(),
        }
    }

    // ============================================================================
    // Read accessors
    // ============================================================================

    pub async fn project(&self) -> Option<ProjectPath> {
        self.project.path().await
    }

    pub async fn has_project(&self) -> bool {
        self.project.has_project().await
    }

    /// Current dependency snapshot (empty when no project is open).
    pub fn dependencies(&self) -> Arc<DependencySet> {
        self.store.current()
    }

    /// Observes every wholesale replacement of the snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DependencySet>> {
        self.store.subscribe()
    }

    pub fn search_phase(&self) -> SearchPhase {
        self.search.phase()
    }

    pub fn search_results(&self) -> SearchResult {
        self.search.results()
    }

    pub fn selection(&self) -> Option<DependencyRecord> {
        self.search.selection()
    }

    pub fn last_error(&self) -> Option<SessionError> {
        self.errors.get()
    }

    pub fn dismiss_error(&self) {
        self.errors.dismiss();
    }

    // ============================================================================
    // Project lifecycle
    // ============================================================================

    /// Initializes a project at `path` through the backend, then opens it.
    ///
    /// `None` is what the directory picker returns when the user cancels;
    /// it is a no-op.
    pub async fn init_project(&self, path: Option<ProjectPath>) -> Result<()> {
        let Some(path) = path else {
            tracing::debug!("[DependencySession] init_project: no directory selected");
            return Ok(());
        };

        tracing::debug!("[DependencySession] init_project: {}", path);
        if let Err(err) = self.gateway.init(&path).await {
            let err = DepoError::mutation_failed(OperationKind::Init, err.message());
            self.errors.record(OperationKind::Init, &err);
            return Err(err);
        }

        self.open(path).await
    }

    /// Opens an existing project at `path` and refreshes its dependencies.
    ///
    /// `None` is a no-op. The project stays open even if the first refresh
    /// fails; the failure is recorded and returned.
    pub async fn select_project(&self, path: Option<ProjectPath>) -> Result<()> {
        let Some(path) = path else {
            tracing::debug!("[DependencySession] select_project: no directory selected");
            return Ok(());
        };
        self.open(path).await
    }

    async fn open(&self, path: ProjectPath) -> Result<()> {
        let active = self
            .project
            .activate(path, || {
                self.store.clear();
                self.search.close();
            })
            .await;
        tracing::info!(
            "[DependencySession] Project opened: {} (generation {})",
            active.path,
            active.generation
        );
        self.refresh_project(&active).await
    }

    // ============================================================================
    // Refresh
    // ============================================================================

    /// Re-queries all dependencies of the active project.
    ///
    /// On success the snapshot is replaced wholesale; on failure it is left
    /// untouched and the failure is recorded.
    pub async fn refresh(&self) -> Result<()> {
        let active = self.require_project(OperationKind::Refresh).await?;
        self.refresh_project(&active).await
    }

    async fn refresh_project(&self, active: &ActiveProject) -> Result<()> {
        tracing::debug!("[DependencySession] Refreshing {}", active.path);

        match self.gateway.get_project_dependencies(&active.path).await {
            Ok(set) => {
                let count = set.len();
                let applied = self
                    .project
                    .run_if_current(active.generation, || self.store.replace(set))
                    .await;
                if applied {
                    tracing::debug!(
                        "[DependencySession] Refreshed {}: {} dependencies",
                        active.path,
                        count
                    );
                } else {
                    tracing::warn!(
                        "[DependencySession] Discarding refresh for {}: project changed",
                        active.path
                    );
                }
                Ok(())
            }
            Err(err) => {
                let err = match err {
                    DepoError::InvariantViolation(_) => err,
                    other => DepoError::RefreshFailed(other.message()),
                };
                let recorded = self
                    .project
                    .run_if_current(active.generation, || {
                        self.errors.record(OperationKind::Refresh, &err);
                    })
                    .await;
                if !recorded {
                    tracing::warn!(
                        "[DependencySession] Ignoring refresh failure for {}: project changed",
                        active.path
                    );
                }
                Err(err)
            }
        }
    }

    // ============================================================================
    // Search / selection
    // ============================================================================

    /// Searches the registry for candidates matching `query`.
    ///
    /// A blank query never reaches the backend and leaves the current result
    /// untouched. On failure the previous result is kept.
    pub async fn search(&self, query: &str) -> Result<()> {
        let active = self.require_project(OperationKind::Search).await?;
        let query = query.trim();
        if query.is_empty() {
            return Err(self.reject(OperationKind::Search, DepoError::EmptyQuery));
        }

        let ticket = self.search.begin();
        tracing::debug!("[DependencySession] Searching for '{}'", query);

        match self.gateway.find_dependency(&active.path, query).await {
            Ok(results) => {
                let count = results.len();
                if self.search.complete(ticket, results) {
                    tracing::debug!(
                        "[DependencySession] Search '{}' returned {} candidates",
                        query,
                        count
                    );
                } else {
                    tracing::warn!(
                        "[DependencySession] Discarding superseded search '{}'",
                        query
                    );
                }
                Ok(())
            }
            Err(err) => {
                let err = DepoError::SearchFailed(err.message());
                if self.search.fail(ticket) {
                    self.errors.record(OperationKind::Search, &err);
                }
                Err(err)
            }
        }
    }

    /// Selects a candidate from the current search result.
    ///
    /// Names are compared case-insensitively. A non-blank `constraint`
    /// overrides the candidate's version constraint.
    pub fn select_candidate(&self, name: &str, constraint: Option<&str>) -> Result<DependencyRecord> {
        self.search
            .select(name, constraint)
            .map_err(|err| self.reject(OperationKind::Add, err))
    }

    /// Closes the add flow, discarding results and selection.
    pub fn close_search(&self) {
        self.search.close();
    }

    // ============================================================================
    // Mutation intents
    // ============================================================================

    /// Adds the selected candidate to the project.
    ///
    /// A successful add closes the search flow; a failed one keeps the
    /// selection so it can be re-triggered.
    pub async fn add_selected(&self) -> Result<()> {
        let active = self.require_project(OperationKind::Add).await?;
        let ticket = self.search.current_ticket();
        let record = match self.search.confirmed_selection() {
            Ok(record) => record,
            Err(err) if err.is_precondition() => {
                return Err(self.reject(OperationKind::Add, err));
            }
            Err(err) => {
                self.errors.record(OperationKind::Add, &err);
                return Err(err);
            }
        };

        let gateway = Arc::clone(&self.gateway);
        let path = active.path.clone();
        let result = self
            .mutate(&active, OperationKind::Add, true, || async move {
                gateway.add_dependency(&path, &record).await
            })
            .await;

        // a search issued while the add was in flight keeps its results
        if !matches!(result, Err(DepoError::BackendMutationFailed { .. }))
            && !self.search.close_if(ticket)
        {
            tracing::debug!("[DependencySession] Search changed during add; leaving it open");
        }
        result
    }

    /// Removes `name` from the project.
    pub async fn delete_dependency(&self, name: &str) -> Result<()> {
        let active = self.require_project(OperationKind::Delete).await?;
        let gateway = Arc::clone(&self.gateway);
        let path = active.path.clone();
        self.mutate(&active, OperationKind::Delete, true, || async move {
            gateway.delete_dependency(&path, name).await
        })
        .await
    }

    /// Updates `name` to the latest version its constraint allows.
    pub async fn update_dependency(&self, name: &str) -> Result<()> {
        let active = self.require_project(OperationKind::Update).await?;
        let gateway = Arc::clone(&self.gateway);
        let path = active.path.clone();
        self.mutate(&active, OperationKind::Update, true, || async move {
            gateway.update_dependency(&path, name).await
        })
        .await
    }

    /// Sets the version constraint of `name`. A blank constraint is rejected
    /// before any backend call.
    pub async fn set_constraint(&self, name: &str, constraint: &str) -> Result<()> {
        let active = self.require_project(OperationKind::SetConstraint).await?;
        let constraint = constraint.trim();
        if constraint.is_empty() {
            return Err(self.reject(OperationKind::SetConstraint, DepoError::EmptyConstraint));
        }

        let gateway = Arc::clone(&self.gateway);
        let path = active.path.clone();
        self.mutate(&active, OperationKind::SetConstraint, true, || async move {
            gateway
                .modify_dependency_constraint(&path, name, constraint)
                .await
        })
        .await
    }

    /// Removes the version constraint of `name`.
    pub async fn clear_constraint(&self, name: &str) -> Result<()> {
        let active = self.require_project(OperationKind::ClearConstraint).await?;
        let gateway = Arc::clone(&self.gateway);
        let path = active.path.clone();
        self.mutate(&active, OperationKind::ClearConstraint, true, || async move {
            gateway.remove_dependency_constraint(&path, name).await
        })
        .await
    }

    /// Installs all dependencies, then refreshes.
    pub async fn install_dependencies(&self) -> Result<()> {
        let active = self.require_project(OperationKind::Install).await?;
        let gateway = Arc::clone(&self.gateway);
        let path = active.path.clone();
        self.mutate(&active, OperationKind::Install, true, || async move {
            gateway.install_dependencies(&path).await
        })
        .await
    }

    /// Builds all dependencies. Building does not change dependency records,
    /// so no refresh follows.
    pub async fn build_dependencies(&self) -> Result<()> {
        let active = self.require_project(OperationKind::Build).await?;
        let gateway = Arc::clone(&self.gateway);
        let path = active.path.clone();
        self.mutate(&active, OperationKind::Build, false, || async move {
            gateway.build_dependencies(&path).await
        })
        .await
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    /// Issues exactly one backend call and, on success, refreshes.
    ///
    /// On failure the snapshot is left as it was and the failure recorded.
    async fn mutate<F, Fut>(
        &self,
        active: &ActiveProject,
        operation: OperationKind,
        refresh_after: bool,
        call: F,
    ) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        tracing::debug!("[DependencySession] {} on {}", operation, active.path);

        if let Err(err) = call().await {
            let err = DepoError::mutation_failed(operation, err.message());
            self.errors.record(operation, &err);
            return Err(err);
        }

        tracing::info!("[DependencySession] {} succeeded on {}", operation, active.path);

        if refresh_after {
            self.refresh_project(active).await?;
        }
        Ok(())
    }

    async fn require_project(&self, operation: OperationKind) -> Result<ActiveProject> {
        self.project
            .require()
            .await
            .map_err(|err| self.reject(operation, err))
    }

    /// Logs a precondition failure and hands it back. Precondition failures
    /// are not written to the error surface.
    fn reject(&self, operation: OperationKind, err: DepoError) -> DepoError {
        tracing::warn!("[DependencySession] {} rejected: {}", operation, err);
        err
    }
}
