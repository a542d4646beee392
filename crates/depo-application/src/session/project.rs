use depo_core::error::{DepoError, Result};
use depo_core::project::ProjectPath;
use tokio::sync::RwLock;

/// The project a session is currently editing.
///
/// `generation` increases on every activation, so work started for one
/// activation can tell whether it is still current when it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveProject {
    pub path: ProjectPath,
    pub generation: u64,
}

/// Holds the active project identifier.
///
/// Starts `Unset`. Activation is the only transition; there is no way back
/// to `Unset`.
pub struct ProjectState {
    active: RwLock<Option<ActiveProject>>,
}

impl ProjectState {
    /// Creates a state with no project open.
    pub fn new() -> Self {
        Self {
            active: RwLock::new(None),
        }
    }

    /// Makes `path` the active project.
    ///
    /// `on_change` runs while the write lock is held, so no reader observes
    /// the new project together with state derived from the old one.
    pub async fn activate<F>(&self, path: ProjectPath, on_change: F) -> ActiveProject
    where
        F: FnOnce(),
    {
        let mut active = self.active.write().await;
        let generation = active.as_ref().map_or(1, |current| current.generation + 1);
        let project = ActiveProject { path, generation };
        *active = Some(project.clone());
        on_change();
        project
    }

    /// Returns the active project, if any.
    pub async fn current(&self) -> Option<ActiveProject> {
        self.active.read().await.clone()
    }

    pub async fn path(&self) -> Option<ProjectPath> {
        self.active.read().await.as_ref().map(|p| p.path.clone())
    }

    pub async fn has_project(&self) -> bool {
        self.active.read().await.is_some()
    }

    /// Returns the active project or `NoProject`.
    pub async fn require(&self) -> Result<ActiveProject> {
        self.current().await.ok_or(DepoError::NoProject)
    }

    /// Runs `f` only if `generation` is still active.
    ///
    /// The read lock is held for the duration of `f`, so an activation cannot
    /// interleave with it.
    pub async fn run_if_current<F>(&self, generation: u64, f: F) -> bool
    where
        F: FnOnce(),
    {
        let active = self.active.read().await;
        match active.as_ref() {
            Some(project) if project.generation == generation => {
                f();
                true
            }
            _ => false,
        }
    }
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_unset() {
        let state = ProjectState::new();
        assert!(!state.has_project().await);
        assert_eq!(state.require().await.unwrap_err(), DepoError::NoProject);
    }

    #[tokio::test]
    async fn test_activation_bumps_generation() {
        let state = ProjectState::new();
        let first = state.activate(ProjectPath::from("/a"), || {}).await;
        let second = state.activate(ProjectPath::from("/a"), || {}).await;

        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert!(!state.run_if_current(first.generation, || {}).await);
        assert!(state.run_if_current(second.generation, || {}).await);
        assert_eq!(state.path().await, Some(ProjectPath::from("/a")));
    }

    #[tokio::test]
    async fn test_run_if_current_skips_stale_generation() {
        let state = ProjectState::new();
        let stale = state.activate(ProjectPath::from("/a"), || {}).await;
        state.activate(ProjectPath::from("/b"), || {}).await;

        let mut ran = false;
        assert!(!state.run_if_current(stale.generation, || ran = true).await);
        assert!(!ran);
    }
}
