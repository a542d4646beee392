//! Scripted gateway for session tests.

use async_trait::async_trait;
use depo_core::dependency::{DependencyGateway, DependencyRecord, DependencySet, SearchResult};
use depo_core::error::{DepoError, Result};
use depo_core::project::ProjectPath;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init(String),
    GetDeps(String),
    Find(String, String),
    Add(String, DependencyRecord),
    Delete(String, String),
    Update(String, String),
    ModifyConstraint(String, String, String),
    RemoveConstraint(String, String),
    Build(String),
    Install(String),
}

type Snapshot = (Option<oneshot::Receiver<()>>, Result<DependencySet>);

/// Records every call and answers from scripted queues.
///
/// Snapshot and search responses are consumed in call order; when a queue
/// runs dry an empty response is returned. Commands listed in `failures`
/// fail on every call.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<Call>>,
    snapshots: Mutex<VecDeque<Snapshot>>,
    searches: Mutex<VecDeque<Result<SearchResult>>>,
    failures: Mutex<HashMap<&'static str, String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_snapshot(&self, snapshot: Result<DependencySet>) {
        self.snapshots.lock().unwrap().push_back((None, snapshot));
    }

    /// Queues a snapshot that is only returned once `gate` fires.
    pub fn push_gated_snapshot(&self, gate: oneshot::Receiver<()>, snapshot: Result<DependencySet>) {
        self.snapshots
            .lock()
            .unwrap()
            .push_back((Some(gate), snapshot));
    }

    pub fn push_search(&self, result: Result<SearchResult>) {
        self.searches.lock().unwrap().push_back(result);
    }

    pub fn fail_command(&self, command: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(command, message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn outcome(&self, command: &'static str) -> Result<()> {
        match self.failures.lock().unwrap().get(command) {
            Some(message) => Err(DepoError::gateway(command, message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DependencyGateway for MockGateway {
    async fn init(&self, project: &ProjectPath) -> Result<()> {
        self.record(Call::Init(project.to_string()));
        self.outcome("init")
    }

    async fn get_project_dependencies(&self, project: &ProjectPath) -> Result<DependencySet> {
        self.record(Call::GetDeps(project.to_string()));
        let next = self.snapshots.lock().unwrap().pop_front();
        match next {
            Some((gate, snapshot)) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                snapshot
            }
            None => Ok(DependencySet::new()),
        }
    }

    async fn find_dependency(&self, project: &ProjectPath, query: &str) -> Result<SearchResult> {
        self.record(Call::Find(project.to_string(), query.to_string()));
        let next = self.searches.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(SearchResult::empty(query)))
    }

    async fn add_dependency(&self, project: &ProjectPath, record: &DependencyRecord) -> Result<()> {
        self.record(Call::Add(project.to_string(), record.clone()));
        self.outcome("add_dependency")
    }

    async fn delete_dependency(&self, project: &ProjectPath, name: &str) -> Result<()> {
        self.record(Call::Delete(project.to_string(), name.to_string()));
        self.outcome("delete_dependency")
    }

    async fn update_dependency(&self, project: &ProjectPath, name: &str) -> Result<()> {
        self.record(Call::Update(project.to_string(), name.to_string()));
        self.outcome("update_dependency")
    }

    async fn modify_dependency_constraint(
        &self,
        project: &ProjectPath,
        name: &str,
        new_constraint: &str,
    ) -> Result<()> {
        self.record(Call::ModifyConstraint(
            project.to_string(),
            name.to_string(),
            new_constraint.to_string(),
        ));
        self.outcome("modify_dependency_constraint")
    }

    async fn remove_dependency_constraint(&self, project: &ProjectPath, name: &str) -> Result<()> {
        self.record(Call::RemoveConstraint(project.to_string(), name.to_string()));
        self.outcome("remove_dependency_constraint")
    }

    async fn build_dependencies(&self, project: &ProjectPath) -> Result<()> {
        self.record(Call::Build(project.to_string()));
        self.outcome("build_dependencies")
    }

    async fn install_dependencies(&self, project: &ProjectPath) -> Result<()> {
        self.record(Call::Install(project.to_string()));
        self.outcome("install_dependencies")
    }
}
