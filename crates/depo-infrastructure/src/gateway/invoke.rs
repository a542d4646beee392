//! Typed gateway over named backend commands.

use async_trait::async_trait;
use depo_core::dependency::{DependencyGateway, DependencyRecord, DependencySet, SearchResult};
use depo_core::error::{DepoError, Result};
use depo_core::project::ProjectPath;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

use super::transport::CommandTransport;

pub mod commands {
    pub const INIT: &str = "init";
    pub const GET_PROJECT_DEPS: &str = "get_project_deps";
    pub const FIND_DEPENDENCY: &str = "find_dependency";
    pub const ADD_DEPENDENCY: &str = "add_dependency";
    pub const DELETE_DEPENDENCY: &str = "delete_dependency";
    pub const UPDATE_DEPENDENCY: &str = "update_dependency";
    pub const MODIFY_DEPENDENCY_CONSTRAINT: &str = "modify_dependency_constraint";
    pub const REMOVE_DEPENDENCY_CONSTRAINT: &str = "remove_dependency_constraint";
    pub const BUILD_DEPENDENCIES: &str = "build_dependencies";
    pub const INSTALL_DEPENDENCIES: &str = "install_dependencies";
}

/// [`DependencyGateway`] that turns each operation into one backend command.
///
/// Arguments are sent as camelCase JSON objects (`path`, `name`, `dep`,
/// `newConstraint`). Snapshots and search results arrive as lists of records.
#[derive(Clone)]
pub struct InvokeGateway {
    transport: Arc<dyn CommandTransport>,
}

impl InvokeGateway {
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        Self { transport }
    }

    async fn call<T: DeserializeOwned>(&self, command: &str, args: Value) -> Result<T> {
        tracing::debug!("[InvokeGateway] -> {}", command);
        let value = self.transport.invoke(command, args).await?;
        serde_json::from_value(value).map_err(|e| {
            DepoError::gateway(command, format!("unexpected response shape: {}", e))
        })
    }

    async fn call_unit(&self, command: &str, args: Value) -> Result<()> {
        tracing::debug!("[InvokeGateway] -> {}", command);
        self.transport.invoke(command, args).await.map(|_| ())
    }
}

#[async_trait]
impl DependencyGateway for InvokeGateway {
    async fn init(&self, project: &ProjectPath) -> Result<()> {
        self.call_unit(commands::INIT, json!({ "path": project }))
            .await
    }

    async fn get_project_dependencies(&self, project: &ProjectPath) -> Result<DependencySet> {
        let records: Vec<DependencyRecord> = self
            .call(commands::GET_PROJECT_DEPS, json!({ "path": project }))
            .await?;
        DependencySet::from_records(records)
    }

    async fn find_dependency(&self, project: &ProjectPath, query: &str) -> Result<SearchResult> {
        let candidates: Vec<DependencyRecord> = self
            .call(
                commands::FIND_DEPENDENCY,
                json!({ "path": project, "name": query }),
            )
            .await?;
        Ok(SearchResult::from_candidates(query, candidates))
    }

    async fn add_dependency(&self, project: &ProjectPath, record: &DependencyRecord) -> Result<()> {
        self.call_unit(
            commands::ADD_DEPENDENCY,
            json!({ "path": project, "dep": record }),
        )
        .await
    }

    async fn delete_dependency(&self, project: &ProjectPath, name: &str) -> Result<()> {
        self.call_unit(
            commands::DELETE_DEPENDENCY,
            json!({ "path": project, "name": name }),
        )
        .await
    }

    async fn update_dependency(&self, project: &ProjectPath, name: &str) -> Result<()> {
        self.call_unit(
            commands::UPDATE_DEPENDENCY,
            json!({ "path": project, "name": name }),
        )
        .await
    }

    async fn modify_dependency_constraint(
        &self,
        project: &ProjectPath,
        name: &str,
        new_constraint: &str,
    ) -> Result<()> {
        self.call_unit(
            commands::MODIFY_DEPENDENCY_CONSTRAINT,
            json!({ "path": project, "name": name, "newConstraint": new_constraint }),
        )
        .await
    }

    async fn remove_dependency_constraint(&self, project: &ProjectPath, name: &str) -> Result<()> {
        self.call_unit(
            commands::REMOVE_DEPENDENCY_CONSTRAINT,
            json!({ "path": project, "name": name }),
        )
        .await
    }

    async fn build_dependencies(&self, project: &ProjectPath) -> Result<()> {
        self.call_unit(commands::BUILD_DEPENDENCIES, json!({ "path": project }))
            .await
    }

    async fn install_dependencies(&self, project: &ProjectPath) -> Result<()> {
        self.call_unit(commands::INSTALL_DEPENDENCIES, json!({ "path": project }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records invocations and answers from a fixed table.
    #[derive(Default)]
    struct FakeTransport {
        invocations: Mutex<Vec<(String, Value)>>,
        responses: Mutex<HashMap<String, Result<Value>>>,
    }

    impl FakeTransport {
        fn respond(&self, command: &str, response: Result<Value>) {
            self.responses
                .lock()
                .unwrap()
                .insert(command.to_string(), response);
        }

        fn invocations(&self) -> Vec<(String, Value)> {
            self.invocations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandTransport for FakeTransport {
        async fn invoke(&self, command: &str, args: Value) -> Result<Value> {
            self.invocations
                .lock()
                .unwrap()
                .push((command.to_string(), args));
            self.responses
                .lock()
                .unwrap()
                .get(command)
                .cloned()
                .unwrap_or(Ok(Value::Null))
        }
    }

    fn gateway() -> (Arc<FakeTransport>, InvokeGateway) {
        let transport = Arc::new(FakeTransport::default());
        (transport.clone(), InvokeGateway::new(transport))
    }

    #[tokio::test]
    async fn test_snapshot_list_becomes_named_set() {
        let (transport, gateway) = gateway();
        transport.respond(
            commands::GET_PROJECT_DEPS,
            Ok(json!([
                {"name": "lodash", "version": "4.17.21"},
                {"name": "fmt", "full_name": "fmtlib/fmt", "url": "https://github.com/fmtlib/fmt", "version_constraint": "^10"}
            ])),
        );

        let set = gateway
            .get_project_dependencies(&ProjectPath::from("/proj"))
            .await
            .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("lodash").unwrap().version.as_deref(), Some("4.17.21"));
        assert_eq!(set.get("fmt").unwrap().display_name(), "fmtlib/fmt");
        assert_eq!(
            transport.invocations(),
            vec![(commands::GET_PROJECT_DEPS.to_string(), json!({"path": "/proj"}))]
        );
    }

    #[tokio::test]
    async fn test_duplicate_names_in_snapshot_are_rejected() {
        let (transport, gateway) = gateway();
        transport.respond(
            commands::GET_PROJECT_DEPS,
            Ok(json!([{"name": "fmt"}, {"name": "fmt"}])),
        );

        let err = gateway
            .get_project_dependencies(&ProjectPath::from("/proj"))
            .await
            .unwrap_err();
        assert!(matches!(err, DepoError::InvariantViolation(_)));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_gateway_error() {
        let (transport, gateway) = gateway();
        transport.respond(commands::GET_PROJECT_DEPS, Ok(json!({"oops": true})));

        let err = gateway
            .get_project_dependencies(&ProjectPath::from("/proj"))
            .await
            .unwrap_err();
        assert!(err.is_gateway_failure());
    }

    #[tokio::test]
    async fn test_find_sends_query_as_name() {
        let (transport, gateway) = gateway();
        transport.respond(commands::FIND_DEPENDENCY, Ok(json!([{"name": "left-pad"}])));

        let result = gateway
            .find_dependency(&ProjectPath::from("/proj"), "left")
            .await
            .unwrap();

        assert_eq!(result.query, "left");
        assert!(result.get("left-pad").is_some());
        assert_eq!(
            transport.invocations()[0].1,
            json!({"path": "/proj", "name": "left"})
        );
    }

    #[tokio::test]
    async fn test_add_sends_full_record() {
        let (transport, gateway) = gateway();
        let record = DependencyRecord::named("left-pad").with_constraint("^1.0.0");

        gateway
            .add_dependency(&ProjectPath::from("/proj"), &record)
            .await
            .unwrap();

        assert_eq!(
            transport.invocations(),
            vec![(
                commands::ADD_DEPENDENCY.to_string(),
                json!({"path": "/proj", "dep": {"name": "left-pad", "version_constraint": "^1.0.0"}})
            )]
        );
    }

    #[tokio::test]
    async fn test_modify_constraint_uses_camel_case_argument() {
        let (transport, gateway) = gateway();

        gateway
            .modify_dependency_constraint(&ProjectPath::from("/proj"), "fmt", "^10.0")
            .await
            .unwrap();

        assert_eq!(
            transport.invocations()[0],
            (
                commands::MODIFY_DEPENDENCY_CONSTRAINT.to_string(),
                json!({"path": "/proj", "name": "fmt", "newConstraint": "^10.0"})
            )
        );
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let (transport, gateway) = gateway();
        transport.respond(
            commands::DELETE_DEPENDENCY,
            Err(DepoError::gateway(commands::DELETE_DEPENDENCY, "Package file not found")),
        );

        let err = gateway
            .delete_dependency(&ProjectPath::from("/proj"), "fmt")
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Package file not found");
    }
}
