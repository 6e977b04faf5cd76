//! Deployment state machine (§4.3.1):
//! `UNDEPLOYED -> DEPLOYING -> DEPLOYED | DEPLOYMENT_FAILED`, and
//! `DEPLOYED -> UNDEPLOYING -> UNDEPLOYED`.

use chrono::{DateTime, Utc};
use nebula_core::WorkflowId;
use nebula_registry::Registry;
use nebula_workflow::{NodeType, WorkflowDefinition};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;
use crate::trigger_index::{derive_index_key, IndexRowStatus, TriggerIndex, TriggerIndexRow, TriggerSubtype};

/// Where a workflow's deployment currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatus {
    /// No index rows exist for this workflow.
    Undeployed,
    /// Deployment is in progress (not currently a durable state; reserved
    /// for a future async deploy path).
    Deploying,
    /// Index rows are active and the workflow is routable.
    Deployed,
    /// Deployment was attempted and rolled back.
    DeploymentFailed,
    /// Undeployment is in progress (not currently a durable state).
    Undeploying,
}

/// One entry in a workflow's deployment history (§4.3.1 step 5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentHistoryEvent {
    /// The workflow this event describes.
    pub workflow_id: WorkflowId,
    /// The status reached.
    pub status: DeploymentStatus,
    /// When the transition happened.
    pub at: DateTime<Utc>,
    /// Failure detail, set only for `DeploymentFailed`.
    pub detail: Option<String>,
}

/// Deploys and undeploys workflows against the Node Specification Registry
/// and the [`TriggerIndex`], keeping a small in-memory deployment history.
///
/// Does not itself start cron jobs, email pollers, or webhook listeners —
/// those are the cron runner's and the host's own job; this type only owns
/// the index rows and the deployment status transitions that gate them.
pub struct Deployer<'a> {
    registry: &'a Registry,
    index: &'a TriggerIndex,
}

impl<'a> Deployer<'a> {
    #[must_use]
    pub fn new(registry: &'a Registry, index: &'a TriggerIndex) -> Self {
        Self { registry, index }
    }

    /// `deploy(workflow)` (§4.3.1 steps 1-5).
    pub fn deploy(&self, workflow: &WorkflowDefinition) -> Result<DeploymentHistoryEvent, SchedulerError> {
        if let Err(e) = self.registry.validate_workflow(workflow) {
            return Err(SchedulerError::ValidationFailed(workflow.id, e.to_string()));
        }

        let mut rows = Vec::new();
        for node in workflow.nodes.iter().filter(|n| n.node_type == NodeType::Trigger) {
            let subtype = match TriggerSubtype::parse(&node.subtype) {
                Ok(s) => s,
                Err(e) => return Err(self.rollback(workflow.id, e)),
            };
            let index_key = match derive_index_key(node.id, subtype, &node.configurations) {
                Ok(k) => k,
                Err(e) => return Err(self.rollback(workflow.id, e)),
            };
            rows.push(TriggerIndexRow {
                id: nebula_core::TriggerIndexId::v4(),
                workflow_id: workflow.id,
                node_id: node.id,
                subtype,
                index_key,
                trigger_config: node.configurations.clone(),
                status: IndexRowStatus::Active,
                created_at: Utc::now(),
            });
        }

        for row in rows {
            self.index.upsert(row);
        }

        Ok(DeploymentHistoryEvent { workflow_id: workflow.id, status: DeploymentStatus::Deployed, at: Utc::now(), detail: None })
    }

    fn rollback(&self, workflow_id: WorkflowId, cause: SchedulerError) -> SchedulerError {
        self.index.remove_workflow(workflow_id);
        cause
    }

    /// `undeploy(workflow)` (§4.3.1).
    pub fn undeploy(&self, workflow_id: WorkflowId) -> Result<DeploymentHistoryEvent, SchedulerError> {
        if !self.index.contains_workflow(workflow_id) {
            return Err(SchedulerError::NotDeployed(workflow_id));
        }
        self.index.remove_workflow(workflow_id);
        Ok(DeploymentHistoryEvent { workflow_id, status: DeploymentStatus::Undeployed, at: Utc::now(), detail: None })
    }
}

#[cfg(test)]
mod tests {
    use nebula_core::NodeId;
    use nebula_workflow::NodeDefinition;

    use super::*;

    fn cron_workflow() -> WorkflowDefinition {
        let node = NodeDefinition::new(NodeId::v4(), "on-schedule", NodeType::Trigger, "CRON")
            .with_configuration("cron_expression", "0 * * * *".into());
        WorkflowDefinition {
            id: WorkflowId::v4(),
            name: "scheduled".to_string(),
            description: None,
            version: semver::Version::new(1, 0, 0),
            nodes: vec![node],
            connections: vec![],
            variables: Default::default(),
            config: Default::default(),
            tags: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn deploy_indexes_trigger_nodes() {
        let registry = Registry::with_builtins();
        let index = TriggerIndex::new();
        let workflow = cron_workflow();

        let deployer = Deployer::new(&registry, &index);
        let result = deployer.deploy(&workflow);
        assert!(result.is_ok(), "{result:?}");
        assert_eq!(index.candidates(TriggerSubtype::Cron, "0 * * * *").len(), 1);
    }

    #[test]
    fn failed_index_derivation_rolls_back() {
        let registry = Registry::with_builtins();
        let index = TriggerIndex::new();
        let mut workflow = cron_workflow();
        workflow.nodes[0].configurations.clear();

        let deployer = Deployer::new(&registry, &index);
        assert!(deployer.deploy(&workflow).is_err());
        assert!(!index.contains_workflow(workflow.id));
    }

    #[test]
    fn undeploy_requires_prior_deployment() {
        let registry = Registry::with_builtins();
        let index = TriggerIndex::new();
        let deployer = Deployer::new(&registry, &index);
        assert!(matches!(deployer.undeploy(WorkflowId::v4()), Err(SchedulerError::NotDeployed(_))));
    }

    #[test]
    fn undeploy_removes_index_rows() {
        let registry = Registry::with_builtins();
        let index = TriggerIndex::new();
        let workflow = cron_workflow();
        let deployer = Deployer::new(&registry, &index);
        deployer.deploy(&workflow).unwrap();

        deployer.undeploy(workflow.id).unwrap();
        assert!(index.candidates(TriggerSubtype::Cron, "0 * * * *").is_empty());
    }
}
