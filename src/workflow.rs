//! The compiled workflow artifact.
//!
//! A [`Workflow`] is what [`GraphBuilder::compile`](crate::graphs::GraphBuilder::compile)
//! produces: validated nodes, edges, entry point, reducer registry, and runner
//! configuration, all immutable. It exposes just the two operations the
//! runtime needs — merging an update through the reducers and looking up a
//! node's edge — and leaves sequencing to
//! [`WorkflowRunner`](crate::runtimes::runner::WorkflowRunner).

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::graphs::Edge;
use crate::node::{Node, NodePartial};
use crate::reducers::{ReducerError, ReducerRegistry};
use crate::runtimes::checkpointer::CheckpointerType;
use crate::runtimes::runner::WorkflowRunner;
use crate::runtimes::runtime_config::RunnerConfig;
use crate::state::SessionState;
use crate::types::NodeName;

/// Immutable, validated workflow graph.
///
/// Cheap to clone: nodes and routers are behind `Arc`s. Compile once, share
/// across runners and tasks.
#[derive(Clone)]
pub struct Workflow {
    nodes: FxHashMap<NodeName, Arc<dyn Node>>,
    entry: NodeName,
    edges: FxHashMap<NodeName, Edge>,
    reducers: ReducerRegistry,
    runner_config: RunnerConfig,
}

impl Workflow {
    pub(crate) fn from_parts(
        nodes: FxHashMap<NodeName, Arc<dyn Node>>,
        entry: NodeName,
        edges: FxHashMap<NodeName, Edge>,
        reducers: ReducerRegistry,
        runner_config: RunnerConfig,
    ) -> Self {
        Self {
            nodes,
            entry,
            edges,
            reducers,
            runner_config,
        }
    }

    /// The node fresh sessions start at.
    #[must_use]
    pub fn entry(&self) -> &NodeName {
        &self.entry
    }

    #[must_use]
    pub fn runner_config(&self) -> &RunnerConfig {
        &self.runner_config
    }

    /// Looks up a node implementation by name.
    #[must_use]
    pub fn node(&self, name: &NodeName) -> Option<&Arc<dyn Node>> {
        self.nodes.get(name)
    }

    /// Looks up a node's outgoing edge.
    #[must_use]
    pub fn edge(&self, from: &NodeName) -> Option<&Edge> {
        self.edges.get(from)
    }

    /// Merges an update into `state` through the reducer registry.
    ///
    /// This is the only way state changes: run input and node output both
    /// pass through here, under the same per-channel policies.
    pub fn apply_update(
        &self,
        state: &mut SessionState,
        update: &NodePartial,
    ) -> Result<(), ReducerError> {
        self.reducers.apply_all(state, update)
    }

    /// Convenience: a runner over this workflow with the configured
    /// checkpointer (in-memory by default).
    #[must_use]
    pub fn runner(&self) -> WorkflowRunner {
        WorkflowRunner::new(self.clone(), self.runner_config.checkpointer)
    }

    /// Convenience: a runner with an explicit checkpointer selection.
    #[must_use]
    pub fn runner_with(&self, checkpointer: CheckpointerType) -> WorkflowRunner {
        WorkflowRunner::new(self.clone(), checkpointer)
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&NodeName> = self.nodes.keys().collect();
        names.sort();
        f.debug_struct("Workflow")
            .field("entry", &self.entry)
            .field("nodes", &names)
            .field("edges", &self.edges.len())
            .finish()
    }
}
