use miette::Diagnostic;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

use super::edges::{ConditionalEdge, Edge, Router, Transition};
use crate::node::Node;
use crate::reducers::ReducerRegistry;
use crate::runtimes::runtime_config::RunnerConfig;
use crate::types::NodeName;
use crate::workflow::Workflow;

/// Fluent builder for workflow graphs.
///
/// Declaration order does not matter: edges may reference nodes added later.
/// All consistency checks run in [`compile`](GraphBuilder::compile), which
/// either returns an immutable [`Workflow`] or a specific
/// [`GraphConfigError`].
///
/// # Examples
///
/// ```
/// use threadflow::graphs::{GraphBuilder, Transition};
/// use threadflow::node::{Node, NodeContext, NodeError, NodePartial};
/// use threadflow::state::StateSnapshot;
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct Noop;
/// #[async_trait]
/// impl Node for Noop {
///     async fn run(&self, _: StateSnapshot, _: NodeContext) -> Result<NodePartial, NodeError> {
///         Ok(NodePartial::new())
///     }
/// }
///
/// let workflow = GraphBuilder::new()
///     .add_node("llm", Noop)
///     .add_node("tool", Noop)
///     .set_entry("llm")
///     .add_conditional_edge(
///         "llm",
///         Arc::new(|snapshot| {
///             let wants_tool = snapshot
///                 .last_message()
///                 .is_some_and(|m| m.content.to_lowercase().contains("tool"));
///             if wants_tool { "tool".into() } else { "end".into() }
///         }),
///         [("tool", Transition::to("tool")), ("end", Transition::Terminate)],
///     )
///     .add_edge("tool", Transition::to("llm"))
///     .compile()
///     .unwrap();
/// assert_eq!(workflow.entry().as_str(), "llm");
/// ```
#[must_use]
pub struct GraphBuilder {
    nodes: FxHashMap<NodeName, Arc<dyn Node>>,
    entry: Option<NodeName>,
    edges: FxHashMap<NodeName, Edge>,
    conflicting_edges: Vec<NodeName>,
    reducers: ReducerRegistry,
    runner_config: RunnerConfig,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
            entry: None,
            edges: FxHashMap::default(),
            conflicting_edges: Vec::new(),
            reducers: ReducerRegistry::default(),
            runner_config: RunnerConfig::default(),
        }
    }

    /// Declares a node under the given name.
    ///
    /// Re-declaring a name replaces the previous node implementation.
    pub fn add_node(mut self, name: impl Into<NodeName>, node: impl Node + 'static) -> Self {
        self.nodes.insert(name.into(), Arc::new(node));
        self
    }

    /// Designates the entry node for fresh sessions.
    pub fn set_entry(mut self, name: impl Into<NodeName>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Declares the unconditional outgoing edge of `from`.
    ///
    /// A node may have exactly one outgoing edge; declaring a second is
    /// recorded and rejected at compile time.
    pub fn add_edge(mut self, from: impl Into<NodeName>, to: Transition) -> Self {
        let from = from.into();
        if self.edges.contains_key(&from) {
            self.conflicting_edges.push(from);
        } else {
            self.edges.insert(from, Edge::Direct(to));
        }
        self
    }

    /// Declares the conditional outgoing edge of `from`: `router` produces a
    /// label which `targets` resolves to a transition.
    pub fn add_conditional_edge<L, T>(
        mut self,
        from: impl Into<NodeName>,
        router: Router,
        targets: T,
    ) -> Self
    where
        L: Into<String>,
        T: IntoIterator<Item = (L, Transition)>,
    {
        let from = from.into();
        if self.edges.contains_key(&from) {
            self.conflicting_edges.push(from);
            return self;
        }
        let targets: FxHashMap<String, Transition> = targets
            .into_iter()
            .map(|(label, transition)| (label.into(), transition))
            .collect();
        self.edges
            .insert(from, Edge::Conditional(ConditionalEdge::new(router, targets)));
        self
    }

    /// Replaces the default reducer registry.
    pub fn with_reducers(mut self, reducers: ReducerRegistry) -> Self {
        self.reducers = reducers;
        self
    }

    /// Replaces the default runner configuration.
    pub fn with_runner_config(mut self, config: RunnerConfig) -> Self {
        self.runner_config = config;
        self
    }

    /// Validates the declared graph and freezes it into a [`Workflow`].
    ///
    /// Checks, in order: the graph has nodes; no node was given two outgoing
    /// edges; an entry is declared and exists; every edge source exists;
    /// every static and mapped target exists (or is `Terminate`); every node
    /// has an outgoing edge. Cycles pass validation.
    #[instrument(skip(self), fields(nodes = self.nodes.len(), edges = self.edges.len()))]
    pub fn compile(self) -> Result<Workflow, GraphConfigError> {
        if self.nodes.is_empty() {
            return Err(GraphConfigError::EmptyGraph);
        }
        if let Some(from) = self.conflicting_edges.into_iter().next() {
            return Err(GraphConfigError::ConflictingEdges { from });
        }

        let entry = self.entry.ok_or(GraphConfigError::MissingEntry)?;
        if !self.nodes.contains_key(&entry) {
            return Err(GraphConfigError::UnknownEntry { entry });
        }

        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(GraphConfigError::UnknownEdgeSource { from: from.clone() });
            }
            match edge {
                Edge::Direct(transition) => {
                    if let Some(target) = transition.target()
                        && !self.nodes.contains_key(target)
                    {
                        return Err(GraphConfigError::UnknownTarget {
                            from: from.clone(),
                            target: target.clone(),
                        });
                    }
                }
                Edge::Conditional(conditional) => {
                    for (label, transition) in conditional.targets() {
                        if let Some(target) = transition.target()
                            && !self.nodes.contains_key(target)
                        {
                            return Err(GraphConfigError::UnknownLabelTarget {
                                from: from.clone(),
                                label: label.clone(),
                                target: target.clone(),
                            });
                        }
                    }
                }
            }
        }

        for node in self.nodes.keys() {
            if !self.edges.contains_key(node) {
                return Err(GraphConfigError::DanglingNode { node: node.clone() });
            }
        }

        tracing::debug!(entry = %entry, "graph compiled");
        Ok(Workflow::from_parts(
            self.nodes,
            entry,
            self.edges,
            self.reducers,
            self.runner_config,
        ))
    }
}

/// Wiring mistakes caught by [`GraphBuilder::compile`].
///
/// Each variant names the offending node so misconfigurations are actionable
/// without digging through the builder calls.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphConfigError {
    #[error("graph has no nodes")]
    #[diagnostic(
        code(threadflow::graphs::empty),
        help("Add at least one node with GraphBuilder::add_node before compiling.")
    )]
    EmptyGraph,

    #[error("no entry node set")]
    #[diagnostic(
        code(threadflow::graphs::missing_entry),
        help("Call GraphBuilder::set_entry with the node fresh sessions should start at.")
    )]
    MissingEntry,

    #[error("entry node `{entry}` is not declared in the graph")]
    #[diagnostic(code(threadflow::graphs::unknown_entry))]
    UnknownEntry { entry: NodeName },

    #[error("edge declared from unknown node `{from}`")]
    #[diagnostic(code(threadflow::graphs::unknown_edge_source))]
    UnknownEdgeSource { from: NodeName },

    #[error("edge from `{from}` targets unknown node `{target}`")]
    #[diagnostic(code(threadflow::graphs::unknown_target))]
    UnknownTarget { from: NodeName, target: NodeName },

    #[error("conditional edge from `{from}` maps label `{label}` to unknown node `{target}`")]
    #[diagnostic(code(threadflow::graphs::unknown_label_target))]
    UnknownLabelTarget {
        from: NodeName,
        label: String,
        target: NodeName,
    },

    #[error("node `{node}` has no outgoing edge")]
    #[diagnostic(
        code(threadflow::graphs::dangling_node),
        help("Every node needs exactly one outgoing edge; add one (Transition::Terminate is valid).")
    )]
    DanglingNode { node: NodeName },

    #[error("node `{from}` was given more than one outgoing edge")]
    #[diagnostic(
        code(threadflow::graphs::conflicting_edges),
        help("Use a single conditional edge when a node needs data-dependent routing.")
    )]
    ConflictingEdges { from: NodeName },
}
