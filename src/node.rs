//! Node execution contract.
//!
//! A node is one unit of computation in a workflow: it receives an immutable
//! [`StateSnapshot`] plus a [`NodeContext`] and returns a [`NodePartial`]
//! describing the state it wants merged. Nodes never write to the checkpoint
//! store and never mutate shared state directly.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::message::Message;
use crate::state::StateSnapshot;
use crate::types::NodeName;
use crate::utils::collections::ExtraMap;

/// Core trait for executable workflow nodes.
///
/// Implementations should be stateless and deterministic with respect to the
/// snapshot they receive; any side effects (tool calls, model calls) belong in
/// the node body, and their results flow back through the returned partial.
///
/// # Examples
///
/// ```rust,no_run
/// use threadflow::message::Message;
/// use threadflow::node::{Node, NodeContext, NodeError, NodePartial};
/// use threadflow::state::StateSnapshot;
/// use async_trait::async_trait;
///
/// struct Greeter;
///
/// #[async_trait]
/// impl Node for Greeter {
///     async fn run(
///         &self,
///         snapshot: StateSnapshot,
///         _ctx: NodeContext,
///     ) -> Result<NodePartial, NodeError> {
///         let who = snapshot
///             .last_message()
///             .ok_or(NodeError::MissingInput { what: "a user message" })?;
///         Ok(NodePartial::new()
///             .with_messages(vec![Message::assistant(&format!("Hello, {}!", who.content))]))
///     }
/// }
/// ```
#[async_trait]
pub trait Node: Send + Sync {
    /// Execute this node against the given snapshot.
    async fn run(&self, snapshot: StateSnapshot, ctx: NodeContext)
        -> Result<NodePartial, NodeError>;
}

/// Execution metadata handed to a node on each invocation.
///
/// Carries the node's identity, the step number within the session, and the
/// session id, so node-side logging and tool calls can be correlated with the
/// runner's own traces.
#[derive(Clone, Debug)]
pub struct NodeContext {
    /// The graph name this invocation runs under.
    pub node: NodeName,
    /// Step number within the session (continues across resumed runs).
    pub step: u64,
    /// Session this invocation belongs to.
    pub session_id: String,
}

/// Partial state update returned by a node.
///
/// `None` fields are untouched by the merge; `Some` fields are handed to the
/// reducer registered for that channel. A default partial is a valid "no
/// update" result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePartial {
    /// Messages to append to the session log.
    pub messages: Option<Vec<Message>>,
    /// Metadata entries to overwrite per key.
    pub extra: Option<ExtraMap>,
}

impl NodePartial {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }

    #[must_use]
    pub fn with_extra(mut self, extra: ExtraMap) -> Self {
        self.extra = Some(extra);
        self
    }

    /// True when the partial carries no data for any channel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let no_messages = self.messages.as_ref().is_none_or(|m| m.is_empty());
        let no_extra = self.extra.as_ref().is_none_or(|e| e.is_empty());
        no_messages && no_extra
    }
}

/// Fatal node failure: aborts the run and surfaces through the step stream.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeError {
    #[error("missing expected input: {what}")]
    #[diagnostic(
        code(threadflow::node::missing_input),
        help("Check that the run input or an earlier node produced the required data.")
    )]
    MissingInput { what: &'static str },

    #[error("provider error ({provider}): {message}")]
    #[diagnostic(
        code(threadflow::node::provider),
        help("The external provider failed; inspect the message for the upstream cause.")
    )]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("invalid input or output: {0}")]
    #[diagnostic(code(threadflow::node::validation))]
    ValidationFailed(String),

    #[error(transparent)]
    #[diagnostic(code(threadflow::node::serde_json))]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::collections::new_extra_map;
    use serde_json::json;

    #[test]
    fn partial_emptiness() {
        assert!(NodePartial::new().is_empty());
        assert!(NodePartial::new().with_messages(vec![]).is_empty());
        assert!(!NodePartial::new()
            .with_messages(vec![Message::assistant("x")])
            .is_empty());

        let mut extra = new_extra_map();
        extra.insert("k".into(), json!(true));
        assert!(!NodePartial::new().with_extra(extra).is_empty());
    }
}
