//! Shared fixtures for integration tests: simple node implementations and
//! the two-node agent graph used across suites.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;

use threadflow::graphs::{GraphBuilder, Router, Transition};
use threadflow::message::Message;
use threadflow::node::{Node, NodeContext, NodeError, NodePartial};
use threadflow::state::StateSnapshot;
use threadflow::workflow::Workflow;

/// Appends one assistant message naming itself. Handy for wiring-shape tests
/// where the content does not matter.
pub struct EchoNode {
    pub name: &'static str,
}

#[async_trait]
impl Node for EchoNode {
    async fn run(
        &self,
        _snapshot: StateSnapshot,
        _ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        Ok(NodePartial::new().with_messages(vec![Message::assistant(&format!("{} ran", self.name))]))
    }
}

/// Stand-in for a model call: answers based on the last message, and asks for
/// the tool when the user's request mentions needing one.
pub struct LlmNode;

#[async_trait]
impl Node for LlmNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        _ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let last = snapshot
            .last_message()
            .map(|m| m.content.to_lowercase())
            .unwrap_or_default();
        let reply = if last.contains("tool_needed") {
            "Okay, I'll use a tool."
        } else if last.contains("hello") {
            "Hello there! How can I help?"
        } else {
            "I've processed your message."
        };
        Ok(NodePartial::new().with_messages(vec![Message::assistant(reply)]))
    }
}

/// Stand-in for a tool invocation.
pub struct ToolNode;

#[async_trait]
impl Node for ToolNode {
    async fn run(
        &self,
        _snapshot: StateSnapshot,
        _ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        Ok(NodePartial::new().with_messages(vec![Message::assistant("Tool result: 42 widgets found.")]))
    }
}

/// Always fails; for error-path tests.
pub struct FailingNode;

#[async_trait]
impl Node for FailingNode {
    async fn run(
        &self,
        _snapshot: StateSnapshot,
        _ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        Err(NodeError::ValidationFailed("induced failure".to_string()))
    }
}

/// Router used by the agent graph: branch to the tool when the last message
/// mentions a tool, otherwise finish.
pub fn tool_router() -> Router {
    Arc::new(|snapshot: StateSnapshot| {
        let wants_tool = snapshot
            .last_message()
            .is_some_and(|m| m.content.to_lowercase().contains("tool"));
        if wants_tool {
            "tool".to_string()
        } else {
            "end".to_string()
        }
    })
}

/// The canonical two-node agent loop: llm decides, tool executes, control
/// returns to llm, and the llm's next answer ends the run.
pub fn agent_workflow() -> Workflow {
    GraphBuilder::new()
        .add_node("llm", LlmNode)
        .add_node("tool", ToolNode)
        .set_entry("llm")
        .add_conditional_edge(
            "llm",
            tool_router(),
            [
                ("tool", Transition::to("tool")),
                ("end", Transition::Terminate),
            ],
        )
        .add_edge("tool", Transition::to("llm"))
        .compile()
        .expect("agent workflow compiles")
}

/// A graph that never reaches a terminal transition.
pub fn endless_workflow() -> Workflow {
    GraphBuilder::new()
        .add_node("spin", EchoNode { name: "spin" })
        .set_entry("spin")
        .add_conditional_edge(
            "spin",
            Arc::new(|_| "again".to_string()),
            [("again", Transition::to("spin"))],
        )
        .compile()
        .expect("endless workflow compiles")
}
