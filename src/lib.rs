//! # Threadflow: Checkpointed Conversation Workflow Executor
//!
//! Threadflow runs directed graphs of async nodes over accumulating session
//! state. Sessions ("threads") persist a checkpoint after every step, so a
//! later run with the same session id resumes the conversation exactly where
//! it left off.
//!
//! ## Core Concepts
//!
//! - **Nodes**: Async units of work receiving a state snapshot and returning
//!   a partial update
//! - **Reducers**: Explicit per-channel merge policies (messages accumulate,
//!   metadata replaces per key)
//! - **Graph**: Declarative wiring with static and conditional edges,
//!   validated at compile time; cycles are legal
//! - **Runner**: Streams one report per committed step; the consumer's pace
//!   is the execution pace
//! - **Checkpointer**: One durable record per session, overwritten each step
//!
//! ## Quick Start
//!
//! ```
//! use threadflow::{
//!     graphs::{GraphBuilder, Transition},
//!     message::Message,
//!     node::{Node, NodeContext, NodeError, NodePartial},
//!     state::StateSnapshot,
//! };
//! use async_trait::async_trait;
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl Node for Greeter {
//!     async fn run(
//!         &self,
//!         _snapshot: StateSnapshot,
//!         _ctx: NodeContext,
//!     ) -> Result<NodePartial, NodeError> {
//!         Ok(NodePartial::new().with_messages(vec![Message::assistant("Hello!")]))
//!     }
//! }
//!
//! let workflow = GraphBuilder::new()
//!     .add_node("greet", Greeter)
//!     .set_entry("greet")
//!     .add_edge("greet", Transition::Terminate)
//!     .compile()
//!     .unwrap();
//! ```
//!
//! Then drive a session:
//!
//! ```rust,no_run
//! # async fn demo(workflow: threadflow::workflow::Workflow) -> miette::Result<()> {
//! use futures_util::StreamExt;
//! use threadflow::state::RunInput;
//!
//! let runner = workflow.runner();
//! let mut steps = runner.run("thread-1", RunInput::user("Hi!"));
//! while let Some(step) = steps.next().await {
//!     println!("{:?}", step?.next);
//! }
//! // A later run with "thread-1" resumes with the accumulated log.
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`message`] - Conversation log entries
//! - [`state`] - Session state, snapshots, and run input
//! - [`node`] - The node trait and execution primitives
//! - [`reducers`] - Merge policies and the per-channel registry
//! - [`graphs`] - Graph definition and compile-time validation
//! - [`workflow`] - The compiled workflow artifact
//! - [`runtimes`] - Runner, checkpointing, persistence models, inspection
//! - [`telemetry`] - Tracing subscriber helpers

pub mod graphs;
pub mod message;
pub mod node;
pub mod reducers;
pub mod runtimes;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod utils;
pub mod workflow;
