//! Graph definition: nodes, edges, and compile-time validation.
//!
//! A workflow graph is declared fluently on a [`GraphBuilder`] and frozen
//! into an immutable [`Workflow`](crate::workflow::Workflow) by
//! [`GraphBuilder::compile`]. All wiring mistakes (unknown targets, dangling
//! nodes, missing entry) are rejected at compile time with a specific
//! [`GraphConfigError`] variant; a compiled workflow cannot raise a wiring
//! error at run time. Cycles are legal and expected — they are how agent
//! loops are expressed.

mod builder;
mod edges;

pub use builder::{GraphBuilder, GraphConfigError};
pub use edges::{ConditionalEdge, Edge, Router, Transition};
