//! Runtime layer: execution, checkpointing, and session inspection.

pub mod checkpointer;
pub mod inspector;
pub mod persistence;
pub mod runner;
pub mod runtime_config;

pub use checkpointer::{Checkpoint, Checkpointer, CheckpointerError, CheckpointerType, InMemoryCheckpointer};
pub use inspector::SessionInspector;
pub use runner::{RunOptions, RunnerError, StepReport, StepStream, WorkflowRunner};
pub use runtime_config::RunnerConfig;
