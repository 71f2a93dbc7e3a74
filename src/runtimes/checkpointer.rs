//! Durable session storage.
//!
//! One logical [`Checkpoint`] exists per session id, overwritten after every
//! committed step. The store is the only durable artifact of execution:
//! anything not in the latest checkpoint does not exist as far as a resumed
//! run is concerned.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::state::SessionState;
use crate::types::NodeName;

pub type Result<T> = std::result::Result<T, CheckpointerError>;

/// Checkpoint store selection for [`RunnerConfig`](crate::runtimes::runtime_config::RunnerConfig).
///
/// Durable backends are supplied by integrators through the [`Checkpointer`]
/// trait and [`WorkflowRunner::with_checkpointer`](crate::runtimes::runner::WorkflowRunner::with_checkpointer);
/// only the in-memory reference implementation ships with the crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckpointerType {
    #[default]
    InMemory,
}

/// The latest committed state of a session.
///
/// `next_node` is the cursor: the node the next run of this session starts
/// at. Terminal runs store the workflow entry here so a finished conversation
/// re-enters at the top with its accumulated log.
#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    pub session_id: String,
    /// Step counter at commit time; continues across resumed runs.
    pub step: u64,
    pub state: SessionState,
    /// Cursor for the next run of this session.
    pub next_node: NodeName,
    pub created_at: DateTime<Utc>,
}

impl Checkpoint {
    #[must_use]
    pub fn new(
        session_id: impl Into<String>,
        step: u64,
        state: SessionState,
        next_node: NodeName,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            step,
            state,
            next_node,
            created_at: Utc::now(),
        }
    }
}

/// Storage abstraction for checkpoints.
///
/// Semantics required of implementations: last-write-wins per session id, and
/// a `load` after a completed `save` for the same session observes that save
/// (linearizable per session). Cross-session ordering is unconstrained.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Loads the latest checkpoint for a session, if any exists.
    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>>;

    /// Persists a checkpoint, replacing any previous one for the session.
    async fn save(&self, checkpoint: Checkpoint) -> Result<()>;

    /// Lists all session ids with a stored checkpoint.
    async fn list_sessions(&self) -> Result<Vec<String>>;
}

/// Reference in-memory store.
///
/// Correct and concurrency-safe, but process-local: state is lost on
/// restart. Suitable for tests and for deployments where sessions are
/// ephemeral by design.
#[derive(Default)]
pub struct InMemoryCheckpointer {
    checkpoints: RwLock<FxHashMap<String, Checkpoint>>,
}

impl InMemoryCheckpointer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for InMemoryCheckpointer {
    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>> {
        let guard = self.checkpoints.read().await;
        Ok(guard.get(session_id).cloned())
    }

    async fn save(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut guard = self.checkpoints.write().await;
        guard.insert(checkpoint.session_id.clone(), checkpoint);
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<String>> {
        let guard = self.checkpoints.read().await;
        let mut sessions: Vec<String> = guard.keys().cloned().collect();
        sessions.sort();
        Ok(sessions)
    }
}

/// Checkpoint store failures.
#[derive(Debug, Error, Diagnostic)]
pub enum CheckpointerError {
    #[error("failed to persist checkpoint for session `{session_id}`: {reason}")]
    #[diagnostic(
        code(threadflow::checkpointer::save),
        help("The run stopped before this step was committed; the previous checkpoint is intact.")
    )]
    Save { session_id: String, reason: String },

    #[error("failed to load checkpoint for session `{session_id}`: {reason}")]
    #[diagnostic(code(threadflow::checkpointer::load))]
    Load { session_id: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(threadflow::checkpointer::persistence))]
    Persistence(#[from] crate::runtimes::persistence::PersistenceError),
}

impl CheckpointerError {
    /// True for transient store failures worth retrying with the same
    /// arguments; false for corrupt or undecodable data.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckpointerError::Save { .. } | CheckpointerError::Load { .. }
        )
    }
}
