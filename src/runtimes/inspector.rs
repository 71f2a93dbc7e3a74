//! Read-only session inspection.

use std::sync::Arc;

use crate::runtimes::checkpointer::{Checkpointer, Result};
use crate::state::StateSnapshot;
use crate::types::NodeName;

/// Read-only view over a checkpoint store.
///
/// Inspection never mutates the cursor and never triggers execution, so it is
/// safe to call concurrently with in-flight runs; it simply observes the last
/// committed checkpoint.
#[derive(Clone)]
pub struct SessionInspector {
    checkpointer: Arc<dyn Checkpointer>,
}

impl SessionInspector {
    #[must_use]
    pub fn new(checkpointer: Arc<dyn Checkpointer>) -> Self {
        Self { checkpointer }
    }

    /// The last committed state of a session, if one exists.
    pub async fn peek(&self, session_id: &str) -> Result<Option<StateSnapshot>> {
        Ok(self
            .checkpointer
            .load(session_id)
            .await?
            .map(|checkpoint| checkpoint.state.snapshot()))
    }

    /// The node the session's next run will start at, if a checkpoint exists.
    pub async fn cursor(&self, session_id: &str) -> Result<Option<NodeName>> {
        Ok(self
            .checkpointer
            .load(session_id)
            .await?
            .map(|checkpoint| checkpoint.next_node))
    }

    /// The last committed step number, if a checkpoint exists.
    pub async fn step(&self, session_id: &str) -> Result<Option<u64>> {
        Ok(self
            .checkpointer
            .load(session_id)
            .await?
            .map(|checkpoint| checkpoint.step))
    }

    /// All known session ids.
    pub async fn sessions(&self) -> Result<Vec<String>> {
        self.checkpointer.list_sessions().await
    }
}
