/*!
Persistence primitives for serializing checkpoints to durable backends.

The crate ships only the in-memory checkpointer; external stores (SQL,
object storage) integrate through the `Checkpointer` trait and use these
serde-friendly models as their wire shape. Keeping them decoupled from the
in-memory types means the stored format can stay stable while the runtime
types evolve.

This module performs no I/O. It is pure data transformation and
(de)serialization glue.
*/

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::Message;
use crate::runtimes::checkpointer::Checkpoint;
use crate::state::SessionState;
use crate::types::NodeName;
use crate::utils::collections::ExtraMap;

/// Serde-friendly shape of [`SessionState`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedState {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub extra: ExtraMap,
}

/// Serde-friendly shape of a [`Checkpoint`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedCheckpoint {
    pub session_id: String,
    pub step: u64,
    pub state: PersistedState,
    /// Cursor node name for the next run.
    pub next_node: String,
    /// RFC3339 creation time (keeps `chrono::DateTime` out of the stored shape).
    pub created_at: String,
}

impl PersistedCheckpoint {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| PersistenceError::Serde { source })
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|source| PersistenceError::Serde { source })
    }
}

/// Conversion and serialization errors for persistence models.
#[derive(Debug, Error, Diagnostic)]
pub enum PersistenceError {
    #[error("JSON serialization/deserialization failed: {source}")]
    #[diagnostic(
        code(threadflow::persistence::serde),
        help("Ensure the stored JSON matches the Persisted* shapes.")
    )]
    Serde {
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

impl From<&SessionState> for PersistedState {
    fn from(state: &SessionState) -> Self {
        PersistedState {
            messages: state.messages.clone(),
            extra: state.extra.clone(),
        }
    }
}

impl From<PersistedState> for SessionState {
    fn from(persisted: PersistedState) -> Self {
        SessionState {
            messages: persisted.messages,
            extra: persisted.extra,
        }
    }
}

impl From<&Checkpoint> for PersistedCheckpoint {
    fn from(checkpoint: &Checkpoint) -> Self {
        PersistedCheckpoint {
            session_id: checkpoint.session_id.clone(),
            step: checkpoint.step,
            state: PersistedState::from(&checkpoint.state),
            next_node: checkpoint.next_node.to_string(),
            created_at: checkpoint.created_at.to_rfc3339(),
        }
    }
}

impl From<PersistedCheckpoint> for Checkpoint {
    fn from(persisted: PersistedCheckpoint) -> Self {
        // Unparseable timestamps fall back to load time; the timestamp is
        // informational and must not block restoring a session.
        let created_at = DateTime::parse_from_rfc3339(&persisted.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        Checkpoint {
            session_id: persisted.session_id,
            step: persisted.step,
            state: SessionState::from(persisted.state),
            next_node: NodeName::new(persisted.next_node),
            created_at,
        }
    }
}
