//! Session state: the accumulated data a workflow reads and mutates.
//!
//! A session ("thread") owns one [`SessionState`]. Nodes never touch it
//! directly: they receive an immutable [`StateSnapshot`] and return a
//! [`NodePartial`](crate::node::NodePartial) that the reducer registry merges
//! back in. Callers hand new input to a run as a [`RunInput`], which is merged
//! through the same reducers before the first node executes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;
use crate::node::NodePartial;
use crate::utils::collections::{new_extra_map, ExtraMap};

/// Accumulated per-session state.
///
/// `messages` is the ordered, append-only conversation log; `extra` is a
/// replace-per-key metadata map. Both survive across runs of the same session
/// via the checkpoint store.
///
/// # Examples
///
/// ```
/// use threadflow::state::SessionState;
///
/// let state = SessionState::builder()
///     .with_system_message("You are a helpful assistant.")
///     .with_user_message("Hello!")
///     .build();
/// assert_eq!(state.messages.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Ordered conversation log. Reducers only ever append here.
    pub messages: Vec<Message>,
    /// Keyed metadata. Reducers overwrite per key.
    pub extra: ExtraMap,
}

impl SessionState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state seeded with a single user message.
    #[must_use]
    pub fn new_with_user_message(content: &str) -> Self {
        Self {
            messages: vec![Message::user(content)],
            extra: new_extra_map(),
        }
    }

    /// Starts fluent construction of a state.
    #[must_use]
    pub fn builder() -> SessionStateBuilder {
        SessionStateBuilder::default()
    }

    /// The most recently appended message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Clones the state into an immutable snapshot for nodes and routers.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            messages: self.messages.clone(),
            extra: self.extra.clone(),
        }
    }
}

/// Immutable point-in-time view of a [`SessionState`].
///
/// Handed to [`Node::run`](crate::node::Node::run) and to conditional-edge
/// routers. Owning clones keeps the node contract simple (no borrows across
/// `await` points) and guarantees a node cannot mutate shared state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub messages: Vec<Message>,
    pub extra: ExtraMap,
}

impl StateSnapshot {
    /// The most recently appended message, if any.
    ///
    /// Routers typically branch on this.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Fluent builder for [`SessionState`].
#[derive(Clone, Debug, Default)]
pub struct SessionStateBuilder {
    messages: Vec<Message>,
    extra: ExtraMap,
}

impl SessionStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    #[must_use]
    pub fn with_user_message(self, content: &str) -> Self {
        self.with_message(Message::user(content))
    }

    #[must_use]
    pub fn with_assistant_message(self, content: &str) -> Self {
        self.with_message(Message::assistant(content))
    }

    #[must_use]
    pub fn with_system_message(self, content: &str) -> Self {
        self.with_message(Message::system(content))
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn build(self) -> SessionState {
        SessionState {
            messages: self.messages,
            extra: self.extra,
        }
    }
}

/// Caller-supplied input for a single run.
///
/// Merged through the reducer registry before the first node executes, so the
/// same accumulate/replace policies govern caller input and node output alike.
/// An empty input is valid and resumes the session with its stored state
/// unchanged.
///
/// ```
/// use threadflow::state::RunInput;
/// use serde_json::json;
///
/// let input = RunInput::user("I need fresh data, tool_needed")
///     .with_extra("request_id", json!("r-42"));
/// assert!(!input.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RunInput {
    messages: Vec<Message>,
    extra: ExtraMap,
}

impl RunInput {
    /// An empty input: the run starts from the stored state as-is.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Input consisting of one user message.
    #[must_use]
    pub fn user(content: &str) -> Self {
        Self::default().with_message(Message::user(content))
    }

    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.extra.is_empty()
    }

    /// Converts the input into the update shape the reducers consume.
    #[must_use]
    pub fn into_partial(self) -> NodePartial {
        let mut partial = NodePartial::new();
        if !self.messages.is_empty() {
            partial = partial.with_messages(self.messages);
        }
        if !self.extra.is_empty() {
            partial = partial.with_extra(self.extra);
        }
        partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_preserves_message_order() {
        let state = SessionState::builder()
            .with_system_message("sys")
            .with_user_message("first")
            .with_assistant_message("second")
            .build();
        let roles: Vec<&str> = state.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
        assert_eq!(state.last_message().map(|m| m.content.as_str()), Some("second"));
    }

    #[test]
    fn snapshot_is_detached_from_state() {
        let mut state = SessionState::new_with_user_message("hello");
        let snapshot = state.snapshot();
        state.messages.push(Message::assistant("later"));
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(state.messages.len(), 2);
    }

    #[test]
    fn run_input_into_partial_skips_empty_fields() {
        let partial = RunInput::empty().into_partial();
        assert!(partial.messages.is_none());
        assert!(partial.extra.is_none());

        let partial = RunInput::user("hi").with_extra("k", json!(1)).into_partial();
        assert_eq!(partial.messages.as_ref().map(Vec::len), Some(1));
        assert!(partial.extra.is_some());
    }
}
