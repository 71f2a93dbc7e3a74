//! Core identifier types shared across the graph, runtime, and reducer layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node declared in a workflow graph.
///
/// A thin newtype over `String` so that node identity is explicit at API
/// boundaries instead of being one more bare string argument. Construct via
/// [`NodeName::new`] or the `From` impls:
///
/// ```
/// use threadflow::types::NodeName;
///
/// let a = NodeName::new("llm");
/// let b: NodeName = "llm".into();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "llm");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeName(String);

impl NodeName {
    /// Creates a node name from anything string-like.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for NodeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&NodeName> for NodeName {
    fn from(name: &NodeName) -> Self {
        name.clone()
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// State channel addressed by a reducer registration.
///
/// Each channel carries exactly one merge policy in the
/// [`ReducerRegistry`](crate::reducers::ReducerRegistry); a node update is
/// routed to the reducer registered for the channel it populates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelType {
    /// The ordered conversation log (`SessionState::messages`).
    Messages,
    /// The keyed metadata map (`SessionState::extra`).
    Extra,
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelType::Messages => f.write_str("messages"),
            ChannelType::Extra => f.write_str("extra"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_name_display_and_conversions() {
        let name = NodeName::new("tool");
        assert_eq!(name.to_string(), "tool");
        assert_eq!(NodeName::from("tool"), name);
        assert_eq!(NodeName::from("tool".to_string()), name);
    }

    #[test]
    fn channel_type_display() {
        assert_eq!(ChannelType::Messages.to_string(), "messages");
        assert_eq!(ChannelType::Extra.to_string(), "extra");
    }
}
