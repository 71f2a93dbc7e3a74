use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::state::StateSnapshot;
use crate::types::NodeName;

/// Where execution goes after a node completes.
///
/// Routing targets are a closed sum type rather than a sentinel node name, so
/// "stop here" cannot collide with a user-declared node and the compiler
/// forces every routing site to handle termination.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Hand the cursor to another node in the graph.
    Continue(NodeName),
    /// End the run. The session itself stays resumable.
    Terminate,
}

impl Transition {
    /// Shorthand for `Transition::Continue(name.into())`.
    #[must_use]
    pub fn to(name: impl Into<NodeName>) -> Self {
        Transition::Continue(name.into())
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Transition::Terminate)
    }

    /// The target node, when this transition continues.
    #[must_use]
    pub fn target(&self) -> Option<&NodeName> {
        match self {
            Transition::Continue(name) => Some(name),
            Transition::Terminate => None,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Continue(name) => write!(f, "continue({name})"),
            Transition::Terminate => f.write_str("terminate"),
        }
    }
}

/// Routing function of a conditional edge.
///
/// Pure over the merged post-step snapshot: it returns a label that the
/// edge's target map resolves to a [`Transition`]. Purity is what makes a
/// step's routing reproducible from its checkpoint.
pub type Router = Arc<dyn Fn(StateSnapshot) -> String + Send + Sync + 'static>;

/// A data-dependent edge: a router producing a label plus a label-to-target
/// map. Labels the map does not contain are a run-time routing error.
#[derive(Clone)]
pub struct ConditionalEdge {
    router: Router,
    targets: FxHashMap<String, Transition>,
}

impl ConditionalEdge {
    #[must_use]
    pub fn new(router: Router, targets: FxHashMap<String, Transition>) -> Self {
        Self { router, targets }
    }

    /// Evaluate the router against a snapshot, producing a label.
    #[must_use]
    pub fn route(&self, snapshot: StateSnapshot) -> String {
        (self.router)(snapshot)
    }

    /// Resolve a label to its mapped transition.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<&Transition> {
        self.targets.get(label)
    }

    /// All transitions this edge can produce, for validation.
    pub fn targets(&self) -> impl Iterator<Item = (&String, &Transition)> {
        self.targets.iter()
    }
}

impl fmt::Debug for ConditionalEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalEdge")
            .field("router", &"<fn>")
            .field("targets", &self.targets)
            .finish()
    }
}

/// The single outgoing edge of a node.
#[derive(Clone, Debug)]
pub enum Edge {
    /// Unconditional: always the same transition.
    Direct(Transition),
    /// Data-dependent: router label resolved through a target map.
    Conditional(ConditionalEdge),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_helpers() {
        let cont = Transition::to("llm");
        assert!(!cont.is_terminal());
        assert_eq!(cont.target(), Some(&NodeName::new("llm")));
        assert_eq!(cont.to_string(), "continue(llm)");

        assert!(Transition::Terminate.is_terminal());
        assert_eq!(Transition::Terminate.target(), None);
    }

    #[test]
    fn conditional_edge_resolution() {
        let router: Router = Arc::new(|_| "go".to_string());
        let mut targets = FxHashMap::default();
        targets.insert("go".to_string(), Transition::to("tool"));
        let edge = ConditionalEdge::new(router, targets);

        let snapshot = crate::state::SessionState::new().snapshot();
        let label = edge.route(snapshot);
        assert_eq!(edge.resolve(&label), Some(&Transition::to("tool")));
        assert_eq!(edge.resolve("missing"), None);
    }
}
