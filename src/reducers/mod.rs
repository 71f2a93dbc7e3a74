//! State merging: how node updates become session state.
//!
//! Every state channel has exactly one registered [`Reducer`] with an explicit
//! [`MergePolicy`], so the merge behavior of the whole system is auditable in
//! one place (the [`ReducerRegistry`]). The built-in pair matches the default
//! session shape: [`AddMessages`] accumulates the conversation log,
//! [`MapMerge`] overwrites metadata per key.
//!
//! Reducers are infallible on well-typed input and associative in step order:
//! applying updates one step at a time produces the same state as applying
//! their concatenation.

mod add_messages;
mod map_merge;
mod reducer_registry;

pub use add_messages::AddMessages;
pub use map_merge::MapMerge;
pub use reducer_registry::ReducerRegistry;

use miette::Diagnostic;
use thiserror::Error;

use crate::node::NodePartial;
use crate::state::SessionState;
use crate::types::ChannelType;

/// Declared merge behavior of a reducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// New values are appended; existing values are never reordered or dropped.
    Accumulate,
    /// New values overwrite existing values (per key for map channels).
    Replace,
}

/// Merges one channel of a [`NodePartial`] into session state.
///
/// Implementations must be pure with respect to their inputs and must only
/// touch the channel they are registered for.
pub trait Reducer: Send + Sync {
    /// The policy this reducer implements, surfaced for auditing.
    fn policy(&self) -> MergePolicy;

    /// Apply the update's data for this reducer's channel to `state`.
    fn apply(&self, state: &mut SessionState, update: &NodePartial);
}

/// Raised when an update carries data for a channel with no registered
/// reducer. This is a configuration error, not a data error.
#[derive(Debug, Error, Diagnostic)]
pub enum ReducerError {
    #[error("no reducer registered for channel `{0}`")]
    #[diagnostic(
        code(threadflow::reducers::unknown_channel),
        help("Register a reducer for this channel via ReducerRegistry before compiling the graph.")
    )]
    UnknownChannel(ChannelType),
}
