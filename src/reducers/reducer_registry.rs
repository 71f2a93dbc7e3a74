use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::{AddMessages, MapMerge, MergePolicy, Reducer, ReducerError};
use crate::node::NodePartial;
use crate::state::SessionState;
use crate::types::ChannelType;

/// Per-channel table of merge policies.
///
/// The registry is the single auditable answer to "what happens when a node
/// returns data for this field": each channel maps to exactly one reducer.
/// [`ReducerRegistry::default`] registers the standard pair (messages
/// accumulate, extra replaces); callers can override a channel's reducer at
/// graph build time via [`GraphBuilder::with_reducers`](crate::graphs::GraphBuilder::with_reducers).
#[derive(Clone)]
pub struct ReducerRegistry {
    reducers: FxHashMap<ChannelType, Arc<dyn Reducer>>,
}

impl Default for ReducerRegistry {
    fn default() -> Self {
        Self::empty()
            .with_reducer(ChannelType::Messages, Arc::new(AddMessages))
            .with_reducer(ChannelType::Extra, Arc::new(MapMerge))
    }
}

impl ReducerRegistry {
    /// A registry with no channels registered. Useful as a base when every
    /// channel should carry a custom reducer.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            reducers: FxHashMap::default(),
        }
    }

    /// Registers (or replaces) the reducer for a channel.
    #[must_use]
    pub fn with_reducer(mut self, channel: ChannelType, reducer: Arc<dyn Reducer>) -> Self {
        self.reducers.insert(channel, reducer);
        self
    }

    /// The declared policy for a channel, if one is registered.
    #[must_use]
    pub fn policy(&self, channel: ChannelType) -> Option<MergePolicy> {
        self.reducers.get(&channel).map(|r| r.policy())
    }

    /// Applies one channel of `update` to `state`.
    ///
    /// Updates that carry no data for the channel are no-ops; data for an
    /// unregistered channel is a configuration error.
    pub fn try_update(
        &self,
        channel: ChannelType,
        state: &mut SessionState,
        update: &NodePartial,
    ) -> Result<(), ReducerError> {
        if !channel_has_data(channel, update) {
            return Ok(());
        }
        let reducer = self
            .reducers
            .get(&channel)
            .ok_or(ReducerError::UnknownChannel(channel))?;
        reducer.apply(state, update);
        Ok(())
    }

    /// Applies every populated channel of `update` to `state`.
    ///
    /// This is the merge barrier the runner calls once per step; it is also
    /// how run input enters the state before the first node executes.
    pub fn apply_all(
        &self,
        state: &mut SessionState,
        update: &NodePartial,
    ) -> Result<(), ReducerError> {
        for channel in [ChannelType::Messages, ChannelType::Extra] {
            self.try_update(channel, state, update)?;
        }
        Ok(())
    }
}

/// Channel guard: does this update carry data for the channel at all?
fn channel_has_data(channel: ChannelType, update: &NodePartial) -> bool {
    match channel {
        ChannelType::Messages => update.messages.as_ref().is_some_and(|m| !m.is_empty()),
        ChannelType::Extra => update.extra.as_ref().is_some_and(|e| !e.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::utils::collections::new_extra_map;
    use serde_json::json;

    #[test]
    fn default_registry_policies() {
        let registry = ReducerRegistry::default();
        assert_eq!(
            registry.policy(ChannelType::Messages),
            Some(MergePolicy::Accumulate)
        );
        assert_eq!(registry.policy(ChannelType::Extra), Some(MergePolicy::Replace));
    }

    #[test]
    fn apply_all_merges_both_channels() {
        let registry = ReducerRegistry::default();
        let mut state = SessionState::new();
        let mut extra = new_extra_map();
        extra.insert("step".into(), json!(1));
        let update = NodePartial::new()
            .with_messages(vec![Message::user("hi")])
            .with_extra(extra);

        registry.apply_all(&mut state, &update).unwrap();
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.extra["step"], json!(1));
    }

    #[test]
    fn unregistered_channel_with_data_is_an_error() {
        let registry = ReducerRegistry::empty();
        let mut state = SessionState::new();
        let update = NodePartial::new().with_messages(vec![Message::user("hi")]);
        let err = registry.apply_all(&mut state, &update).unwrap_err();
        assert!(matches!(err, ReducerError::UnknownChannel(ChannelType::Messages)));
    }

    #[test]
    fn unregistered_channel_without_data_is_fine() {
        let registry = ReducerRegistry::empty();
        let mut state = SessionState::new();
        registry.apply_all(&mut state, &NodePartial::new()).unwrap();
    }
}
