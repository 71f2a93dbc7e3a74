use super::{MergePolicy, Reducer};
use crate::node::NodePartial;
use crate::state::SessionState;

/// Replace reducer for the extra channel: overwrites per key, leaves keys the
/// update does not mention untouched.
#[derive(Debug, PartialEq, Clone, Hash, Eq)]
pub struct MapMerge;

impl Reducer for MapMerge {
    fn policy(&self) -> MergePolicy {
        MergePolicy::Replace
    }

    fn apply(&self, state: &mut SessionState, update: &NodePartial) {
        if let Some(extra) = &update.extra
            && !extra.is_empty()
        {
            for (k, v) in extra.iter() {
                state.extra.insert(k.clone(), v.clone());
            }
        }
    }
}
