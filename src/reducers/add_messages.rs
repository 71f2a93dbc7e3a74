use super::{MergePolicy, Reducer};
use crate::node::NodePartial;
use crate::state::SessionState;

/// Accumulate reducer for the messages channel: appends in update order,
/// never reorders or removes existing entries.
#[derive(Debug, PartialEq, Clone, Hash, Eq)]
pub struct AddMessages;

impl Reducer for AddMessages {
    fn policy(&self) -> MergePolicy {
        MergePolicy::Accumulate
    }

    fn apply(&self, state: &mut SessionState, update: &NodePartial) {
        if let Some(messages) = &update.messages
            && !messages.is_empty()
        {
            state.messages.extend(messages.iter().cloned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn appends_preserving_order() {
        let mut state = SessionState::new_with_user_message("hi");
        let update = NodePartial::new()
            .with_messages(vec![Message::assistant("a"), Message::assistant("b")]);
        AddMessages.apply(&mut state, &update);
        let contents: Vec<&str> = state.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "a", "b"]);
    }

    #[test]
    fn absent_or_empty_updates_are_noops() {
        let mut state = SessionState::new_with_user_message("hi");
        AddMessages.apply(&mut state, &NodePartial::new());
        AddMessages.apply(&mut state, &NodePartial::new().with_messages(vec![]));
        assert_eq!(state.messages.len(), 1);
    }
}
