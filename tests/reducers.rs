//! Merge semantics: accumulation, per-key replacement, associativity.

use proptest::prelude::*;
use threadflow::message::Message;
use threadflow::node::NodePartial;
use threadflow::reducers::ReducerRegistry;
use threadflow::state::SessionState;
use threadflow::utils::collections::new_extra_map;

use serde_json::json;

#[test]
fn messages_accumulate_in_step_order() {
    let registry = ReducerRegistry::default();
    let mut state = SessionState::new_with_user_message("start");

    for i in 0..3 {
        let update =
            NodePartial::new().with_messages(vec![Message::assistant(&format!("reply {i}"))]);
        registry.apply_all(&mut state, &update).unwrap();
    }

    let contents: Vec<&str> = state.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["start", "reply 0", "reply 1", "reply 2"]);
}

#[test]
fn extra_replaces_per_key_only() {
    let registry = ReducerRegistry::default();
    let mut state = SessionState::new();
    state.extra.insert("untouched".into(), json!("original"));
    state.extra.insert("counter".into(), json!(1));

    let mut extra = new_extra_map();
    extra.insert("counter".into(), json!(2));
    registry
        .apply_all(&mut state, &NodePartial::new().with_extra(extra))
        .unwrap();

    assert_eq!(state.extra["untouched"], json!("original"));
    assert_eq!(state.extra["counter"], json!(2));
}

#[test]
fn absent_fields_leave_state_untouched() {
    let registry = ReducerRegistry::default();
    let mut state = SessionState::new_with_user_message("hello");
    state.extra.insert("k".into(), json!(true));
    let before = state.clone();

    registry.apply_all(&mut state, &NodePartial::new()).unwrap();
    assert_eq!(state, before);
}

proptest! {
    /// Applying message batches one step at a time equals applying their
    /// concatenation as one batch.
    #[test]
    fn message_merging_is_associative(batches in prop::collection::vec(
        prop::collection::vec("[a-z ]{0,12}", 0..4),
        0..6,
    )) {
        let registry = ReducerRegistry::default();

        let mut stepwise = SessionState::new();
        for batch in &batches {
            let messages: Vec<Message> = batch.iter().map(|c| Message::assistant(c)).collect();
            let update = NodePartial::new().with_messages(messages);
            registry.apply_all(&mut stepwise, &update).unwrap();
        }

        let mut combined = SessionState::new();
        let all: Vec<Message> = batches
            .iter()
            .flatten()
            .map(|c| Message::assistant(c))
            .collect();
        registry
            .apply_all(&mut combined, &NodePartial::new().with_messages(all))
            .unwrap();

        prop_assert_eq!(stepwise, combined);
    }

    /// For the extra channel, the last write per key wins regardless of how
    /// the writes are batched.
    #[test]
    fn extra_merging_is_last_write_wins(writes in prop::collection::vec(
        ("[abc]", 0i64..100),
        0..8,
    )) {
        let registry = ReducerRegistry::default();

        let mut stepwise = SessionState::new();
        for (key, value) in &writes {
            let mut extra = new_extra_map();
            extra.insert(key.clone(), json!(value));
            registry
                .apply_all(&mut stepwise, &NodePartial::new().with_extra(extra))
                .unwrap();
        }

        let mut expected = SessionState::new();
        for (key, value) in &writes {
            expected.extra.insert(key.clone(), json!(value));
        }

        prop_assert_eq!(stepwise, expected);
    }
}
