//! In-memory checkpoint store semantics.

use threadflow::runtimes::checkpointer::{
    Checkpoint, Checkpointer, CheckpointerError, InMemoryCheckpointer,
};
use threadflow::state::SessionState;
use threadflow::types::NodeName;

fn checkpoint(session_id: &str, step: u64, last_content: &str) -> Checkpoint {
    Checkpoint::new(
        session_id,
        step,
        SessionState::new_with_user_message(last_content),
        NodeName::new("llm"),
    )
}

#[tokio::test]
async fn load_of_unknown_session_is_none() {
    let store = InMemoryCheckpointer::new();
    assert!(store.load("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn save_then_load_roundtrips() {
    let store = InMemoryCheckpointer::new();
    store.save(checkpoint("s1", 1, "hello")).await.unwrap();

    let loaded = store.load("s1").await.unwrap().unwrap();
    assert_eq!(loaded.session_id, "s1");
    assert_eq!(loaded.step, 1);
    assert_eq!(loaded.next_node.as_str(), "llm");
    assert_eq!(loaded.state.messages[0].content, "hello");
}

#[tokio::test]
async fn later_save_replaces_earlier_one() {
    let store = InMemoryCheckpointer::new();
    store.save(checkpoint("s1", 1, "first")).await.unwrap();
    store.save(checkpoint("s1", 2, "second")).await.unwrap();

    let loaded = store.load("s1").await.unwrap().unwrap();
    assert_eq!(loaded.step, 2);
    assert_eq!(loaded.state.messages[0].content, "second");
}

#[tokio::test]
async fn list_sessions_is_sorted_and_deduplicated() {
    let store = InMemoryCheckpointer::new();
    store.save(checkpoint("zeta", 1, "z")).await.unwrap();
    store.save(checkpoint("alpha", 1, "a")).await.unwrap();
    store.save(checkpoint("alpha", 2, "a2")).await.unwrap();

    let sessions = store.list_sessions().await.unwrap();
    assert_eq!(sessions, vec!["alpha".to_string(), "zeta".to_string()]);
}

#[test]
fn retryability_classification() {
    let save = CheckpointerError::Save {
        session_id: "s".into(),
        reason: "disk full".into(),
    };
    let load = CheckpointerError::Load {
        session_id: "s".into(),
        reason: "connection reset".into(),
    };
    assert!(save.is_retryable());
    assert!(load.is_retryable());

    let corrupt = CheckpointerError::Persistence(
        threadflow::runtimes::persistence::PersistedCheckpoint::from_json("{")
            .unwrap_err(),
    );
    assert!(!corrupt.is_retryable());
}
