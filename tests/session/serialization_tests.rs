//! Session and message wire-format stability.

use serde_json::json;

use taskforge_session::{
    CanvasContentType, Identity, MemoryStore, Message, MessagePayload, Session, SessionStore,
};

#[test]
fn message_kinds_use_stable_type_tags() {
    let cases = vec![
        (Message::user("hi"), "user"),
        (Message::agent_thought("thinking"), "agent_thought"),
        (Message::agent_response("done"), "agent_response"),
        (
            Message::agent_canvas_output("<p>x</p>", CanvasContentType::Html),
            "agent_canvas_output",
        ),
        (Message::tool_result("search", "3 hits"), "tool_result"),
    ];

    for (message, expected_tag) in cases {
        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(value["type"], expected_tag);
    }
}

#[test]
fn tool_result_keeps_its_tool_name() {
    let message = Message::tool_result("web_search", "result body");
    let value = serde_json::to_value(&message).expect("serialize");

    assert_eq!(value["tool"], "web_search");
    assert_eq!(value["content"], "result body");
}

#[test]
fn session_round_trips_with_identities_and_provider() {
    let mut session = Session::new("round-trip");
    session.identities.push(Identity {
        id: "user@example.com".to_string(),
        kind: "email".to_string(),
    });
    session.active_llm_provider = Some("gemini-main".to_string());
    session.push(Message::user("hello"));
    session.push(Message::agent_response("hi there"));

    let serialized = serde_json::to_string(&session).expect("serialize");
    let back: Session = serde_json::from_str(&serialized).expect("deserialize");

    assert_eq!(back.id, "round-trip");
    assert_eq!(back.history.len(), 2);
    assert_eq!(back.identities[0].id, "user@example.com");
    assert_eq!(back.active_llm_provider.as_deref(), Some("gemini-main"));
}

#[test]
fn legacy_sessions_without_optional_fields_still_load() {
    let raw = json!({
        "id": "legacy",
        "history": [],
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    });

    let session: Session = serde_json::from_value(raw).expect("deserialize");
    assert!(session.identities.is_empty());
    assert_eq!(session.active_llm_provider, None);
}

#[test]
fn identity_kind_serializes_as_type() {
    let identity = Identity {
        id: "u1".to_string(),
        kind: "api_key".to_string(),
    };
    let value = serde_json::to_value(&identity).expect("serialize");
    assert_eq!(value["type"], "api_key");
}

#[test]
fn store_round_trip_preserves_compacted_history() {
    let store = MemoryStore::new();
    let mut session = Session::new("compacted");
    for i in 0..10 {
        session.push(Message::user(format!("msg {i}")));
    }
    session.replace_prefix(4, Message::agent_thought("Summarized conversation: early work"));
    store.save(&session).expect("save");

    let loaded = store.load("compacted").expect("load");
    assert_eq!(loaded.history.len(), 5);
    assert!(matches!(
        loaded.history[0].payload,
        MessagePayload::AgentThought { .. }
    ));
}
