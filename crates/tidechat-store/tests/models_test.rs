use tidechat_store::{MessageContent, MessagePart, MessageRole, TranscriptMessage};

#[test]
fn test_transcript_message_wire_shape() {
    let json = r#"{
        "id": "msg-abc123",
        "role": "user",
        "content": "hello there",
        "createdAt": "2025-01-15T10:30:00Z"
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.id, "msg-abc123");
    assert_eq!(msg.role, MessageRole::User);
    assert_eq!(msg.content.to_plain_text(), "hello there");
}

#[test]
fn test_transcript_message_missing_created_at_defaults_to_now() {
    let json = r#"{"id": "m1", "role": "user", "content": "hi"}"#;
    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.id, "m1");
}

#[test]
fn test_role_serialization_is_lowercase() {
    let msg = TranscriptMessage::assistant("hello");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"assistant\""));
}

#[test]
fn test_content_plain_text_round_trip() {
    let content = MessageContent::text("plain");
    let json = serde_json::to_string(&content).unwrap();
    assert_eq!(json, "\"plain\"");

    let back: MessageContent = serde_json::from_str(&json).unwrap();
    assert_eq!(back.to_plain_text(), "plain");
}

#[test]
fn test_content_parts_deserialization() {
    let json = r#"[
        {"type": "text", "text": "look at this"},
        {"type": "image", "image": "data:image/png;base64,xyz"}
    ]"#;

    let content: MessageContent = serde_json::from_str(json).unwrap();
    match &content {
        MessageContent::Parts(parts) => assert_eq!(parts.len(), 2),
        _ => panic!("Expected Parts variant"),
    }
    assert_eq!(content.to_plain_text(), "look at this");
}

#[test]
fn test_tool_call_part_shape() {
    let json = r#"{
        "type": "tool-call",
        "toolCallId": "call_1",
        "toolName": "get_weather",
        "args": {"city": "NYC"}
    }"#;

    let part: MessagePart = serde_json::from_str(json).unwrap();
    match part {
        MessagePart::ToolCall { tool_name, .. } => assert_eq!(tool_name, "get_weather"),
        _ => panic!("Expected ToolCall variant"),
    }
}

#[test]
fn test_to_llm_role_mapping() {
    assert_eq!(TranscriptMessage::user("q").to_llm().role(), "user");
    assert_eq!(TranscriptMessage::assistant("a").to_llm().role(), "assistant");

    let system = TranscriptMessage::new(MessageRole::System, MessageContent::text("rules"));
    assert_eq!(system.to_llm().role(), "system");
}

#[test]
fn test_to_llm_flattens_parts_to_text() {
    let msg = TranscriptMessage::new(
        MessageRole::User,
        MessageContent::Parts(vec![
            MessagePart::Text { text: "a".to_string() },
            MessagePart::Image { image: "data:...".to_string() },
            MessagePart::Text { text: "b".to_string() },
        ]),
    );

    let llm = msg.to_llm();
    match llm {
        tidechat_llm::Message::Human { content, .. } => {
            assert_eq!(content.as_text(), Some("a\nb"));
        }
        _ => panic!("Expected Human variant"),
    }
}

#[test]
fn test_minted_ids_are_unique() {
    let a = TranscriptMessage::user("x");
    let b = TranscriptMessage::user("x");
    assert_ne!(a.id, b.id);
}
