use tidechat_llm::StreamEvent;
use tidechat_llm::streaming::{ChatStreamChunk, Delta, StreamChoice};

fn chunk(content: Option<&str>, finish_reason: Option<&str>) -> ChatStreamChunk {
    ChatStreamChunk {
        id: "chatcmpl-1".to_string(),
        object: "chat.completion.chunk".to_string(),
        created: 0,
        model: "gpt-4o-mini".to_string(),
        choices: vec![StreamChoice {
            index: 0,
            delta: Delta {
                role: None,
                content: content.map(|s| s.to_string()),
            },
            finish_reason: finish_reason.map(|s| s.to_string()),
        }],
    }
}

#[test]
fn test_stream_event_message() {
    let event = StreamEvent::Message {
        content: "Hello".to_string(),
    };

    match event {
        StreamEvent::Message { content } => assert_eq!(content, "Hello"),
        _ => panic!("Expected Message variant"),
    }
}

#[test]
fn test_stream_event_done() {
    let event = StreamEvent::Done {
        finish_reason: Some("stop".to_string()),
    };

    match event {
        StreamEvent::Done { finish_reason } => {
            assert_eq!(finish_reason, Some("stop".to_string()));
        }
        _ => panic!("Expected Done variant"),
    }
}

#[test]
fn test_stream_event_serialization_message() {
    let event = StreamEvent::Message {
        content: "Test".to_string(),
    };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"message\""));
    assert!(json.contains("Test"));
}

#[test]
fn test_stream_event_deserialization_message() {
    let json = r#"{"type":"message","content":"Hello"}"#;
    let event: StreamEvent = serde_json::from_str(json).unwrap();

    match event {
        StreamEvent::Message { content } => assert_eq!(content, "Hello"),
        _ => panic!("Expected Message variant"),
    }
}

#[test]
fn test_chunk_content_extraction() {
    let c = chunk(Some("delta text"), None);
    assert_eq!(c.content(), Some("delta text"));
    assert!(!c.is_done());
}

#[test]
fn test_chunk_done_detection() {
    let c = chunk(None, Some("stop"));
    assert_eq!(c.content(), None);
    assert!(c.is_done());
}

#[test]
fn test_chunk_deserialization() {
    let json = r#"{
        "id": "chatcmpl-1",
        "object": "chat.completion.chunk",
        "created": 1700000000,
        "model": "gpt-4o-mini",
        "choices": [{"index": 0, "delta": {"content": "Hi"}, "finish_reason": null}]
    }"#;
    let c: ChatStreamChunk = serde_json::from_str(json).unwrap();
    assert_eq!(c.content(), Some("Hi"));
}
