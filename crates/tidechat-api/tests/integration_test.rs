use axum::response::IntoResponse;
use tidechat_api::error::ApiError;
use tidechat_store::StoreError;

#[tokio::test]
async fn test_unauthenticated_maps_to_401() {
    let response = ApiError::Unauthenticated.into_response();
    assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_not_found_maps_to_404() {
    let response = ApiError::NotFound("User".to_string()).into_response();
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_request_maps_to_400() {
    let response = ApiError::BadRequest("Invalid chat ID format".to_string()).into_response();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_internal_maps_to_500() {
    let response = ApiError::Internal(anyhow::anyhow!("boom")).into_response();
    assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_access_denied_is_indistinguishable_from_not_found() {
    let denied: ApiError = StoreError::AccessDenied("abc".to_string()).into();
    let missing = ApiError::NotFound("Chat abc".to_string());

    let denied_status = denied.into_response().status();
    let missing_status = missing.into_response().status();

    assert_eq!(denied_status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(denied_status, missing_status);
}

#[tokio::test]
async fn test_empty_turn_maps_to_400() {
    let err: ApiError = StoreError::EmptyTurn.into();
    let response = err.into_response();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[test]
fn test_finished_stream_persists_accumulated_answer() {
    use tidechat_api::handlers::chat::turn_output;

    let generated = turn_output("hello there".to_string(), true);
    assert_eq!(generated, vec!["hello there".to_string()]);
}

#[test]
fn test_errored_stream_persists_no_assistant_message() {
    use tidechat_api::handlers::chat::turn_output;

    // Partial text from a stream that never reached its finish event must
    // not become a stored assistant turn
    assert!(turn_output("partial ans".to_string(), false).is_empty());
}

#[test]
fn test_finished_stream_with_no_content_persists_nothing() {
    use tidechat_api::handlers::chat::turn_output;

    assert!(turn_output(String::new(), true).is_empty());
}

#[tokio::test]
async fn test_header_sessions_reads_subject() {
    use axum::http::HeaderMap;
    use tidechat_api::session::{HeaderSessions, SessionAuthority};

    let sessions = HeaderSessions::new("x-auth-request-email");

    let mut headers = HeaderMap::new();
    headers.insert("x-auth-request-email", "user@example.com".parse().unwrap());
    assert_eq!(
        sessions.authenticate(&headers).await,
        Some("user@example.com".to_string())
    );

    let empty = HeaderMap::new();
    assert_eq!(sessions.authenticate(&empty).await, None);
}

#[tokio::test]
async fn test_header_sessions_rejects_blank_subject() {
    use axum::http::HeaderMap;
    use tidechat_api::session::{HeaderSessions, SessionAuthority};

    let sessions = HeaderSessions::new("x-auth-request-email");

    let mut headers = HeaderMap::new();
    headers.insert("x-auth-request-email", "".parse().unwrap());
    assert_eq!(sessions.authenticate(&headers).await, None);
}
