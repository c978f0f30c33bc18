use axum::{http::Uri, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::messages;
use super::state::AppState;
use super::types::ApiError;
use super::users;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .merge(users::create_users_router())
        .merge(messages::create_messages_router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::message::FeedService;
    use crate::infrastructure::storage::InMemoryPersistence;
    use crate::infrastructure::user::{test_hasher, AuthService};

    fn test_router() -> Router {
        let persistence = Arc::new(InMemoryPersistence::new());
        let hasher = Arc::new(test_hasher());
        let state = AppState::new(
            Arc::new(AuthService::new(Arc::clone(&persistence), hasher)),
            Arc::new(FeedService::new(persistence)),
            2,
        );
        create_router(state)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    #[tokio::test]
    async fn test_register_then_check() {
        let router = test_router();

        let (status, body) = send(
            &router,
            "POST",
            "/users",
            Some(json!({"name": "alice", "password": "pw1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"name": "alice"}));

        let (status, body) = send(
            &router,
            "POST",
            "/users/check",
            Some(json!({"name": "alice", "password": "pw1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"valid": true}));

        let (_, body) = send(
            &router,
            "POST",
            "/users/check",
            Some(json!({"name": "alice", "password": "pw2"})),
        )
        .await;
        assert_eq!(body, json!({"valid": false}));
    }

    #[tokio::test]
    async fn test_check_unknown_user_is_invalid() {
        let router = test_router();

        let (status, body) = send(
            &router,
            "POST",
            "/users/check",
            Some(json!({"name": "ghost", "password": "x"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"valid": false}));
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let router = test_router();
        let credentials = json!({"name": "alice", "password": "pw1"});

        send(&router, "POST", "/users", Some(credentials.clone())).await;
        let (status, body) = send(&router, "POST", "/users", Some(credentials)).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["type"], "conflict_error");
    }

    #[tokio::test]
    async fn test_post_from_unknown_author() {
        let router = test_router();

        let (status, body) = send(
            &router,
            "POST",
            "/messages",
            Some(json!({"name": "bob", "text": "hello"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Unknown user: bob");
        assert_eq!(body["error"]["code"], "unknown_user");

        let (_, body) = send(&router, "GET", "/messages?limit=10", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_feed_window() {
        let router = test_router();
        send(
            &router,
            "POST",
            "/users",
            Some(json!({"name": "alice", "password": "pw"})),
        )
        .await;

        for text in ["one", "two", "three"] {
            let (status, body) = send(
                &router,
                "POST",
                "/messages",
                Some(json!({"name": "alice", "text": text})),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);
            assert_eq!(body, Value::Null);
        }

        let (status, body) = send(&router, "GET", "/messages?limit=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"name": "alice", "text": "one"},
                {"name": "alice", "text": "two"},
                {"name": "alice", "text": "three"},
            ])
        );

        // default_limit is 2 in the test state
        let (_, body) = send(&router, "GET", "/messages", None).await;
        assert_eq!(
            body,
            json!([
                {"name": "alice", "text": "two"},
                {"name": "alice", "text": "three"},
            ])
        );

        let (_, body) = send(&router, "GET", "/messages?limit=0", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_invalid_limit_is_bad_request() {
        let router = test_router();

        let (status, body) = send(&router, "GET", "/messages?limit=-1", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let router = test_router();
        let request = Request::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from("{\"name\":"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let router = test_router();

        let (status, body) = send(&router, "GET", "/nowhere", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found_error");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let router = test_router();

        let (status, body) = send(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&router, "GET", "/live", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
