//! Property-based tests for authentication
//!
//! Requests to protected endpoints without a valid bearer token must be
//! answered with 401, whatever shape the Authorization header takes.

#[cfg(test)]
mod tests {
    use crate::auth::TokenService;
    use crate::config::AppConfig;
    use crate::routes::create_router;
    use crate::state::{AppState, Stores};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use proptest::prelude::*;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::new(Stores::in_memory(), AppConfig::default())
    }

    fn blog_request(auth_header: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .uri("/api/blogs")
            .method("POST")
            .header("Content-Type", "application/json");

        if let Some(header) = auth_header {
            builder = builder.header("Authorization", header);
        }

        builder
            .body(Body::from(r#"{"title":"T","url":"U"}"#))
            .unwrap()
    }

    /// Generate random invalid tokens
    fn invalid_token_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            // Random string (not a valid JWT)
            "[a-zA-Z0-9]{10,50}".prop_map(|s| s),
            // Malformed JWT (wrong number of parts)
            "[a-zA-Z0-9]{10}\\.[a-zA-Z0-9]{10}".prop_map(|s| s),
            // Valid format but invalid signature
            "[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}\\.[a-zA-Z0-9_-]{20}".prop_map(|s| s),
        ]
    }

    /// Generate random authorization header formats
    fn auth_header_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            // No header
            Just(None),
            // Missing Bearer prefix
            invalid_token_strategy().prop_map(Some),
            // Wrong scheme
            invalid_token_strategy().prop_map(|t| Some(format!("Basic {}", t))),
            // Bearer with invalid token
            invalid_token_strategy().prop_map(|t| Some(format!("Bearer {}", t))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: creating a blog without a valid token returns 401
        #[test]
        fn prop_unauthenticated_create_returns_401(auth_header in auth_header_strategy()) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let app = create_router(create_test_state());
                let response = app.oneshot(blog_request(auth_header)).await.unwrap();

                prop_assert_eq!(
                    response.status(),
                    StatusCode::UNAUTHORIZED,
                    "Expected 401 for unauthenticated request"
                );

                Ok(())
            })?;
        }
    }

    #[tokio::test]
    async fn test_missing_auth_header_returns_401() {
        let app = create_router(create_test_state());
        let response = app.oneshot(blog_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_rejected_even_on_public_route() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/api/blogs")
            .method("GET")
            .header("Authorization", "Bearer invalid.token.here")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_anonymous_public_route_allowed() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/api/blogs")
            .method("GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_token_with_wrong_secret_returns_401() {
        let state = create_test_state();
        let foreign = TokenService::new("wrong-secret-key", None);
        let token = foreign.issue(uuid::Uuid::new_v4(), "user1").unwrap();

        let app = create_router(state);
        let response = app
            .oneshot(blog_request(Some(format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_returns_401() {
        let state = create_test_state();
        // Correctly signed, but no such user was ever stored
        let token = state.tokens().issue(uuid::Uuid::new_v4(), "ghost").unwrap();

        let app = create_router(state);
        let response = app
            .oneshot(blog_request(Some(format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "token invalid" })
        );
    }

    #[tokio::test]
    async fn test_stale_token_is_rejected_even_on_login() {
        let state = create_test_state();
        let expired = TokenService::new(&state.config().jwt.secret, Some(-120))
            .issue(uuid::Uuid::new_v4(), "user1")
            .unwrap();

        let request = Request::builder()
            .uri("/api/login")
            .method("POST")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", expired))
            .body(Body::from(r#"{"username":"user1","password":"pw1"}"#))
            .unwrap();

        let response = create_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "token expired" })
        );
    }
}
