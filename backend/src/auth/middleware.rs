//! Authentication middleware
//!
//! [`identify_caller`] runs in front of every API route. It never rejects an
//! anonymous request; it only rejects a request that presents a bearer token
//! which fails verification. Handlers that need a caller take [`AuthUser`],
//! handlers that merely care take `Option<AuthUser>`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use bloglist_shared::AuthError;
use tracing::debug;
use uuid::Uuid;

/// Identity resolved from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}

/// Bearer token from the `Authorization` header, if one is present.
///
/// Any other scheme is treated as no token at all.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|token| !token.is_empty())
}

/// Resolve the caller's identity and attach it to the request
pub async fn identify_caller(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = bearer_token(request.headers()) {
        let claims = state.tokens().verify(token)?;

        // The token may outlive its user
        let user = state
            .users()
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| {
                debug!(user_id = %claims.user_id, "Token references unknown user");
                ApiError::from(AuthError::InvalidToken)
            })?;

        request.extensions_mut().insert(AuthUser {
            id: user.id,
            username: user.username,
            name: user.name,
        });
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("Bearer abc.def.ghi"), Some("abc.def.ghi"))]
    #[case(Some("bearer abc"), Some("abc"))]
    #[case(Some("Basic dXNlcjpwYXNz"), None)]
    #[case(Some("Bearer "), None)]
    #[case(Some("abc.def.ghi"), None)]
    fn test_bearer_token_extraction(#[case] header: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(&headers(header)), expected);
    }

    #[tokio::test]
    async fn test_missing_identity_is_rejected() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_attached_identity_is_extracted() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let user = AuthUser {
            id: Uuid::new_v4(),
            username: "user1".to_string(),
            name: None,
        };
        parts.extensions.insert(user.clone());

        assert_eq!(AuthUser::from_request_parts(&mut parts, &()).await.unwrap(), user);
    }
}
