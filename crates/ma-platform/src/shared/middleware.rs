//! API Middleware
//!
//! Authentication for Axum handlers. Accepts a Bearer token in the
//! Authorization header or the session cookie.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, header::COOKIE, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::auth::{extract_bearer_token, TokenService};
use crate::shared::error::ErrorResponse;
use crate::usecase::ExecutionContext;

/// Session cookie name
const SESSION_COOKIE_NAME: &str = "meetapp_session";

/// Correlation header propagated into use case execution contexts
const CORRELATION_HEADER: &str = "x-correlation-id";

/// Application state injected into every request
#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
}

/// The caller of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub correlation_id: Option<String>,
}

impl AuthContext {
    /// Execution context for a use case run on behalf of this caller.
    pub fn execution_context(&self) -> ExecutionContext {
        match &self.correlation_id {
            Some(correlation_id) => ExecutionContext::with_correlation(&self.user_id, correlation_id),
            None => ExecutionContext::create(&self.user_id),
        }
    }
}

/// Authenticated user extractor
pub struct Authenticated(pub AuthContext);

impl std::ops::Deref for Authenticated {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Error response for authentication failures
pub struct AuthError {
    pub status: StatusCode,
    pub message: String,
}

impl AuthError {
    fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let error = if self.status == StatusCode::UNAUTHORIZED {
            "UNAUTHORIZED"
        } else {
            "INTERNAL_ERROR"
        };
        let body = ErrorResponse {
            error: error.to_string(),
            message: self.message,
            details: Default::default(),
        };
        (self.status, Json(body)).into_response()
    }
}

fn extract_session_cookie(parts: &Parts) -> Option<String> {
    parts.headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';')
                .filter_map(|c| c.trim().split_once('='))
                .find(|(name, _)| *name == SESSION_COOKIE_NAME)
                .map(|(_, value)| value.to_string())
        })
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let app_state = parts.extensions.get::<AppState>()
            .ok_or_else(|| AuthError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Auth service not configured".to_string(),
            })?;

        let token = parts.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .map(String::from)
            .or_else(|| extract_session_cookie(parts))
            .ok_or_else(|| AuthError::unauthorized("Missing authentication token"))?;

        let claims = app_state.token_service.validate(&token)
            .map_err(|e| AuthError::unauthorized(e.to_string()))?;

        let correlation_id = parts.headers
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(Authenticated(AuthContext {
            user_id: claims.sub,
            correlation_id,
        }))
    }
}

/// Layer that injects `AppState` into request extensions so the
/// `Authenticated` extractor can find the token service.
#[derive(Clone)]
pub struct AuthLayer {
    state: AppState,
}

impl AuthLayer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    state: AppState,
}

impl<S, B> Service<axum::http::Request<B>> for AuthMiddleware<S>
where
    S: Service<axum::http::Request<B>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(self.state.clone());
        let future = self.inner.call(req);
        Box::pin(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: (&str, &str)) -> Parts {
        let (parts, _) = Request::builder()
            .header(header.0, header.1)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_session_cookie_exact_name() {
        let parts = parts_with(("cookie", "theme=dark; meetapp_session=abc.def; other=1"));
        assert_eq!(extract_session_cookie(&parts), Some("abc.def".to_string()));

        let parts = parts_with(("cookie", "meetapp_session_old=stale"));
        assert_eq!(extract_session_cookie(&parts), None);
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let mut parts = parts_with(("x-correlation-id", "corr-1"));
        parts.extensions.insert(AppState {
            token_service: Arc::new(TokenService::new("secret", "meetapp", "meetapp")),
        });

        let result = Authenticated::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ref e) if e.status == StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_bearer_token_with_correlation() {
        let service = Arc::new(TokenService::new("secret", "meetapp", "meetapp"));
        let token = service.issue("user-1", chrono::Duration::hours(1)).unwrap();

        let (mut parts, _) = Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .header("x-correlation-id", "corr-1")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(AppState { token_service: service });

        let Authenticated(ctx) = Authenticated::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();
        assert_eq!(ctx.user_id, "user-1");
        assert_eq!(ctx.execution_context().correlation_id, "corr-1");
    }
}
