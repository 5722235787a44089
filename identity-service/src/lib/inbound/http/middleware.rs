use auth::TokenProvider;
use auth::TokenType;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Subject;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity bound to a request that carried a valid access token.
///
/// Handlers that require authentication take it as an extractor; it rejects
/// with 401 when the middleware bound nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub subject: Subject,
}

/// Middleware that binds an [`AuthenticatedPrincipal`] to the request
/// extensions when the bearer token is a valid access token.
///
/// Never rejects: a missing or invalid token leaves the request anonymous and
/// route-level extraction decides whether that is acceptable.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(principal) = resolve_principal(state.tokens.as_ref(), req.headers()) {
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

/// Resolve the principal from the `Authorization` header, if any.
pub fn resolve_principal(
    tokens: &dyn TokenProvider,
    headers: &HeaderMap,
) -> Option<AuthenticatedPrincipal> {
    let token = bearer_token(headers)?;

    let verified = tokens
        .validate(token)
        .inspect_err(|e| tracing::warn!(error = %e, "Bearer token rejected"))
        .ok()?;

    if verified.token_type != TokenType::Access {
        tracing::warn!(
            token_type = %verified.token_type,
            "Bearer token rejected: not an access token"
        );
        return None;
    }

    match Subject::new(verified.subject) {
        Ok(subject) => Some(AuthenticatedPrincipal { subject }),
        Err(e) => {
            tracing::warn!(error = %e, "Bearer token rejected: invalid subject claim");
            None
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?;

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if token.is_none() {
        tracing::warn!("Authorization header present but not of the form 'Bearer <token>'");
    }

    token
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .ok_or_else(|| AuthError::AuthenticationRequired.into())
    }
}
