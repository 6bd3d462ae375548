use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, AppState};

type GuardFuture = Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send>>;

/// Builds a route-group permission guard for `middleware::from_fn_with_state`.
///
/// Every name in `required` must be held by the principal. An empty list
/// lets the request through untouched, even without a principal. Holding
/// `system.admin` does not substitute for a listed name; operations that
/// accept the wildcard check for it explicitly in their handlers.
pub fn require(
    required: &'static [&'static str],
) -> impl Fn(State<Arc<AppState>>, Request, Next) -> GuardFuture + Clone + Send + Sync + 'static {
    move |State(_state): State<Arc<AppState>>, request: Request, next: Next| {
        Box::pin(async move {
            if required.is_empty() {
                return Ok(next.run(request).await);
            }

            let principal = request
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

            if !principal.has_all(required) {
                return Err(ApiError::forbidden(required));
            }

            Ok(next.run(request).await)
        })
    }
}
