//! Authenticated-user extraction.
//!
//! Token verification itself is an external collaborator; by the time a
//! request reaches this service the gateway has resolved the token to a
//! user id and forwarded it in `X-User-Id`. Progress-mutating handlers
//! take `AuthedUser` as a precondition and reject requests without it.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

const USER_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct AuthedUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
  S: Send + Sync,
{
  type Rejection = AppError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .headers
      .get(USER_HEADER)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(|s| AuthedUser(s.to_string()))
      .ok_or(AppError::Unauthorized)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::Request;

  async fn extract(req: Request<()>) -> Result<AuthedUser, AppError> {
    let (mut parts, _) = req.into_parts();
    AuthedUser::from_request_parts(&mut parts, &()).await
  }

  #[tokio::test]
  async fn accepts_a_forwarded_user_id() {
    let req = Request::builder().header("X-User-Id", "user-7").body(()).unwrap();
    let user = extract(req).await.unwrap();
    assert_eq!(user.0, "user-7");
  }

  #[tokio::test]
  async fn rejects_missing_or_blank_header() {
    let req = Request::builder().body(()).unwrap();
    assert!(matches!(extract(req).await, Err(AppError::Unauthorized)));

    let req = Request::builder().header("X-User-Id", "   ").body(()).unwrap();
    assert!(matches!(extract(req).await, Err(AppError::Unauthorized)));
  }
}
