pub mod availability;
pub mod bookings;
pub mod events;
pub mod health;
pub mod takers;

use axum::extract::FromRequest;
use axum::http::HeaderMap;

use crate::errors::AppError;

/// `axum::Json` whose rejections come back as a JSON 400 like every other
/// client error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Admin routes require `Authorization: Bearer <ADMIN_TOKEN>`.
fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
