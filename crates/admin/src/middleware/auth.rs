//! Authentication extractors for admin.
//!
//! Every back-office handler except login takes one of these. Rejections are
//! JSON so API clients can tell "log in" from "not allowed".

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires admin authentication.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Extractor that requires an admin allowed to change orders.
///
/// Viewers get 403.
pub struct RequireOrderManager(pub CurrentAdmin);

/// Why an admin extractor rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuthRejection {
    /// No admin in the session.
    Unauthorized,
    /// Logged in, but the role does not allow this.
    Forbidden,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "login required"),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "your role cannot change orders",
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn current_admin(parts: &Parts) -> Result<CurrentAdmin, AdminAuthRejection> {
    // Set by SessionManagerLayer
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AdminAuthRejection::Unauthorized)?;

    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
        .ok_or(AdminAuthRejection::Unauthorized)
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_admin(parts).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for RequireOrderManager
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = current_admin(parts).await?;
        if !admin.role.can_manage_orders() {
            return Err(AdminAuthRejection::Forbidden);
        }
        Ok(Self(admin))
    }
}

/// Helper to set the current admin in the session.
///
/// Cycles the session id first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
