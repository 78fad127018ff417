//! Login and logout.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAdminAuth;
use crate::middleware::auth::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AuthService;
use crate::state::AppState;

/// Login form.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Check credentials and start an admin session.
#[instrument(skip(state, session))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let admin = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    let current = CurrentAdmin::from(admin);
    set_current_admin(&session, &current).await?;
    set_sentry_user(current.id.as_i32(), Some(current.email.as_str()));
    info!(admin_id = %current.id, role = %current.role, "Admin logged in");

    Ok(Json(current))
}

/// End the admin session.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn logout(
    RequireAdminAuth(admin): RequireAdminAuth,
    session: Session,
) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    info!("Admin logged out");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::models::AdminRole;
    use crate::routes::test_support::{TestApp, get, post_json};

    #[tokio::test]
    async fn test_malformed_email_is_rejected_as_bad_credentials() {
        let app = TestApp::new();
        let (status, body) = app
            .send(post_json(
                "/auth/login",
                &json!({"email": "not-an-email", "password": "correct horse battery"}),
            ))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid credentials");
    }

    #[tokio::test]
    async fn test_me_requires_login() {
        let app = TestApp::new();
        let (status, body) = app.send(get("/auth/me")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "login required");
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = TestApp::new();
        app.login_as(AdminRole::Admin).await;

        let (status, body) = app.send(get("/auth/me")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "admin");
        assert_eq!(body["email"], "admin@caferencontre.ph");

        let (status, _) = app.send(post_json("/auth/logout", &json!({}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.send(get("/auth/me")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
