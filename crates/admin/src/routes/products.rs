//! Read-only catalog listing.

use axum::{Json, extract::State};
use tracing::instrument;

use cafe_rencontre_core::Product;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::models::AdminRole;
    use crate::routes::test_support::{TestApp, get};

    #[tokio::test]
    async fn test_products_require_login() {
        let app = TestApp::new();
        let (status, _) = app.send(get("/products")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_database_failure_is_hidden() {
        let app = TestApp::new();
        app.login_as(AdminRole::Viewer).await;

        let (status, body) = app.send(get("/products")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
