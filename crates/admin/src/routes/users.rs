//! Customer directory.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequireAdminAuth;
use crate::models::{DirectoryUser, UserSummary};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UserSearch {
    #[serde(default)]
    pub q: String,
}

/// Matching users plus the summary over the whole directory.
#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<DirectoryUser>,
    pub summary: UserSummary,
}

pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(search): Query<UserSearch>,
) -> Json<UserList> {
    let directory = state.users();
    Json(UserList {
        users: directory.search(&search.q).into_iter().cloned().collect(),
        summary: directory.summary(),
    })
}
