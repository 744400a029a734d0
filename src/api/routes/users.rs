//! User administration routes.

use crate::{
    api::{SharedState, extract::Json},
    core::{
        plan::{self, FarmerFeature},
        user::{self, DashboardStats, UserUpdate},
    },
    entities::user::Model as UserModel,
    errors::Result,
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

async fn list_users(State(state): State<SharedState>) -> Result<Json<Vec<UserModel>>> {
    Ok(Json(user::list_users(&state.database).await?))
}

async fn get_user(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserModel>> {
    Ok(Json(user::require_user(&state.database, &user_id).await?))
}

async fn update_user(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<UserModel>> {
    Ok(Json(user::update_user(&state.database, &user_id, update).await?))
}

async fn delete_user(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode> {
    user::delete_user(&state.database, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/{id}/features` - plan-gated features the user can use.
async fn user_features(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<FarmerFeature>>> {
    let account = user::require_user(&state.database, &user_id).await?;
    Ok(Json(plan::unlocked_features(&account)))
}

async fn admin_stats(State(state): State<SharedState>) -> Result<Json<DashboardStats>> {
    Ok(Json(user::dashboard_stats(&state.database).await?))
}

/// User and admin routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/{id}/features", get(user_features))
        .route("/admin/stats", get(admin_stats))
}
