//! Login and registration routes.

use crate::{
    api::{SharedState, extract::Json},
    core::user::{self, NewUser},
    entities::user::Model as UserModel,
    errors::{Error, Result},
};
use axum::{Router, extract::State, http::StatusCode, routing::post};
use serde::Deserialize;
use tracing::info;

/// Body of `POST /auth/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email, any case
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// `POST /auth/login` - returns the account on valid credentials.
async fn login(
    State(state): State<SharedState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserModel>> {
    let user = user::authenticate_user(&state.database, &request.email, &request.password)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    info!(user_id = %user.id, "Login succeeded");
    Ok(Json(user))
}

/// `POST /auth/register` - creates a new account.
async fn register(
    State(state): State<SharedState>,
    Json(request): Json<NewUser>,
) -> Result<(StatusCode, Json<UserModel>)> {
    let user = user::create_user(&state.database, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login and registration routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, send};
    use crate::errors::Result;
    use crate::test_utils::setup_test_db;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_register_then_login() -> Result<()> {
        let db = setup_test_db().await?;
        let (_state, app) = app(db);

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/register",
            Some(json!({
                "name": "Siti Aminah",
                "email": "siti@example.com",
                "password": "rahasia",
                "role": "FARMER",
                "city": "Boyolali"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["plan"], "FREE");
        assert!(body.get("passwordHash").is_none());

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/login",
            Some(json!({"email": "SITI@example.com", "password": "rahasia"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Siti Aminah");

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/login",
            Some(json!({"email": "siti@example.com", "password": "salah"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_requests() -> Result<()> {
        let (_state, app) = app(setup_test_db().await?);

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/register",
            Some(json!({
                "name": "Owner",
                "email": "owner@example.com",
                "password": "pw",
                "role": "OWNER"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/login",
            Some(json!({"email": "andi@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|e| e.contains("password")));

        let (status, body) = send(&app, Method::POST, "/auth/login", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email() -> Result<()> {
        let db = setup_test_db().await?;
        let (_state, app) = app(db);
        let payload = json!({
            "name": "Andi",
            "email": "andi@example.com",
            "password": "pw",
            "role": "BUYER"
        });

        let (status, _) = send(&app, Method::POST, "/auth/register", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&app, Method::POST, "/auth/register", Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        Ok(())
    }
}
