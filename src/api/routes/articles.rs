//! Community article routes: moderation by admins, comments and likes by anyone.

use crate::{
    api::{
        SharedState,
        extract::{Json, Query},
    },
    core::{
        article::{self, ArticleDetail, ArticleUpdate, NewArticle},
        plan::{self, FarmerFeature},
        user,
    },
    entities::{ArticleModel, CommentModel, LikeModel, UserRole},
    errors::{Error, Result},
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

/// `?viewer=` on the detail route
#[derive(Debug, Deserialize)]
pub struct ViewerQuery {
    /// User reading the article, if signed in
    pub viewer: Option<String>,
}

/// Body of `POST /articles/{id}/comments`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    /// Commenting user
    pub user_id: String,
    /// Comment text
    pub content: String,
}

/// Body of `POST /articles/{id}/likes`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    /// User toggling the like
    pub user_id: String,
}

/// Like state after a toggle
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    /// Whether the user now likes the article
    pub liked: bool,
    /// Total likes after the toggle
    pub like_count: usize,
}

async fn list_articles(State(state): State<SharedState>) -> Result<Json<Vec<ArticleModel>>> {
    Ok(Json(article::list_articles(&state.database).await?))
}

/// `POST /articles` - only admins publish articles.
async fn create_article(
    State(state): State<SharedState>,
    Json(request): Json<NewArticle>,
) -> Result<(StatusCode, Json<ArticleModel>)> {
    let author = user::require_user(&state.database, &request.author_id).await?;
    if author.role != UserRole::Admin {
        return Err(Error::Forbidden {
            message: "Only admins can publish articles".to_string(),
        });
    }
    let created = article::create_article(&state.database, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_article(
    State(state): State<SharedState>,
    Path(article_id): Path<String>,
) -> Result<Json<ArticleModel>> {
    article::get_article_by_id(&state.database, &article_id)
        .await?
        .map(Json)
        .ok_or(Error::ArticleNotFound { id: article_id })
}

async fn update_article(
    State(state): State<SharedState>,
    Path(article_id): Path<String>,
    Json(update): Json<ArticleUpdate>,
) -> Result<Json<ArticleModel>> {
    Ok(Json(
        article::update_article(&state.database, &article_id, update).await?,
    ))
}

async fn delete_article(
    State(state): State<SharedState>,
    Path(article_id): Path<String>,
) -> Result<StatusCode> {
    article::delete_article(&state.database, &article_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /articles/{id}/detail?viewer=` - community reading is a PRO feature for farmers.
async fn article_detail(
    State(state): State<SharedState>,
    Path(article_id): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<ArticleDetail>> {
    if let Some(viewer_id) = &query.viewer {
        let viewer = user::require_user(&state.database, viewer_id).await?;
        plan::ensure_feature(&viewer, FarmerFeature::CommunityArticles)?;
    }
    Ok(Json(
        article::article_detail(&state.database, &article_id, query.viewer.as_deref()).await?,
    ))
}

async fn list_comments(
    State(state): State<SharedState>,
    Path(article_id): Path<String>,
) -> Result<Json<Vec<CommentModel>>> {
    Ok(Json(
        article::comments_for_article(&state.database, &article_id).await?,
    ))
}

async fn add_comment(
    State(state): State<SharedState>,
    Path(article_id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentModel>)> {
    let comment =
        article::add_comment(&state.database, &article_id, &request.user_id, &request.content)
            .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn list_likes(
    State(state): State<SharedState>,
    Path(article_id): Path<String>,
) -> Result<Json<Vec<LikeModel>>> {
    Ok(Json(
        article::likes_for_article(&state.database, &article_id).await?,
    ))
}

async fn toggle_like(
    State(state): State<SharedState>,
    Path(article_id): Path<String>,
    Json(request): Json<LikeRequest>,
) -> Result<Json<LikeResponse>> {
    let liked = article::toggle_like(&state.database, &article_id, &request.user_id).await?;
    let like_count = article::likes_for_article(&state.database, &article_id)
        .await?
        .len();
    Ok(Json(LikeResponse { liked, like_count }))
}

/// Article, comment and like routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route(
            "/articles/{id}",
            get(get_article).patch(update_article).delete(delete_article),
        )
        .route("/articles/{id}/detail", get(article_detail))
        .route("/articles/{id}/comments", get(list_comments).post(add_comment))
        .route("/articles/{id}/likes", get(list_likes))
        .route("/articles/{id}/likes/toggle", post(toggle_like))
}
