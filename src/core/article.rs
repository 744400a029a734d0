//! Community articles, their comments, and likes.
//!
//! Admins publish and moderate articles; any user may comment or like. Removing an
//! article removes its comments and likes in the same database transaction.

use crate::{
    entities::{Article, Comment, Like, Tags, User, article, comment, like, new_id, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::OnConflict};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Fields accepted when publishing an article
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    /// Headline, must not be blank
    pub title: String,
    /// Article body
    #[serde(default)]
    pub content: String,
    /// Cover image URL
    #[serde(default)]
    pub image_url: String,
    /// ID of the writing user
    pub author_id: String,
    /// Topic tags; blank tags are dropped
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update of an article. Author and publish date are fixed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    /// New headline
    pub title: Option<String>,
    /// New body
    pub content: Option<String>,
    /// New cover image URL
    pub image_url: Option<String>,
    /// Replacement tag list
    pub tags: Option<Vec<String>>,
}

/// A comment joined with its author's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// The stored comment
    #[serde(flatten)]
    pub comment: comment::Model,
    /// `None` if the author account is gone
    pub author_name: Option<String>,
}

/// Everything the article detail view needs in one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    /// The article itself
    pub article: article::Model,
    /// `None` if the author account is gone
    pub author_name: Option<String>,
    /// Comments, oldest first
    pub comments: Vec<CommentView>,
    /// Number of users who liked the article
    pub like_count: usize,
    /// Whether the viewing user has liked the article
    pub liked_by_viewer: bool,
}

async fn require_article(db: &DatabaseConnection, article_id: &str) -> Result<article::Model> {
    Article::find_by_id(article_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ArticleNotFound {
            id: article_id.to_string(),
        })
}

/// Retrieves all articles, newest first.
pub async fn list_articles(db: &DatabaseConnection) -> Result<Vec<article::Model>> {
    Article::find()
        .order_by_desc(article::Column::PublishDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific article by its unique ID.
pub async fn get_article_by_id(
    db: &DatabaseConnection,
    article_id: &str,
) -> Result<Option<article::Model>> {
    Article::find_by_id(article_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Publishes a new article dated now. Tags are trimmed and empty tags dropped.
///
/// # Errors
/// Returns an error if the title is empty or the insert fails.
#[instrument(skip(db, new_article), fields(author_id = %new_article.author_id))]
pub async fn create_article(
    db: &DatabaseConnection,
    new_article: NewArticle,
) -> Result<article::Model> {
    if new_article.title.trim().is_empty() {
        return Err(Error::validation("Article title cannot be empty"));
    }

    let model = article::ActiveModel {
        id: Set(new_id()),
        title: Set(new_article.title.trim().to_string()),
        content: Set(new_article.content),
        image_url: Set(new_article.image_url),
        author_id: Set(new_article.author_id),
        publish_date: Set(chrono::Utc::now()),
        tags: Set(Tags::normalized(new_article.tags)),
    };
    let created = model.insert(db).await?;
    info!(article_id = %created.id, "Article published");
    Ok(created)
}

/// Applies a partial update to an article.
#[instrument(skip(db, update))]
pub async fn update_article(
    db: &DatabaseConnection,
    article_id: &str,
    update: ArticleUpdate,
) -> Result<article::Model> {
    if let Some(title) = &update.title {
        if title.trim().is_empty() {
            return Err(Error::validation("Article title cannot be empty"));
        }
    }

    let mut active: article::ActiveModel = require_article(db, article_id).await?.into();
    if let Some(title) = update.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(content) = update.content {
        active.content = Set(content);
    }
    if let Some(image_url) = update.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(tags) = update.tags {
        active.tags = Set(Tags::normalized(tags));
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes an article together with its comments and likes.
#[instrument(skip(db))]
pub async fn delete_article(db: &DatabaseConnection, article_id: &str) -> Result<()> {
    let txn = db.begin().await?;

    Comment::delete_many()
        .filter(comment::Column::ArticleId.eq(article_id))
        .exec(&txn)
        .await?;
    Like::delete_many()
        .filter(like::Column::ArticleId.eq(article_id))
        .exec(&txn)
        .await?;
    Article::delete_by_id(article_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Article deleted with comments and likes");
    Ok(())
}

/// Retrieves the comments on an article, oldest first. Comments with the same
/// timestamp come back in creation order.
pub async fn comments_for_article(
    db: &DatabaseConnection,
    article_id: &str,
) -> Result<Vec<comment::Model>> {
    Comment::find()
        .filter(comment::Column::ArticleId.eq(article_id))
        .order_by_asc(comment::Column::Timestamp)
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds a comment to an existing article.
///
/// # Errors
/// Returns an error if:
/// - The comment is empty after trimming
/// - The article does not exist
#[instrument(skip(db, content))]
pub async fn add_comment(
    db: &DatabaseConnection,
    article_id: &str,
    user_id: &str,
    content: &str,
) -> Result<comment::Model> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::validation("Comment cannot be empty"));
    }
    require_article(db, article_id).await?;

    comment::ActiveModel {
        id: Set(new_id()),
        article_id: Set(article_id.to_string()),
        user_id: Set(user_id.to_string()),
        content: Set(content.to_string()),
        timestamp: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves the likes on an article.
pub async fn likes_for_article(
    db: &DatabaseConnection,
    article_id: &str,
) -> Result<Vec<like::Model>> {
    Like::find()
        .filter(like::Column::ArticleId.eq(article_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Likes the article for this user, or removes the like if it already exists.
///
/// Returns `true` if the user now likes the article.
#[instrument(skip(db))]
pub async fn toggle_like(db: &DatabaseConnection, article_id: &str, user_id: &str) -> Result<bool> {
    let txn = db.begin().await?;

    let existing = Like::find()
        .filter(like::Column::ArticleId.eq(article_id))
        .filter(like::Column::UserId.eq(user_id))
        .one(&txn)
        .await?;

    let liked = if let Some(found) = existing {
        found.delete(&txn).await?;
        false
    } else {
        Like::insert(like::ActiveModel {
            id: Set(new_id()),
            article_id: Set(article_id.to_string()),
            user_id: Set(user_id.to_string()),
        })
        .on_conflict(
            OnConflict::columns([like::Column::ArticleId, like::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;
        true
    };

    txn.commit().await?;
    debug!(liked, "Like toggled");
    Ok(liked)
}

/// Builds the detail view of an article for `viewer_id`.
pub async fn article_detail(
    db: &DatabaseConnection,
    article_id: &str,
    viewer_id: Option<&str>,
) -> Result<ArticleDetail> {
    let article = require_article(db, article_id).await?;
    let comments = comments_for_article(db, article_id).await?;
    let likes = likes_for_article(db, article_id).await?;

    let names: HashMap<String, String> = User::find()
        .all(db)
        .await?
        .into_iter()
        .map(|u: user::Model| (u.id, u.name))
        .collect();

    let comments = comments
        .into_iter()
        .map(|comment| CommentView {
            author_name: names.get(&comment.user_id).cloned(),
            comment,
        })
        .collect();

    Ok(ArticleDetail {
        author_name: names.get(&article.author_id).cloned(),
        like_count: likes.len(),
        liked_by_viewer: viewer_id.is_some_and(|viewer| likes.iter().any(|l| l.user_id == viewer)),
        comments,
        article,
    })
}
