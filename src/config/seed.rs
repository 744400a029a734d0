//! Initial marketplace data loaded from a TOML seed file.
//!
//! The seed is applied only to an empty database: once any user exists, the
//! stored data wins and the seed file is ignored.

use crate::{
    core::user::{email_key, hash_password},
    entities::{
        FarmerPlan, ProductUnit, Tags, User, UserRole, article, comment, like, product, user,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

/// Structure of the whole seed file
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    /// `[[users]]` tables
    #[serde(default)]
    pub users: Vec<SeedUser>,
    /// `[[products]]` tables
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    /// `[[articles]]` tables
    #[serde(default)]
    pub articles: Vec<SeedArticle>,
    /// `[[comments]]` tables
    #[serde(default)]
    pub comments: Vec<SeedComment>,
    /// `[[likes]]` tables
    #[serde(default)]
    pub likes: Vec<SeedLike>,
}

/// A seeded account. The plain password is hashed on insert.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedUser {
    /// Fixed ID, so other seed records can refer to it
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
    /// Account role
    pub role: UserRole,
    /// Plan for farmers
    pub plan: Option<FarmerPlan>,
    /// Street address
    #[serde(default)]
    pub address: String,
    /// City or regency
    #[serde(default)]
    pub city: String,
    /// Province
    #[serde(default)]
    pub province: String,
    /// Account creation time
    pub join_date: DateTime<Utc>,
}

/// A seeded product listing
#[derive(Debug, Deserialize, Clone)]
pub struct SeedProduct {
    /// Fixed product ID
    pub id: String,
    /// Product name
    pub name: String,
    /// Listing description
    #[serde(default)]
    pub description: String,
    /// Price per unit in rupiah
    pub price: f64,
    /// Sale unit
    pub unit: ProductUnit,
    /// Units in stock
    pub stock: i32,
    /// Product photo URL
    #[serde(default)]
    pub image_url: String,
    /// ID of a seeded farmer
    pub farmer_id: String,
}

/// A seeded article
#[derive(Debug, Deserialize, Clone)]
pub struct SeedArticle {
    /// Fixed article ID
    pub id: String,
    /// Headline
    pub title: String,
    /// Article body
    pub content: String,
    /// Cover image URL
    #[serde(default)]
    pub image_url: String,
    /// ID of a seeded author
    pub author_id: String,
    /// Publication time
    pub publish_date: DateTime<Utc>,
    /// Topic tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A seeded comment on a seeded article
#[derive(Debug, Deserialize, Clone)]
pub struct SeedComment {
    /// Fixed comment ID
    pub id: String,
    /// ID of the commented article
    pub article_id: String,
    /// ID of the commenting user
    pub user_id: String,
    /// Comment text
    pub content: String,
    /// Posting time
    pub timestamp: DateTime<Utc>,
}

/// A seeded like
#[derive(Debug, Deserialize, Clone)]
pub struct SeedLike {
    /// Fixed like ID
    pub id: String,
    /// ID of the liked article
    pub article_id: String,
    /// ID of the liking user
    pub user_id: String,
}

/// Parses seed data from a TOML string.
///
/// # Errors
/// Returns [`Error::Config`] if the TOML is invalid or a field has the wrong type.
pub fn parse_seed(contents: &str) -> Result<Seed> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Loads seed data from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<Seed> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!(
            "Failed to read seed file {}: {e}",
            path.as_ref().display()
        ),
    })?;
    parse_seed(&contents)
}

/// Inserts the seed if the database has no users yet.
///
/// Returns `true` when the seed was applied.
#[instrument(skip_all)]
pub async fn apply_seed(db: &DatabaseConnection, seed: &Seed) -> Result<bool> {
    if User::find().count(db).await? > 0 {
        info!("Database already populated, skipping seed");
        return Ok(false);
    }

    let txn = db.begin().await?;

    for u in &seed.users {
        User::insert(user::ActiveModel {
            id: Set(u.id.clone()),
            name: Set(u.name.clone()),
            email: Set(u.email.clone()),
            email_key: Set(email_key(&u.email)),
            password_hash: Set(hash_password(&u.password)?),
            role: Set(u.role),
            plan: Set(u.plan),
            address: Set(u.address.clone()),
            city: Set(u.city.clone()),
            province: Set(u.province.clone()),
            join_date: Set(u.join_date),
        })
        .exec_without_returning(&txn)
        .await?;
    }

    for p in &seed.products {
        product::Entity::insert(product::ActiveModel {
            id: Set(p.id.clone()),
            name: Set(p.name.clone()),
            description: Set(p.description.clone()),
            price: Set(p.price),
            unit: Set(p.unit),
            stock: Set(p.stock),
            image_url: Set(p.image_url.clone()),
            farmer_id: Set(p.farmer_id.clone()),
        })
        .exec_without_returning(&txn)
        .await?;
    }

    for a in &seed.articles {
        article::Entity::insert(article::ActiveModel {
            id: Set(a.id.clone()),
            title: Set(a.title.clone()),
            content: Set(a.content.clone()),
            image_url: Set(a.image_url.clone()),
            author_id: Set(a.author_id.clone()),
            publish_date: Set(a.publish_date),
            tags: Set(Tags::normalized(&a.tags)),
        })
        .exec_without_returning(&txn)
        .await?;
    }

    for c in &seed.comments {
        comment::Entity::insert(comment::ActiveModel {
            id: Set(c.id.clone()),
            article_id: Set(c.article_id.clone()),
            user_id: Set(c.user_id.clone()),
            content: Set(c.content.clone()),
            timestamp: Set(c.timestamp),
        })
        .exec_without_returning(&txn)
        .await?;
    }

    for l in &seed.likes {
        like::Entity::insert(like::ActiveModel {
            id: Set(l.id.clone()),
            article_id: Set(l.article_id.clone()),
            user_id: Set(l.user_id.clone()),
        })
        .exec_without_returning(&txn)
        .await?;
    }

    txn.commit().await?;
    info!(
        users = seed.users.len(),
        products = seed.products.len(),
        articles = seed.articles.len(),
        "Seed data applied"
    );
    Ok(true)
}
