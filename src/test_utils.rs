//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{article, product, user},
    entities::{self, ProductUnit, UserRole},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Password given to every user created by [`create_test_user`]
pub const TEST_PASSWORD: &str = "password";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database with a real connection pool, for tests
/// that need several connections writing at once. The database lives as long as
/// the returned directory.
pub async fn setup_file_db() -> Result<(tempfile::TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("teman-tani.db").display());
    let db = crate::config::database::create_connection(&url).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((dir, db))
}

/// Builds registration input with [`TEST_PASSWORD`] and empty address fields.
#[must_use]
pub fn new_user_input(name: &str, email: &str, role: UserRole) -> user::NewUser {
    user::NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        role,
        address: String::new(),
        city: String::new(),
        province: String::new(),
    }
}

/// Creates a test user through the normal registration path.
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    role: UserRole,
) -> Result<entities::user::Model> {
    user::create_user(db, new_user_input(name, email, role)).await
}

/// Creates a farmer on the PRO plan.
pub async fn create_pro_farmer(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
) -> Result<entities::user::Model> {
    let farmer = create_test_user(db, name, email, UserRole::Farmer).await?;
    user::update_user(
        db,
        &farmer.id,
        user::UserUpdate {
            plan: Some(entities::FarmerPlan::Pro),
            ..Default::default()
        },
    )
    .await
}

/// Builds product input with sensible defaults.
///
/// # Defaults
/// * price: 10000.0
/// * unit: kg
/// * stock: 10
#[must_use]
pub fn new_product_input(name: &str, farmer_id: &str) -> product::NewProduct {
    product::NewProduct {
        name: name.to_string(),
        description: format!("Fresh {name}"),
        price: 10_000.0,
        unit: ProductUnit::Kg,
        stock: 10,
        image_url: String::new(),
        farmer_id: farmer_id.to_string(),
    }
}

/// Creates a test product with the defaults of [`new_product_input`].
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    farmer_id: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, new_product_input(name, farmer_id)).await
}

/// Creates a test product with custom price and stock.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    farmer_id: &str,
    price: f64,
    stock: i32,
) -> Result<entities::product::Model> {
    let mut input = new_product_input(name, farmer_id);
    input.price = price;
    input.stock = stock;
    product::create_product(db, input).await
}

/// Creates a test article with a short body and no tags.
pub async fn create_test_article(
    db: &DatabaseConnection,
    title: &str,
    author_id: &str,
) -> Result<entities::article::Model> {
    article::create_article(
        db,
        article::NewArticle {
            title: title.to_string(),
            content: format!("All about {title}"),
            image_url: String::new(),
            author_id: author_id.to_string(),
            tags: Vec::new(),
        },
    )
    .await
}

/// Sets up a database with a PRO farmer, a buyer and one product of the farmer.
/// Returns (db, farmer, buyer, product) for order and chat tests.
pub async fn setup_marketplace() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::user::Model,
    entities::product::Model,
)> {
    let db = setup_test_db().await?;
    let farmer = create_pro_farmer(&db, "Budi", "budi@example.com").await?;
    let buyer = create_test_user(&db, "Andi", "andi@example.com", UserRole::Buyer).await?;
    let product = create_custom_product(&db, "Beras", &farmer.id, 15_000.0, 100).await?;
    Ok((db, farmer, buyer, product))
}
