//! Product business logic - Handles all marketplace listing operations.
//!
//! This module provides functions for creating, retrieving, updating, and deleting the
//! products farmers list on the marketplace, plus the buyer-facing search and the
//! listing view that joins each product with its farmer. All functions are async and
//! return Result types for proper error handling throughout the system.

use crate::{
    entities::{Product, ProductUnit, User, new_id, product, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Fields accepted when a farmer lists a new product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// Product name, must not be blank
    pub name: String,
    /// Listing description
    #[serde(default)]
    pub description: String,
    /// Price per unit in rupiah, must be positive
    pub price: f64,
    /// Sale unit
    pub unit: ProductUnit,
    /// Units in stock, must not be negative
    pub stock: i32,
    /// Product photo URL
    #[serde(default)]
    pub image_url: String,
    /// ID of the selling farmer
    pub farmer_id: String,
}

/// Partial update of a product. The owning farmer cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New unit price
    pub price: Option<f64>,
    /// New sale unit
    pub unit: Option<ProductUnit>,
    /// New stock level
    pub stock: Option<i32>,
    /// New photo URL
    pub image_url: Option<String>,
}

/// A product as shown to buyers, with the selling farmer's display data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// The listed product
    #[serde(flatten)]
    pub product: product::Model,
    /// `None` when the farmer account no longer exists
    pub farmer_name: Option<String>,
    /// City of the selling farmer
    pub farmer_city: Option<String>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Product name cannot be empty"));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<()> {
    if stock < 0 {
        return Err(Error::validation("Stock cannot be negative"));
    }
    Ok(())
}

/// Retrieves all products, ordered alphabetically by name.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the products listed by one farmer.
pub async fn list_products_by_farmer(
    db: &DatabaseConnection,
    farmer_id: &str,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::FarmerId.eq(farmer_id))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: &str,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds products whose name or description contains `term`, ignoring case.
///
/// An empty or whitespace-only term returns every product.
pub async fn search_products(db: &DatabaseConnection, term: &str) -> Result<Vec<product::Model>> {
    let needle = term.trim().to_lowercase();
    let products = list_products(db).await?;
    if needle.is_empty() {
        return Ok(products);
    }

    Ok(products
        .into_iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .collect())
}

/// Retrieves every product joined with its farmer's name and city.
pub async fn list_listings(db: &DatabaseConnection) -> Result<Vec<Listing>> {
    let products = list_products(db).await?;
    let farmers: HashMap<String, user::Model> = User::find()
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    Ok(products
        .into_iter()
        .map(|product| {
            let farmer = farmers.get(&product.farmer_id);
            Listing {
                farmer_name: farmer.map(|f| f.name.clone()),
                farmer_city: farmer.map(|f| f.city.clone()),
                product,
            }
        })
        .collect())
}

/// Lists a new product on the marketplace.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is zero, negative, or not finite (NaN, infinity)
/// - The stock is negative
/// - The database insert operation fails
#[instrument(skip(db, new_product), fields(farmer_id = %new_product.farmer_id))]
pub async fn create_product(
    db: &DatabaseConnection,
    new_product: NewProduct,
) -> Result<product::Model> {
    validate_name(&new_product.name)?;
    validate_price(new_product.price)?;
    validate_stock(new_product.stock)?;

    let product = product::ActiveModel {
        id: Set(new_id()),
        name: Set(new_product.name.trim().to_string()),
        description: Set(new_product.description),
        price: Set(new_product.price),
        unit: Set(new_product.unit),
        stock: Set(new_product.stock),
        image_url: Set(new_product.image_url),
        farmer_id: Set(new_product.farmer_id),
    };
    let created = product.insert(db).await?;
    info!(product_id = %created.id, "Product listed");
    Ok(created)
}

/// Applies a partial update to a product, with the same validation as creation.
///
/// # Errors
/// Returns an error if:
/// - A provided name, price, or stock is invalid
/// - The product does not exist
/// - The database update operation fails
#[instrument(skip(db, update))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: &str,
    update: ProductUpdate,
) -> Result<product::Model> {
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    if let Some(price) = update.price {
        validate_price(price)?;
    }
    if let Some(stock) = update.stock {
        validate_stock(stock)?;
    }

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            id: product_id.to_string(),
        })?
        .into();

    if let Some(name) = update.name {
        product.name = Set(name.trim().to_string());
    }
    if let Some(description) = update.description {
        product.description = Set(description);
    }
    if let Some(price) = update.price {
        product.price = Set(price);
    }
    if let Some(unit) = update.unit {
        product.unit = Set(unit);
    }
    if let Some(stock) = update.stock {
        product.stock = Set(stock);
    }
    if let Some(image_url) = update.image_url {
        product.image_url = Set(image_url);
    }

    product.update(db).await.map_err(Into::into)
}

/// Removes a product listing. Orders that reference it are kept.
/// Deleting an unknown product is a no-op.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: &str) -> Result<()> {
    let result = Product::delete_by_id(product_id).exec(db).await?;
    info!(deleted = result.rows_affected, "Product delete");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::user::delete_user;
    use crate::entities::UserRole;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let mut input = new_product_input("  ", "farmer");
        let result = create_product(&db, input.clone()).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        input = new_product_input("Bayam", "farmer");
        input.price = 0.0;
        let result = create_product(&db, input.clone()).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: 0.0 })));

        input.price = f64::NAN;
        let result = create_product(&db, input.clone()).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount: _ })));

        input.price = 5000.0;
        input.stock = -1;
        let result = create_product(&db, input).await;
        assert!(matches!(result, Err(Error::Validation { message: _ })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let farmer = create_test_user(&db, "Siti", "siti@example.com", UserRole::Farmer).await?;

        let product = create_custom_product(&db, "Susu Sapi", &farmer.id, 18_000.0, 50).await?;

        assert_eq!(product.name, "Susu Sapi");
        assert_eq!(product.price, 18_000.0);
        assert_eq!(product.stock, 50);
        assert_eq!(product.farmer_id, farmer.id);

        let found = get_product_by_id(&db, &product.id).await?;
        assert_eq!(found, Some(product));
        assert!(get_product_by_id(&db, "missing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_products_by_farmer() -> Result<()> {
        let db = setup_test_db().await?;
        let budi = create_test_user(&db, "Budi", "budi@example.com", UserRole::Farmer).await?;
        let siti = create_test_user(&db, "Siti", "siti@example.com", UserRole::Farmer).await?;

        create_test_product(&db, "Cabai", &budi.id).await?;
        create_test_product(&db, "Beras", &budi.id).await?;
        create_test_product(&db, "Susu", &siti.id).await?;

        let budi_products = list_products_by_farmer(&db, &budi.id).await?;
        let names: Vec<_> = budi_products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Beras", "Cabai"]);

        assert_eq!(list_products(&db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_partial() -> Result<()> {
        let db = setup_test_db().await?;
        let farmer = create_test_user(&db, "Budi", "budi@example.com", UserRole::Farmer).await?;
        let product = create_test_product(&db, "Cabai", &farmer.id).await?;

        let updated = update_product(
            &db,
            &product.id,
            ProductUpdate {
                price: Some(50_000.0),
                stock: Some(25),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.price, 50_000.0);
        assert_eq!(updated.stock, 25);
        assert_eq!(updated.name, "Cabai");
        assert_eq!(updated.farmer_id, farmer.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_errors() -> Result<()> {
        let db = setup_test_db().await?;

        let missing = update_product(&db, "missing", ProductUpdate::default()).await;
        assert!(matches!(missing, Err(Error::ProductNotFound { id: _ })));

        let bad_price = update_product(
            &db,
            "missing",
            ProductUpdate {
                price: Some(-1.0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(bad_price, Err(Error::InvalidAmount { amount: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product() -> Result<()> {
        let db = setup_test_db().await?;
        let farmer = create_test_user(&db, "Budi", "budi@example.com", UserRole::Farmer).await?;
        let product = create_test_product(&db, "Cabai", &farmer.id).await?;

        delete_product(&db, &product.id).await?;
        assert!(get_product_by_id(&db, &product.id).await?.is_none());

        // Deleting again is harmless
        delete_product(&db, &product.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_search_products() -> Result<()> {
        let db = setup_test_db().await?;
        let farmer = create_test_user(&db, "Budi", "budi@example.com", UserRole::Farmer).await?;
        let mut input = new_product_input("Beras Pandan Wangi", &farmer.id);
        input.description = "Beras organik dari Subang".to_string();
        create_product(&db, input).await?;
        create_test_product(&db, "Cabai Rawit", &farmer.id).await?;

        assert_eq!(search_products(&db, "beras").await?.len(), 1);
        assert_eq!(search_products(&db, "SUBANG").await?.len(), 1);
        assert_eq!(search_products(&db, "rawit").await?.len(), 1);
        assert!(search_products(&db, "durian").await?.is_empty());
        assert_eq!(search_products(&db, "   ").await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_listings_joins_farmer() -> Result<()> {
        let db = setup_test_db().await?;
        let farmer = create_test_user(&db, "Budi", "budi@example.com", UserRole::Farmer).await?;
        crate::core::user::update_user(
            &db,
            &farmer.id,
            crate::core::user::UserUpdate {
                city: Some("Subang".to_string()),
                ..Default::default()
            },
        )
        .await?;
        create_test_product(&db, "Beras", &farmer.id).await?;
        create_test_product(&db, "Orphan", "ghost-farmer").await?;

        let listings = list_listings(&db).await?;
        assert_eq!(listings.len(), 2);
        let beras = listings.iter().find(|l| l.product.name == "Beras").unwrap();
        assert_eq!(beras.farmer_name.as_deref(), Some("Budi"));
        assert_eq!(beras.farmer_city.as_deref(), Some("Subang"));
        let orphan = listings.iter().find(|l| l.product.name == "Orphan").unwrap();
        assert!(orphan.farmer_name.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_products_removed_with_farmer() -> Result<()> {
        let db = setup_test_db().await?;
        let farmer = create_test_user(&db, "Budi", "budi@example.com", UserRole::Farmer).await?;
        create_test_product(&db, "Beras", &farmer.id).await?;

        delete_user(&db, &farmer.id).await?;
        assert!(list_products(&db).await?.is_empty());
        Ok(())
    }
}
