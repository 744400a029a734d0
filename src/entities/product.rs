//! Product entity - Produce listed on the marketplace by a farmer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Unit a product is sold in
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ProductUnit {
    /// Kilogram
    #[sea_orm(string_value = "kg")]
    Kg,
    /// A bunch, as for leafy vegetables
    #[sea_orm(string_value = "ikat")]
    Ikat,
    /// A single piece
    #[sea_orm(string_value = "buah")]
    Buah,
    /// Liter
    #[sea_orm(string_value = "liter")]
    Liter,
}

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Name of the product (e.g., "Beras Organik")
    pub name: String,
    /// Free-text description shown on the listing
    pub description: String,
    /// Price per unit in rupiah
    pub price: f64,
    /// Unit the price and stock are counted in
    pub unit: ProductUnit,
    /// Units available for ordering
    pub stock: i32,
    /// Product photo URL
    pub image_url: String,
    /// ID of the farmer selling this product
    pub farmer_id: String,
}

/// Products reference their farmer by ID only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
