//! Order entity - A buyer's purchase of a quantity of one product.
//!
//! The farmer of an order is not stored; it is found through the product.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an order
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum OrderStatus {
    /// Placed and awaiting the farmer
    #[sea_orm(string_value = "Pending")]
    Pending,
    /// Fulfilled by the farmer
    #[sea_orm(string_value = "Completed")]
    Completed,
    /// Cancelled; its stock was returned to the product
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// ID of the buyer who placed the order
    pub buyer_id: String,
    /// ID of the ordered product, which may since have been deleted
    pub product_id: String,
    /// Units ordered
    pub quantity: i32,
    /// Quantity times the unit price at the time of ordering
    pub total_price: f64,
    /// Time the order was placed
    pub order_date: DateTimeUtc,
    /// Current lifecycle state
    pub status: OrderStatus,
}

/// No schema-level relations: the product of an order may be deleted while the
/// order is kept, so `product_id` is a plain reference.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
