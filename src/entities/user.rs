//! User entity - Represents every account in the marketplace.
//!
//! A user is a farmer, a buyer, or an admin. Farmers additionally carry a
//! subscription plan that gates some dashboard features. The password is kept
//! only as a bcrypt hash and is never serialized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of an account
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Sells produce and monitors a farm
    #[sea_orm(string_value = "FARMER")]
    Farmer,
    /// Buys produce
    #[sea_orm(string_value = "BUYER")]
    Buyer,
    /// Moderates users and articles
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

/// Subscription tier of a farmer
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "UPPERCASE")]
pub enum FarmerPlan {
    /// Monitoring dashboard only
    #[sea_orm(string_value = "FREE")]
    Free,
    /// Every farmer feature
    #[sea_orm(string_value = "PRO")]
    Pro,
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email as entered
    pub email: String,
    /// Lowercased email used for lookups; unique across accounts
    #[sea_orm(unique)]
    #[serde(skip_serializing, default)]
    pub email_key: String,
    /// bcrypt password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Account role
    pub role: UserRole,
    /// Subscription plan, only set for farmers
    pub plan: Option<FarmerPlan>,
    /// Street address
    pub address: String,
    /// City or regency
    pub city: String,
    /// Province
    pub province: String,
    /// When the account was created
    pub join_date: DateTimeUtc,
}

/// Other tables reference users by ID only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
