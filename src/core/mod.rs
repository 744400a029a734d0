//! Core business logic - framework-agnostic marketplace operations.
//!
//! Everything here takes a `DatabaseConnection` and returns [`crate::errors::Result`];
//! the HTTP layer in [`crate::api`] is a thin wrapper around these functions.

/// Community articles, comments and likes
pub mod article;
/// Buyer-farmer conversations
pub mod chat;
/// Static farm dashboard data
pub mod farm_data;
/// Placing orders and order status
pub mod order;
/// FREE/PRO plan gating
pub mod plan;
/// Marketplace products and listings
pub mod product;
/// Accounts, authentication and moderation
pub mod user;
