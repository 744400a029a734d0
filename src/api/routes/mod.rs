//! Route handlers organized by resource.

/// Articles, comments and likes
pub mod articles;
/// Login and registration
pub mod auth;
/// Buyer-farmer conversations
pub mod chats;
/// Static farm dashboard data
pub mod farm;
/// Orders
pub mod orders;
/// Products and listings
pub mod products;
/// User administration
pub mod users;
