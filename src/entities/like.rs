//! Like entity - One user liking one article. At most one row per pair.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Like database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "likes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the like
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Liked article
    pub article_id: String,
    /// User who liked it
    pub user_id: String,
}

/// Likes reference their article and user by ID only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
