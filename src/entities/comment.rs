//! Comment entity - A user's comment on an article.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Comment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the comment
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Article the comment belongs to
    pub article_id: String,
    /// ID of the commenting user
    pub user_id: String,
    /// Comment text, trimmed and non-empty
    pub content: String,
    /// Time the comment was posted
    pub timestamp: DateTimeUtc,
}

/// Comments reference their article and author by ID only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
