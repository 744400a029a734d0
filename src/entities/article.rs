//! Article entity - Community articles and farming tips written by admins.
//!
//! Tags are stored as a JSON array in a single column.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordered list of tags attached to an article
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Tags(pub Vec<String>);

impl Tags {
    /// Builds a tag list, trimming every tag and dropping empty ones.
    #[must_use]
    pub fn normalized<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tags.into_iter()
                .map(|tag| tag.as_ref().trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
        )
    }
}

/// Article database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the article
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Headline
    pub title: String,
    /// Article body
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// Cover image URL
    pub image_url: String,
    /// ID of the user who wrote the article
    pub author_id: String,
    /// When the article was published
    pub publish_date: DateTimeUtc,
    /// Topic tags, e.g. "padi" or "irigasi"
    #[sea_orm(column_type = "Json")]
    pub tags: Tags,
}

/// Comments and likes reference articles by ID only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
