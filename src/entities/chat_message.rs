//! Chat message entity - One message inside a conversation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chat message database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chat_messages")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the message
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Conversation this message belongs to
    #[serde(skip_serializing)]
    pub conversation_id: String,
    /// ID of the participant who sent the message
    pub sender_id: String,
    /// Message text, trimmed and non-empty
    pub text: String,
    /// Time the message was sent
    pub timestamp: DateTimeUtc,
    /// Insertion order within the conversation
    #[serde(skip_serializing, default)]
    pub seq: i64,
}

/// Defines relationships between ChatMessage and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each message belongs to one conversation
    #[sea_orm(
        belongs_to = "super::conversation::Entity",
        from = "Column::ConversationId",
        to = "super::conversation::Column::Id"
    )]
    Conversation,
}

impl Related<super::conversation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
