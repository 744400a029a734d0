//! Conversation entity - A message thread between exactly two users.
//!
//! The two participants are stored with the smaller user ID first, and the pair
//! is unique, so there is one thread per pair of users. Messages live in the `chat_messages` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Conversation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the conversation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The participant with the smaller user ID
    pub participant_a: String,
    /// The participant with the larger user ID
    pub participant_b: String,
    /// Timestamp of the newest message, or creation time if empty
    pub last_message_timestamp: DateTimeUtc,
}

impl Model {
    /// Returns true if `user_id` is one of the two participants.
    #[must_use]
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }
}

/// Defines relationships between Conversation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One conversation has many messages
    #[sea_orm(has_many = "super::chat_message::Entity")]
    Messages,
}

impl Related<super::chat_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
