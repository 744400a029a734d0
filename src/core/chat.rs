//! Buyer-farmer messaging.
//!
//! A conversation is identified by its unordered participant pair: opening a
//! conversation between A and B returns the same thread as between B and A.
//! The pair is stored with the smaller ID first, and a unique index over the two
//! columns keeps concurrent opens from creating a second thread.

use crate::{
    entities::{ChatMessage, Conversation, chat_message, conversation, new_id},
    errors::{Error, Result},
};
use sea_orm::{
    Condition, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::OnConflict,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// A conversation with its messages in send order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationThread {
    /// Conversation ID
    pub id: String,
    /// The two user IDs, smaller first
    pub participants: [String; 2],
    /// Messages, oldest first
    pub messages: Vec<chat_message::Model>,
    /// Time of the newest message, or of creation if there are none
    pub last_message_timestamp: DateTimeUtc,
}

impl ConversationThread {
    fn new(conversation: conversation::Model, messages: Vec<chat_message::Model>) -> Self {
        Self {
            id: conversation.id,
            participants: [conversation.participant_a, conversation.participant_b],
            messages,
            last_message_timestamp: conversation.last_message_timestamp,
        }
    }

    /// The participant that is not `user_id`.
    #[must_use]
    pub fn other_participant(&self, user_id: &str) -> Option<&str> {
        match &self.participants {
            [a, b] if a == user_id => Some(b.as_str()),
            [a, b] if b == user_id => Some(a.as_str()),
            _ => None,
        }
    }
}

/// Orders a pair the way it is stored.
fn canonical_pair<'a>(user_a: &'a str, user_b: &'a str) -> (&'a str, &'a str) {
    if user_a <= user_b {
        (user_a, user_b)
    } else {
        (user_b, user_a)
    }
}

async fn find_pair(
    db: &DatabaseConnection,
    first: &str,
    second: &str,
) -> Result<Option<conversation::Model>> {
    Conversation::find()
        .filter(conversation::Column::ParticipantA.eq(first))
        .filter(conversation::Column::ParticipantB.eq(second))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn messages_for(
    db: &DatabaseConnection,
    conversation_id: &str,
) -> Result<Vec<chat_message::Model>> {
    ChatMessage::find()
        .filter(chat_message::Column::ConversationId.eq(conversation_id))
        .order_by_asc(chat_message::Column::Seq)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the user's conversations, most recently active first.
pub async fn conversations_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<ConversationThread>> {
    let conversations = Conversation::find()
        .filter(
            Condition::any()
                .add(conversation::Column::ParticipantA.eq(user_id))
                .add(conversation::Column::ParticipantB.eq(user_id)),
        )
        .order_by_desc(conversation::Column::LastMessageTimestamp)
        .all(db)
        .await?;

    if conversations.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = conversations.iter().map(|c| c.id.clone()).collect();
    let mut grouped: HashMap<String, Vec<chat_message::Model>> = HashMap::new();
    for message in ChatMessage::find()
        .filter(chat_message::Column::ConversationId.is_in(ids))
        .order_by_asc(chat_message::Column::Seq)
        .all(db)
        .await?
    {
        grouped
            .entry(message.conversation_id.clone())
            .or_default()
            .push(message);
    }

    Ok(conversations
        .into_iter()
        .map(|c| {
            let messages = grouped.remove(&c.id).unwrap_or_default();
            ConversationThread::new(c, messages)
        })
        .collect())
}

/// Returns the conversation between two users, creating it if needed.
///
/// # Errors
/// Returns [`Error::Validation`] if both IDs are the same user.
#[instrument(skip(db))]
pub async fn get_or_create_conversation(
    db: &DatabaseConnection,
    user_a: &str,
    user_b: &str,
) -> Result<ConversationThread> {
    if user_a == user_b {
        return Err(Error::validation("Cannot start a conversation with yourself"));
    }

    let (first, second) = canonical_pair(user_a, user_b);

    if let Some(existing) = find_pair(db, first, second).await? {
        debug!(conversation_id = %existing.id, "Reusing conversation");
        let messages = messages_for(db, &existing.id).await?;
        return Ok(ConversationThread::new(existing, messages));
    }

    let inserted = Conversation::insert(conversation::ActiveModel {
        id: Set(new_id()),
        participant_a: Set(first.to_string()),
        participant_b: Set(second.to_string()),
        last_message_timestamp: Set(chrono::Utc::now()),
    })
    .on_conflict(
        OnConflict::columns([
            conversation::Column::ParticipantA,
            conversation::Column::ParticipantB,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    let stored = find_pair(db, first, second).await?.ok_or_else(|| {
        Error::Database(DbErr::RecordNotFound(format!(
            "conversation between {first} and {second}"
        )))
    })?;
    if inserted > 0 {
        info!(conversation_id = %stored.id, "Conversation opened");
    }
    let messages = messages_for(db, &stored.id).await?;
    Ok(ConversationThread::new(stored, messages))
}

/// Appends a message to a conversation and bumps its activity timestamp.
///
/// # Errors
/// Returns an error if:
/// - The text is empty after trimming
/// - The conversation does not exist
/// - The sender is not one of the two participants
#[instrument(skip(db, text))]
pub async fn send_message(
    db: &DatabaseConnection,
    conversation_id: &str,
    sender_id: &str,
    text: &str,
) -> Result<chat_message::Model> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::validation("Message cannot be empty"));
    }

    let txn = db.begin().await?;

    let conversation = Conversation::find_by_id(conversation_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::ConversationNotFound {
            id: conversation_id.to_string(),
        })?;

    if !conversation.has_participant(sender_id) {
        return Err(Error::Forbidden {
            message: format!("{sender_id} is not part of conversation {conversation_id}"),
        });
    }

    let seq = ChatMessage::find()
        .filter(chat_message::Column::ConversationId.eq(conversation_id))
        .count(&txn)
        .await?;
    let now = chrono::Utc::now();

    let message = chat_message::ActiveModel {
        id: Set(new_id()),
        conversation_id: Set(conversation.id.clone()),
        sender_id: Set(sender_id.to_string()),
        text: Set(text.to_string()),
        timestamp: Set(now),
        seq: Set(i64::try_from(seq).unwrap_or(i64::MAX)),
    }
    .insert(&txn)
    .await?;

    let mut active: conversation::ActiveModel = conversation.into();
    active.last_message_timestamp = Set(now);
    active.update(&txn).await?;

    txn.commit().await?;
    Ok(message)
}
