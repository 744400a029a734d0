//! Conversation routes between buyers and farmers.

use crate::{
    api::{SharedState, extract::Json},
    core::{
        chat::{self, ConversationThread},
        plan::{self, FarmerFeature},
        user,
    },
    entities::ChatMessageModel,
    errors::Result,
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

/// Body of `POST /conversations`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenConversationRequest {
    /// User opening the conversation
    pub user_id: String,
    /// The other participant
    pub other_user_id: String,
}

/// Body of `POST /conversations/{id}/messages`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Sending participant
    pub sender_id: String,
    /// Message text
    pub text: String,
}

async fn user_conversations(
    State(state): State<SharedState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ConversationThread>>> {
    let viewer = user::require_user(&state.database, &user_id).await?;
    plan::ensure_feature(&viewer, FarmerFeature::BuyerChats)?;
    Ok(Json(
        chat::conversations_for_user(&state.database, &user_id).await?,
    ))
}

async fn open_conversation(
    State(state): State<SharedState>,
    Json(request): Json<OpenConversationRequest>,
) -> Result<Json<ConversationThread>> {
    let opener = user::require_user(&state.database, &request.user_id).await?;
    plan::ensure_feature(&opener, FarmerFeature::BuyerChats)?;
    user::require_user(&state.database, &request.other_user_id).await?;
    Ok(Json(
        chat::get_or_create_conversation(
            &state.database,
            &request.user_id,
            &request.other_user_id,
        )
        .await?,
    ))
}

async fn send_message(
    State(state): State<SharedState>,
    Path(conversation_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageModel>)> {
    let sender = user::require_user(&state.database, &request.sender_id).await?;
    plan::ensure_feature(&sender, FarmerFeature::BuyerChats)?;
    let message = chat::send_message(
        &state.database,
        &conversation_id,
        &request.sender_id,
        &request.text,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Conversation and message routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/users/{id}/conversations", get(user_conversations))
        .route("/conversations", post(open_conversation))
        .route("/conversations/{id}/messages", post(send_message))
}
