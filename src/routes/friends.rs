use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Friend, FriendRequest, Message, RequestStatus},
    routes::{required, AppState},
};

#[derive(Debug, Deserialize)]
pub struct NewFriendRequest {
    pub sender_id: String,
    pub receiver_email: String,
}

#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
}

/// Records a friend request and accepts it immediately.
///
/// There is no user directory, so the friend's id and display name are
/// derived from the email address.
pub async fn send_request(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewFriendRequest>,
) -> AppResult<(StatusCode, Json<FriendRequest>)> {
    let sender_id = required(&request.sender_id, "sender_id")?;
    let email = required(&request.receiver_email, "receiver_email")?.to_lowercase();

    let Some((local_part, domain)) = email.split_once('@') else {
        return Err(AppError::InvalidInput(format!("Invalid email: {}", email)));
    };
    if local_part.is_empty() || domain.is_empty() {
        return Err(AppError::InvalidInput(format!("Invalid email: {}", email)));
    }

    let now = Utc::now();
    let friend_request = FriendRequest {
        request_id: Uuid::new_v4(),
        sender_id: sender_id.clone(),
        receiver_email: email.clone(),
        status: RequestStatus::Accepted,
        created_at: now,
    };
    state.friends.record_request(friend_request.clone()).await?;

    let added = state
        .friends
        .add_friend(Friend {
            user_id: sender_id.clone(),
            friend_id: format!("mock_id_{}", email),
            friend_email: email.clone(),
            friend_name: local_part.to_string(),
            friend_photo: None,
            added_at: now,
        })
        .await?;

    tracing::info!(sender_id = %sender_id, added, "Friend request accepted");

    Ok((StatusCode::CREATED, Json(friend_request)))
}

pub async fn sent_requests(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<FriendRequest>>> {
    let requests = state.friends.sent_requests(&user_id).await?;
    Ok(Json(requests))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Friend>>> {
    let friends = state.friends.list_friends(&user_id).await?;
    Ok(Json(friends))
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewMessage>,
) -> AppResult<(StatusCode, Json<Message>)> {
    if request.content.trim().is_empty() {
        return Err(AppError::InvalidInput("Message cannot be empty".to_string()));
    }

    let message = Message {
        message_id: Uuid::new_v4(),
        sender_id: required(&request.sender_id, "sender_id")?,
        receiver_id: required(&request.receiver_id, "receiver_id")?,
        content: request.content,
        timestamp: Utc::now(),
    };

    state.messages.append(message.clone()).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Both directions of a conversation, oldest first
pub async fn conversation(
    State(state): State<Arc<AppState>>,
    Path((user_id, friend_id)): Path<(String, String)>,
) -> AppResult<Json<Vec<Message>>> {
    let messages = state.messages.conversation(&user_id, &friend_id).await?;
    Ok(Json(messages))
}
