use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Location, Quest, QuestCompletion, QuestInvite, RequestStatus, UserPreferences},
    routes::{required, AppState},
};

/// XP awarded for any completed quest
const COMPLETION_XP: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct GenerateQuestsRequest {
    pub location: Location,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

fn default_radius_km() -> f64 {
    5.0
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub message: String,
    pub xp_earned: u32,
    pub completion_id: String,
}

#[derive(Debug, Deserialize)]
pub struct NewQuestInvite {
    pub quest_id: String,
    pub sender_id: String,
    pub receiver_id: String,
}

/// Looks up places and events around the user and returns generated quests.
///
/// The request radius overrides any radius inside `preferences`.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateQuestsRequest>,
) -> AppResult<Json<Vec<Quest>>> {
    let prefs = request.preferences.unwrap_or_default();
    let quests = state
        .quest_search
        .generate(request.location, request.radius_km, prefs)
        .await?;
    Ok(Json(quests))
}

pub async fn complete(
    Json(completion): Json<QuestCompletion>,
) -> AppResult<Json<CompletionResponse>> {
    let user_id = required(&completion.user_id, "user_id")?;
    let quest_id = required(&completion.quest_id, "quest_id")?;

    if let Some(rating) = completion.rating {
        if !(1..=5).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }
    }

    tracing::info!(
        user_id = %user_id,
        quest_id = %quest_id,
        rating = ?completion.rating,
        completed_at = %completion.completed_at,
        "Quest completed"
    );

    Ok(Json(CompletionResponse {
        message: "Quest completed!".to_string(),
        xp_earned: COMPLETION_XP,
        completion_id: format!("{}_{}", user_id, quest_id),
    }))
}

pub async fn invite(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewQuestInvite>,
) -> AppResult<(StatusCode, Json<QuestInvite>)> {
    let invite = QuestInvite {
        invite_id: Uuid::new_v4(),
        quest_id: required(&request.quest_id, "quest_id")?,
        sender_id: required(&request.sender_id, "sender_id")?,
        receiver_id: required(&request.receiver_id, "receiver_id")?,
        status: RequestStatus::Pending,
        created_at: Utc::now(),
    };

    state.invites.create(invite.clone()).await?;
    tracing::info!(invite_id = %invite.invite_id, quest_id = %invite.quest_id, "Quest invite sent");

    Ok((StatusCode::CREATED, Json(invite)))
}

pub async fn list_invites(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<QuestInvite>>> {
    let invites = state.invites.list_for_receiver(&user_id).await?;
    Ok(Json(invites))
}
