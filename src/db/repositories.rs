//! Storage ports for the social features.
//!
//! Handlers only see these traits; `AppState` decides which implementation
//! backs them.

use crate::{
    error::AppResult,
    models::{Favorite, Friend, FriendRequest, Message, QuestInvite},
};

#[async_trait::async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Saves a favorite, replacing an existing one for the same user and item
    async fn save(&self, favorite: Favorite) -> AppResult<Favorite>;

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Favorite>>;

    /// Returns false when there was nothing to remove
    async fn remove(&self, user_id: &str, item_id: &str) -> AppResult<bool>;
}

#[async_trait::async_trait]
pub trait FriendRepository: Send + Sync {
    async fn record_request(&self, request: FriendRequest) -> AppResult<()>;

    /// Requests a user has sent, oldest first
    async fn sent_requests(&self, sender_id: &str) -> AppResult<Vec<FriendRequest>>;

    /// Adds a friend entry; returns false if the user already has a friend with that email
    async fn add_friend(&self, friend: Friend) -> AppResult<bool>;

    async fn list_friends(&self, user_id: &str) -> AppResult<Vec<Friend>>;
}

#[async_trait::async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, message: Message) -> AppResult<()>;

    /// Messages exchanged between two users in either direction, in send order
    async fn conversation(&self, user_id: &str, other_id: &str) -> AppResult<Vec<Message>>;
}

#[async_trait::async_trait]
pub trait InviteRepository: Send + Sync {
    async fn create(&self, invite: QuestInvite) -> AppResult<()>;

    async fn list_for_receiver(&self, receiver_id: &str) -> AppResult<Vec<QuestInvite>>;
}
