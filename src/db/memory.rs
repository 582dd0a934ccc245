use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    db::repositories::{FavoriteRepository, FriendRepository, InviteRepository, MessageRepository},
    error::AppResult,
    models::{Favorite, Friend, FriendRequest, Message, QuestInvite},
};

#[derive(Default)]
struct StoreInner {
    favorites: HashMap<String, Vec<Favorite>>,
    friends: HashMap<String, Vec<Friend>>,
    friend_requests: Vec<FriendRequest>,
    messages: Vec<Message>,
    invites: Vec<QuestInvite>,
}

/// Process-local store for the social features. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FavoriteRepository for InMemoryStore {
    async fn save(&self, favorite: Favorite) -> AppResult<Favorite> {
        let mut inner = self.inner.write().await;
        let saved = inner.favorites.entry(favorite.user_id.clone()).or_default();

        match saved.iter_mut().find(|f| f.item_id == favorite.item_id) {
            Some(existing) => *existing = favorite.clone(),
            None => saved.push(favorite.clone()),
        }

        Ok(favorite)
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Favorite>> {
        let inner = self.inner.read().await;
        Ok(inner.favorites.get(user_id).cloned().unwrap_or_default())
    }

    async fn remove(&self, user_id: &str, item_id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(saved) = inner.favorites.get_mut(user_id) else {
            return Ok(false);
        };

        let before = saved.len();
        saved.retain(|f| f.item_id != item_id);
        Ok(saved.len() < before)
    }
}

#[async_trait::async_trait]
impl FriendRepository for InMemoryStore {
    async fn record_request(&self, request: FriendRequest) -> AppResult<()> {
        self.inner.write().await.friend_requests.push(request);
        Ok(())
    }

    async fn sent_requests(&self, sender_id: &str) -> AppResult<Vec<FriendRequest>> {
        let inner = self.inner.read().await;
        Ok(inner
            .friend_requests
            .iter()
            .filter(|r| r.sender_id == sender_id)
            .cloned()
            .collect())
    }

    async fn add_friend(&self, friend: Friend) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let friends = inner.friends.entry(friend.user_id.clone()).or_default();

        if friends.iter().any(|f| f.friend_email == friend.friend_email) {
            return Ok(false);
        }

        friends.push(friend);
        Ok(true)
    }

    async fn list_friends(&self, user_id: &str) -> AppResult<Vec<Friend>> {
        let inner = self.inner.read().await;
        Ok(inner.friends.get(user_id).cloned().unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl MessageRepository for InMemoryStore {
    async fn append(&self, message: Message) -> AppResult<()> {
        self.inner.write().await.messages.push(message);
        Ok(())
    }

    async fn conversation(&self, user_id: &str, other_id: &str) -> AppResult<Vec<Message>> {
        let inner = self.inner.read().await;
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.is_between(user_id, other_id))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl InviteRepository for InMemoryStore {
    async fn create(&self, invite: QuestInvite) -> AppResult<()> {
        self.inner.write().await.invites.push(invite);
        Ok(())
    }

    async fn list_for_receiver(&self, receiver_id: &str) -> AppResult<Vec<QuestInvite>> {
        let inner = self.inner.read().await;
        Ok(inner
            .invites
            .iter()
            .filter(|i| i.receiver_id == receiver_id)
            .cloned()
            .collect())
    }
}
