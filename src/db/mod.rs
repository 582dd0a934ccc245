pub mod memory;
pub mod redis;
pub mod repositories;

pub use memory::InMemoryStore;
pub use self::redis::create_redis_client;
pub use self::redis::Cache;
pub use self::redis::CacheKey;
pub use repositories::{FavoriteRepository, FriendRepository, InviteRepository, MessageRepository};
