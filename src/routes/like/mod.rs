mod cache;
mod coordinator;
mod handler;
mod model;
mod store;

pub use cache::{CacheError, CountCache, RedisCountCache, like_count_key};
pub use coordinator::{LikeCoordinator, LikeError};
pub use handler::{get_likes, toggle_like};
pub use model::{LikeRecord, LikeSummary};
pub use store::{MembershipStore, PgMembershipStore};
