pub mod enrich;
pub mod feed;
pub mod graph;
pub mod post;

mod stores;

use std::{future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;
use uuid::Uuid;

pub use feed::{FeedQuery, FeedResponse};
pub use stores::PgStores;

use pulse_config::Config;
use pulse_storage::{
	db::Db,
	models::{
		ActivityRow, BadgeRow, CirclePostRow, CircleRow, IndividualPostRow, ProfileRow, SessionRow,
	},
};

use crate::graph::GraphCache;

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type StoreResult<T> = pulse_storage::Result<T>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	#[error("Not authenticated.")]
	Unauthenticated,
	#[error("Not found: {0}")]
	NotFound(String),
	#[error(transparent)]
	Storage(#[from] pulse_storage::Error),
}

/// Resolved identity of the requester. Circle membership is owned by the
/// social-graph resolver, not the session.
#[derive(Clone, Debug)]
pub struct Session {
	pub user_id: Uuid,
	pub display_name: String,
}

pub trait RelationshipStore
where
	Self: Send + Sync,
{
	fn following_ids<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, StoreResult<Vec<Uuid>>>;

	fn follower_ids<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, StoreResult<Vec<Uuid>>>;

	fn connection_ids<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, StoreResult<Vec<Uuid>>>;

	fn circle_memberships<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, StoreResult<Vec<CircleRow>>>;

	fn circle_mate_ids<'a>(
		&'a self,
		circle_ids: &'a [Uuid],
		user_id: Uuid,
	) -> BoxFuture<'a, StoreResult<Vec<Uuid>>>;

	fn blocked_ids<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, StoreResult<Vec<Uuid>>>;

	fn follow_exists<'a>(
		&'a self,
		follower_id: Uuid,
		followee_id: Uuid,
	) -> BoxFuture<'a, StoreResult<bool>>;

	fn connection_exists<'a>(&'a self, a: Uuid, b: Uuid) -> BoxFuture<'a, StoreResult<bool>>;
}

pub trait ContentStore
where
	Self: Send + Sync,
{
	fn activities<'a>(
		&'a self,
		user_id: Uuid,
		before: Option<OffsetDateTime>,
		limit: i64,
	) -> BoxFuture<'a, StoreResult<Vec<ActivityRow>>>;

	fn circle_posts<'a>(
		&'a self,
		circle_ids: &'a [Uuid],
		before: Option<OffsetDateTime>,
		limit: i64,
	) -> BoxFuture<'a, StoreResult<Vec<CirclePostRow>>>;

	fn individual_posts<'a>(
		&'a self,
		viewer_id: Uuid,
		visible_user_ids: &'a [Uuid],
		before: Option<OffsetDateTime>,
		limit: i64,
	) -> BoxFuture<'a, StoreResult<Vec<IndividualPostRow>>>;

	fn individual_post<'a>(
		&'a self,
		post_id: i64,
	) -> BoxFuture<'a, StoreResult<Option<IndividualPostRow>>>;
}

pub trait ProfileStore
where
	Self: Send + Sync,
{
	fn profiles<'a>(&'a self, user_ids: &'a [Uuid]) -> BoxFuture<'a, StoreResult<Vec<ProfileRow>>>;

	fn featured_badges<'a>(
		&'a self,
		user_ids: &'a [Uuid],
	) -> BoxFuture<'a, StoreResult<Vec<BadgeRow>>>;
}

pub trait LikeStore
where
	Self: Send + Sync,
{
	fn liked_circle_posts<'a>(
		&'a self,
		viewer_id: Uuid,
		post_ids: &'a [i64],
	) -> BoxFuture<'a, StoreResult<Vec<i64>>>;

	fn liked_individual_posts<'a>(
		&'a self,
		viewer_id: Uuid,
		post_ids: &'a [i64],
	) -> BoxFuture<'a, StoreResult<Vec<i64>>>;
}

pub trait SessionStore
where
	Self: Send + Sync,
{
	fn session<'a>(&'a self, token: &'a str) -> BoxFuture<'a, StoreResult<Option<SessionRow>>>;
}

/// The collaborator seams the feed engine reads through. Production wiring
/// points every seam at Postgres; tests swap in in-memory stores.
#[derive(Clone)]
pub struct Stores {
	pub relationships: Arc<dyn RelationshipStore>,
	pub content: Arc<dyn ContentStore>,
	pub profiles: Arc<dyn ProfileStore>,
	pub likes: Arc<dyn LikeStore>,
	pub sessions: Arc<dyn SessionStore>,
}
impl Stores {
	pub fn postgres(db: Arc<Db>) -> Self {
		let store = Arc::new(PgStores::new(db));

		Self {
			relationships: store.clone(),
			content: store.clone(),
			profiles: store.clone(),
			likes: store.clone(),
			sessions: store,
		}
	}
}

pub struct FeedService {
	pub cfg: Config,
	stores: Stores,
	graph_cache: GraphCache,
}
impl FeedService {
	pub fn new(cfg: Config, stores: Stores) -> Self {
		let graph_cache = GraphCache::new(cfg.feed.graph_cache_ttl_secs);

		Self { cfg, stores, graph_cache }
	}

	pub(crate) fn stores(&self) -> &Stores {
		&self.stores
	}

	/// Resolves a bearer token to a session. Missing or expired tokens are
	/// both `Unauthenticated`; the caller must not learn which.
	pub async fn authenticate(&self, token: &str) -> ServiceResult<Session> {
		let Some(row) = self.stores.sessions.session(token).await? else {
			return Err(ServiceError::Unauthenticated);
		};

		if row.expires_at.is_some_and(|expires_at| expires_at <= OffsetDateTime::now_utc()) {
			return Err(ServiceError::Unauthenticated);
		}

		Ok(Session { user_id: row.user_id, display_name: row.display_name })
	}
}
