use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use pulse_storage::{
	db::Db,
	models::{
		ActivityRow, BadgeRow, CirclePostRow, CircleRow, IndividualPostRow, ProfileRow, SessionRow,
	},
	queries,
};

use crate::{
	BoxFuture, ContentStore, LikeStore, ProfileStore, RelationshipStore, SessionStore, StoreResult,
};

/// Postgres-backed implementation of every store seam.
pub struct PgStores {
	db: Arc<Db>,
}
impl PgStores {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}
impl RelationshipStore for PgStores {
	fn following_ids<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, StoreResult<Vec<Uuid>>> {
		Box::pin(queries::following_ids(&self.db, user_id))
	}

	fn follower_ids<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, StoreResult<Vec<Uuid>>> {
		Box::pin(queries::follower_ids(&self.db, user_id))
	}

	fn connection_ids<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, StoreResult<Vec<Uuid>>> {
		Box::pin(queries::connection_ids(&self.db, user_id))
	}

	fn circle_memberships<'a>(
		&'a self,
		user_id: Uuid,
	) -> BoxFuture<'a, StoreResult<Vec<CircleRow>>> {
		Box::pin(queries::circle_memberships(&self.db, user_id))
	}

	fn circle_mate_ids<'a>(
		&'a self,
		circle_ids: &'a [Uuid],
		user_id: Uuid,
	) -> BoxFuture<'a, StoreResult<Vec<Uuid>>> {
		Box::pin(queries::circle_mate_ids(&self.db, circle_ids, user_id))
	}

	fn blocked_ids<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, StoreResult<Vec<Uuid>>> {
		Box::pin(queries::blocked_ids(&self.db, user_id))
	}

	fn follow_exists<'a>(
		&'a self,
		follower_id: Uuid,
		followee_id: Uuid,
	) -> BoxFuture<'a, StoreResult<bool>> {
		Box::pin(queries::follow_exists(&self.db, follower_id, followee_id))
	}

	fn connection_exists<'a>(&'a self, a: Uuid, b: Uuid) -> BoxFuture<'a, StoreResult<bool>> {
		Box::pin(queries::connection_exists(&self.db, a, b))
	}
}
impl ContentStore for PgStores {
	fn activities<'a>(
		&'a self,
		user_id: Uuid,
		before: Option<OffsetDateTime>,
		limit: i64,
	) -> BoxFuture<'a, StoreResult<Vec<ActivityRow>>> {
		Box::pin(queries::fetch_activities(&self.db, user_id, before, limit))
	}

	fn circle_posts<'a>(
		&'a self,
		circle_ids: &'a [Uuid],
		before: Option<OffsetDateTime>,
		limit: i64,
	) -> BoxFuture<'a, StoreResult<Vec<CirclePostRow>>> {
		Box::pin(queries::fetch_circle_posts(&self.db, circle_ids, before, limit))
	}

	fn individual_posts<'a>(
		&'a self,
		viewer_id: Uuid,
		visible_user_ids: &'a [Uuid],
		before: Option<OffsetDateTime>,
		limit: i64,
	) -> BoxFuture<'a, StoreResult<Vec<IndividualPostRow>>> {
		Box::pin(queries::fetch_individual_posts(&self.db, viewer_id, visible_user_ids, before, limit))
	}

	fn individual_post<'a>(
		&'a self,
		post_id: i64,
	) -> BoxFuture<'a, StoreResult<Option<IndividualPostRow>>> {
		Box::pin(queries::individual_post_by_id(&self.db, post_id))
	}
}
impl ProfileStore for PgStores {
	fn profiles<'a>(&'a self, user_ids: &'a [Uuid]) -> BoxFuture<'a, StoreResult<Vec<ProfileRow>>> {
		Box::pin(queries::profiles_by_ids(&self.db, user_ids))
	}

	fn featured_badges<'a>(
		&'a self,
		user_ids: &'a [Uuid],
	) -> BoxFuture<'a, StoreResult<Vec<BadgeRow>>> {
		Box::pin(queries::featured_badges_by_user_ids(&self.db, user_ids))
	}
}
impl LikeStore for PgStores {
	fn liked_circle_posts<'a>(
		&'a self,
		viewer_id: Uuid,
		post_ids: &'a [i64],
	) -> BoxFuture<'a, StoreResult<Vec<i64>>> {
		Box::pin(queries::liked_circle_post_ids(&self.db, viewer_id, post_ids))
	}

	fn liked_individual_posts<'a>(
		&'a self,
		viewer_id: Uuid,
		post_ids: &'a [i64],
	) -> BoxFuture<'a, StoreResult<Vec<i64>>> {
		Box::pin(queries::liked_individual_post_ids(&self.db, viewer_id, post_ids))
	}
}
impl SessionStore for PgStores {
	fn session<'a>(&'a self, token: &'a str) -> BoxFuture<'a, StoreResult<Option<SessionRow>>> {
		Box::pin(queries::session_by_token(&self.db, token))
	}
}
