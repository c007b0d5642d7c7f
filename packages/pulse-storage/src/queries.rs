use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{
		ActivityRow, BadgeRow, CirclePostRow, CircleRow, IndividualPostRow, ProfileRow, SessionRow,
	},
};

pub async fn following_ids(db: &Db, user_id: Uuid) -> Result<Vec<Uuid>> {
	let ids: Vec<Uuid> =
		sqlx::query_scalar("SELECT followee_id FROM follows WHERE follower_id = $1")
			.bind(user_id)
			.fetch_all(&db.pool)
			.await?;

	Ok(ids)
}

pub async fn follower_ids(db: &Db, user_id: Uuid) -> Result<Vec<Uuid>> {
	let ids: Vec<Uuid> =
		sqlx::query_scalar("SELECT follower_id FROM follows WHERE followee_id = $1")
			.bind(user_id)
			.fetch_all(&db.pool)
			.await?;

	Ok(ids)
}

pub async fn connection_ids(db: &Db, user_id: Uuid) -> Result<Vec<Uuid>> {
	let ids: Vec<Uuid> = sqlx::query_scalar(
		"\
SELECT CASE WHEN requester_id = $1 THEN addressee_id ELSE requester_id END
FROM connections
WHERE status = 'accepted'
	AND (requester_id = $1 OR addressee_id = $1)",
	)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}

pub async fn blocked_ids(db: &Db, user_id: Uuid) -> Result<Vec<Uuid>> {
	let ids: Vec<Uuid> = sqlx::query_scalar(
		"\
SELECT blocked_id FROM user_blocks WHERE blocker_id = $1
UNION
SELECT blocker_id FROM user_blocks WHERE blocked_id = $1",
	)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}

pub async fn circle_memberships(db: &Db, user_id: Uuid) -> Result<Vec<CircleRow>> {
	let circles: Vec<CircleRow> = sqlx::query_as(
		"\
SELECT c.circle_id, c.name
FROM circle_members m
JOIN circles c ON c.circle_id = m.circle_id
WHERE m.user_id = $1",
	)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(circles)
}

pub async fn circle_mate_ids(db: &Db, circle_ids: &[Uuid], user_id: Uuid) -> Result<Vec<Uuid>> {
	let ids: Vec<Uuid> = sqlx::query_scalar(
		"\
SELECT DISTINCT user_id
FROM circle_members
WHERE circle_id = ANY($1)
	AND user_id <> $2",
	)
	.bind(circle_ids)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}

pub async fn follow_exists(db: &Db, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
	let exists: bool = sqlx::query_scalar(
		"SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)",
	)
	.bind(follower_id)
	.bind(followee_id)
	.fetch_one(&db.pool)
	.await?;

	Ok(exists)
}

pub async fn connection_exists(db: &Db, a: Uuid, b: Uuid) -> Result<bool> {
	let exists: bool = sqlx::query_scalar(
		"\
SELECT EXISTS (
	SELECT 1
	FROM connections
	WHERE status = 'accepted'
		AND ((requester_id = $1 AND addressee_id = $2) OR (requester_id = $2 AND addressee_id = $1))
)",
	)
	.bind(a)
	.bind(b)
	.fetch_one(&db.pool)
	.await?;

	Ok(exists)
}

pub async fn fetch_activities(
	db: &Db,
	user_id: Uuid,
	before: Option<OffsetDateTime>,
	limit: i64,
) -> Result<Vec<ActivityRow>> {
	let mut builder = sqlx::QueryBuilder::new(
		"SELECT activity_id, user_id, kind, metadata, visibility, created_at \
		 FROM activity_log WHERE user_id = ",
	);

	builder.push_bind(user_id);

	if let Some(before) = before {
		builder.push(" AND created_at < ");
		builder.push_bind(before);
	}

	builder.push(" ORDER BY created_at DESC LIMIT ");
	builder.push_bind(limit);

	let rows: Vec<ActivityRow> = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn fetch_circle_posts(
	db: &Db,
	circle_ids: &[Uuid],
	before: Option<OffsetDateTime>,
	limit: i64,
) -> Result<Vec<CirclePostRow>> {
	let mut builder = sqlx::QueryBuilder::new(
		"SELECT post_id, circle_id, author_id, kind, text_content, image_url, challenge_id, \
		 like_count, comment_count, created_at \
		 FROM circle_posts WHERE circle_id = ANY(",
	);

	builder.push_bind(circle_ids);
	builder.push(")");

	if let Some(before) = before {
		builder.push(" AND created_at < ");
		builder.push_bind(before);
	}

	builder.push(" ORDER BY created_at DESC LIMIT ");
	builder.push_bind(limit);

	let rows: Vec<CirclePostRow> = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(rows)
}

/// Coarse audience pre-filter: the viewer's own posts, anything public, and
/// restricted posts from anyone in the resolved visible-user set. This may
/// include rows the precise visibility evaluator later rejects, but never
/// excludes one it would accept.
pub async fn fetch_individual_posts(
	db: &Db,
	viewer_id: Uuid,
	visible_user_ids: &[Uuid],
	before: Option<OffsetDateTime>,
	limit: i64,
) -> Result<Vec<IndividualPostRow>> {
	let mut builder = sqlx::QueryBuilder::new(
		"SELECT post_id, author_id, kind, visibility, text_content, image_url, challenge_id, \
		 like_count, comment_count, created_at \
		 FROM individual_posts WHERE (author_id = ",
	);

	builder.push_bind(viewer_id);
	builder.push(" OR visibility = 'public' OR (visibility IN ('followers', 'connections') AND author_id = ANY(");
	builder.push_bind(visible_user_ids);
	builder.push(")))");

	if let Some(before) = before {
		builder.push(" AND created_at < ");
		builder.push_bind(before);
	}

	builder.push(" ORDER BY created_at DESC LIMIT ");
	builder.push_bind(limit);

	let rows: Vec<IndividualPostRow> = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(rows)
}

pub async fn individual_post_by_id(db: &Db, post_id: i64) -> Result<Option<IndividualPostRow>> {
	let row: Option<IndividualPostRow> = sqlx::query_as(
		"\
SELECT post_id, author_id, kind, visibility, text_content, image_url, challenge_id, like_count,
	comment_count, created_at
FROM individual_posts
WHERE post_id = $1",
	)
	.bind(post_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn profiles_by_ids(db: &Db, user_ids: &[Uuid]) -> Result<Vec<ProfileRow>> {
	let rows: Vec<ProfileRow> = sqlx::query_as(
		"SELECT user_id, display_name, profile_picture FROM users WHERE user_id = ANY($1)",
	)
	.bind(user_ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Featured badges for the given users, ordered for grouping. The per-user
/// cap is applied by the caller after grouping, not in SQL.
pub async fn featured_badges_by_user_ids(db: &Db, user_ids: &[Uuid]) -> Result<Vec<BadgeRow>> {
	let rows: Vec<BadgeRow> = sqlx::query_as(
		"\
SELECT user_id, label, icon_url, display_order
FROM user_badges
WHERE user_id = ANY($1)
	AND is_featured
ORDER BY user_id, display_order",
	)
	.bind(user_ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn liked_circle_post_ids(db: &Db, user_id: Uuid, post_ids: &[i64]) -> Result<Vec<i64>> {
	let ids: Vec<i64> = sqlx::query_scalar(
		"SELECT post_id FROM circle_post_likes WHERE user_id = $1 AND post_id = ANY($2)",
	)
	.bind(user_id)
	.bind(post_ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}

pub async fn liked_individual_post_ids(
	db: &Db,
	user_id: Uuid,
	post_ids: &[i64],
) -> Result<Vec<i64>> {
	let ids: Vec<i64> = sqlx::query_scalar(
		"SELECT post_id FROM individual_post_likes WHERE user_id = $1 AND post_id = ANY($2)",
	)
	.bind(user_id)
	.bind(post_ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}

pub async fn session_by_token(db: &Db, token: &str) -> Result<Option<SessionRow>> {
	let row: Option<SessionRow> = sqlx::query_as(
		"\
SELECT s.token, s.user_id, u.display_name, s.expires_at
FROM sessions s
JOIN users u ON u.user_id = s.user_id
WHERE s.token = $1",
	)
	.bind(token)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}
