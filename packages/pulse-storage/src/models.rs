use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ActivityRow {
	pub activity_id: i64,
	pub user_id: Uuid,
	pub kind: String,
	pub metadata: Option<Value>,
	pub visibility: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct CirclePostRow {
	pub post_id: i64,
	pub circle_id: Uuid,
	pub author_id: Uuid,
	pub kind: String,
	pub text_content: Option<String>,
	pub image_url: Option<String>,
	pub challenge_id: Option<Uuid>,
	pub like_count: i32,
	pub comment_count: i32,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct IndividualPostRow {
	pub post_id: i64,
	pub author_id: Uuid,
	pub kind: String,
	pub visibility: String,
	pub text_content: Option<String>,
	pub image_url: Option<String>,
	pub challenge_id: Option<Uuid>,
	pub like_count: i32,
	pub comment_count: i32,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ProfileRow {
	pub user_id: Uuid,
	pub display_name: String,
	pub profile_picture: Option<String>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct BadgeRow {
	pub user_id: Uuid,
	pub label: String,
	pub icon_url: Option<String>,
	pub display_order: i32,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct CircleRow {
	pub circle_id: Uuid,
	pub name: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct SessionRow {
	pub token: String,
	pub user_id: Uuid,
	pub display_name: String,
	pub expires_at: Option<OffsetDateTime>,
}
