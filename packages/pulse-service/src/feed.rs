use pulse_domain::{Cursor, FeedItem, FeedItemKind, Visibility, can_view, paginate};
use pulse_storage::models::{ActivityRow, CirclePostRow, IndividualPostRow};

use crate::{FeedService, ServiceResult, Session, enrich::Enrichment};

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct FeedQuery {
	pub cursor: Option<String>,
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
	pub items: Vec<FeedItem>,
	pub next_cursor: Option<String>,
	pub has_more: bool,
}

impl FeedService {
	/// Assembles one page of the unified timeline for the session's user:
	/// graph and block resolution, the three source fetches, the precise
	/// visibility pass, enrichment, and the deterministic merge.
	pub async fn feed(&self, session: &Session, query: FeedQuery) -> ServiceResult<FeedResponse> {
		let feed_cfg = &self.cfg.feed;
		let page_size =
			query.limit.unwrap_or(feed_cfg.default_page_size).clamp(1, feed_cfg.max_page_size)
				as usize;
		// A malformed cursor never fails the request; pagination restarts
		// from the newest page instead.
		let cursor = query.cursor.as_deref().and_then(|raw| match Cursor::parse(raw) {
			Ok(cursor) => Some(cursor),
			Err(err) => {
				tracing::debug!(%err, "Ignoring malformed feed cursor.");

				None
			},
		});
		let before = cursor.as_ref().map(|cursor| cursor.created_at);
		let viewer_id = session.user_id;
		let (graph, blocks) =
			tokio::try_join!(self.resolve_graph(viewer_id), self.resolve_blocks(viewer_id))?;
		let circle_ids = graph.circle_ids();
		let visible_user_ids =
			graph.all_visible_user_ids.iter().copied().collect::<Vec<_>>();
		// One surplus row per source signals another page without a count
		// query.
		let fetch_limit = page_size as i64 + 1;
		let content = &self.stores().content;
		let (activities, circle_posts, individual_posts) = tokio::try_join!(
			content.activities(viewer_id, before, fetch_limit),
			async {
				if circle_ids.is_empty() {
					Ok(Vec::new())
				} else {
					content.circle_posts(&circle_ids, before, fetch_limit).await
				}
			},
			content.individual_posts(viewer_id, &visible_user_ids, before, fetch_limit),
		)?;
		// The SQL pre-filter over-approximates; the evaluator trims the rows
		// it would never have admitted.
		let individual_posts = individual_posts
			.into_iter()
			.filter(|row| {
				let Some(visibility) = Visibility::parse(&row.visibility) else {
					return false;
				};

				can_view(Some(viewer_id), row.author_id, visibility, &blocks, graph.as_ref())
			})
			.collect::<Vec<_>>();
		let enrichment =
			self.enrich(session, &activities, &circle_posts, &individual_posts).await?;
		let mut items =
			Vec::with_capacity(activities.len() + circle_posts.len() + individual_posts.len());

		items.extend(activities.into_iter().map(|row| normalize_activity(row, &enrichment)));
		items.extend(circle_posts.into_iter().map(|row| {
			let circle_name = graph.circle_name(row.circle_id).map(str::to_string);

			normalize_circle_post(row, circle_name, &enrichment)
		}));
		items.extend(
			individual_posts.into_iter().map(|row| normalize_individual_post(row, &enrichment)),
		);

		let page = paginate(items, &blocks, page_size);

		Ok(FeedResponse {
			items: page.items,
			next_cursor: page.next_cursor.map(|cursor| cursor.encode()),
			has_more: page.has_more,
		})
	}
}

pub(crate) fn normalize_activity(row: ActivityRow, enrichment: &Enrichment) -> FeedItem {
	FeedItem {
		id: FeedItemKind::Activity.synthesize_id(row.activity_id),
		kind: FeedItemKind::Activity,
		actor_id: row.user_id,
		actor_display_name: enrichment.display_name(row.user_id),
		actor_image_url: enrichment.profile_picture(row.user_id),
		actor_badges: enrichment.badges(row.user_id),
		activity_or_post_kind: row.kind,
		text_content: None,
		image_url: None,
		circle_id: None,
		circle_name: None,
		metadata: row.metadata,
		like_count: 0,
		comment_count: 0,
		viewer_has_liked: false,
		created_at: row.created_at,
		// The activity row's own visibility column is ignored: activity
		// entries are owner-only in the feed.
		visibility_mode: None,
		challenge_id: None,
	}
}

pub(crate) fn normalize_circle_post(
	row: CirclePostRow,
	circle_name: Option<String>,
	enrichment: &Enrichment,
) -> FeedItem {
	FeedItem {
		id: FeedItemKind::CirclePost.synthesize_id(row.post_id),
		kind: FeedItemKind::CirclePost,
		actor_id: row.author_id,
		actor_display_name: enrichment.display_name(row.author_id),
		actor_image_url: enrichment.profile_picture(row.author_id),
		actor_badges: enrichment.badges(row.author_id),
		activity_or_post_kind: row.kind,
		text_content: row.text_content,
		image_url: row.image_url,
		circle_id: Some(row.circle_id),
		circle_name,
		metadata: None,
		like_count: row.like_count.max(0),
		comment_count: row.comment_count.max(0),
		viewer_has_liked: enrichment.has_liked_circle_post(row.post_id),
		created_at: row.created_at,
		visibility_mode: None,
		challenge_id: row.challenge_id,
	}
}

pub(crate) fn normalize_individual_post(
	row: IndividualPostRow,
	enrichment: &Enrichment,
) -> FeedItem {
	FeedItem {
		id: FeedItemKind::IndividualPost.synthesize_id(row.post_id),
		kind: FeedItemKind::IndividualPost,
		actor_id: row.author_id,
		actor_display_name: enrichment.display_name(row.author_id),
		actor_image_url: enrichment.profile_picture(row.author_id),
		actor_badges: enrichment.badges(row.author_id),
		activity_or_post_kind: row.kind,
		text_content: row.text_content,
		image_url: row.image_url,
		circle_id: None,
		circle_name: None,
		metadata: None,
		like_count: row.like_count.max(0),
		comment_count: row.comment_count.max(0),
		viewer_has_liked: enrichment.has_liked_individual_post(row.post_id),
		created_at: row.created_at,
		visibility_mode: Visibility::parse(&row.visibility),
		challenge_id: row.challenge_id,
	}
}
