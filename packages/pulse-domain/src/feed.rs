use std::cmp::Ordering;

use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{cursor::Cursor, graph::BlockSet, visibility::Visibility};

/// Originating source of a merged feed item. Modeled as a tagged variant,
/// not a hierarchy; the feed is a hot read path.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedItemKind {
	Activity,
	CirclePost,
	IndividualPost,
}
impl FeedItemKind {
	/// Id prefix guaranteeing cross-source uniqueness within a page.
	pub fn id_prefix(&self) -> &'static str {
		match self {
			Self::Activity => "activity",
			Self::CirclePost => "post",
			Self::IndividualPost => "ipost",
		}
	}

	pub fn synthesize_id(&self, row_id: i64) -> String {
		format!("{}-{row_id}", self.id_prefix())
	}
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorBadge {
	pub label: String,
	pub icon_url: Option<String>,
}

/// One normalized, displayable unit in the merged timeline, regardless of
/// originating source. Request-scoped; never persisted.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
	pub id: String,
	pub kind: FeedItemKind,
	pub actor_id: Uuid,
	pub actor_display_name: String,
	pub actor_image_url: Option<String>,
	pub actor_badges: Vec<ActorBadge>,
	pub activity_or_post_kind: String,
	pub text_content: Option<String>,
	pub image_url: Option<String>,
	pub circle_id: Option<Uuid>,
	pub circle_name: Option<String>,
	pub metadata: Option<Value>,
	pub like_count: i32,
	pub comment_count: i32,
	pub viewer_has_liked: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub visibility_mode: Option<Visibility>,
	pub challenge_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeedPage {
	pub items: Vec<FeedItem>,
	pub next_cursor: Option<Cursor>,
	pub has_more: bool,
}

/// Merge already-normalized items into one page: drop blocked actors (the
/// one enforcement point guaranteed to run for every item regardless of
/// source), sort newest-first with the synthesized id as deterministic
/// tie-break, truncate to `page_size`, and derive the next cursor. Sources
/// fetch `page_size + 1` rows each, so a surplus after truncation means
/// another page exists.
pub fn paginate(items: Vec<FeedItem>, blocks: &BlockSet, page_size: usize) -> FeedPage {
	let mut items =
		items.into_iter().filter(|item| !blocks.contains(item.actor_id)).collect::<Vec<_>>();

	items.sort_by(compare_newest_first);

	let has_more = items.len() > page_size;

	items.truncate(page_size);

	let next_cursor = if has_more {
		items
			.last()
			.map(|item| Cursor { created_at: item.created_at, item_id: item.id.clone() })
	} else {
		None
	};

	FeedPage { items, next_cursor, has_more }
}

fn compare_newest_first(a: &FeedItem, b: &FeedItem) -> Ordering {
	b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use time::macros::datetime;

	use super::*;

	fn user(n: u128) -> Uuid {
		Uuid::from_u128(n)
	}

	fn item(kind: FeedItemKind, row_id: i64, actor: Uuid, created_at: OffsetDateTime) -> FeedItem {
		FeedItem {
			id: kind.synthesize_id(row_id),
			kind,
			actor_id: actor,
			actor_display_name: "Avery".to_string(),
			actor_image_url: None,
			actor_badges: vec![],
			activity_or_post_kind: "workout".to_string(),
			text_content: None,
			image_url: None,
			circle_id: None,
			circle_name: None,
			metadata: None,
			like_count: 0,
			comment_count: 0,
			viewer_has_liked: false,
			created_at,
			visibility_mode: None,
			challenge_id: None,
		}
	}

	#[test]
	fn ids_are_unique_across_sources_sharing_a_row_id() {
		let at = datetime!(2026-03-01 08:00:00 UTC);
		let page = paginate(
			vec![
				item(FeedItemKind::Activity, 7, user(1), at),
				item(FeedItemKind::CirclePost, 7, user(1), at),
				item(FeedItemKind::IndividualPost, 7, user(1), at),
			],
			&BlockSet::default(),
			10,
		);
		let ids = page.items.iter().map(|item| item.id.as_str()).collect::<HashSet<_>>();

		assert_eq!(ids, HashSet::from(["activity-7", "post-7", "ipost-7"]));
	}

	#[test]
	fn sorts_newest_first_with_id_tie_break() {
		let newer = datetime!(2026-03-01 09:00:00 UTC);
		let older = datetime!(2026-03-01 08:00:00 UTC);
		let page = paginate(
			vec![
				item(FeedItemKind::CirclePost, 3, user(1), older),
				item(FeedItemKind::IndividualPost, 5, user(1), newer),
				item(FeedItemKind::CirclePost, 9, user(1), newer),
			],
			&BlockSet::default(),
			10,
		);
		let ids = page.items.iter().map(|item| item.id.as_str()).collect::<Vec<_>>();

		// "post-9" > "ipost-5" lexicographically, so it wins the shared instant.
		assert_eq!(ids, vec!["post-9", "ipost-5", "post-3"]);
	}

	#[test]
	fn blocked_actors_are_dropped_regardless_of_source() {
		let at = datetime!(2026-03-01 08:00:00 UTC);
		let blocked = user(2);
		let page = paginate(
			vec![
				item(FeedItemKind::Activity, 1, user(1), at),
				item(FeedItemKind::CirclePost, 2, blocked, at),
				item(FeedItemKind::IndividualPost, 3, blocked, at),
			],
			&BlockSet::new(HashSet::from([blocked])),
			10,
		);

		assert_eq!(page.items.len(), 1);
		assert_eq!(page.items[0].id, "activity-1");
	}

	#[test]
	fn surplus_item_sets_has_more_and_cursor() {
		let page = paginate(
			vec![
				item(FeedItemKind::CirclePost, 1, user(1), datetime!(2026-03-01 09:00:00 UTC)),
				item(FeedItemKind::CirclePost, 2, user(1), datetime!(2026-03-01 08:00:00 UTC)),
			],
			&BlockSet::default(),
			1,
		);

		assert!(page.has_more);

		let cursor = page.next_cursor.expect("cursor for a continued page");

		assert_eq!(cursor.item_id, "post-1");
		assert_eq!(cursor.created_at, datetime!(2026-03-01 09:00:00 UTC));
	}

	#[test]
	fn exact_fit_yields_no_cursor() {
		let page = paginate(
			vec![item(FeedItemKind::CirclePost, 1, user(1), datetime!(2026-03-01 09:00:00 UTC))],
			&BlockSet::default(),
			1,
		);

		assert!(!page.has_more);
		assert!(page.next_cursor.is_none());
	}

	#[test]
	fn merge_is_deterministic_for_identical_input() {
		let build = || {
			vec![
				item(FeedItemKind::Activity, 1, user(1), datetime!(2026-03-01 09:00:00 UTC)),
				item(FeedItemKind::CirclePost, 2, user(2), datetime!(2026-03-01 09:00:00 UTC)),
				item(FeedItemKind::IndividualPost, 3, user(3), datetime!(2026-03-01 07:00:00 UTC)),
			]
		};
		let first = paginate(build(), &BlockSet::default(), 2);
		let second = paginate(build(), &BlockSet::default(), 2);

		assert_eq!(first, second);
	}
}
