use std::sync::Arc;

use pulse_service::{FeedQuery, FeedService, ServiceError, Session};
use pulse_testkit::{MemoryStores, test_config, ts, user_id};

fn service(stores: &Arc<MemoryStores>) -> FeedService {
	FeedService::new(test_config(), stores.stores())
}

fn uncached_service(stores: &Arc<MemoryStores>) -> FeedService {
	let mut cfg = test_config();

	cfg.feed.graph_cache_ttl_secs = 0;

	FeedService::new(cfg, stores.stores())
}

fn session(user: uuid::Uuid, display_name: &str) -> Session {
	Session { user_id: user, display_name: display_name.to_string() }
}

fn query(cursor: Option<&str>, limit: Option<u32>) -> FeedQuery {
	FeedQuery { cursor: cursor.map(str::to_string), limit }
}

#[tokio::test]
async fn blocked_author_is_absent_even_when_public() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);
	let followed = user_id(2);
	let blocker = user_id(3);

	stores.add_user(viewer, "Val");
	stores.add_user(followed, "Ana");
	stores.add_user(blocker, "Bo");
	stores.follow(viewer, followed);
	stores.block(blocker, viewer);
	stores.add_individual_post(10, followed, "followers", "tempo run", ts(100));
	stores.add_individual_post(11, blocker, "public", "new pr", ts(99));

	let service = service(&stores);
	let page = service.feed(&session(viewer, "Val"), query(None, None)).await.expect("feed");
	let ids = page.items.iter().map(|item| item.id.as_str()).collect::<Vec<_>>();

	assert_eq!(ids, vec!["ipost-10"]);
}

#[tokio::test]
async fn zero_circle_memberships_issue_no_circle_post_query() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);

	stores.add_user(viewer, "Val");
	stores.add_activity(1, viewer, "workout_completed", ts(50));
	stores.add_individual_post(2, viewer, "private", "note to self", ts(40));

	let service = service(&stores);
	let page = service.feed(&session(viewer, "Val"), query(None, None)).await.expect("feed");

	assert_eq!(stores.counts().circle_post_queries(), 0);

	let ids = page.items.iter().map(|item| item.id.as_str()).collect::<Vec<_>>();

	assert_eq!(ids, vec!["activity-1", "ipost-2"]);
}

#[tokio::test]
async fn graph_is_cached_but_blocks_stay_fresh() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);

	stores.add_user(viewer, "Val");

	let service = service(&stores);
	let viewer_session = session(viewer, "Val");

	service.feed(&viewer_session, query(None, None)).await.expect("first feed");

	// Four relationship views, no circle-mate query without circles.
	assert_eq!(stores.counts().relationship_queries(), 4);
	assert_eq!(stores.counts().block_queries(), 1);

	service.feed(&viewer_session, query(None, None)).await.expect("second feed");

	// The graph came from the cache; blocking was re-resolved.
	assert_eq!(stores.counts().relationship_queries(), 4);
	assert_eq!(stores.counts().block_queries(), 2);
}

#[tokio::test]
async fn zero_ttl_disables_the_graph_cache() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);

	stores.add_user(viewer, "Val");

	let service = uncached_service(&stores);
	let viewer_session = session(viewer, "Val");

	service.feed(&viewer_session, query(None, None)).await.expect("first feed");
	service.feed(&viewer_session, query(None, None)).await.expect("second feed");

	assert_eq!(stores.counts().relationship_queries(), 8);
}

#[tokio::test]
async fn cursor_walk_visits_every_item_once_strictly_older_each_page() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);
	let mate = user_id(2);
	let stranger = user_id(3);
	let circle = user_id(40);

	stores.add_user(viewer, "Val");
	stores.add_user(mate, "Mia");
	stores.add_user(stranger, "Sol");
	stores.add_circle(circle, "Trail Crew");
	stores.join_circle(circle, viewer);
	stores.join_circle(circle, mate);
	stores.add_activity(1, viewer, "workout_completed", ts(50));
	stores.add_activity(2, viewer, "badge_earned", ts(40));
	stores.add_circle_post(3, circle, mate, "hill repeats", ts(30));
	stores.add_individual_post(4, viewer, "private", "drafting", ts(20));
	stores.add_individual_post(5, stranger, "public", "race day", ts(10));

	let service = service(&stores);
	let viewer_session = session(viewer, "Val");
	let mut cursor: Option<String> = None;
	let mut seen = Vec::new();
	let mut last_created_at: Option<time::OffsetDateTime> = None;

	loop {
		let page = service
			.feed(&viewer_session, query(cursor.as_deref(), Some(2)))
			.await
			.expect("feed page");

		assert!(page.items.len() <= 2);

		for item in &page.items {
			if let Some(last) = last_created_at {
				assert!(item.created_at < last, "page boundary must move strictly older");
			}

			seen.push(item.id.clone());
		}

		last_created_at = page.items.last().map(|item| item.created_at);

		if !page.has_more {
			assert!(page.next_cursor.is_none());

			break;
		}

		cursor = Some(page.next_cursor.expect("cursor accompanies has_more"));
	}

	assert_eq!(seen, vec!["activity-1", "activity-2", "post-3", "ipost-4", "ipost-5"]);
}

#[tokio::test]
async fn refetching_the_same_cursor_is_idempotent() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);

	stores.add_user(viewer, "Val");

	for i in 0..4 {
		stores.add_activity(i, viewer, "workout_completed", ts(100 - i));
	}

	let service = service(&stores);
	let viewer_session = session(viewer, "Val");
	let first = service.feed(&viewer_session, query(None, Some(2))).await.expect("first page");
	let cursor = first.next_cursor.expect("more pages");
	let second_a =
		service.feed(&viewer_session, query(Some(&cursor), Some(2))).await.expect("second page");
	let second_b =
		service.feed(&viewer_session, query(Some(&cursor), Some(2))).await.expect("replayed page");

	assert_eq!(
		serde_json::to_value(&second_a).expect("serializes"),
		serde_json::to_value(&second_b).expect("serializes"),
	);
}

#[tokio::test]
async fn coarse_prefilter_rows_are_trimmed_by_the_evaluator() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);
	let follower = user_id(2);

	stores.add_user(viewer, "Val");
	stores.add_user(follower, "Fay");
	// Fay follows Val, which puts her in the visible-user union; Val does
	// not follow back, so her followers-only post must still be trimmed.
	stores.follow(follower, viewer);
	stores.add_individual_post(7, follower, "followers", "easy spin", ts(10));

	let service = service(&stores);
	let page = service.feed(&session(viewer, "Val"), query(None, None)).await.expect("feed");

	assert!(page.items.is_empty());
}

#[tokio::test]
async fn connections_posts_are_visible_to_connections_in_feed() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);
	let friend = user_id(2);

	stores.add_user(viewer, "Val");
	stores.add_user(friend, "Cam");
	stores.connect(viewer, friend);
	stores.add_individual_post(8, friend, "connections", "long ride sunday?", ts(10));

	let service = service(&stores);
	let page = service.feed(&session(viewer, "Val"), query(None, None)).await.expect("feed");
	let ids = page.items.iter().map(|item| item.id.as_str()).collect::<Vec<_>>();

	assert_eq!(ids, vec!["ipost-8"]);
}

#[tokio::test]
async fn missing_profiles_fall_back_without_dropping_items() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);
	let mate = user_id(2);
	let circle = user_id(40);

	// Neither the viewer nor the mate has a profile row.
	stores.add_circle(circle, "Trail Crew");
	stores.join_circle(circle, viewer);
	stores.join_circle(circle, mate);
	stores.add_activity(1, viewer, "workout_completed", ts(20));
	stores.add_circle_post(2, circle, mate, "intervals", ts(10));

	let service = service(&stores);
	let page = service.feed(&session(viewer, "Val"), query(None, None)).await.expect("feed");

	assert_eq!(page.items.len(), 2);
	// The viewer's own item renders with the session name, the dangling
	// actor with the generic fallback.
	assert_eq!(page.items[0].actor_display_name, "Val");
	assert_eq!(page.items[1].actor_display_name, "Unknown");
	assert_eq!(page.items[1].circle_name.as_deref(), Some("Trail Crew"));
}

#[tokio::test]
async fn featured_badges_are_capped_at_three_in_display_order() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);
	let author = user_id(2);

	stores.add_user(viewer, "Val");
	stores.add_user(author, "Ana");
	stores.follow(viewer, author);
	stores.add_featured_badge(author, "100 Workouts", 0);
	stores.add_featured_badge(author, "Early Bird", 1);
	stores.add_featured_badge(author, "Streak 30", 2);
	stores.add_featured_badge(author, "Marathon", 3);
	stores.add_badge(author, "Hidden", false, -1);
	stores.add_individual_post(5, author, "followers", "shakeout jog", ts(10));

	let service = service(&stores);
	let page = service.feed(&session(viewer, "Val"), query(None, None)).await.expect("feed");
	let labels = page.items[0]
		.actor_badges
		.iter()
		.map(|badge| badge.label.as_str())
		.collect::<Vec<_>>();

	assert_eq!(labels, vec!["100 Workouts", "Early Bird", "Streak 30"]);
}

#[tokio::test]
async fn viewer_like_state_is_resolved_per_source() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);
	let mate = user_id(2);
	let circle = user_id(40);

	stores.add_user(viewer, "Val");
	stores.add_user(mate, "Mia");
	stores.add_circle(circle, "Trail Crew");
	stores.join_circle(circle, viewer);
	stores.join_circle(circle, mate);
	stores.add_circle_post(3, circle, mate, "hill repeats", ts(30));
	stores.add_individual_post(3, viewer, "private", "untouched", ts(20));
	stores.like_circle_post(3, viewer);

	let service = service(&stores);
	let page = service.feed(&session(viewer, "Val"), query(None, None)).await.expect("feed");
	let liked = page
		.items
		.iter()
		.map(|item| (item.id.as_str(), item.viewer_has_liked))
		.collect::<Vec<_>>();

	// Same row id in both like tables must not bleed across sources.
	assert_eq!(liked, vec![("post-3", true), ("ipost-3", false)]);
}

#[tokio::test]
async fn malformed_cursor_restarts_from_the_newest_page() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);

	stores.add_user(viewer, "Val");
	stores.add_activity(1, viewer, "workout_completed", ts(50));

	let service = service(&stores);
	let viewer_session = session(viewer, "Val");
	let fresh = service.feed(&viewer_session, query(None, None)).await.expect("feed");
	let garbled =
		service.feed(&viewer_session, query(Some("not|a|real|cursor"), None)).await.expect("feed");

	assert_eq!(
		serde_json::to_value(&fresh).expect("serializes"),
		serde_json::to_value(&garbled).expect("serializes"),
	);
}

#[tokio::test]
async fn limit_is_clamped_to_the_configured_bounds() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);

	stores.add_user(viewer, "Val");

	for i in 0..60 {
		stores.add_activity(i, viewer, "workout_completed", ts(1_000 - i));
	}

	let service = service(&stores);
	let viewer_session = session(viewer, "Val");
	let oversized = service.feed(&viewer_session, query(None, Some(500))).await.expect("feed");

	assert_eq!(oversized.items.len(), 50);
	assert!(oversized.has_more);

	let undersized = service.feed(&viewer_session, query(None, Some(0))).await.expect("feed");

	assert_eq!(undersized.items.len(), 1);
	assert!(undersized.has_more);
}

#[tokio::test]
async fn a_failing_store_fails_the_whole_request() {
	let stores = MemoryStores::new();
	let viewer = user_id(1);

	stores.add_user(viewer, "Val");
	stores.add_activity(1, viewer, "workout_completed", ts(50));
	stores.set_failing(true);

	let service = service(&stores);
	let err = service
		.feed(&session(viewer, "Val"), query(None, None))
		.await
		.expect_err("feed must not degrade to a partial page");

	assert!(matches!(err, ServiceError::Storage(_)));
}
