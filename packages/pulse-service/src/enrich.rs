use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use pulse_domain::ActorBadge;
use pulse_storage::models::{ActivityRow, CirclePostRow, IndividualPostRow, ProfileRow};

use crate::{FeedService, ServiceResult, Session};

/// Batch-resolved display data for every actor and post on a page: profiles,
/// featured badges (capped per user), and the viewer's like state.
pub(crate) struct Enrichment {
	viewer: Session,
	profiles: HashMap<Uuid, ProfileRow>,
	badges: HashMap<Uuid, Vec<ActorBadge>>,
	liked_circle_posts: HashSet<i64>,
	liked_individual_posts: HashSet<i64>,
}
impl Enrichment {
	/// Missing profiles never fail enrichment; the item is rendered with the
	/// session's own name (for the viewer) or a generic fallback.
	pub(crate) fn display_name(&self, actor_id: Uuid) -> String {
		if let Some(profile) = self.profiles.get(&actor_id) {
			return profile.display_name.clone();
		}
		if actor_id == self.viewer.user_id {
			return self.viewer.display_name.clone();
		}

		"Unknown".to_string()
	}

	pub(crate) fn profile_picture(&self, actor_id: Uuid) -> Option<String> {
		self.profiles.get(&actor_id).and_then(|profile| profile.profile_picture.clone())
	}

	pub(crate) fn badges(&self, actor_id: Uuid) -> Vec<ActorBadge> {
		self.badges.get(&actor_id).cloned().unwrap_or_default()
	}

	pub(crate) fn has_liked_circle_post(&self, post_id: i64) -> bool {
		self.liked_circle_posts.contains(&post_id)
	}

	pub(crate) fn has_liked_individual_post(&self, post_id: i64) -> bool {
		self.liked_individual_posts.contains(&post_id)
	}
}

impl FeedService {
	pub(crate) async fn enrich(
		&self,
		session: &Session,
		activities: &[ActivityRow],
		circle_posts: &[CirclePostRow],
		individual_posts: &[IndividualPostRow],
	) -> ServiceResult<Enrichment> {
		let actor_ids = activities
			.iter()
			.map(|row| row.user_id)
			.chain(circle_posts.iter().map(|row| row.author_id))
			.chain(individual_posts.iter().map(|row| row.author_id))
			.collect::<HashSet<_>>()
			.into_iter()
			.collect::<Vec<_>>();
		let circle_post_ids = circle_posts.iter().map(|row| row.post_id).collect::<Vec<_>>();
		let individual_post_ids =
			individual_posts.iter().map(|row| row.post_id).collect::<Vec<_>>();
		let profiles = &self.stores().profiles;
		let likes = &self.stores().likes;
		let viewer_id = session.user_id;
		let (profile_rows, badge_rows, liked_circle, liked_individual) = tokio::try_join!(
			async {
				if actor_ids.is_empty() {
					Ok(Vec::new())
				} else {
					profiles.profiles(&actor_ids).await
				}
			},
			async {
				if actor_ids.is_empty() {
					Ok(Vec::new())
				} else {
					profiles.featured_badges(&actor_ids).await
				}
			},
			async {
				if circle_post_ids.is_empty() {
					Ok(Vec::new())
				} else {
					likes.liked_circle_posts(viewer_id, &circle_post_ids).await
				}
			},
			async {
				if individual_post_ids.is_empty() {
					Ok(Vec::new())
				} else {
					likes.liked_individual_posts(viewer_id, &individual_post_ids).await
				}
			},
		)?;
		let badge_limit = self.cfg.feed.featured_badge_limit;
		let mut badges: HashMap<Uuid, Vec<ActorBadge>> = HashMap::new();

		// Rows arrive ordered by (user, display_order); the per-user cap is
		// applied here rather than in SQL.
		for row in badge_rows {
			let entry = badges.entry(row.user_id).or_default();

			if entry.len() < badge_limit {
				entry.push(ActorBadge { label: row.label, icon_url: row.icon_url });
			}
		}

		Ok(Enrichment {
			viewer: session.clone(),
			profiles: profile_rows.into_iter().map(|row| (row.user_id, row)).collect(),
			badges,
			liked_circle_posts: liked_circle.into_iter().collect(),
			liked_individual_posts: liked_individual.into_iter().collect(),
		})
	}
}
