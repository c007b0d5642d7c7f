use std::collections::HashSet;

use uuid::Uuid;

use crate::visibility::RelationshipView;

/// A circle the graph owner belongs to.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CircleRef {
	pub id: Uuid,
	pub name: String,
}

/// The set of user ids relevant to one viewer's visibility decisions,
/// resolved once per request (or served from a short-lived cache). None of
/// the sets ever contain the owner's own id.
#[derive(Clone, Debug, Default)]
pub struct SocialGraph {
	pub owner_id: Uuid,
	pub following_ids: HashSet<Uuid>,
	pub follower_ids: HashSet<Uuid>,
	pub connection_ids: HashSet<Uuid>,
	pub circle_mate_ids: HashSet<Uuid>,
	pub all_visible_user_ids: HashSet<Uuid>,
	pub circles: Vec<CircleRef>,
}
impl SocialGraph {
	pub fn new(
		owner_id: Uuid,
		following_ids: HashSet<Uuid>,
		follower_ids: HashSet<Uuid>,
		connection_ids: HashSet<Uuid>,
		circle_mate_ids: HashSet<Uuid>,
		circles: Vec<CircleRef>,
	) -> Self {
		let mut graph = Self {
			owner_id,
			following_ids,
			follower_ids,
			connection_ids,
			circle_mate_ids,
			all_visible_user_ids: HashSet::new(),
			circles,
		};

		graph.following_ids.remove(&owner_id);
		graph.follower_ids.remove(&owner_id);
		graph.connection_ids.remove(&owner_id);
		graph.circle_mate_ids.remove(&owner_id);

		graph.all_visible_user_ids = graph
			.following_ids
			.iter()
			.chain(&graph.follower_ids)
			.chain(&graph.connection_ids)
			.chain(&graph.circle_mate_ids)
			.copied()
			.collect();

		graph
	}

	pub fn circle_ids(&self) -> Vec<Uuid> {
		self.circles.iter().map(|circle| circle.id).collect()
	}

	pub fn circle_name(&self, circle_id: Uuid) -> Option<&str> {
		self.circles
			.iter()
			.find(|circle| circle.id == circle_id)
			.map(|circle| circle.name.as_str())
	}
}
impl RelationshipView for SocialGraph {
	fn follows(&self, author_id: Uuid) -> bool {
		self.following_ids.contains(&author_id)
	}

	fn connected(&self, author_id: Uuid) -> bool {
		self.connection_ids.contains(&author_id)
	}
}

/// Users with a blocking relationship (either direction) with one viewer.
/// Always resolved fresh; blocking must take effect immediately.
#[derive(Clone, Debug, Default)]
pub struct BlockSet {
	blocked_user_ids: HashSet<Uuid>,
}
impl BlockSet {
	pub fn new(blocked_user_ids: HashSet<Uuid>) -> Self {
		Self { blocked_user_ids }
	}

	pub fn contains(&self, user_id: Uuid) -> bool {
		self.blocked_user_ids.contains(&user_id)
	}
}
