use uuid::Uuid;

use crate::graph::BlockSet;

/// Audience of an individual post. Circle posts are implicitly scoped to
/// circle membership and activity entries to their owner; neither carries
/// one of these modes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
	Public,
	Followers,
	Connections,
	Private,
}
impl Visibility {
	/// Unknown modes map to `None`; callers treat that as not visible.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"public" => Some(Self::Public),
			"followers" => Some(Self::Followers),
			"connections" => Some(Self::Connections),
			"private" => Some(Self::Private),
			_ => None,
		}
	}
}

/// Relationship predicates between the viewer and one author. The feed path
/// backs this with the resolved social-graph sets; the single-post path backs
/// it with fresh existence queries. Both run the same `can_view`.
pub trait RelationshipView {
	fn follows(&self, author_id: Uuid) -> bool;
	fn connected(&self, author_id: Uuid) -> bool;
}

/// Relationship facts resolved directly from the store for one
/// (viewer, author) pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolvedRelationship {
	pub follows_author: bool,
	pub connected_to_author: bool,
}
impl RelationshipView for ResolvedRelationship {
	fn follows(&self, _author_id: Uuid) -> bool {
		self.follows_author
	}

	fn connected(&self, _author_id: Uuid) -> bool {
		self.connected_to_author
	}
}

/// Whether `viewer` may see content with `visibility` authored by `author`.
/// Rules apply in order; the first match wins. Blocking overrides everything
/// below it, including `public`.
pub fn can_view<R>(
	viewer: Option<Uuid>,
	author: Uuid,
	visibility: Visibility,
	blocks: &BlockSet,
	rel: &R,
) -> bool
where
	R: RelationshipView + ?Sized,
{
	if viewer == Some(author) {
		return true;
	}
	if visibility == Visibility::Private {
		return false;
	}
	if blocks.contains(author) {
		return false;
	}
	if visibility == Visibility::Public {
		return true;
	}
	if viewer.is_none() {
		return false;
	}

	match visibility {
		Visibility::Followers => rel.follows(author),
		Visibility::Connections => rel.connected(author),
		// Already decided above; default deny.
		Visibility::Public | Visibility::Private => false,
	}
}
