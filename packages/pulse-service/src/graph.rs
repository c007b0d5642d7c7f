use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
	time::{Duration, Instant},
};

use uuid::Uuid;

use pulse_domain::{BlockSet, CircleRef, SocialGraph};

use crate::{FeedService, ServiceResult};

/// Per-user social-graph cache with TTL-only expiry and last-writer-wins
/// overwrite. Staleness up to the TTL is acceptable for inclusion decisions;
/// exclusion decisions (blocking) never read from here.
pub(crate) struct GraphCache {
	ttl: Duration,
	entries: Mutex<HashMap<Uuid, CacheEntry>>,
}

struct CacheEntry {
	resolved_at: Instant,
	graph: Arc<SocialGraph>,
}

impl GraphCache {
	pub(crate) fn new(ttl_secs: u64) -> Self {
		Self { ttl: Duration::from_secs(ttl_secs), entries: Mutex::new(HashMap::new()) }
	}

	fn get(&self, user_id: Uuid) -> Option<Arc<SocialGraph>> {
		if self.ttl.is_zero() {
			return None;
		}

		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries
			.get(&user_id)
			.filter(|entry| entry.resolved_at.elapsed() < self.ttl)
			.map(|entry| entry.graph.clone())
	}

	fn put(&self, user_id: Uuid, graph: Arc<SocialGraph>) {
		if self.ttl.is_zero() {
			return;
		}

		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.insert(user_id, CacheEntry { resolved_at: Instant::now(), graph });
	}
}

impl FeedService {
	/// Resolves the viewer's social graph, serving from the cache when a
	/// fresh-enough entry exists. The four relationship views are fetched
	/// concurrently; circle co-members need the circle list first and are
	/// only queried when the viewer belongs to at least one circle.
	pub async fn resolve_graph(&self, user_id: Uuid) -> ServiceResult<Arc<SocialGraph>> {
		if let Some(graph) = self.graph_cache.get(user_id) {
			return Ok(graph);
		}

		let relationships = &self.stores().relationships;
		let (following, followers, connections, memberships) = tokio::try_join!(
			relationships.following_ids(user_id),
			relationships.follower_ids(user_id),
			relationships.connection_ids(user_id),
			relationships.circle_memberships(user_id),
		)?;
		let circle_ids = memberships.iter().map(|circle| circle.circle_id).collect::<Vec<_>>();
		let circle_mates = if circle_ids.is_empty() {
			Vec::new()
		} else {
			relationships.circle_mate_ids(&circle_ids, user_id).await?
		};
		let circles = memberships
			.into_iter()
			.map(|circle| CircleRef { id: circle.circle_id, name: circle.name })
			.collect();
		let graph = Arc::new(SocialGraph::new(
			user_id,
			following.into_iter().collect(),
			followers.into_iter().collect(),
			connections.into_iter().collect(),
			circle_mates.into_iter().collect(),
			circles,
		));

		self.graph_cache.put(user_id, graph.clone());

		Ok(graph)
	}

	/// Blocking must take effect immediately, so this always hits the store.
	pub async fn resolve_blocks(&self, user_id: Uuid) -> ServiceResult<BlockSet> {
		let blocked = self.stores().relationships.blocked_ids(user_id).await?;

		Ok(BlockSet::new(blocked.into_iter().collect()))
	}
}
