use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub feed: Feed,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Feed {
	/// Page size used when the request does not specify a limit.
	#[serde(default = "default_page_size")]
	pub default_page_size: u32,
	/// Hard upper bound the request limit is clamped to.
	#[serde(default = "default_max_page_size")]
	pub max_page_size: u32,
	/// TTL of the per-user social-graph cache. Zero disables caching. Block
	/// lists are never cached regardless of this value.
	#[serde(default = "default_graph_cache_ttl_secs")]
	pub graph_cache_ttl_secs: u64,
	/// Featured badges attached to each feed actor.
	#[serde(default = "default_featured_badge_limit")]
	pub featured_badge_limit: usize,
}

fn default_page_size() -> u32 {
	20
}

fn default_max_page_size() -> u32 {
	50
}

fn default_graph_cache_ttl_secs() -> u64 {
	300
}

fn default_featured_badge_limit() -> usize {
	3
}
