use std::sync::Arc;

use pulse_service::{FeedService, Stores};
use pulse_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FeedService>,
}
impl AppState {
	pub async fn new(config: pulse_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let stores = Stores::postgres(Arc::new(db));

		Ok(Self::with_service(FeedService::new(config, stores)))
	}

	/// Wires the app onto an already-built service; tests use this to swap
	/// in in-memory stores.
	pub fn with_service(service: FeedService) -> Self {
		Self { service: Arc::new(service) }
	}
}
