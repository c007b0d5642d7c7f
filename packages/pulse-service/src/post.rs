use pulse_domain::{FeedItem, ResolvedRelationship, Visibility, can_view};

use crate::{FeedService, ServiceError, ServiceResult, Session, feed::normalize_individual_post};

impl FeedService {
	/// Standalone visibility-checked read of one individual post. Unlike the
	/// feed path, the follower/connection checks hit the store directly
	/// instead of the cached graph; an access-control decision for a single
	/// post does not get to be stale. Posts the viewer may not see are
	/// indistinguishable from posts that do not exist.
	pub async fn individual_post(
		&self,
		session: &Session,
		post_id: i64,
	) -> ServiceResult<FeedItem> {
		let viewer_id = session.user_id;
		let Some(row) = self.stores().content.individual_post(post_id).await? else {
			return Err(ServiceError::NotFound(format!("post {post_id}")));
		};
		let Some(visibility) = Visibility::parse(&row.visibility) else {
			return Err(ServiceError::NotFound(format!("post {post_id}")));
		};
		let relationships = &self.stores().relationships;
		let relationship = match visibility {
			Visibility::Followers => ResolvedRelationship {
				follows_author: relationships.follow_exists(viewer_id, row.author_id).await?,
				connected_to_author: false,
			},
			Visibility::Connections => ResolvedRelationship {
				follows_author: false,
				connected_to_author: relationships
					.connection_exists(viewer_id, row.author_id)
					.await?,
			},
			Visibility::Public | Visibility::Private => ResolvedRelationship::default(),
		};
		let blocks = self.resolve_blocks(viewer_id).await?;

		if !can_view(Some(viewer_id), row.author_id, visibility, &blocks, &relationship) {
			return Err(ServiceError::NotFound(format!("post {post_id}")));
		}

		let enrichment = self.enrich(session, &[], &[], std::slice::from_ref(&row)).await?;

		Ok(normalize_individual_post(row, &enrichment))
	}
}
