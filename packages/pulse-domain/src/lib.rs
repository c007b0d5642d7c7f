pub mod cursor;
pub mod feed;
pub mod graph;
pub mod time_serde;
pub mod visibility;

pub use cursor::{Cursor, CursorError};
pub use feed::{ActorBadge, FeedItem, FeedItemKind, FeedPage, paginate};
pub use graph::{BlockSet, CircleRef, SocialGraph};
pub use visibility::{RelationshipView, ResolvedRelationship, Visibility, can_view};
