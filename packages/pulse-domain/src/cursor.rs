use time::{OffsetDateTime, format_description::well_known::Rfc3339};

#[derive(Debug, thiserror::Error)]
pub enum CursorError {
	#[error("Cursor is missing the separator.")]
	MissingSeparator,
	#[error("Cursor timestamp is not a valid RFC 3339 instant.")]
	InvalidTimestamp,
	#[error("Cursor item id is empty.")]
	EmptyItemId,
}

/// Pagination token: the last-seen item's instant and synthesized id. The
/// encoding is an implementation detail of the merge layer; clients must
/// treat the string as opaque. Every item on the page after a cursor is
/// strictly older than `created_at`, or shares it with a lexicographically
/// smaller id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cursor {
	pub created_at: OffsetDateTime,
	pub item_id: String,
}
impl Cursor {
	pub fn encode(&self) -> String {
		// An unformattable instant yields an unparsable token, which the
		// next request downgrades to "no cursor".
		let formatted = self.created_at.format(&Rfc3339).unwrap_or_default();

		format!("{formatted}|{}", self.item_id)
	}

	pub fn parse(raw: &str) -> Result<Self, CursorError> {
		let (timestamp, item_id) = raw.split_once('|').ok_or(CursorError::MissingSeparator)?;
		let created_at =
			OffsetDateTime::parse(timestamp, &Rfc3339).map_err(|_| CursorError::InvalidTimestamp)?;

		if item_id.is_empty() {
			return Err(CursorError::EmptyItemId);
		}

		Ok(Self { created_at, item_id: item_id.to_string() })
	}
}
