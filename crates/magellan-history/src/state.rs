//! Per-entry state carried in the host's opaque state slot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Position-index state attached to every history entry this crate
/// produces.
///
/// The index is the sole source of truth for computing the navigation
/// delta on pop events, since the host mechanism does not report how many
/// entries a back/forward gesture traversed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryState {
	/// Position of the entry within the session.
	pub idx: i64,
}

impl EntryState {
	/// Creates a state for the given position index.
	pub fn new(idx: i64) -> Self {
		Self { idx }
	}

	/// Reads an entry state out of the host's opaque state slot.
	///
	/// Entries produced outside this crate may carry any shape, or none
	/// at all; both default to index 0.
	pub fn from_value(value: Option<&Value>) -> Self {
		value
			.and_then(|v| serde_json::from_value(v.clone()).ok())
			.unwrap_or_default()
	}

	/// Serializes this state into the shape stored in the host slot.
	pub fn to_value(self) -> Value {
		serde_json::json!({ "idx": self.idx })
	}
}
