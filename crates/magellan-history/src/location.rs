//! URL location snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A snapshot of the current URL at the time of a navigation event.
///
/// Recreated on every event and never mutated in place. `search` keeps
/// its leading `?` and `hash` its leading `#` when non-empty, matching
/// host location conventions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
	/// The path portion of the URL, e.g. `/users/42`.
	pub pathname: String,
	/// The query string including its leading `?`, or empty.
	pub search: String,
	/// The fragment including its leading `#`, or empty.
	pub hash: String,
}

impl Location {
	/// Splits a target URL string into its pathname, search and hash
	/// components. The hash is cut at the first `#`, then the search at
	/// the first `?` of what remains.
	pub fn parse(to: &str) -> Self {
		let (rest, hash) = match to.find('#') {
			Some(i) => (&to[..i], &to[i..]),
			None => (to, ""),
		};
		let (pathname, search) = match rest.find('?') {
			Some(i) => (&rest[..i], &rest[i..]),
			None => (rest, ""),
		};

		Self {
			pathname: pathname.to_string(),
			search: search.to_string(),
			hash: hash.to_string(),
		}
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}{}", self.pathname, self.search, self.hash)
	}
}

impl From<&str> for Location {
	fn from(to: &str) -> Self {
		Self::parse(to)
	}
}
