//! Depth-first route resolution.
//!
//! Resolving is a pure function over an immutable route tree and a
//! pathname: siblings are tried in declaration order, branches recurse
//! before falling through, and the first tree branch yielding any leaf
//! match wins. There is no specificity scoring; authors order
//! more-specific routes before catch-alls.

use std::collections::HashMap;

use crate::pattern::PathPattern;
use crate::route::Route;

/// The result of resolving a pathname against a route tree.
///
/// Produced fresh on every resolution; nothing is cached here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
	/// Child indices describing the traversal from the tree root to the
	/// matched leaf, one index per nesting level.
	pub path: Vec<usize>,
	/// The pathname that was resolved.
	pub pathname: String,
	/// The matched leaf's full template, rooted at `/`.
	pub routename: String,
	/// Parameter bindings extracted from the pathname. A wildcard capture
	/// is stored under `"*"`.
	pub params: HashMap<String, String>,
}

/// Resolves `pathname` against an ordered route tree.
///
/// Returns `None` when no leaf matches; callers render a fallback by
/// declaring an explicit catch-all leaf (conventionally a trailing `*`
/// route at the end of the top-level list).
///
/// Leaves whose joined template fails to compile are skipped with a
/// warning; [`crate::Routes::new`] rejects such trees up front.
pub fn match_route(routes: &[Route], pathname: &str) -> Option<RouteMatch> {
	let found = match_level(routes, pathname, "");
	if let Some(ref m) = found {
		tracing::debug!(pathname, routename = %m.routename, "resolved route");
	}
	found
}

fn match_level(routes: &[Route], pathname: &str, prefix: &str) -> Option<RouteMatch> {
	for (index, route) in routes.iter().enumerate() {
		let current = join_path(prefix, route.segment().unwrap_or(""));

		if !route.children().is_empty() {
			let Some(mut found) = match_level(route.children(), pathname, &current) else {
				continue;
			};
			found.path.insert(0, index);
			return Some(found);
		}

		let routename = rooted(current);
		let pattern = match PathPattern::new(&routename) {
			Ok(pattern) => pattern,
			Err(error) => {
				tracing::warn!(%routename, %error, "skipping leaf with invalid template");
				continue;
			}
		};
		let Some(params) = pattern.matches(pathname) else {
			continue;
		};

		return Some(RouteMatch {
			path: vec![index],
			pathname: pathname.to_string(),
			routename,
			params,
		});
	}

	None
}

/// Joins a prefix and a segment with exactly one slash between them.
///
/// Strips one trailing slash from the prefix and one leading slash from
/// the segment, dropping an empty side entirely. Interior repeated
/// slashes are preserved as-is.
pub(crate) fn join_path(prefix: &str, segment: &str) -> String {
	let head = prefix.strip_suffix('/').unwrap_or(prefix);
	let tail = segment.strip_prefix('/').unwrap_or(segment);

	match (head.is_empty(), tail.is_empty()) {
		(true, _) => tail.to_string(),
		(_, true) => head.to_string(),
		(false, false) => format!("{head}/{tail}"),
	}
}

/// Ensures a leaf template starts at the path root.
pub(crate) fn rooted(path: String) -> String {
	if path.starts_with('/') {
		path
	} else {
		format!("/{path}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_first_match_wins_over_specificity() {
		// The dynamic leaf is declared first, so it wins even though the
		// literal sibling matches the same pathname more specifically.
		let routes = vec![Route::path("users/:id"), Route::path("users/special")];

		let matched = match_route(&routes, "/users/special").unwrap();
		assert_eq!(matched.path, vec![0]);
		assert_eq!(matched.params.get("id"), Some(&"special".to_string()));
	}

	#[test]
	fn test_declaration_order_across_branches() {
		// The first branch yielding any leaf match wins; the later,
		// more specific branch is never consulted.
		let routes = vec![
			Route::path("docs").child(Route::path(":page")),
			Route::path("docs").child(Route::path("intro")),
		];

		let matched = match_route(&routes, "/docs/intro").unwrap();
		assert_eq!(matched.path, vec![0, 0]);
	}

	#[test]
	fn test_branch_failure_falls_through_to_sibling() {
		let routes = vec![
			Route::path("admin").child(Route::path("audit")),
			Route::path("admin").child(Route::path(":section")),
		];

		let matched = match_route(&routes, "/admin/users").unwrap();
		assert_eq!(matched.path, vec![1, 0]);
		assert_eq!(matched.params.get("section"), Some(&"users".to_string()));
	}

	#[test]
	fn test_index_matches_branch_prefix_exactly() {
		let routes = vec![
			Route::path("dashboard").with_children([Route::index(), Route::path("settings")]),
		];

		let matched = match_route(&routes, "/dashboard").unwrap();
		assert_eq!(matched.path, vec![0, 0]);
		assert_eq!(matched.routename, "/dashboard");

		let matched = match_route(&routes, "/dashboard/settings").unwrap();
		assert_eq!(matched.path, vec![0, 1]);

		assert!(match_route(&routes, "/dashboard/other").is_none());
	}

	#[test]
	fn test_index_under_dynamic_branch_keeps_params() {
		let routes = vec![Route::path("users/:user_id").child(Route::index())];

		let matched = match_route(&routes, "/users/42").unwrap();
		assert_eq!(matched.path, vec![0, 0]);
		assert_eq!(matched.params.get("user_id"), Some(&"42".to_string()));
	}

	#[test]
	fn test_root_index() {
		let routes = vec![Route::group().with_children([Route::index(), Route::path("about")])];

		let matched = match_route(&routes, "/").unwrap();
		assert_eq!(matched.path, vec![0, 0]);
		assert_eq!(matched.routename, "/");
	}

	#[test]
	fn test_no_match_propagates_as_none() {
		let routes = vec![
			Route::path("/"),
			Route::path("dashboard"),
			Route::path("users/:userId"),
		];

		assert!(match_route(&routes, "/does/not/exist").is_none());
	}

	#[test]
	fn test_wildcard_leaf_captures_rest() {
		let routes = vec![Route::path("files").child(Route::path("*"))];

		let matched = match_route(&routes, "/files/a/b/c").unwrap();
		assert_eq!(matched.path, vec![0, 0]);
		assert_eq!(matched.params.get("*"), Some(&"a/b/c".to_string()));
	}

	#[test]
	fn test_catch_all_ordering_convention() {
		let routes = vec![
			Route::path("/"),
			Route::path("users/:id"),
			Route::path("*"),
		];

		let matched = match_route(&routes, "/missing/page").unwrap();
		assert_eq!(matched.path, vec![2]);
		assert_eq!(matched.params.get("*"), Some(&"missing/page".to_string()));

		// Earlier, more specific declarations still win.
		let matched = match_route(&routes, "/users/7").unwrap();
		assert_eq!(matched.path, vec![1]);
	}

	#[test]
	fn test_join_strips_exactly_one_slash() {
		assert_eq!(join_path("users/", "/:id"), "users/:id");
		assert_eq!(join_path("users", ":id"), "users/:id");
		assert_eq!(join_path("", "users"), "users");
		assert_eq!(join_path("users", ""), "users");
		assert_eq!(join_path("", "/"), "");
	}

	#[test]
	fn test_join_preserves_interior_slashes() {
		assert_eq!(join_path("a//b/", "/c"), "a//b/c");

		let routes = vec![Route::path("a//b")];
		assert!(match_route(&routes, "/a//b").is_some());
		assert!(match_route(&routes, "/a/b").is_none());
	}

	#[test]
	fn test_deep_nesting_traversal_path() {
		let routes = vec![
			Route::path("misc"),
			Route::group().with_children([
				Route::path("api").with_children([
					Route::path("v1").with_children([Route::path("users/:id"), Route::path("posts")]),
				]),
			]),
		];

		let matched = match_route(&routes, "/api/v1/posts").unwrap();
		assert_eq!(matched.path, vec![1, 0, 0, 1]);
		assert_eq!(matched.routename, "/api/v1/posts");
	}
}
