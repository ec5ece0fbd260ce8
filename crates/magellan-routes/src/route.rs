//! Route tree declarations.
//!
//! A route tree is constructed once at application configuration time and
//! is immutable thereafter; the matcher only ever reads it, so a tree can
//! be shared across any number of concurrent resolutions.

use thiserror::Error;

use crate::matcher::{RouteMatch, join_path, match_route, rooted};
use crate::pattern::{PathPattern, PatternError};

/// A node in the route declaration tree.
///
/// A node either contributes a path template segment ([`Route::path`]),
/// marks an index position matching its parent's accumulated path exactly
/// ([`Route::index`]), or is an anonymous structural wrapper
/// ([`Route::group`]). A node with children is a branch grouping its
/// descendants under a shared prefix; a node without children is a leaf
/// the matcher can resolve to.
#[derive(Debug, Clone, Default)]
pub struct Route {
	/// Path template segment this node contributes, if any.
	segment: Option<String>,
	/// Marks a node matching its parent's accumulated path exactly.
	index: bool,
	/// Ordered child nodes.
	children: Vec<Route>,
}

impl Route {
	/// Creates a node contributing `segment` to the matched path.
	///
	/// The segment may mix literal text, `:name` dynamic parameters and a
	/// trailing `*` wildcard; see [`PathPattern`] for the template rules.
	pub fn path(segment: impl Into<String>) -> Self {
		Self {
			segment: Some(segment.into()),
			index: false,
			children: Vec::new(),
		}
	}

	/// Creates an index node.
	///
	/// An index leaf matches if and only if the pathname equals its
	/// parent's accumulated path exactly, with no additional segment.
	pub fn index() -> Self {
		Self {
			segment: None,
			index: true,
			children: Vec::new(),
		}
	}

	/// Creates an anonymous structural node contributing no segment, e.g.
	/// a wrapper grouping several top-level routes.
	pub fn group() -> Self {
		Self::default()
	}

	/// Appends a child node.
	pub fn child(mut self, child: Route) -> Self {
		self.children.push(child);
		self
	}

	/// Appends a sequence of child nodes in order.
	pub fn with_children(mut self, children: impl IntoIterator<Item = Route>) -> Self {
		self.children.extend(children);
		self
	}

	/// Returns the path template segment this node contributes, if any.
	pub fn segment(&self) -> Option<&str> {
		self.segment.as_deref()
	}

	/// Returns whether this is an index node.
	pub fn is_index(&self) -> bool {
		self.index
	}

	/// Returns the ordered child nodes.
	pub fn children(&self) -> &[Route] {
		&self.children
	}
}

/// Error produced when a route tree fails configuration-time validation.
#[derive(Debug, Error)]
pub enum RouteTreeError {
	/// A leaf's joined template failed to compile.
	#[error("route template '{routename}' is invalid")]
	InvalidTemplate {
		/// The full leaf template, rooted at `/`.
		routename: String,
		/// The underlying compilation failure.
		#[source]
		source: PatternError,
	},
	/// An index node declared children.
	#[error("index route under '{prefix}' must not declare children")]
	IndexWithChildren {
		/// Accumulated path of the offending node's parent.
		prefix: String,
	},
}

/// A validated, immutable route tree.
///
/// [`Routes::new`] walks the declaration tree once, compiling every
/// leaf's joined template, so malformed templates surface here rather
/// than silently failing to match later.
#[derive(Debug, Clone)]
pub struct Routes {
	roots: Vec<Route>,
}

impl Routes {
	/// Validates a route declaration tree.
	///
	/// # Errors
	///
	/// Returns [`RouteTreeError`] when a leaf's joined template is
	/// malformed (see [`PatternError`]) or when an index node declares
	/// children.
	pub fn new(roots: Vec<Route>) -> Result<Self, RouteTreeError> {
		validate_level(&roots, "")?;
		Ok(Self { roots })
	}

	/// Resolves a pathname against this tree.
	pub fn match_path(&self, pathname: &str) -> Option<RouteMatch> {
		match_route(&self.roots, pathname)
	}

	/// Returns the top-level route nodes.
	pub fn roots(&self) -> &[Route] {
		&self.roots
	}
}

fn validate_level(routes: &[Route], prefix: &str) -> Result<(), RouteTreeError> {
	for route in routes {
		if route.is_index() && !route.children().is_empty() {
			return Err(RouteTreeError::IndexWithChildren {
				prefix: rooted(prefix.to_string()),
			});
		}

		let current = join_path(prefix, route.segment().unwrap_or(""));

		if !route.children().is_empty() {
			validate_level(route.children(), &current)?;
			continue;
		}

		let routename = rooted(current);
		PathPattern::new(&routename).map_err(|source| RouteTreeError::InvalidTemplate {
			routename: routename.clone(),
			source,
		})?;
	}

	Ok(())
}
