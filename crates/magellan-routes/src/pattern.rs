//! Path pattern compilation.
//!
//! Compiles route templates into anchored matchers. A template mixes
//! literal text, dynamic segments written as `:name`, and at most one
//! trailing wildcard written as `*`.

use std::collections::HashMap;
use std::fmt;

use regex::RegexBuilder;
use thiserror::Error;

/// Name under which a trailing wildcard capture is stored.
pub const WILDCARD_PARAM: &str = "*";

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed size for a compiled pattern regex in bytes.
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Error produced when a route template fails to compile.
#[derive(Debug, Error)]
pub enum PatternError {
	/// The pattern string exceeds [`MAX_PATTERN_LENGTH`].
	#[error("pattern is {length} bytes, exceeding the {max} byte limit")]
	TooLong {
		/// Length of the offending pattern in bytes.
		length: usize,
		/// The enforced limit.
		max: usize,
	},
	/// The pattern declares more than one `*` wildcard.
	#[error("pattern declares more than one `*` wildcard")]
	MultipleWildcards,
	/// A `*` wildcard appears somewhere other than the trailing position.
	#[error("wildcard `*` is only supported as the final segment")]
	InteriorWildcard,
	/// The generated regex was rejected by the engine.
	#[error("pattern failed to compile: {0}")]
	Regex(#[from] regex::Error),
}

/// A compiled path template.
///
/// Supports templates like:
/// - `/users` - exact match
/// - `/users/:id` - single dynamic segment
/// - `/users/:user_id/posts/:post_id` - multiple dynamic segments
/// - `/files/*` - trailing wildcard capturing the rest of the path
///
/// A dynamic segment matches any run of characters excluding `/`,
/// including the empty run: `/users/:id` matches `/users/` and binds
/// `id` to `""`. The wildcard matches the remaining rest of the path,
/// slashes included, and is bound under the name `"*"`; the separator
/// before it is optional, so `/files/*` also matches `/files`.
///
/// Matches are anchored to the entire pathname, never a prefix or
/// suffix of it.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The original template string.
	pattern: String,
	/// Compiled anchored regex.
	regex: regex::Regex,
	/// Parameter names in the order they appear in the template.
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles a route template.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if the template exceeds the length limit,
	/// declares more than one wildcard, places a wildcard anywhere but the
	/// trailing position, or produces a regex the engine rejects.
	pub fn new(pattern: &str) -> Result<Self, PatternError> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(PatternError::TooLong {
				length: pattern.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}

		let wildcards = pattern.matches('*').count();
		if wildcards > 1 {
			return Err(PatternError::MultipleWildcards);
		}
		if wildcards == 1 && !(pattern == "*" || pattern.ends_with("/*")) {
			return Err(PatternError::InteriorWildcard);
		}

		let (regex_src, param_names) = Self::compile(pattern);

		let regex = RegexBuilder::new(&regex_src)
			.size_limit(MAX_REGEX_SIZE)
			.build()?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	/// Tokenizes the template into an anchored regex source and the
	/// ordered list of parameter names.
	fn compile(pattern: &str) -> (String, Vec<String>) {
		let mut regex_src = String::from("^");
		let mut param_names = Vec::new();
		let mut chars = pattern.chars().peekable();

		while let Some(c) = chars.next() {
			match c {
				':' => {
					// Dynamic segment: the name runs to the next slash.
					let mut name = String::new();
					while let Some(&next) = chars.peek() {
						if next == '/' {
							break;
						}
						name.push(next);
						chars.next();
					}
					param_names.push(name);
					regex_src.push_str("([^/]*)");
				}
				'/' if chars.peek() == Some(&'*') => {
					// Trailing wildcard: consumes the rest of the path,
					// slashes included. The separator itself is optional.
					chars.next();
					param_names.push(WILDCARD_PARAM.to_string());
					regex_src.push_str("/?(.*)");
				}
				'*' => {
					param_names.push(WILDCARD_PARAM.to_string());
					regex_src.push_str("(.*)");
				}
				'/' | '.' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|'
				| '\\' => {
					regex_src.push('\\');
					regex_src.push(c);
				}
				_ => {
					regex_src.push(c);
				}
			}
		}

		regex_src.push('$');
		(regex_src, param_names)
	}

	/// Returns the original template string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in template order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Tests a pathname against this pattern and extracts parameters.
	///
	/// Returns a map of parameter names to their extracted values, with a
	/// wildcard capture stored under `"*"`.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let captures = self.regex.captures(path)?;

		let params = self
			.param_names
			.iter()
			.zip(captures.iter().skip(1))
			.map(|(name, capture)| {
				let value = capture.map(|m| m.as_str()).unwrap_or_default();
				(name.clone(), value.to_string())
			})
			.collect();

		Some(params)
	}

	/// Checks whether this pattern would match the given pathname.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Rebuilds a concrete path from this template and bound parameters.
	///
	/// Returns `None` when a parameter the template names is missing from
	/// `params`.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut out = String::new();
		let mut chars = self.pattern.chars().peekable();

		while let Some(c) = chars.next() {
			match c {
				':' => {
					let mut name = String::new();
					while let Some(&next) = chars.peek() {
						if next == '/' {
							break;
						}
						name.push(next);
						chars.next();
					}
					out.push_str(params.get(&name)?);
				}
				'*' => out.push_str(params.get(WILDCARD_PARAM)?),
				_ => out.push(c),
			}
		}

		Some(out)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}
