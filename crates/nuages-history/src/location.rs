//! Location snapshots and path resolution.
//!
//! A [`Location`] is an immutable description of "where we are": pathname,
//! query string, fragment, per-entry state, and a unique key. Navigation
//! always produces a new `Location` value; observed snapshots are never
//! mutated behind a renderer's back.
//!
//! The free functions in this module are the pure string layer underneath
//! navigation: parsing a path into its parts, serializing parts back into a
//! single string, resolving relative targets, and joining or stripping a
//! basename prefix.
//!
//! ## Example
//!
//! ```
//! use nuages_history::location::{Target, parse_path, resolve_path};
//!
//! let parts = parse_path("/inbox?folder=spam#latest");
//! assert_eq!(parts.pathname, "/inbox");
//! assert_eq!(parts.search, "?folder=spam");
//! assert_eq!(parts.hash, "#latest");
//!
//! let resolved = resolve_path(&Target::from("../archive"), "/inbox/42");
//! assert_eq!(resolved.pathname, "/inbox/archive");
//! ```

use std::fmt;

use serde_json::Value;
use uuid::Uuid;

/// An immutable snapshot of one history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
	/// Absolute pathname, always beginning with `/`.
	pub pathname: String,
	/// Query string, either empty or beginning with `?`.
	pub search: String,
	/// Fragment, either empty or beginning with `#`.
	pub hash: String,
	/// Arbitrary per-entry state supplied at navigation time.
	pub state: Option<Value>,
	/// Key identifying this entry, unique within the history stack.
	pub key: String,
}

impl Location {
	/// Creates a location from path parts, normalizing separators and
	/// generating a fresh key.
	pub fn new(path: &Path, state: Option<Value>) -> Self {
		Location {
			pathname: if path.pathname.is_empty() {
				"/".to_string()
			} else {
				path.pathname.clone()
			},
			search: normalize_search(&path.search),
			hash: normalize_hash(&path.hash),
			state,
			key: generate_key(),
		}
	}

	/// The root location `/` with no state. Used as the initial entry of
	/// freshly created history stacks.
	pub fn root() -> Self {
		Location::new(&Path::default(), None)
	}

	/// The path parts of this location, without state or key.
	pub fn path(&self) -> Path {
		Path {
			pathname: self.pathname.clone(),
			search: self.search.clone(),
			hash: self.hash.clone(),
		}
	}

	/// Serializes pathname, search, and hash into a single string.
	pub fn to_path_string(&self) -> String {
		create_path(&self.path())
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_path_string())
	}
}

/// The three path parts of a location, without entry identity.
///
/// Fields may be empty when the value describes a partial target (for
/// example `?page=2` keeps `pathname` empty so resolution preserves the
/// current pathname).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
	/// Pathname, absolute or relative; may be empty in partial targets.
	pub pathname: String,
	/// Query string, with or without the leading `?`; may be empty.
	pub search: String,
	/// Fragment, with or without the leading `#`; may be empty.
	pub hash: String,
}

impl Path {
	/// Builds a path from a pathname only.
	pub fn from_pathname(pathname: impl Into<String>) -> Self {
		Path {
			pathname: pathname.into(),
			..Path::default()
		}
	}
}

impl fmt::Display for Path {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", create_path(self))
	}
}

/// A navigation target: either a whole path string or structured parts.
///
/// String targets are split on `?` and `#` during resolution, so a string
/// can never smuggle a separator into the wrong part. Structured targets
/// are validated by the consumer before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
	/// A path string such as `"/a/b?x=1#top"`, `"../sibling"` or `"?q=1"`.
	Path(String),
	/// Structured parts, useful when search or hash are built separately.
	Parts(Path),
}

impl From<&str> for Target {
	fn from(value: &str) -> Self {
		Target::Path(value.to_string())
	}
}

impl From<String> for Target {
	fn from(value: String) -> Self {
		Target::Path(value)
	}
}

impl From<Path> for Target {
	fn from(value: Path) -> Self {
		Target::Parts(value)
	}
}

impl From<&Location> for Target {
	fn from(value: &Location) -> Self {
		Target::Parts(value.path())
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Target::Path(path) => write!(f, "{path}"),
			Target::Parts(parts) => write!(f, "{parts}"),
		}
	}
}

/// Splits a path string into pathname, search, and hash.
///
/// The hash is taken first (everything from the first `#`), then the search
/// (everything from the first `?` of the remainder). A `?` inside the hash
/// therefore stays in the hash, matching anchor semantics.
pub fn parse_path(value: &str) -> Path {
	let mut pathname = value;
	let mut hash = String::new();
	let mut search = String::new();

	if let Some(idx) = pathname.find('#') {
		hash = pathname[idx..].to_string();
		pathname = &pathname[..idx];
	}
	if let Some(idx) = pathname.find('?') {
		search = pathname[idx..].to_string();
		pathname = &pathname[..idx];
	}

	Path {
		pathname: pathname.to_string(),
		search,
		hash,
	}
}

/// Serializes path parts into a single string.
///
/// Empty or bare-separator search/hash parts are omitted; missing leading
/// separators are added.
pub fn create_path(path: &Path) -> String {
	let mut out = path.pathname.clone();
	if !path.search.is_empty() && path.search != "?" {
		if path.search.starts_with('?') {
			out.push_str(&path.search);
		} else {
			out.push('?');
			out.push_str(&path.search);
		}
	}
	if !path.hash.is_empty() && path.hash != "#" {
		if path.hash.starts_with('#') {
			out.push_str(&path.hash);
		} else {
			out.push('#');
			out.push_str(&path.hash);
		}
	}
	out
}

/// Normalizes a search string to `""` or a `?`-prefixed value.
pub fn normalize_search(search: &str) -> String {
	if search.is_empty() || search == "?" {
		String::new()
	} else if search.starts_with('?') {
		search.to_string()
	} else {
		format!("?{search}")
	}
}

/// Normalizes a hash string to `""` or a `#`-prefixed value.
pub fn normalize_hash(hash: &str) -> String {
	if hash.is_empty() || hash == "#" {
		String::new()
	} else if hash.starts_with('#') {
		hash.to_string()
	} else {
		format!("#{hash}")
	}
}

/// Resolves a target against a base pathname.
///
/// Absolute target pathnames are kept as-is; an empty target pathname keeps
/// the base; relative pathnames walk `.` and `..` segments against the
/// base. Search and hash come from the target, normalized. Resolution is
/// idempotent: resolving an already absolute result yields itself.
pub fn resolve_path(to: &Target, from_pathname: &str) -> Path {
	let parts = match to {
		Target::Path(value) => parse_path(value),
		Target::Parts(parts) => parts.clone(),
	};

	let pathname = if parts.pathname.is_empty() {
		from_pathname.to_string()
	} else if parts.pathname.starts_with('/') {
		parts.pathname.clone()
	} else {
		resolve_relative(&parts.pathname, from_pathname)
	};

	Path {
		pathname,
		search: normalize_search(&parts.search),
		hash: normalize_hash(&parts.hash),
	}
}

fn resolve_relative(relative: &str, from_pathname: &str) -> String {
	let mut segments: Vec<&str> = from_pathname.trim_end_matches('/').split('/').collect();
	for segment in relative.split('/') {
		match segment {
			".." => {
				// Keep the leading empty segment so the result stays rooted.
				if segments.len() > 1 {
					segments.pop();
				}
			}
			"." => {}
			other => segments.push(other),
		}
	}
	if segments.len() > 1 {
		segments.join("/")
	} else {
		"/".to_string()
	}
}

/// Joins a basename and a pathname, collapsing duplicate slashes at the
/// seam. `join_paths("/", "/inbox")` is `/inbox`, not `//inbox`.
pub fn join_paths(base: &str, pathname: &str) -> String {
	let joined = format!("{base}/{pathname}");
	let mut out = String::with_capacity(joined.len());
	let mut previous_slash = false;
	for ch in joined.chars() {
		if ch == '/' {
			if !previous_slash {
				out.push(ch);
			}
			previous_slash = true;
		} else {
			out.push(ch);
			previous_slash = false;
		}
	}
	out
}

/// Removes a basename prefix from a pathname.
///
/// Returns `None` when the pathname does not live under the basename. The
/// comparison is case-insensitive and only matches on `/` boundaries, so
/// basename `/app` matches `/app/x` but not `/applet`.
pub fn strip_basename(pathname: &str, basename: &str) -> Option<String> {
	if basename == "/" {
		return Some(pathname.to_string());
	}
	let lower_pathname = pathname.to_lowercase();
	let lower_basename = basename.to_lowercase();
	if !lower_pathname.starts_with(&lower_basename) {
		return None;
	}
	let remainder = pathname.get(basename.len()..)?;
	match remainder.chars().next() {
		None => Some("/".to_string()),
		Some('/') => Some(remainder.to_string()),
		Some(_) => None,
	}
}

fn generate_key() -> String {
	let mut key = Uuid::new_v4().simple().to_string();
	key.truncate(8);
	key
}
