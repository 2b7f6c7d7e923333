//! An ordered multimap view over the query string.
//!
//! [`SearchParams`] keeps pairs in appearance order and follows the
//! `URLSearchParams` mutation semantics: `set` rewrites the first
//! occurrence in place and drops the rest, `append` always adds at the
//! end. Parsing is tolerant; a malformed pair is skipped rather than
//! failing the whole query. Encoding and decoding go through
//! `serde_urlencoded`, so `+`/space and percent escapes behave like a
//! form submission.

use std::fmt;

use crate::error::NavError;
use crate::navigator::NavigateOptions;
use crate::scope::RouterScope;

/// Ordered key/value pairs parsed from a query string.
///
/// ## Example
///
/// ```
/// use nuages_router::SearchParams;
///
/// let mut params = SearchParams::parse("?tag=a&tag=b&page=2");
/// assert_eq!(params.get_all("tag"), vec!["a", "b"]);
/// params.set("page", "3");
/// assert_eq!(params.to_query_string(), "tag=a&tag=b&page=3");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
	pairs: Vec<(String, String)>,
}

impl SearchParams {
	/// An empty set of pairs.
	pub fn new() -> Self {
		SearchParams::default()
	}

	/// Parses a query string, with or without the leading `?`.
	///
	/// Pairs that fail to decode are skipped; a bare key without `=`
	/// parses as an empty value.
	pub fn parse(query: &str) -> Self {
		let trimmed = query.strip_prefix('?').unwrap_or(query);
		let pairs = trimmed
			.split('&')
			.filter(|segment| !segment.is_empty())
			.filter_map(|segment| {
				serde_urlencoded::from_str::<Vec<(String, String)>>(segment)
					.ok()
					.and_then(|mut decoded| decoded.pop())
			})
			.collect();
		SearchParams { pairs }
	}

	/// Builds from explicit pairs, keeping their order.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		SearchParams {
			pairs: pairs
				.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		}
	}

	/// Builds from `(key, values)` entries, flattening each entry into one
	/// pair per value.
	pub fn from_entries<I, K, Vs, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, Vs)>,
		K: Into<String>,
		Vs: IntoIterator<Item = V>,
		V: Into<String>,
	{
		let mut params = SearchParams::new();
		for (key, values) in entries {
			let key = key.into();
			for value in values {
				params.append(key.clone(), value);
			}
		}
		params
	}

	/// First value for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.pairs
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Every value for `key`, in order.
	pub fn get_all(&self, key: &str) -> Vec<String> {
		self.pairs
			.iter()
			.filter(|(k, _)| k == key)
			.map(|(_, v)| v.clone())
			.collect()
	}

	/// Whether any pair carries `key`.
	pub fn has(&self, key: &str) -> bool {
		self.pairs.iter().any(|(k, _)| k == key)
	}

	/// Adds a pair at the end.
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.pairs.push((key.into(), value.into()));
	}

	/// Rewrites the first occurrence of `key` in place, drops the rest,
	/// and appends when the key was absent.
	pub fn set(&mut self, key: &str, value: impl Into<String>) {
		let value = value.into();
		let mut missing = true;
		self.pairs.retain_mut(|(k, v)| {
			if k != key {
				return true;
			}
			if missing {
				*v = value.clone();
				missing = false;
				true
			} else {
				false
			}
		});
		if missing {
			self.pairs.push((key.to_string(), value));
		}
	}

	/// Removes every pair carrying `key`.
	pub fn delete(&mut self, key: &str) {
		self.pairs.retain(|(k, _)| k != key);
	}

	/// Distinct keys in first-appearance order.
	pub fn keys(&self) -> Vec<String> {
		let mut seen: Vec<String> = Vec::new();
		for (key, _) in &self.pairs {
			if !seen.iter().any(|s| s == key) {
				seen.push(key.clone());
			}
		}
		seen
	}

	/// Iterates the pairs in order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
		self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Number of pairs.
	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	/// Whether there are no pairs.
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	/// Fills in defaults for keys this query does not carry at all.
	///
	/// A key present here, even with different values, is left untouched;
	/// an absent key receives every default value for it.
	pub fn merge_defaults(mut self, defaults: &SearchParams) -> SearchParams {
		for key in defaults.keys() {
			if !self.has(&key) {
				for value in defaults.get_all(&key) {
					self.append(key.clone(), value);
				}
			}
		}
		self
	}

	/// Form-encodes the pairs, without a leading `?`.
	pub fn to_query_string(&self) -> String {
		serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
	}
}

impl fmt::Display for SearchParams {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_query_string())
	}
}

impl From<&str> for SearchParams {
	fn from(query: &str) -> Self {
		SearchParams::parse(query)
	}
}

impl FromIterator<(String, String)> for SearchParams {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		SearchParams {
			pairs: iter.into_iter().collect(),
		}
	}
}

impl RouterScope {
	/// The current location's query, parsed.
	pub fn search_params(&self) -> SearchParams {
		SearchParams::parse(&self.location().search)
	}

	/// The current query with `defaults` merged in for absent keys.
	pub fn search_params_with_defaults(&self, defaults: &SearchParams) -> SearchParams {
		self.search_params().merge_defaults(defaults)
	}

	/// Navigates to the current pathname with `next` as its query.
	///
	/// The hash is dropped, matching what following a `?query` href does.
	pub fn set_search_params(
		&self,
		next: &SearchParams,
		options: NavigateOptions,
	) -> Result<(), NavError> {
		self.navigate_with(format!("?{}", next.to_query_string()), options)
	}
}
