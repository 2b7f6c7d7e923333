//! Router error taxonomy.

use thiserror::Error;

/// Rejections for malformed navigation targets.
///
/// String targets never fail: their separators are parsed, not validated.
/// Structured targets are rejected when a part smuggles in a separator
/// that belongs to a later part.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
	/// The pathname part embeds a `?` or `#` separator.
	#[error("target pathname must not embed a search or hash separator")]
	PathnameSeparator,

	/// The search part embeds a `#` separator.
	#[error("target search must not embed a hash separator")]
	SearchSeparator,
}

/// Navigation failures surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
	/// The navigation target is malformed.
	#[error("invalid navigation target: {0}")]
	InvalidTarget(#[from] TargetError),

	/// The basename is malformed. Basenames must be absolute and must not
	/// carry search or hash separators.
	#[error("invalid basename {0:?}: must start with '/' and stay separator-free")]
	InvalidBasename(String),
}
