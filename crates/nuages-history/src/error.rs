//! Errors produced while constructing or driving a history backend.

use thiserror::Error;

/// Failures a history backend can report.
///
/// Backend construction is fallible instead of panicking, so embedding
/// code can surface a broken environment (a missing `window`, a rejected
/// session-history call) as an ordinary error.
#[derive(Debug, Error)]
pub enum HistoryError {
	/// The global `window` object is unavailable, typically because the
	/// code runs outside a browsing context.
	#[error("browser window is unavailable")]
	WindowUnavailable,

	/// The underlying session history rejected an operation.
	#[error("history backend error: {0}")]
	Backend(String),

	/// Entry state failed to serialize or deserialize.
	#[error("history state serialization failed: {0}")]
	State(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_names_the_failure() {
		assert_eq!(
			HistoryError::WindowUnavailable.to_string(),
			"browser window is unavailable"
		);
		assert_eq!(
			HistoryError::Backend("pushState rejected".into()).to_string(),
			"history backend error: pushState rejected"
		);
	}

	#[test]
	fn serde_errors_convert_into_state_errors() {
		let parse_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
		let error = HistoryError::from(parse_error);
		assert!(matches!(error, HistoryError::State(_)));
		assert!(error.to_string().starts_with("history state serialization failed:"));
	}
}
