//! Errors raised while decoding backend payloads.
//!
//! Tokenizing, autocomplete detection and layout never fail; only turning raw
//! API responses into typed data can.

use thiserror::Error;

/// A backend payload could not be used.
#[derive(Debug, Error)]
pub enum DataError {
	/// The payload was not valid JSON of the expected shape.
	#[error("malformed payload: {0}")]
	Json(#[from] serde_json::Error),
	/// A network payload listed the same node id twice.
	#[error("duplicate node id `{0}` in network payload")]
	DuplicateNode(String),
}

/// Result alias for payload decoding.
pub type Result<T> = std::result::Result<T, DataError>;
