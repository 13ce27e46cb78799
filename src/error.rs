//! Error types for the notification widget.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, NotyError>;

/// Errors produced while building layers, draining flashes, or serving polls.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NotyError {
	/// Unknown layer class or otherwise unusable widget configuration.
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// Poll request is missing fields or carries an undecodable config.
	#[error("Malformed poll request: {0}")]
	MalformedRequest(String),

	/// A layer was asked to render before a flash type was staged.
	#[error("No notification staged on layer")]
	NothingStaged,

	/// The flash storage port failed.
	#[error("Flash storage error: {0}")]
	Storage(String),

	/// A layer factory is already registered under this name.
	#[error("Layer already registered: {0}")]
	AlreadyRegistered(String),

	#[error("Settings error: {0}")]
	Settings(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Template error: {0}")]
	Template(#[from] tera::Error),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl NotyError {
	/// HTTP status code this error maps to when it escapes a handler.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::NotyError;
	///
	/// assert_eq!(NotyError::Configuration("x".into()).status_code(), 400);
	/// assert_eq!(NotyError::NothingStaged.status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			NotyError::Configuration(_) | NotyError::MalformedRequest(_) => 400,
			_ => 500,
		}
	}
}
