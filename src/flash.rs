//! Flash entries and the storage port they are drained from
//!
//! Flashes are one-shot, session-scoped messages queued by application code
//! under a severity key (`success`, `error`, ...). The widget drains every
//! entry whose key is a recognized [`FlashType`] and leaves the rest alone.
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_noty::flash::{FlashStorage, FlashValue, MemoryFlashStorage};
//!
//! let storage = MemoryFlashStorage::new();
//! storage.add("success", "Saved").unwrap();
//! storage.add("success", "Published").unwrap();
//!
//! let entries = storage.all().unwrap();
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].1.messages(), vec!["Saved", "Published"]);
//! ```

use crate::error::{NotyError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Recognized flash severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashType {
	Alert,
	Info,
	Success,
	Error,
	Warning,
}

impl FlashType {
	/// Every severity, in the order the widget recognizes them.
	pub const ALL: [FlashType; 5] = [
		FlashType::Alert,
		FlashType::Info,
		FlashType::Success,
		FlashType::Error,
		FlashType::Warning,
	];

	/// Storage key for this severity.
	pub fn as_str(&self) -> &'static str {
		match self {
			FlashType::Alert => "alert",
			FlashType::Info => "info",
			FlashType::Success => "success",
			FlashType::Error => "error",
			FlashType::Warning => "warning",
		}
	}

	/// Title used when neither the message nor the layer options supply one.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::flash::FlashType;
	///
	/// assert_eq!(FlashType::Success.default_title(), "Success");
	/// assert_eq!(FlashType::Alert.default_title(), "Alert");
	/// ```
	pub fn default_title(&self) -> &'static str {
		match self {
			FlashType::Alert => "Alert",
			FlashType::Info => "Info",
			FlashType::Success => "Success",
			FlashType::Error => "Error",
			FlashType::Warning => "Warning",
		}
	}

	/// Look up a severity by storage key. Keys are matched exactly.
	pub fn from_key(key: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == key)
	}
}

impl fmt::Display for FlashType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FlashType {
	type Err = NotyError;

	fn from_str(s: &str) -> Result<Self> {
		Self::from_key(s)
			.ok_or_else(|| NotyError::Configuration(format!("unknown flash type: {}", s)))
	}
}

/// The set of severities a drain consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashTypes {
	types: Vec<FlashType>,
}

impl FlashTypes {
	/// Restrict draining to the given severities.
	pub fn new(types: impl IntoIterator<Item = FlashType>) -> Self {
		let mut collected: Vec<FlashType> = Vec::new();
		for kind in types {
			if !collected.contains(&kind) {
				collected.push(kind);
			}
		}
		Self { types: collected }
	}

	/// Resolve a raw storage key to a recognized severity.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::flash::{FlashType, FlashTypes};
	///
	/// let types = FlashTypes::default();
	/// assert_eq!(types.recognize("error"), Some(FlashType::Error));
	/// assert_eq!(types.recognize("custom"), None);
	/// ```
	pub fn recognize(&self, key: &str) -> Option<FlashType> {
		FlashType::from_key(key).filter(|kind| self.types.contains(kind))
	}

	pub fn contains(&self, key: &str) -> bool {
		self.recognize(key).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = FlashType> + '_ {
		self.types.iter().copied()
	}
}

impl Default for FlashTypes {
	fn default() -> Self {
		Self::new(FlashType::ALL)
	}
}

/// A stored flash value: one message, many messages, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FlashValue {
	Many(Vec<String>),
	One(String),
	#[default]
	Empty,
}

impl FlashValue {
	/// Normalize to a message list; a scalar becomes a singleton.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::flash::FlashValue;
	///
	/// assert_eq!(FlashValue::One("Saved".into()).messages(), vec!["Saved"]);
	/// assert!(FlashValue::Empty.messages().is_empty());
	/// ```
	pub fn messages(&self) -> Vec<&str> {
		match self {
			FlashValue::Many(messages) => messages.iter().map(String::as_str).collect(),
			FlashValue::One(message) => vec![message.as_str()],
			FlashValue::Empty => Vec::new(),
		}
	}

	/// Append a message, promoting a scalar to a list.
	pub fn push(&mut self, message: impl Into<String>) {
		let message = message.into();
		*self = match std::mem::take(self) {
			FlashValue::Empty => FlashValue::One(message),
			FlashValue::One(first) => FlashValue::Many(vec![first, message]),
			FlashValue::Many(mut messages) => {
				messages.push(message);
				FlashValue::Many(messages)
			}
		};
	}
}

impl From<&str> for FlashValue {
	fn from(message: &str) -> Self {
		FlashValue::One(message.to_string())
	}
}

impl From<String> for FlashValue {
	fn from(message: String) -> Self {
		FlashValue::One(message)
	}
}

impl From<Vec<String>> for FlashValue {
	fn from(messages: Vec<String>) -> Self {
		FlashValue::Many(messages)
	}
}

impl From<Vec<&str>> for FlashValue {
	fn from(messages: Vec<&str>) -> Self {
		FlashValue::Many(messages.into_iter().map(str::to_string).collect())
	}
}

/// Storage port the drain reads from and removes consumed entries through.
///
/// Implementations use interior mutability; one instance is scoped to one
/// user session.
pub trait FlashStorage: Send + Sync {
	/// All entries in natural insertion order.
	fn all(&self) -> Result<Vec<(String, FlashValue)>>;

	/// Remove the entry stored under `key`. Removing a missing key is not an error.
	fn remove(&self, key: &str) -> Result<()>;

	/// Replace the entry stored under `key`, keeping its position if it exists.
	fn set(&self, key: &str, value: FlashValue) -> Result<()>;

	/// Append a message under `key`.
	fn add(&self, key: &str, message: &str) -> Result<()>;
}

/// In-memory flash storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlashStorage {
	entries: Arc<Mutex<Vec<(String, FlashValue)>>>,
}

impl MemoryFlashStorage {
	/// Create an empty storage.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a storage pre-filled with entries, in the given order.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::flash::{FlashStorage, FlashValue, MemoryFlashStorage};
	///
	/// let storage = MemoryFlashStorage::with_entries([
	///     ("success", FlashValue::from(vec!["A", "B"])),
	///     ("custom", FlashValue::from("X")),
	/// ]);
	/// assert_eq!(storage.len(), 2);
	/// ```
	pub fn with_entries<K, I>(entries: I) -> Self
	where
		K: Into<String>,
		I: IntoIterator<Item = (K, FlashValue)>,
	{
		let storage = Self::new();
		{
			let mut guard = storage.entries.lock();
			for (key, value) in entries {
				let key = key.into();
				match guard.iter_mut().find(|(existing, _)| *existing == key) {
					Some(slot) => slot.1 = value,
					None => guard.push((key, value)),
				}
			}
		}
		storage
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	/// Entry stored under `key`, if any.
	pub fn get(&self, key: &str) -> Option<FlashValue> {
		self.entries
			.lock()
			.iter()
			.find(|(existing, _)| existing == key)
			.map(|(_, value)| value.clone())
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// Whether another clone still refers to these entries.
	pub fn is_shared(&self) -> bool {
		Arc::strong_count(&self.entries) > 1
	}
}

impl FlashStorage for MemoryFlashStorage {
	fn all(&self) -> Result<Vec<(String, FlashValue)>> {
		Ok(self.entries.lock().clone())
	}

	fn remove(&self, key: &str) -> Result<()> {
		self.entries.lock().retain(|(existing, _)| existing != key);
		Ok(())
	}

	fn set(&self, key: &str, value: FlashValue) -> Result<()> {
		let mut entries = self.entries.lock();
		match entries.iter_mut().find(|(existing, _)| existing == key) {
			Some(slot) => slot.1 = value,
			None => entries.push((key.to_string(), value)),
		}
		Ok(())
	}

	fn add(&self, key: &str, message: &str) -> Result<()> {
		let mut entries = self.entries.lock();
		match entries.iter_mut().find(|(existing, _)| existing == key) {
			Some(slot) => slot.1.push(message),
			None => entries.push((key.to_string(), FlashValue::from(message))),
		}
		Ok(())
	}
}
