//! Session-scoped flash storage
//!
//! The poll endpoint must drain the flashes of the session that issued the
//! ajax request. [`FlashSessions`] resolves a request to that storage;
//! [`SessionFlashStore`] keeps one [`MemoryFlashStorage`] per session id taken
//! from the session cookie.
//!
//! Only application code queueing flashes creates sessions. Resolving a
//! request never does, and a session is dropped again once it has been
//! drained empty.

use crate::error::Result;
use crate::flash::{FlashStorage, MemoryFlashStorage};
use crate::http::Request;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves a request to the flash storage of its session.
pub trait FlashSessions: Send + Sync {
	fn storage_for(&self, request: &Request) -> Result<Arc<dyn FlashStorage>>;

	/// Called after the storage returned by [`storage_for`](Self::storage_for)
	/// has been drained and dropped.
	fn release(&self, _request: &Request) -> Result<()> {
		Ok(())
	}
}

/// In-memory flash storage keyed by session id.
///
/// # Examples
///
/// ```
/// use reinhardt_noty::flash::FlashStorage;
/// use reinhardt_noty::session::SessionFlashStore;
///
/// let store = SessionFlashStore::new("sessionid");
/// store.session("abc").add("success", "Saved").unwrap();
///
/// assert_eq!(store.len(), 1);
/// assert!(store.existing("other").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SessionFlashStore {
	cookie_name: String,
	sessions: Arc<RwLock<HashMap<String, MemoryFlashStorage>>>,
}

impl SessionFlashStore {
	pub fn new(cookie_name: impl Into<String>) -> Self {
		Self {
			cookie_name: cookie_name.into(),
			sessions: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	pub fn cookie_name(&self) -> &str {
		&self.cookie_name
	}

	/// Flash storage for `session_id`, created on first use.
	pub fn session(&self, session_id: &str) -> MemoryFlashStorage {
		if let Some(storage) = self.existing(session_id) {
			return storage;
		}
		self.sessions
			.write()
			.entry(session_id.to_string())
			.or_default()
			.clone()
	}

	/// Flash storage for `session_id` if that session holds any.
	pub fn existing(&self, session_id: &str) -> Option<MemoryFlashStorage> {
		self.sessions.read().get(session_id).cloned()
	}

	/// Session id named by the request's session cookie.
	pub fn session_id(&self, request: &Request) -> Option<String> {
		request
			.cookie(&self.cookie_name)
			.filter(|id| !id.is_empty())
	}

	/// Drop the session if it is empty and nothing else holds its storage.
	pub fn prune(&self, session_id: &str) {
		let mut sessions = self.sessions.write();
		if sessions
			.get(session_id)
			.is_some_and(|storage| storage.is_empty() && !storage.is_shared())
		{
			sessions.remove(session_id);
			tracing::trace!(session = %session_id, "dropped drained flash session");
		}
	}

	/// Drop a session's flashes entirely.
	pub fn forget(&self, session_id: &str) {
		self.sessions.write().remove(session_id);
	}

	/// Number of sessions currently holding storage.
	pub fn len(&self) -> usize {
		self.sessions.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.read().is_empty()
	}
}

impl FlashSessions for SessionFlashStore {
	/// Requests without a cookie, or naming an unknown session, get a fresh
	/// empty storage that is not kept.
	fn storage_for(&self, request: &Request) -> Result<Arc<dyn FlashStorage>> {
		let storage = self
			.session_id(request)
			.and_then(|session_id| self.existing(&session_id))
			.unwrap_or_default();
		Ok(Arc::new(storage))
	}

	fn release(&self, request: &Request) -> Result<()> {
		if let Some(session_id) = self.session_id(request) {
			self.prune(&session_id);
		}
		Ok(())
	}
}
