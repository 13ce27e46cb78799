//! Poll endpoint handler

use crate::error::{NotyError, Result};
use crate::http::{Handler, Request, Response};
use crate::registry::LayerRegistry;
use crate::session::FlashSessions;
use crate::settings::NotySettings;
use crate::widget::{NotyWidget, PollRequest};
use async_trait::async_trait;
use hyper::Method;
use std::sync::Arc;

/// Answers the client module's poll with the drained notifications of the
/// requesting session.
///
/// Every request rebuilds the widget from its own `layerClass` and `config`;
/// nothing is kept between polls.
pub struct PollHandler {
	registry: Arc<LayerRegistry>,
	settings: Arc<NotySettings>,
	sessions: Arc<dyn FlashSessions>,
}

impl PollHandler {
	pub fn new(
		registry: Arc<LayerRegistry>,
		settings: Arc<NotySettings>,
		sessions: Arc<dyn FlashSessions>,
	) -> Self {
		Self {
			registry,
			settings,
			sessions,
		}
	}

	pub fn poll_url(&self) -> &str {
		&self.settings.poll_url
	}
}

#[async_trait]
impl Handler for PollHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		if request.method != Method::POST {
			return Ok(Response::method_not_allowed().with_header("Allow", "POST"));
		}

		let poll = PollRequest::from_request(&request).inspect_err(|e| {
			tracing::warn!(error = %e, "rejected malformed notification poll");
		})?;
		let storage = self.sessions.storage_for(&request)?;
		let widget = NotyWidget::for_poll(Arc::clone(&self.registry), &poll, &self.settings);

		let drained = widget.ajax_callback(storage.as_ref());
		drop(storage);
		self.sessions.release(&request)?;

		match drained {
			Ok(body) => Ok(Response::html(body)),
			Err(e @ NotyError::Configuration(_)) => {
				tracing::warn!(layer_class = %poll.layer_class, error = %e, "notification poll misconfigured");
				Err(e)
			}
			Err(e) => Err(e),
		}
	}
}
