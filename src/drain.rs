//! Flash drain: consume recognized flashes and render them through a layer
//!
//! Every entry whose key is a recognized [`FlashType`] is rendered once per
//! message and then removed from storage, even when it held no messages.
//! Entries with other keys are neither rendered nor removed.

use crate::error::Result;
use crate::flash::{FlashStorage, FlashType, FlashTypes};
use crate::layer::Layer;
use crate::options::Options;

/// One rendered flash message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	pub kind: FlashType,
	pub title: Option<String>,
	pub message: String,
	pub rendered: String,
}

/// Drain `storage` through `layer`.
///
/// Output follows storage order for types and list order within a type. A
/// render or removal failure is returned immediately; entries of the type
/// being processed stay in storage in that case.
///
/// # Examples
///
/// ```
/// use reinhardt_noty::drain::drain;
/// use reinhardt_noty::flash::{FlashStorage, FlashTypes, FlashValue, MemoryFlashStorage};
/// use reinhardt_noty::layer::{AlertLayer, LayerOptions};
/// use reinhardt_noty::options::Options;
///
/// let storage = MemoryFlashStorage::with_entries([
///     ("success", FlashValue::from(vec!["A", "B"])),
///     ("custom", FlashValue::from("X")),
/// ]);
/// let mut layer = AlertLayer::new(LayerOptions::default());
///
/// let notifications = drain(&storage, &FlashTypes::default(), &mut layer, &Options::new()).unwrap();
/// assert_eq!(notifications.len(), 2);
/// assert!(storage.contains_key("custom"));
/// assert!(!storage.contains_key("success"));
/// ```
pub fn drain(
	storage: &dyn FlashStorage,
	recognized: &FlashTypes,
	layer: &mut dyn Layer,
	options: &Options,
) -> Result<Vec<Notification>> {
	let mut notifications = Vec::new();

	for (key, value) in storage.all()? {
		let Some(kind) = recognized.recognize(&key) else {
			continue;
		};

		let messages = value.messages();
		tracing::debug!(
			flash_type = %kind,
			count = messages.len(),
			layer = layer.name(),
			"draining flash entry"
		);

		for message in messages {
			layer.set_type(kind);
			layer.set_title(None);
			layer.set_message(message);

			let rendered = layer.notification(options)?;
			tracing::trace!(flash_type = %kind, "rendered notification");

			let staged = layer.staged();
			notifications.push(Notification {
				kind,
				title: staged.title.clone(),
				message: staged.message.clone(),
				rendered,
			});
		}

		storage.remove(&key)?;
	}

	Ok(notifications)
}

/// Newline-joined rendered output, ready for a single `<script>` element.
pub fn join_scripts(notifications: &[Notification]) -> String {
	notifications
		.iter()
		.map(|notification| notification.rendered.as_str())
		.collect::<Vec<_>>()
		.join("\n")
}
