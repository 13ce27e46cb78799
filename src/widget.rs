//! Render orchestrator: initial page render and poll callbacks
//!
//! A [`NotyWidget`] owns the configuration of one notification area. On the
//! initial page render it emits the container, the drained notifications and
//! the polling payload; on a poll it rebuilds itself from the request and
//! returns only the drained script.
//!
//! ```rust
//! use reinhardt_noty::flash::{FlashValue, MemoryFlashStorage};
//! use reinhardt_noty::widget::NotyWidget;
//!
//! let storage = MemoryFlashStorage::with_entries([("success", FlashValue::from("Saved"))]);
//! let rendered = NotyWidget::new().render(&storage).unwrap();
//!
//! assert!(rendered.body.contains(&format!(r#"<div id="{}"></div>"#, rendered.layer_id)));
//! assert!(rendered.body.contains(r#"alert("Success\nSaved");"#));
//! assert!(storage.is_empty());
//! ```

use crate::drain::{Notification, drain, join_scripts};
use crate::error::{NotyError, Result};
use crate::flash::{FlashStorage, FlashTypes};
use crate::http::Request;
use crate::layer::{Layer, LayerOptions};
use crate::options::{Options, merge_options};
use crate::registry::{DEFAULT_LAYER, LayerRegistry};
use crate::script::{POLL_MODULE, PollConfig, PollPayload, script_json, script_tag};
use crate::settings::NotySettings;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::sync::Arc;
use tera::{Context, Tera};

const WIDGET_TEMPLATE: &str = "noty/widget.html";
const POLL_TEMPLATE: &str = "noty/poll.html";

static TEMPLATES: OnceCell<Tera> = OnceCell::new();

fn templates() -> Result<&'static Tera> {
	let tera = TEMPLATES.get_or_try_init(|| {
		let mut tera = Tera::default();
		tera.add_raw_templates(vec![
			(WIDGET_TEMPLATE, include_str!("../templates/noty/widget.html")),
			(POLL_TEMPLATE, include_str!("../templates/noty/poll.html")),
		])?;
		Ok::<_, tera::Error>(tera)
	})?;
	Ok(tera)
}

/// Markup produced by an initial render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWidget {
	pub layer_id: String,
	/// Layer includes for the page `<head>`; empty for layers needing none.
	pub head: String,
	/// Container element followed by the drained notifications.
	pub body: String,
	/// Poll payload and client module, meant for the end of `<body>`.
	pub end_of_body: String,
	pub notifications: Vec<Notification>,
}

impl RenderedWidget {
	/// Everything in document order, for pages without a separate `<head>` slot.
	pub fn to_html(&self) -> String {
		[self.head.as_str(), self.body.as_str(), self.end_of_body.as_str()]
			.iter()
			.filter(|part| !part.is_empty())
			.copied()
			.collect::<Vec<_>>()
			.join("\n")
	}
}

/// Configuration of one notification area.
#[derive(Debug, Clone)]
pub struct NotyWidget {
	registry: Arc<LayerRegistry>,
	layer_class: String,
	layer_options: LayerOptions,
	options: Options,
	flash_types: FlashTypes,
	poll_url: String,
}

impl Default for NotyWidget {
	fn default() -> Self {
		Self::new()
	}
}

impl NotyWidget {
	/// Widget with the built-in layers, the alert layer and the default poll URL.
	pub fn new() -> Self {
		let settings = NotySettings::default();
		Self {
			registry: Arc::new(LayerRegistry::with_builtin()),
			layer_class: DEFAULT_LAYER.to_string(),
			layer_options: LayerOptions::default(),
			options: Options::new(),
			flash_types: FlashTypes::default(),
			poll_url: settings.poll_url,
		}
	}

	pub fn from_settings(settings: &NotySettings, registry: Arc<LayerRegistry>) -> Self {
		Self {
			registry,
			layer_class: settings.layer_class.clone(),
			layer_options: settings.layer_options.clone(),
			options: settings.options.clone(),
			flash_types: settings.flash_types(),
			poll_url: settings.poll_url.clone(),
		}
	}

	/// Rebuild the widget a poll request was issued for.
	///
	/// Layer class and options come from the request; the recognized flash
	/// types and the poll URL stay under server control.
	pub fn for_poll(
		registry: Arc<LayerRegistry>,
		request: &PollRequest,
		settings: &NotySettings,
	) -> Self {
		Self {
			registry,
			layer_class: request.layer_class.clone(),
			layer_options: request.config.layer_options.clone(),
			options: request.config.options.clone(),
			flash_types: settings.flash_types(),
			poll_url: settings.poll_url.clone(),
		}
	}

	pub fn with_registry(mut self, registry: Arc<LayerRegistry>) -> Self {
		self.registry = registry;
		self
	}

	pub fn with_layer_class(mut self, layer_class: impl Into<String>) -> Self {
		self.layer_class = layer_class.into();
		self
	}

	pub fn with_layer_options(mut self, layer_options: LayerOptions) -> Self {
		self.layer_options = layer_options;
		self
	}

	pub fn with_options(mut self, options: Options) -> Self {
		self.options = options;
		self
	}

	pub fn with_flash_types(mut self, flash_types: FlashTypes) -> Self {
		self.flash_types = flash_types;
		self
	}

	pub fn with_poll_url(mut self, poll_url: impl Into<String>) -> Self {
		self.poll_url = poll_url.into();
		self
	}

	pub fn layer_class(&self) -> &str {
		&self.layer_class
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	pub fn layer_options(&self) -> &LayerOptions {
		&self.layer_options
	}

	/// Build the layer and the options it renders with.
	///
	/// Done before storage is read, so an unknown layer class leaves every
	/// flash in place.
	fn build_layer(&self) -> Result<(Box<dyn Layer>, Options)> {
		let layer = self
			.registry
			.create(&self.layer_class, self.layer_options.clone())?;
		let options = merge_options(&layer.default_options(), &self.options);
		Ok((layer, options))
	}

	/// Initial page render.
	pub fn render(&self, storage: &dyn FlashStorage) -> Result<RenderedWidget> {
		let (mut layer, options) = self.build_layer()?;
		let head = layer.head_markup(&options)?;
		let notifications = drain(storage, &self.flash_types, &mut *layer, &options)?;
		let layer_id = layer.layer_id().to_string();

		let payload = PollPayload {
			url: self.poll_url.clone(),
			layer_class: self.layer_class.clone(),
			config: PollConfig {
				options: self.options.clone(),
				layer_options: layer.layer_options().clone(),
			},
		};

		let tera = templates()?;

		let mut context = Context::new();
		context.insert("layer_id", &layer_id);
		context.insert("script", &join_scripts(&notifications));
		let body = tera.render(WIDGET_TEMPLATE, &context)?;

		let mut context = Context::new();
		context.insert("payload", &script_json(&payload)?);
		context.insert("module", POLL_MODULE);
		let end_of_body = tera.render(POLL_TEMPLATE, &context)?;

		tracing::debug!(
			layer = layer.name(),
			layer_id = %layer_id,
			count = notifications.len(),
			"rendered notification widget"
		);

		Ok(RenderedWidget {
			layer_id,
			head,
			body,
			end_of_body,
			notifications,
		})
	}

	/// Poll response body: the drained script in a single `<script>` element.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::flash::MemoryFlashStorage;
	/// use reinhardt_noty::widget::NotyWidget;
	///
	/// let body = NotyWidget::new().ajax_callback(&MemoryFlashStorage::new()).unwrap();
	/// assert_eq!(body, "<script></script>");
	/// ```
	pub fn ajax_callback(&self, storage: &dyn FlashStorage) -> Result<String> {
		let (mut layer, options) = self.build_layer()?;
		let notifications = drain(storage, &self.flash_types, &mut *layer, &options)?;
		tracing::debug!(
			layer = layer.name(),
			layer_id = %layer.layer_id(),
			count = notifications.len(),
			"answered notification poll"
		);
		Ok(script_tag(&join_scripts(&notifications)))
	}
}

#[derive(Debug, Deserialize)]
struct PollForm {
	#[serde(rename = "layerClass")]
	layer_class: String,
	config: String,
}

/// Decoded poll request.
#[derive(Debug, Clone, PartialEq)]
pub struct PollRequest {
	pub layer_class: String,
	pub config: PollConfig,
}

impl PollRequest {
	/// Decode the `layerClass` and `config` form fields.
	///
	/// `layerClass` may arrive JSON-encoded (as the client module sends it) or
	/// raw; `config` must be a JSON object.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::widget::PollRequest;
	///
	/// let request = PollRequest::from_form(
	///     b"layerClass=%22toastr%22&config=%7B%22layerOptions%22%3A%7B%22layerId%22%3A%22box%22%7D%7D",
	/// ).unwrap();
	/// assert_eq!(request.layer_class, "toastr");
	/// assert_eq!(request.config.layer_options.layer_id.as_deref(), Some("box"));
	/// ```
	pub fn from_form(body: &[u8]) -> Result<Self> {
		let form: PollForm = serde_urlencoded::from_bytes(body)
			.map_err(|e| NotyError::MalformedRequest(e.to_string()))?;
		Self::from_fields(form)
	}

	pub fn from_request(request: &Request) -> Result<Self> {
		Self::from_fields(request.form()?)
	}

	fn from_fields(form: PollForm) -> Result<Self> {
		let layer_class = serde_json::from_str::<String>(&form.layer_class)
			.unwrap_or_else(|_| form.layer_class.clone());
		let config: PollConfig = serde_json::from_str(&form.config)
			.map_err(|e| NotyError::MalformedRequest(format!("invalid config: {}", e)))?;
		Ok(Self {
			layer_class,
			config,
		})
	}
}
