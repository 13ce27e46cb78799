//! Layer adapters: pluggable strategies that turn a staged notification into
//! script understood by a client popup library
//!
//! A layer holds exactly one notification in flight. The drain stages a type,
//! a title and a message, then asks the layer to render with the merged
//! options:
//!
//! ```rust
//! use reinhardt_noty::flash::FlashType;
//! use reinhardt_noty::layer::{AlertLayer, Layer, LayerOptions};
//! use reinhardt_noty::options::Options;
//!
//! let mut layer = AlertLayer::new(LayerOptions::default());
//! layer.set_type(FlashType::Success);
//! layer.set_title(None);
//! layer.set_message("Saved");
//!
//! let script = layer.notification(&Options::new()).unwrap();
//! assert_eq!(script, r#"alert("Success\nSaved");"#);
//! ```
//!
//! Layers share their staging behavior through [`LayerBase`]; an
//! implementation only decides how to render.

mod alert;
mod noty;
mod toastr;

pub use alert::AlertLayer;
pub use noty::NotyLayer;
pub use toastr::ToastrLayer;

use crate::error::{NotyError, Result};
use crate::flash::FlashType;
use crate::options::Options;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Prefix of generated layer ids.
pub const LAYER_ID_PREFIX: &str = "noty-layer-";

fn default_title_delimiter() -> Option<String> {
	Some("|".to_string())
}

fn default_show_title() -> bool {
	true
}

fn is_default_title_delimiter(delimiter: &Option<String>) -> bool {
	*delimiter == default_title_delimiter()
}

fn is_default_show_title(show_title: &bool) -> bool {
	*show_title == default_show_title()
}

/// Layer-specific tunables, forwarded verbatim to the layer and to polls.
///
/// Keys this crate does not interpret are kept in `extra` and travel with the
/// poll payload unchanged. Fields left at their defaults are not serialized, so
/// the payload carries what the caller set plus `layerId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerOptions {
	/// Container id; generated when absent so that polls can carry it back.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub layer_id: Option<String>,

	/// Splits `"Title|Body"` messages into a title and a body. `None` disables.
	#[serde(
		default = "default_title_delimiter",
		skip_serializing_if = "is_default_title_delimiter"
	)]
	pub custom_title_delimiter: Option<String>,

	#[serde(
		default = "default_show_title",
		skip_serializing_if = "is_default_show_title"
	)]
	pub show_title: bool,

	/// Per-type overrides for the default title.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub titles: BTreeMap<FlashType, String>,

	#[serde(flatten)]
	pub extra: Options,
}

impl Default for LayerOptions {
	fn default() -> Self {
		Self {
			layer_id: None,
			custom_title_delimiter: default_title_delimiter(),
			show_title: default_show_title(),
			titles: BTreeMap::new(),
			extra: Options::new(),
		}
	}
}

impl LayerOptions {
	pub fn with_layer_id(mut self, layer_id: impl Into<String>) -> Self {
		self.layer_id = Some(layer_id.into());
		self
	}

	pub fn with_title_delimiter(mut self, delimiter: Option<&str>) -> Self {
		self.custom_title_delimiter = delimiter.map(str::to_string);
		self
	}

	pub fn with_show_title(mut self, show_title: bool) -> Self {
		self.show_title = show_title;
		self
	}

	pub fn with_title(mut self, kind: FlashType, title: impl Into<String>) -> Self {
		self.titles.insert(kind, title.into());
		self
	}

	/// Title used for `kind` when none is given explicitly.
	pub fn title_for(&self, kind: FlashType) -> String {
		self.titles
			.get(&kind)
			.cloned()
			.unwrap_or_else(|| kind.default_title().to_string())
	}

	/// Boolean switch carried in the uninterpreted options.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::layer::LayerOptions;
	///
	/// let options: LayerOptions = serde_json::from_str(r#"{"registerAnimateCss": true}"#).unwrap();
	/// assert!(options.flag("registerAnimateCss", false));
	/// assert!(options.flag("registerAssets", true));
	/// ```
	pub fn flag(&self, key: &str, default: bool) -> bool {
		self.extra
			.get(key)
			.and_then(|value| value.as_bool())
			.unwrap_or(default)
	}

	/// Base URL for a layer's client library, `assetUrl` overriding `default`.
	pub fn asset_url<'a>(&'a self, default: &'a str) -> &'a str {
		self.extra
			.get("assetUrl")
			.and_then(|value| value.as_str())
			.map(|url| url.trim_end_matches('/'))
			.filter(|url| !url.is_empty())
			.unwrap_or(default)
	}

	/// Split a `"Title|Body"` message on the first delimiter.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::layer::LayerOptions;
	///
	/// let options = LayerOptions::default();
	/// assert_eq!(
	///     options.split_title("Heads up | Disk almost full"),
	///     Some(("Heads up".to_string(), "Disk almost full".to_string()))
	/// );
	/// assert_eq!(options.split_title("plain"), None);
	/// ```
	pub fn split_title(&self, message: &str) -> Option<(String, String)> {
		let delimiter = self.custom_title_delimiter.as_deref()?;
		if delimiter.is_empty() {
			return None;
		}
		let (title, body) = message.split_once(delimiter)?;
		Some((title.trim().to_string(), body.trim().to_string()))
	}
}

/// The notification currently staged on a layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedNotification {
	pub kind: Option<FlashType>,
	pub title: Option<String>,
	pub message: String,
}

impl StagedNotification {
	/// The staged type, or [`NotyError::NothingStaged`].
	pub fn require_kind(&self) -> Result<FlashType> {
		self.kind.ok_or(NotyError::NothingStaged)
	}

	/// Title to display, honoring `showTitle`. Empty titles are not shown.
	pub fn display_title(&self, show_title: bool) -> Option<&str> {
		if !show_title {
			return None;
		}
		self.title.as_deref().filter(|title| !title.is_empty())
	}
}

/// Identity, options and staged state every layer carries.
#[derive(Debug, Clone)]
pub struct LayerBase {
	layer_id: String,
	options: LayerOptions,
	staged: StagedNotification,
}

impl LayerBase {
	/// Adopt the configured layer id, or generate a fresh one.
	pub fn new(mut options: LayerOptions) -> Self {
		let layer_id = match options.layer_id.as_deref().map(str::trim) {
			Some(id) if !id.is_empty() => id.to_string(),
			_ => generate_layer_id(),
		};
		options.layer_id = Some(layer_id.clone());
		Self {
			layer_id,
			options,
			staged: StagedNotification::default(),
		}
	}

	pub fn layer_id(&self) -> &str {
		&self.layer_id
	}

	/// Options as the layer sees them, `layerId` always set.
	pub fn options(&self) -> &LayerOptions {
		&self.options
	}

	pub fn staged(&self) -> &StagedNotification {
		&self.staged
	}
}

/// Generate a container id unique to one widget instantiation.
pub fn generate_layer_id() -> String {
	format!("{}{}", LAYER_ID_PREFIX, Uuid::new_v4().simple())
}

/// A pluggable notification renderer.
///
/// Not reentrant: stage and render one notification at a time.
pub trait Layer: Send + Sync {
	/// Registry name of this layer.
	fn name(&self) -> &'static str;

	fn base(&self) -> &LayerBase;

	fn base_mut(&mut self) -> &mut LayerBase;

	/// Options merged beneath the caller's options.
	fn default_options(&self) -> Options {
		Options::new()
	}

	/// Render the staged notification with the merged options.
	fn notification(&self, options: &Options) -> Result<String>;

	/// Markup for the page `<head>` on the initial render, such as the client
	/// library's includes. Polls never emit it.
	fn head_markup(&self, _options: &Options) -> Result<String> {
		Ok(String::new())
	}

	fn layer_id(&self) -> &str {
		self.base().layer_id()
	}

	fn layer_options(&self) -> &LayerOptions {
		self.base().options()
	}

	fn staged(&self) -> &StagedNotification {
		self.base().staged()
	}

	fn set_type(&mut self, kind: FlashType) {
		self.base_mut().staged.kind = Some(kind);
	}

	/// Stage a title; `None` derives it from the staged type.
	fn set_title(&mut self, title: Option<&str>) {
		let base = self.base_mut();
		base.staged.title = match title {
			Some(title) => Some(title.to_string()),
			None => base.staged.kind.map(|kind| base.options.title_for(kind)),
		};
	}

	/// Stage a message. A delimited message also replaces the staged title.
	fn set_message(&mut self, message: &str) {
		let base = self.base_mut();
		match base.options.split_title(message) {
			Some((title, body)) => {
				base.staged.title = Some(title);
				base.staged.message = body;
			}
			None => base.staged.message = message.to_string(),
		}
	}
}

/// `<link rel="stylesheet">` for `href`.
pub(crate) fn stylesheet(href: &str) -> String {
	format!(r#"<link rel="stylesheet" href="{}">"#, escape_html(href))
}

/// `<script src>` for `src`.
pub(crate) fn script_src(src: &str) -> String {
	format!(r#"<script src="{}"></script>"#, escape_html(src))
}

/// Escape text for inclusion in HTML markup.
pub(crate) fn escape_html(text: &str) -> String {
	let mut result = String::with_capacity(text.len() + 10);
	for ch in text.chars() {
		match ch {
			'&' => result.push_str("&amp;"),
			'<' => result.push_str("&lt;"),
			'>' => result.push_str("&gt;"),
			'"' => result.push_str("&quot;"),
			'\'' => result.push_str("&#x27;"),
			_ => result.push(ch),
		}
	}
	result
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_generated_layer_ids_are_unique() {
		let first = LayerBase::new(LayerOptions::default());
		let second = LayerBase::new(LayerOptions::default());

		assert!(first.layer_id().starts_with(LAYER_ID_PREFIX));
		assert_ne!(first.layer_id(), second.layer_id());
	}

	#[rstest]
	fn test_configured_layer_id_is_kept() {
		let base = LayerBase::new(LayerOptions::default().with_layer_id("flash-box"));
		assert_eq!(base.layer_id(), "flash-box");
		assert_eq!(base.options().layer_id.as_deref(), Some("flash-box"));
	}

	#[rstest]
	#[case(Some(""))]
	#[case(Some("   "))]
	#[case(None)]
	fn test_blank_layer_id_is_regenerated(#[case] configured: Option<&str>) {
		let mut options = LayerOptions::default();
		options.layer_id = configured.map(str::to_string);
		let base = LayerBase::new(options);
		assert!(base.layer_id().starts_with(LAYER_ID_PREFIX));
	}

	#[rstest]
	fn test_set_title_defaults_from_type() {
		let mut layer = AlertLayer::new(LayerOptions::default());
		layer.set_type(FlashType::Warning);
		layer.set_title(None);
		assert_eq!(layer.staged().title.as_deref(), Some("Warning"));
	}

	#[rstest]
	fn test_set_title_uses_override_table() {
		let options = LayerOptions::default().with_title(FlashType::Error, "Erreur");
		let mut layer = AlertLayer::new(options);
		layer.set_type(FlashType::Error);
		layer.set_title(None);
		assert_eq!(layer.staged().title.as_deref(), Some("Erreur"));
	}

	#[rstest]
	fn test_set_message_splits_custom_title() {
		let mut layer = AlertLayer::new(LayerOptions::default());
		layer.set_type(FlashType::Info);
		layer.set_title(None);
		layer.set_message("Maintenance|Back at 6pm|sharp");

		let staged = layer.staged();
		assert_eq!(staged.title.as_deref(), Some("Maintenance"));
		assert_eq!(staged.message, "Back at 6pm|sharp");
	}

	#[rstest]
	fn test_set_message_without_delimiter_keeps_title() {
		let options = LayerOptions::default().with_title_delimiter(None);
		let mut layer = AlertLayer::new(options);
		layer.set_type(FlashType::Info);
		layer.set_title(None);
		layer.set_message("a|b");

		assert_eq!(layer.staged().title.as_deref(), Some("Info"));
		assert_eq!(layer.staged().message, "a|b");
	}

	#[rstest]
	fn test_display_title_hidden() {
		let staged = StagedNotification {
			kind: Some(FlashType::Info),
			title: Some("Info".into()),
			message: "m".into(),
		};
		assert_eq!(staged.display_title(true), Some("Info"));
		assert_eq!(staged.display_title(false), None);
	}

	#[rstest]
	fn test_layer_options_wire_format() {
		let options: LayerOptions = serde_json::from_value(serde_json::json!({
			"layerId": "abc",
			"customTitleDelimiter": null,
			"registerAnimateCss": true,
			"titles": {"success": "Done"}
		}))
		.unwrap();

		assert_eq!(options.layer_id.as_deref(), Some("abc"));
		assert_eq!(options.custom_title_delimiter, None);
		assert!(options.show_title);
		assert_eq!(options.title_for(FlashType::Success), "Done");
		assert_eq!(options.extra["registerAnimateCss"], true);

		let back = serde_json::to_value(&options).unwrap();
		assert_eq!(back["registerAnimateCss"], true);
		assert_eq!(back["layerId"], "abc");
	}

	#[rstest]
	fn test_asset_url_override() {
		let mut options = LayerOptions::default();
		assert_eq!(options.asset_url("https://cdn.test/lib"), "https://cdn.test/lib");

		options.extra.insert("assetUrl".into(), "/static/lib/".into());
		assert_eq!(options.asset_url("https://cdn.test/lib"), "/static/lib");
	}

	#[rstest]
	fn test_include_tags_escape_urls() {
		assert_eq!(
			script_src("/a.js?x=1&y=\"2\""),
			r#"<script src="/a.js?x=1&amp;y=&quot;2&quot;"></script>"#
		);
		assert_eq!(stylesheet("/a.css"), r#"<link rel="stylesheet" href="/a.css">"#);
	}

	#[rstest]
	fn test_defaults_are_not_serialized() {
		let options = LayerOptions::default().with_layer_id("box");
		assert_eq!(
			serde_json::to_value(&options).unwrap(),
			serde_json::json!({"layerId": "box"})
		);

		let disabled = LayerOptions::default()
			.with_title_delimiter(None)
			.with_show_title(false);
		let value = serde_json::to_value(&disabled).unwrap();
		assert_eq!(
			value,
			serde_json::json!({"customTitleDelimiter": null, "showTitle": false})
		);
		let back: LayerOptions = serde_json::from_value(value).unwrap();
		assert_eq!(back, disabled);
	}

	#[rstest]
	fn test_escape_html() {
		assert_eq!(
			escape_html("<b>\"Tom\" & 'Jerry'</b>"),
			"&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
		);
	}
}
