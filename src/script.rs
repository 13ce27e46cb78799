//! Structured poll payload and the client-side polling module
//!
//! Nothing here interpolates values into executable script. The widget emits
//! its configuration as an inert JSON document
//! (`<script type="application/json" data-noty-poll>`), and the static
//! [`POLL_MODULE`] reads every such document and wires up the polling handler.

use crate::error::Result;
use crate::layer::LayerOptions;
use crate::options::Options;
use serde::{Deserialize, Serialize};

/// Client polling module. Reads payloads, never receives interpolated values.
pub const POLL_MODULE: &str = include_str!("../assets/noty-poll.js");

/// Configuration echoed back by every poll request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollConfig {
	#[serde(default)]
	pub options: Options,
	#[serde(default)]
	pub layer_options: LayerOptions,
}

/// Everything the client module needs to poll for one widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollPayload {
	pub url: String,
	pub layer_class: String,
	pub config: PollConfig,
}

/// Serialize to JSON that is safe to place inside a `<script>` element.
///
/// `<`, `>` and `&` are written as `\u003c`, `\u003e` and `\u0026`; the line
/// separators U+2028 and U+2029 are escaped as well. The output is still valid
/// JSON and a valid JavaScript expression.
///
/// # Examples
///
/// ```
/// use reinhardt_noty::script::script_json;
///
/// let encoded = script_json(&"</script><b>").unwrap();
/// assert_eq!(encoded, r#""\u003c/script\u003e\u003cb\u003e""#);
/// ```
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
	let raw = serde_json::to_string(value)?;
	let mut escaped = String::with_capacity(raw.len() + 16);
	for ch in raw.chars() {
		match ch {
			'<' => escaped.push_str("\\u003c"),
			'>' => escaped.push_str("\\u003e"),
			'&' => escaped.push_str("\\u0026"),
			'\u{2028}' => escaped.push_str("\\u2028"),
			'\u{2029}' => escaped.push_str("\\u2029"),
			_ => escaped.push(ch),
		}
	}
	Ok(escaped)
}

/// Wrap script source in a `<script>` element.
pub fn script_tag(source: &str) -> String {
	format!("<script>{}</script>", source)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_script_json_round_trips_through_parser() {
		let value = json!({"text": "a < b && c > d \u{2028}"});
		let encoded = script_json(&value).unwrap();

		assert!(!encoded.contains('<'));
		assert!(!encoded.contains('&'));
		assert!(!encoded.contains('\u{2028}'));
		let decoded: serde_json::Value = serde_json::from_str(&encoded).unwrap();
		assert_eq!(decoded, value);
	}

	#[rstest]
	fn test_payload_wire_names() {
		let payload = PollPayload {
			url: "/noty/".into(),
			layer_class: "alert".into(),
			config: PollConfig::default(),
		};
		let value = serde_json::to_value(&payload).unwrap();

		assert_eq!(value["layerClass"], "alert");
		assert!(value["config"]["layerOptions"].is_object());
		assert!(value["config"]["options"].is_object());
	}

	#[rstest]
	fn test_poll_config_tolerates_missing_sections() {
		let config: PollConfig = serde_json::from_str("{}").unwrap();
		assert!(config.options.is_empty());
		assert_eq!(config.layer_options.layer_id, None);
	}

	#[rstest]
	fn test_poll_module_skips_own_endpoint() {
		assert!(POLL_MODULE.contains("ajaxComplete"));
		assert!(POLL_MODULE.contains("settings.url === payload.url"));
	}

	#[rstest]
	fn test_script_tag() {
		assert_eq!(script_tag("alert(1);"), "<script>alert(1);</script>");
	}
}
