//! Noty layer

use super::{Layer, LayerBase, LayerOptions, escape_html, script_src, stylesheet};
use crate::error::Result;
use crate::options::Options;
use crate::script::{script_json, script_tag};
use serde_json::{Value, json};

/// Renders notifications as `new Noty({...}).show()`.
///
/// Noty treats `text` as markup, so title and message are HTML-escaped before
/// being composed.
#[derive(Debug, Clone)]
pub struct NotyLayer {
	base: LayerBase,
}

/// Default location of the Noty distribution.
pub const NOTY_ASSET_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/noty/3.1.4";

/// Stylesheet `registerAnimateCss` adds.
pub const ANIMATE_CSS_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/animate.css/3.7.2/animate.min.css";

/// Routes clicks on `[data-confirm]` elements through a modal Noty dialog.
pub const CONFIRM_MODULE: &str = include_str!("../../assets/noty-confirm.js");

fn is_theme_name(theme: &str) -> bool {
	!theme.is_empty()
		&& theme
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl NotyLayer {
	pub const NAME: &'static str = "noty";

	pub fn new(options: LayerOptions) -> Self {
		Self {
			base: LayerBase::new(options),
		}
	}

	fn text(&self) -> String {
		let staged = self.staged();
		match staged.display_title(self.layer_options().show_title) {
			Some(title) => format!(
				"<b>{}</b><br>{}",
				escape_html(title),
				escape_html(&staged.message)
			),
			None => escape_html(&staged.message),
		}
	}
}

impl Layer for NotyLayer {
	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn base(&self) -> &LayerBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut LayerBase {
		&mut self.base
	}

	fn default_options(&self) -> Options {
		match json!({
			"layout": "topRight",
			"theme": "relax",
			"timeout": 5000,
			"progressBar": true,
		}) {
			Value::Object(map) => map,
			_ => Options::new(),
		}
	}

	/// Noty's stylesheet, the selected theme and script, plus the features
	/// switched on by `registerAnimateCss` and `overrideSystemConfirm`.
	fn head_markup(&self, options: &Options) -> Result<String> {
		let layer_options = self.layer_options();
		let mut parts = Vec::new();

		if layer_options.flag("registerAssets", true) {
			let base = layer_options.asset_url(NOTY_ASSET_URL);
			parts.push(stylesheet(&format!("{}/noty.css", base)));
			if let Some(theme) = options.get("theme").and_then(Value::as_str) {
				if is_theme_name(theme) {
					parts.push(stylesheet(&format!("{}/themes/{}.css", base, theme)));
				} else {
					tracing::warn!(theme, "ignoring invalid noty theme name");
				}
			}
			parts.push(script_src(&format!("{}/noty.min.js", base)));
		}
		if layer_options.flag("registerAnimateCss", false) {
			parts.push(stylesheet(ANIMATE_CSS_URL));
		}
		if layer_options.flag("overrideSystemConfirm", false) {
			parts.push(script_tag(CONFIRM_MODULE));
		}

		Ok(parts.join("\n"))
	}

	fn notification(&self, options: &Options) -> Result<String> {
		let kind = self.staged().require_kind()?;
		let mut config = options.clone();
		config.insert("type".to_string(), Value::from(kind.as_str()));
		config.insert("text".to_string(), Value::from(self.text()));
		Ok(format!("new Noty({}).show();", script_json(&config)?))
	}
}
