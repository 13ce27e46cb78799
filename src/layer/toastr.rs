//! Toastr layer

use super::{Layer, LayerBase, LayerOptions, script_src, stylesheet};
use crate::error::Result;
use crate::flash::FlashType;
use crate::options::Options;
use crate::script::script_json;
use serde_json::json;

/// Renders notifications through `toastr`.
///
/// Toastr has no `alert` method, so alerts are shown as `info`.
#[derive(Debug, Clone)]
pub struct ToastrLayer {
	base: LayerBase,
}

/// Default location of the toastr distribution.
pub const TOASTR_ASSET_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/toastr.js/2.1.4";

impl ToastrLayer {
	pub const NAME: &'static str = "toastr";

	pub fn new(options: LayerOptions) -> Self {
		Self {
			base: LayerBase::new(options),
		}
	}

	fn method(kind: FlashType) -> &'static str {
		match kind {
			FlashType::Alert | FlashType::Info => "info",
			FlashType::Success => "success",
			FlashType::Error => "error",
			FlashType::Warning => "warning",
		}
	}
}

impl Layer for ToastrLayer {
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
		let defaults = json!({
			"closeButton": false,
			"progressBar": true,
			"positionClass": "toast-top-right",
			"timeOut": 5000,
			"escapeHtml": true,
		});
		match defaults {
			serde_json::Value::Object(map) => map,
			_ => Options::new(),
		}
	}

	/// Toastr's stylesheet and script, unless `registerAssets` is `false`.
	/// Toastr needs jQuery loaded first.
	fn head_markup(&self, _options: &Options) -> Result<String> {
		let layer_options = self.layer_options();
		if !layer_options.flag("registerAssets", true) {
			return Ok(String::new());
		}
		let base = layer_options.asset_url(TOASTR_ASSET_URL);
		Ok(format!(
			"{}\n{}",
			stylesheet(&format!("{}/toastr.min.css", base)),
			script_src(&format!("{}/toastr.min.js", base)),
		))
	}

	fn notification(&self, options: &Options) -> Result<String> {
		let staged = self.staged();
		let kind = staged.require_kind()?;
		let title = staged
			.display_title(self.layer_options().show_title)
			.unwrap_or_default();
		Ok(format!(
			"toastr[{}]({}, {}, {});",
			script_json(Self::method(kind))?,
			script_json(&staged.message)?,
			script_json(title)?,
			script_json(options)?,
		))
	}
}
