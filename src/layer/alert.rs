//! Browser `alert()` layer, the default

use super::{Layer, LayerBase, LayerOptions};
use crate::error::Result;
use crate::options::Options;
use crate::script::script_json;

/// Renders each notification as a blocking `alert()` call.
///
/// Needs no client library; options are accepted and ignored.
#[derive(Debug, Clone)]
pub struct AlertLayer {
	base: LayerBase,
}

impl AlertLayer {
	pub const NAME: &'static str = "alert";

	pub fn new(options: LayerOptions) -> Self {
		Self {
			base: LayerBase::new(options),
		}
	}
}

impl Layer for AlertLayer {
	fn name(&self) -> &'static str {
		Self::NAME
	}

	fn base(&self) -> &LayerBase {
		&self.base
	}

	fn base_mut(&mut self) -> &mut LayerBase {
		&mut self.base
	}

	fn notification(&self, _options: &Options) -> Result<String> {
		let staged = self.staged();
		staged.require_kind()?;
		let text = match staged.display_title(self.layer_options().show_title) {
			Some(title) => format!("{}\n{}", title, staged.message),
			None => staged.message.clone(),
		};
		Ok(format!("alert({});", script_json(&text)?))
	}
}
