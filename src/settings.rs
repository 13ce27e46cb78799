//! Widget settings loaded from TOML and the environment
//!
//! ```toml
//! layer_class = "noty"
//! poll_url = "/noty/"
//! flash_types = ["success", "error"]
//!
//! [options]
//! timeout = 3000
//! layout = "topRight"
//!
//! [layer_options]
//! customTitleDelimiter = "|"
//! ```

use crate::error::{NotyError, Result};
use crate::flash::{FlashType, FlashTypes};
use crate::layer::LayerOptions;
use crate::options::Options;
use crate::registry::DEFAULT_LAYER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_layer_class() -> String {
	DEFAULT_LAYER.to_string()
}

fn default_poll_url() -> String {
	"/noty/".to_string()
}

fn default_session_cookie() -> String {
	"sessionid".to_string()
}

fn default_flash_types() -> Vec<FlashType> {
	FlashType::ALL.to_vec()
}

/// Settings for the notification widget and its poll endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotySettings {
	#[serde(default = "default_layer_class")]
	pub layer_class: String,

	/// Endpoint polled after every ajax request.
	#[serde(default = "default_poll_url")]
	pub poll_url: String,

	/// Cookie naming the session whose flashes are drained.
	#[serde(default = "default_session_cookie")]
	pub session_cookie: String,

	#[serde(default = "default_flash_types")]
	pub flash_types: Vec<FlashType>,

	#[serde(default)]
	pub options: Options,

	#[serde(default)]
	pub layer_options: LayerOptions,
}

impl Default for NotySettings {
	fn default() -> Self {
		Self {
			layer_class: default_layer_class(),
			poll_url: default_poll_url(),
			session_cookie: default_session_cookie(),
			flash_types: default_flash_types(),
			options: Options::new(),
			layer_options: LayerOptions::default(),
		}
	}
}

impl NotySettings {
	/// Parse settings from TOML text.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_noty::settings::NotySettings;
	///
	/// let settings = NotySettings::from_toml_str(r#"
	///     layer_class = "toastr"
	///     [options]
	///     timeOut = 3000
	/// "#).unwrap();
	/// assert_eq!(settings.layer_class, "toastr");
	/// assert_eq!(settings.poll_url, "/noty/");
	/// assert_eq!(settings.options["timeOut"], 3000);
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self> {
		let settings: Self =
			toml::from_str(content).map_err(|e| NotyError::Settings(e.to_string()))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from a TOML file. A missing file yields the defaults.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		if !path.exists() {
			tracing::debug!(path = %path.display(), "settings file not found, using defaults");
			return Ok(Self::default());
		}
		let content = fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	/// Override scalar settings from `<prefix>LAYER_CLASS`, `<prefix>POLL_URL`
	/// and `<prefix>SESSION_COOKIE`.
	pub fn with_env_overrides(self, prefix: &str) -> Result<Self> {
		self.with_overrides(|name| std::env::var(format!("{}{}", prefix, name)).ok())
	}

	/// Override scalar settings through an arbitrary lookup.
	pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(layer_class) = lookup("LAYER_CLASS") {
			self.layer_class = layer_class;
		}
		if let Some(poll_url) = lookup("POLL_URL") {
			self.poll_url = poll_url;
		}
		if let Some(cookie) = lookup("SESSION_COOKIE") {
			self.session_cookie = cookie;
		}
		self.validate()?;
		Ok(self)
	}

	/// Check invariants that deserialization cannot express.
	pub fn validate(&self) -> Result<()> {
		if self.layer_class.trim().is_empty() {
			return Err(NotyError::Settings("layer_class must not be empty".into()));
		}
		if !self.poll_url.starts_with('/') {
			return Err(NotyError::Settings(format!(
				"poll_url must be an absolute path, got {:?}",
				self.poll_url
			)));
		}
		if self.session_cookie.trim().is_empty() {
			return Err(NotyError::Settings("session_cookie must not be empty".into()));
		}
		Ok(())
	}

	pub fn flash_types(&self) -> FlashTypes {
		FlashTypes::new(self.flash_types.iter().copied())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;
	use tempfile::TempDir;

	#[rstest]
	fn test_defaults() {
		let settings = NotySettings::default();
		assert_eq!(settings.layer_class, "alert");
		assert_eq!(settings.poll_url, "/noty/");
		assert_eq!(settings.session_cookie, "sessionid");
		assert_eq!(settings.flash_types().iter().count(), 5);
	}

	#[rstest]
	fn test_full_toml() {
		let settings = NotySettings::from_toml_str(
			r#"
			layer_class = "noty"
			poll_url = "/notifications/poll"
			flash_types = ["success", "error"]

			[options]
			timeout = 3000
			theme = "mint"

			[layer_options]
			customTitleDelimiter = "::"
			showTitle = false
			registerAnimateCss = true
			"#,
		)
		.unwrap();

		assert_eq!(settings.layer_class, "noty");
		assert_eq!(settings.poll_url, "/notifications/poll");
		assert!(settings.flash_types().contains("error"));
		assert!(!settings.flash_types().contains("info"));
		assert_eq!(settings.options["theme"], "mint");
		assert_eq!(
			settings.layer_options.custom_title_delimiter.as_deref(),
			Some("::")
		);
		assert!(!settings.layer_options.show_title);
		assert_eq!(settings.layer_options.extra["registerAnimateCss"], true);
	}

	#[rstest]
	fn test_unknown_flash_type_rejected() {
		let result = NotySettings::from_toml_str(r#"flash_types = ["notice"]"#);
		assert!(matches!(result, Err(NotyError::Settings(_))));
	}

	#[rstest]
	#[case(r#"poll_url = "noty""#)]
	#[case(r#"layer_class = "  ""#)]
	#[case(r#"session_cookie = """#)]
	fn test_invalid_settings(#[case] content: &str) {
		assert!(matches!(
			NotySettings::from_toml_str(content),
			Err(NotyError::Settings(_))
		));
	}

	#[rstest]
	fn test_from_file() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("noty.toml");
		fs::write(&path, "layer_class = \"toastr\"\n").unwrap();

		let settings = NotySettings::from_file(&path).unwrap();
		assert_eq!(settings.layer_class, "toastr");
	}

	#[rstest]
	fn test_missing_file_uses_defaults() {
		let temp_dir = TempDir::new().unwrap();
		let settings = NotySettings::from_file(temp_dir.path().join("absent.toml")).unwrap();
		assert_eq!(settings, NotySettings::default());
	}

	#[rstest]
	fn test_overrides() {
		let env: HashMap<&str, &str> = [("LAYER_CLASS", "noty"), ("POLL_URL", "/poll")]
			.into_iter()
			.collect();

		let settings = NotySettings::default()
			.with_overrides(|name| env.get(name).map(|v| v.to_string()))
			.unwrap();

		assert_eq!(settings.layer_class, "noty");
		assert_eq!(settings.poll_url, "/poll");
		assert_eq!(settings.session_cookie, "sessionid");
	}

	#[rstest]
	fn test_invalid_override_rejected() {
		let result = NotySettings::default().with_overrides(|name| {
			(name == "POLL_URL").then(|| "relative".to_string())
		});
		assert!(result.is_err());
	}
}
