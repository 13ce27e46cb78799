//! Layer registry: constructs layers from a registered name
//!
//! Unknown names are a configuration error; there is no fallback layer.
//!
//! ```rust
//! use reinhardt_noty::layer::LayerOptions;
//! use reinhardt_noty::registry::LayerRegistry;
//!
//! let registry = LayerRegistry::with_builtin();
//! let layer = registry.create("noty", LayerOptions::default()).unwrap();
//! assert_eq!(layer.name(), "noty");
//!
//! assert!(registry.create("growl", LayerOptions::default()).is_err());
//! ```

use crate::error::{NotyError, Result};
use crate::layer::{AlertLayer, Layer, LayerOptions, NotyLayer, ToastrLayer};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Layer used when no layer class is configured.
pub const DEFAULT_LAYER: &str = AlertLayer::NAME;

/// Constructor registered under a layer name.
pub type LayerFactory = Arc<dyn Fn(LayerOptions) -> Result<Box<dyn Layer>> + Send + Sync>;

/// Registry mapping layer names to their constructors.
pub struct LayerRegistry {
	factories: RwLock<HashMap<String, LayerFactory>>,
}

fn normalize(name: &str) -> String {
	name.trim().to_ascii_lowercase()
}

impl LayerRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self {
			factories: RwLock::new(HashMap::new()),
		}
	}

	/// Create a registry holding the `alert`, `toastr` and `noty` layers.
	pub fn with_builtin() -> Self {
		let registry = Self::new();
		let builtin: [(&str, LayerFactory); 3] = [
			(
				AlertLayer::NAME,
				Arc::new(|options: LayerOptions| Ok(Box::new(AlertLayer::new(options)) as Box<dyn Layer>)),
			),
			(
				ToastrLayer::NAME,
				Arc::new(|options: LayerOptions| Ok(Box::new(ToastrLayer::new(options)) as Box<dyn Layer>)),
			),
			(
				NotyLayer::NAME,
				Arc::new(|options: LayerOptions| Ok(Box::new(NotyLayer::new(options)) as Box<dyn Layer>)),
			),
		];
		{
			let mut factories = registry.factories.write();
			for (name, factory) in builtin {
				factories.insert(name.to_string(), factory);
			}
		}
		registry
	}

	/// Register a layer constructor under `name`.
	///
	/// # Errors
	///
	/// Returns [`NotyError::AlreadyRegistered`] if the name is taken, and
	/// [`NotyError::Configuration`] for a blank name.
	pub fn register<F>(&self, name: &str, factory: F) -> Result<()>
	where
		F: Fn(LayerOptions) -> Result<Box<dyn Layer>> + Send + Sync + 'static,
	{
		let key = normalize(name);
		if key.is_empty() {
			return Err(NotyError::Configuration("layer name must not be empty".into()));
		}
		let mut factories = self.factories.write();
		if factories.contains_key(&key) {
			return Err(NotyError::AlreadyRegistered(key));
		}
		tracing::debug!(layer = %key, "registered notification layer");
		factories.insert(key, Arc::new(factory));
		Ok(())
	}

	/// Build the layer registered under `name`.
	///
	/// # Errors
	///
	/// Returns [`NotyError::Configuration`] when no layer has that name, or
	/// whatever error the factory reports.
	pub fn create(&self, name: &str, options: LayerOptions) -> Result<Box<dyn Layer>> {
		let key = normalize(name);
		let factory = self
			.factories
			.read()
			.get(&key)
			.cloned()
			.ok_or_else(|| NotyError::Configuration(format!("unknown layer class: {}", name)))?;
		factory(options)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.factories.read().contains_key(&normalize(name))
	}

	/// Registered names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
		names.sort();
		names
	}
}

impl Default for LayerRegistry {
	fn default() -> Self {
		Self::with_builtin()
	}
}

impl fmt::Debug for LayerRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LayerRegistry")
			.field("layers", &self.names())
			.finish()
	}
}
