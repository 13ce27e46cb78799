//! # Reinhardt Noty
//!
//! Server-rendered flash notifications for Reinhardt applications.
//!
//! Application code queues one-shot "flash" messages in the session. On the
//! next page render the widget drains them through a pluggable layer that
//! emits script for a client popup library (a plain `alert()`, Toastr or
//! Noty). After every ajax request, a small client module polls the server so
//! flashes queued by that request show up without a page reload.
//!
//! ## Core Principles
//!
//! - **At-most-once delivery**: a recognized flash is rendered once, then removed
//! - **Pluggable layers**: popup libraries are registered by name in a [`LayerRegistry`]
//! - **No interpolated script**: client configuration travels as escaped JSON
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_noty::prelude::*;
//!
//! let storage = MemoryFlashStorage::new();
//! storage.add("success", "Profile saved").unwrap();
//! storage.add("error", "Avatar too large").unwrap();
//!
//! let widget = NotyWidget::new().with_layer_class("toastr");
//! let rendered = widget.render(&storage).unwrap();
//!
//! assert_eq!(rendered.notifications.len(), 2);
//! assert!(rendered.body.contains(r#"toastr["success"]("Profile saved""#));
//! assert!(storage.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`flash`]: flash types, values and the storage port
//! - [`layer`]: the layer capability and the built-in layers
//! - [`registry`]: layer construction by name
//! - [`drain`]: the flash drain
//! - [`widget`]: initial render and poll callbacks
//! - [`handler`], [`server`]: the poll endpoint over HTTP
//! - [`settings`]: TOML and environment configuration

pub mod drain;
pub mod error;
pub mod flash;
pub mod handler;
pub mod http;
pub mod layer;
pub mod options;
pub mod registry;
pub mod script;
pub mod server;
pub mod session;
pub mod settings;
pub mod widget;

pub use drain::{Notification, drain, join_scripts};
pub use error::{NotyError, Result};
pub use flash::{FlashStorage, FlashType, FlashTypes, FlashValue, MemoryFlashStorage};
pub use handler::PollHandler;
pub use layer::{AlertLayer, Layer, LayerOptions, NotyLayer, ToastrLayer};
pub use options::{Options, merge_options};
pub use registry::{DEFAULT_LAYER, LayerRegistry};
pub use server::HttpServer;
pub use session::{FlashSessions, SessionFlashStore};
pub use settings::NotySettings;
pub use widget::{NotyWidget, PollRequest, RenderedWidget};

/// Commonly used types.
pub mod prelude {
	pub use crate::{
		FlashSessions, FlashStorage, FlashType, FlashTypes, FlashValue, HttpServer, Layer,
		LayerOptions, LayerRegistry, MemoryFlashStorage, NotyError, NotySettings, NotyWidget,
		Options, PollHandler, PollRequest, RenderedWidget, Result, SessionFlashStore,
	};
	pub use crate::http::{Handler, Request, Response};
}
