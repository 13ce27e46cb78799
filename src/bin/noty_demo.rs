//! Demo application: a page rendering the notification widget, an endpoint
//! queueing flashes, and the poll endpoint.
//!
//! ```text
//! RUST_LOG=reinhardt_noty=debug cargo run --bin noty-demo
//! ```
//!
//! Settings are read from `noty.toml` in the working directory (optional) and
//! `NOTY_*` environment variables. `NOTY_ADDR` selects the listen address.

use async_trait::async_trait;
use hyper::{Method, StatusCode};
use reinhardt_noty::prelude::*;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tera::{Context, Tera};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Notifications</title>
<script src="https://code.jquery.com/jquery-3.7.1.min.js"></script>
{{ head | safe }}
</head>
<body>
<h1>Notifications</h1>
<p><a href="/flash?type=success&amp;message=Saved&amp;next=/">Queue a flash and reload</a></p>
<p><button id="queue">Queue a flash over ajax</button></p>
{{ widget | safe }}
<script>
$('#queue').on('click', function () {
	$.get('/flash', {type: 'info', message: 'Background job|Finished at ' + new Date().toLocaleTimeString()});
});
</script>
{{ end_of_body | safe }}
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
struct FlashQuery {
	#[serde(rename = "type")]
	kind: String,
	message: String,
	next: Option<String>,
}

struct DemoApp {
	settings: Arc<NotySettings>,
	registry: Arc<LayerRegistry>,
	sessions: SessionFlashStore,
	poll: PollHandler,
}

impl DemoApp {
	fn new(settings: NotySettings) -> Self {
		let settings = Arc::new(settings);
		let registry = Arc::new(LayerRegistry::with_builtin());
		let sessions = SessionFlashStore::new(settings.session_cookie.clone());
		let poll = PollHandler::new(
			Arc::clone(&registry),
			Arc::clone(&settings),
			Arc::new(sessions.clone()),
		);
		Self {
			settings,
			registry,
			sessions,
			poll,
		}
	}

	fn index(&self, request: &Request) -> Result<Response> {
		let (session_id, fresh) = match request.cookie(self.sessions.cookie_name()) {
			Some(id) if !id.is_empty() => (id, false),
			_ => (Uuid::new_v4().simple().to_string(), true),
		};

		let widget = NotyWidget::from_settings(&self.settings, Arc::clone(&self.registry));
		let rendered = widget.render(&self.sessions.session(&session_id))?;
		self.sessions.prune(&session_id);

		let mut context = Context::new();
		context.insert("head", &rendered.head);
		context.insert("widget", &rendered.body);
		context.insert("end_of_body", &rendered.end_of_body);
		let page = Tera::one_off(PAGE, &context, false)?;

		let mut response = Response::html(page);
		if fresh {
			let cookie = format!(
				"{}={}; Path=/; HttpOnly; SameSite=Lax",
				self.sessions.cookie_name(),
				session_id
			);
			response = response.with_header("Set-Cookie", &cookie);
		}
		Ok(response)
	}

	fn queue(&self, request: &Request) -> Result<Response> {
		let query: FlashQuery = request.query()?;
		let session_id = self.sessions.session_id(request).ok_or_else(|| {
			NotyError::MalformedRequest("load the page first to get a session cookie".into())
		})?;
		self.sessions
			.session(&session_id)
			.add(&query.kind, &query.message)?;
		tracing::info!(session = %session_id, flash_type = %query.kind, "queued flash");

		match query.next.filter(|next| next.starts_with('/') && !next.starts_with("//")) {
			Some(next) => Ok(Response::new(StatusCode::SEE_OTHER).with_header("Location", &next)),
			None => Ok(Response::new(StatusCode::NO_CONTENT)),
		}
	}
}

#[async_trait]
impl Handler for DemoApp {
	async fn handle(&self, request: Request) -> Result<Response> {
		if request.path() == self.poll.poll_url() {
			return self.poll.handle(request).await;
		}
		match (&request.method, request.path()) {
			(&Method::GET, "/") => self.index(&request),
			(&Method::GET, "/flash") => self.queue(&request),
			_ => Ok(Response::not_found().with_body("Not Found")),
		}
	}
}

fn setup_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
	setup_tracing();

	let settings = NotySettings::from_file("noty.toml")?.with_env_overrides("NOTY_")?;
	let addr: SocketAddr = std::env::var("NOTY_ADDR")
		.unwrap_or_else(|_| "127.0.0.1:8000".to_string())
		.parse()?;

	tracing::info!(layer = %settings.layer_class, poll_url = %settings.poll_url, "starting noty demo");

	let listener = TcpListener::bind(addr).await?;
	let server = HttpServer::new(Arc::new(DemoApp::new(settings)));
	server
		.serve(listener, async {
			if let Err(err) = tokio::signal::ctrl_c().await {
				tracing::error!(error = %err, "failed to listen for shutdown signal");
				std::future::pending::<()>().await;
			}
		})
		.await
}
