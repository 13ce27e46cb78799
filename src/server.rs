//! HTTP/1 server driving a [`Handler`]

use crate::http::{Handler, Request, Response};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP server handing every request to one handler.
pub struct HttpServer {
	handler: Arc<dyn Handler>,
}

impl HttpServer {
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use reinhardt_noty::http::{Handler, Request, Response};
	/// use reinhardt_noty::server::HttpServer;
	///
	/// struct Hello;
	///
	/// #[async_trait::async_trait]
	/// impl Handler for Hello {
	///     async fn handle(&self, _req: Request) -> reinhardt_noty::Result<Response> {
	///         Ok(Response::ok().with_body("Hello"))
	///     }
	/// }
	///
	/// let server = HttpServer::new(Arc::new(Hello));
	/// ```
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self { handler }
	}

	/// Bind `addr` and serve until an accept error occurs.
	pub async fn listen(self, addr: SocketAddr) -> Result<(), ServerError> {
		let listener = TcpListener::bind(addr).await?;
		self.serve(listener, std::future::pending()).await
	}

	/// Serve connections from `listener` until `shutdown` resolves.
	///
	/// Connections already accepted keep running on their own tasks.
	pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
	where
		F: Future<Output = ()>,
	{
		let local_addr = listener.local_addr()?;
		tracing::info!(address = %local_addr, "server listening");

		tokio::pin!(shutdown);
		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, remote_addr) = result?;
					let handler = Arc::clone(&self.handler);
					tokio::task::spawn(async move {
						if let Err(err) = Self::handle_connection(stream, remote_addr, handler).await {
							tracing::warn!(remote = %remote_addr, error = %err, "error handling connection");
						}
					});
				}
				_ = &mut shutdown => {
					tracing::info!(address = %local_addr, "shutdown signal received, stopping server");
					break;
				}
			}
		}

		Ok(())
	}

	/// Serve HTTP/1 requests arriving on one TCP connection.
	pub async fn handle_connection(
		stream: TcpStream,
		remote_addr: SocketAddr,
		handler: Arc<dyn Handler>,
	) -> Result<(), ServerError> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr,
		};

		http1::Builder::new().serve_connection(io, service).await?;

		Ok(())
	}
}

struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = ServerError;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = Arc::clone(&self.handler);
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body = body.collect().await?.to_bytes();

			let request = Request::new(parts.method, parts.uri, parts.version, parts.headers, body);
			let method = request.method.clone();
			let path = request.path().to_string();

			let response = handler.handle(request).await.unwrap_or_else(|err| {
				tracing::warn!(%method, %path, error = %err, "request failed");
				Response::from(err)
			});
			tracing::debug!(
				remote = %remote_addr,
				%method,
				%path,
				status = response.status.as_u16(),
				"request handled"
			);

			let mut builder = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				builder = builder.header(key, value);
			}

			Ok(builder.body(Full::new(response.body))?)
		})
	}
}
