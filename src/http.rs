//! Minimal request/response types and the handler trait for the poll endpoint.
//!
//! ```rust
//! use reinhardt_noty::http::{Handler, Request, Response};
//! use async_trait::async_trait;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> reinhardt_noty::Result<Response> {
//!         Ok(Response::ok().with_body("Hello!"))
//!     }
//! }
//! ```

use crate::error::{NotyError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, COOKIE, HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, StatusCode, Uri, Version};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// HTTP request with a fully buffered body.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Request {
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
		}
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Value of the cookie named `name`, if sent.
	///
	/// # Examples
	///
	/// ```
	/// use bytes::Bytes;
	/// use hyper::{HeaderMap, Method, Uri, Version, header::COOKIE};
	/// use reinhardt_noty::http::Request;
	///
	/// let mut headers = HeaderMap::new();
	/// headers.insert(COOKIE, "theme=dark; sessionid=abc123".parse().unwrap());
	/// let request = Request::new(Method::GET, Uri::from_static("/"), Version::HTTP_11, headers, Bytes::new());
	///
	/// assert_eq!(request.cookie("sessionid"), Some("abc123".to_string()));
	/// assert_eq!(request.cookie("missing"), None);
	/// ```
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.headers
			.get_all(COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(|cookies| cookies.split(';'))
			.find_map(|cookie| {
				let (key, value) = cookie.trim().split_once('=')?;
				(key == name).then(|| value.to_string())
			})
	}

	/// Decode an `application/x-www-form-urlencoded` body.
	pub fn form<T: DeserializeOwned>(&self) -> Result<T> {
		serde_urlencoded::from_bytes(&self.body)
			.map_err(|e| NotyError::MalformedRequest(e.to_string()))
	}

	/// Decode the query string.
	pub fn query<T: DeserializeOwned>(&self) -> Result<T> {
		serde_urlencoded::from_str(self.uri.query().unwrap_or_default())
			.map_err(|e| NotyError::MalformedRequest(e.to_string()))
	}
}

/// HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// 200 response carrying an HTML body.
	pub fn html(body: impl Into<Bytes>) -> Self {
		Self::ok()
			.with_body(body)
			.with_content_type("text/html; charset=utf-8")
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set a header. Invalid names or values are ignored.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	pub fn with_content_type(mut self, content_type: &'static str) -> Self {
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
		self
	}

	/// Body as UTF-8 text, lossily decoded.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl From<NotyError> for Response {
	fn from(error: NotyError) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = serde_json::json!({
			"error": error.to_string(),
		});
		match serde_json::to_vec(&body) {
			Ok(bytes) => Response::new(status)
				.with_body(bytes)
				.with_content_type("application/json"),
			Err(_) => Response::internal_server_error(),
		}
	}
}

/// Handler trait for processing requests.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Deserialize;

	fn request(method: Method, uri: &'static str, headers: HeaderMap, body: &'static str) -> Request {
		Request::new(
			method,
			Uri::from_static(uri),
			Version::HTTP_11,
			headers,
			Bytes::from_static(body.as_bytes()),
		)
	}

	#[derive(Debug, Deserialize)]
	struct Form {
		name: String,
	}

	#[rstest]
	fn test_cookie_across_headers() {
		let mut headers = HeaderMap::new();
		headers.append(COOKIE, "a=1".parse().unwrap());
		headers.append(COOKIE, "sessionid=s-42; b=2".parse().unwrap());
		let request = request(Method::GET, "/", headers, "");

		assert_eq!(request.cookie("sessionid").as_deref(), Some("s-42"));
		assert_eq!(request.cookie("b").as_deref(), Some("2"));
	}

	#[rstest]
	fn test_form_decoding() {
		let request = request(Method::POST, "/", HeaderMap::new(), "name=Ada+Lovelace");
		let form: Form = request.form().unwrap();
		assert_eq!(form.name, "Ada Lovelace");
	}

	#[rstest]
	fn test_form_missing_field() {
		let request = request(Method::POST, "/", HeaderMap::new(), "other=1");
		let result: Result<Form> = request.form();
		assert!(matches!(result, Err(NotyError::MalformedRequest(_))));
	}

	#[rstest]
	fn test_query_decoding() {
		let request = request(Method::GET, "/flash?name=x", HeaderMap::new(), "");
		let form: Form = request.query().unwrap();
		assert_eq!(form.name, "x");
	}

	#[rstest]
	fn test_error_response() {
		let response = Response::from(NotyError::Configuration("unknown layer class: x".into()));
		assert_eq!(response.status, StatusCode::BAD_REQUEST);
		assert_eq!(
			response.headers.get(CONTENT_TYPE).unwrap(),
			"application/json"
		);
		let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
		assert_eq!(body["error"], "Configuration error: unknown layer class: x");
	}

	#[rstest]
	fn test_html_response() {
		let response = Response::html("<p>hi</p>");
		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.text(), "<p>hi</p>");
		assert_eq!(
			response.headers.get(CONTENT_TYPE).unwrap(),
			"text/html; charset=utf-8"
		);
	}
}
