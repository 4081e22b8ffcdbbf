//! Network access.
//!
//! Components never talk to the network directly: they are given a
//! [`Fetcher`] performing `GET` requests on their behalf.
//!
//! Available implementations:
//!   - [`NoFetcher`], failing on every request.
//!   - Standard [`HashMap`] mapping URLs to canned responses. No network
//!     calls are performed.
//!   - [`FsFetcher`] serving registered URL prefixes from a local directory.
//!   - `ReqwestFetcher` actually performing the requests using the
//!     [`reqwest`](https://crates.io/crates/reqwest) library.
//!     This requires the `reqwest` feature to be enabled.
use bytes::Bytes;
use http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode};
use std::{collections::HashMap, string::FromUtf8Error};
use url::Url;

mod content_type;
mod fs;
mod link;

#[cfg(feature = "reqwest")]
pub mod reqwest;

pub use content_type::*;
pub use fs::*;
pub use link::*;

#[cfg(feature = "reqwest")]
pub use self::reqwest::ReqwestFetcher;

/// Fetch error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The server answered with a non-success status code.
	#[error("ERROR {} retrieving {url}", .status.as_u16())]
	Status { url: Url, status: StatusCode },

	#[cfg(feature = "reqwest")]
	#[error("unable to retrieve {0}: {1}")]
	Reqwest(Url, reqwest_middleware::Error),

	#[error("IO error while reading `{0}`: {1}")]
	IO(Url, std::io::Error),

	#[error("no mount point for `{0}`")]
	NoMountPoint(Url),

	#[error("cannot fetch `{0}`")]
	CannotFetch(Url),

	#[error("no response registered for `{0}`")]
	EntryNotFound(Url),

	#[error("invalid encoding in `{0}`: {1}")]
	InvalidEncoding(Url, FromUtf8Error),

	#[error("JSON parse error in `{0}`: {1}")]
	Parse(Url, serde_json::Error),
}

impl Error {
	/// URL of the request that failed.
	pub fn url(&self) -> &Url {
		match self {
			Self::Status { url, .. } => url,
			#[cfg(feature = "reqwest")]
			Self::Reqwest(url, _) => url,
			Self::IO(url, _)
			| Self::NoMountPoint(url)
			| Self::CannotFetch(url)
			| Self::EntryNotFound(url)
			| Self::InvalidEncoding(url, _)
			| Self::Parse(url, _) => url,
		}
	}
}

/// HTTP response.
///
/// Non-success responses are responses too: only transport failures are
/// errors at the [`Fetcher`] level. Use [`Response::error_for_status`] to
/// turn a non-success status into an [`Error`].
#[derive(Debug, Clone)]
pub struct Response {
	/// Final URL of the response, after redirections.
	url: Url,
	status: StatusCode,
	headers: HeaderMap,
	body: Bytes,
}

impl Response {
	pub fn new(url: Url, status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
		Self {
			url,
			status,
			headers,
			body: body.into(),
		}
	}

	/// Creates a `200 OK` response with the given content type.
	pub fn ok(url: Url, content_type: &'static str, body: impl Into<Bytes>) -> Self {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
		Self::new(url, StatusCode::OK, headers, body)
	}

	/// Creates an empty response with the given status.
	pub fn status_only(url: Url, status: StatusCode) -> Self {
		Self::new(url, status, HeaderMap::new(), Bytes::new())
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	pub fn body(&self) -> &Bytes {
		&self.body
	}

	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Returns the first parsable `Content-Type` header, if any.
	pub fn content_type(&self) -> Option<ContentType> {
		self.headers
			.get_all(CONTENT_TYPE)
			.into_iter()
			.find_map(ContentType::new)
	}

	/// Fails if the response status is not a success.
	pub fn error_for_status(self) -> Result<Self, Error> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(Error::Status {
				url: self.url,
				status: self.status,
			})
		}
	}

	/// Decodes the response body as UTF-8 text.
	pub fn text(&self) -> Result<String, Error> {
		String::from_utf8(self.body.to_vec()).map_err(|e| Error::InvalidEncoding(self.url.clone(), e))
	}

	/// Parses the response body as JSON.
	pub fn json(&self) -> Result<serde_json::Value, Error> {
		serde_json::from_slice(&self.body).map_err(|e| Error::Parse(self.url.clone(), e))
	}
}

/// Network access capability.
pub trait Fetcher {
	/// Performs a `GET` request on the given `url`.
	#[allow(async_fn_in_trait)]
	async fn fetch(&self, url: &Url) -> Result<Response, Error>;
}

impl<'f, F: Fetcher> Fetcher for &'f F {
	async fn fetch(&self, url: &Url) -> Result<Response, Error> {
		F::fetch(self, url).await
	}
}

/// Dummy fetcher.
///
/// Fails on every request, for components that must not access the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFetcher;

impl Fetcher for NoFetcher {
	async fn fetch(&self, url: &Url) -> Result<Response, Error> {
		Err(Error::CannotFetch(url.clone()))
	}
}

impl Fetcher for HashMap<Url, Response> {
	async fn fetch(&self, url: &Url) -> Result<Response, Error> {
		log::debug!("downloading: {}", url);
		self.get(url)
			.cloned()
			.ok_or_else(|| Error::EntryNotFound(url.clone()))
	}
}
