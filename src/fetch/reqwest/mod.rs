//! Simple fetcher based on [`reqwest`](https://crates.io/crates/reqwest)
use super::{Error, Fetcher, Response};
use reqwest::header::ACCEPT;
use reqwest_middleware::ClientWithMiddleware;
use std::time::Instant;
use url::Url;

/// Default `Accept` header.
///
/// JSON-LD is preferred, but HTML pages are accepted too since they may
/// embed JSON-LD blocks.
pub const DEFAULT_ACCEPT: &str =
	"application/ld+json, application/json, text/html;q=0.8, */*;q=0.1";

/// Fetcher options.
pub struct Options {
	/// HTTP client.
	///
	/// Regular HTTP redirections are controlled by the client.
	pub client: ClientWithMiddleware,

	/// `Accept` header sent with every request.
	pub accept: String,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			client: reqwest_middleware::ClientBuilder::new(reqwest::Client::default()).build(),
			accept: DEFAULT_ACCEPT.to_owned(),
		}
	}
}

/// `reqwest`-based fetcher.
///
/// Only works with the [`tokio`](https://tokio.rs/) runtime.
///
/// Fetched documents are not cached: a new network query is made each time
/// an URL is fetched even if it has already been queried before.
#[derive(Default)]
pub struct ReqwestFetcher {
	options: Options,
}

impl ReqwestFetcher {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a new fetcher with the given options.
	pub fn new_using(options: Options) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &Options {
		&self.options
	}
}

impl Fetcher for ReqwestFetcher {
	async fn fetch(&self, url: &Url) -> Result<Response, Error> {
		log::debug!("downloading: {}", url);
		let start = Instant::now();

		let response = self
			.options
			.client
			.get(url.as_str())
			.header(ACCEPT, &self.options.accept)
			.send()
			.await
			.map_err(|e| Error::Reqwest(url.clone(), e))?;

		let final_url = response.url().clone();
		let status = response.status();
		let headers = response.headers().clone();
		let body = response
			.bytes()
			.await
			.map_err(|e| Error::Reqwest(url.clone(), e.into()))?;

		log::debug!(
			"downloaded: {} ({}, {} bytes in {:?})",
			final_url,
			status,
			body.len(),
			start.elapsed()
		);

		Ok(Response::new(final_url, status, headers, body))
	}
}
