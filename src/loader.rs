//! Remote context loader on top of a [`Fetcher`].
use crate::fetch::{self, Fetcher, Link};
use http::header::LINK;
use iref::{Iri, IriBuf};
use json_ld::{syntax::Parse, LoadError, Loader, RemoteDocument};
use url::Url;

/// Loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Fetch(#[from] fetch::Error),

	#[error("invalid URL `{0}`")]
	InvalidUrl(String),

	#[error("invalid content type")]
	InvalidContentType(Url),

	#[error("invalid JSON document `{0}`: {1}")]
	Parse(Url, String),

	#[error("too many redirections")]
	TooManyRedirections(Url),
}

/// Remote context loader using a [`Fetcher`].
///
/// When the response is not a JSON document, the loader follows the
/// `Link: <...>; rel="alternate"; type="application/ld+json"` header, if any.
pub struct FetchLoader<F> {
	fetcher: F,

	/// Maximum number of allowed `Link` header redirections before the loader
	/// fails.
	///
	/// Defaults to 8.
	///
	/// Note: this only controls how many times the loader will use a `Link`
	/// HTTP header to find the target JSON-LD document. Regular HTTP
	/// redirections are handled by the fetcher.
	pub max_redirections: usize,
}

impl<F> FetchLoader<F> {
	pub fn new(fetcher: F) -> Self {
		Self {
			fetcher,
			max_redirections: 8,
		}
	}

	pub fn fetcher(&self) -> &F {
		&self.fetcher
	}

	async fn load_document(&self, url: &Url) -> Result<RemoteDocument<IriBuf>, Error>
	where
		F: Fetcher,
	{
		let mut url = url.clone();
		let mut redirection_number = 0;

		'next_url: loop {
			if redirection_number > self.max_redirections {
				return Err(Error::TooManyRedirections(url));
			}

			let response = self.fetcher.fetch(&url).await?.error_for_status()?;

			match response.content_type() {
				Some(content_type) if content_type.is_json_ld() => {
					let (document, _) = json_ld::syntax::Value::parse_str(&response.text()?)
						.map_err(|e| Error::Parse(response.url().clone(), e.to_string()))?;

					break Ok(RemoteDocument::new(
						Some(into_iri(response.url())?),
						Some(content_type.into_media_type()),
						document,
					));
				}
				_ => {
					log::debug!("no valid media type found");
					for value in response.headers().get_all(LINK) {
						for link in Link::parse_all(value) {
							if link.is_json_ld_alternate() {
								if let Some(target) = link.resolve(response.url()) {
									log::debug!("link found");
									url = target;
									redirection_number += 1;
									continue 'next_url;
								}
							}
						}
					}

					break Err(Error::InvalidContentType(url));
				}
			}
		}
	}
}

impl<F: Fetcher> Loader for FetchLoader<F> {
	async fn load(&self, url: &Iri) -> Result<RemoteDocument<IriBuf>, LoadError> {
		let target =
			Url::parse(url.as_str()).map_err(|_| Error::InvalidUrl(url.as_str().to_owned()));

		match target {
			Ok(target) => self.load_document(&target).await,
			Err(e) => Err(e),
		}
		.map_err(|e| LoadError::new(url.to_owned(), e))
	}
}

fn into_iri(url: &Url) -> Result<IriBuf, Error> {
	IriBuf::new(url.to_string()).map_err(|_| Error::InvalidUrl(url.to_string()))
}
