//! Linked metadata aggregation.
//!
//! The [`MetadataAggregator`] embeds every JSON-LD document linked from a
//! page (`<link type="application/ld+json">`) into the page head, then shows
//! the first JSON-LD block of the page.
use crate::{fetch::Fetcher, Error};
use futures::stream::{FuturesUnordered, StreamExt};
use jsonld_embed_page::{Link, Page};
use url::Url;

/// Identifier of the element receiving error messages.
pub const ERRORS_ELEMENT_ID: &str = "errors";

/// Identifier of the element displaying the first JSON-LD block.
pub const DISPLAY_ELEMENT_ID: &str = "jsonld";

/// Separator appended after each reported error message.
pub const ERROR_SEPARATOR: &str = "\n---\n";

/// Linked JSON-LD metadata aggregator.
///
/// The aggregator is stateless: the page is given to each operation.
pub struct MetadataAggregator<F> {
	fetcher: F,
}

impl<F> MetadataAggregator<F> {
	pub fn new(fetcher: F) -> Self {
		Self { fetcher }
	}

	pub fn fetcher(&self) -> &F {
		&self.fetcher
	}

	/// Appends the given message to the error log of the page.
	pub fn report_error(&self, page: &mut Page, message: &str) {
		log::error!("{message}");
		page.append_text(ERRORS_ELEMENT_ID, message);
		page.append_text(ERRORS_ELEMENT_ID, ERROR_SEPARATOR);
	}

	/// Displays the first JSON-LD block of the page, pretty-printed.
	///
	/// On failure the error is reported and the display element is left
	/// untouched.
	pub fn show_meta(&self, page: &mut Page) {
		match first_block(page) {
			Ok(text) => page.set_text(DISPLAY_ELEMENT_ID, text),
			Err(e) => self.report_error(page, &e.to_string()),
		}
	}
}

fn first_block(page: &Page) -> Result<String, Error> {
	let meta = page.parse_block(0)?;
	Ok(serde_json::to_string_pretty(&meta)?)
}

impl<F: Fetcher> MetadataAggregator<F> {
	/// Fetches the JSON document referenced by `link`, resolved against
	/// `base`, and returns it pretty-printed.
	pub async fn fetch_linked(&self, base: Option<&Url>, link: &Link) -> Result<String, Error> {
		let url = link.resolve(base)?;
		let response = self.fetcher.fetch(&url).await?.error_for_status()?;
		let document = response.json()?;
		Ok(serde_json::to_string_pretty(&document)?)
	}

	/// Fetches the JSON document referenced by `link` and appends it to the
	/// page head as a new JSON-LD block.
	pub async fn embed_linked(&self, page: &mut Page, link: &Link) -> Result<(), Error> {
		let text = self.fetch_linked(page.url(), link).await?;
		page.append_head_block(text);
		Ok(())
	}

	/// Embeds every linked JSON-LD document of the page, then shows the first
	/// JSON-LD block.
	///
	/// All the documents are fetched concurrently and appended in completion
	/// order. Only the first failure is reported. The first block is shown
	/// even if some documents could not be embedded.
	pub async fn add_metadata(&self, page: &mut Page) {
		let links = page.links().to_vec();
		let base = page.url().cloned();

		let mut pending: FuturesUnordered<_> = links
			.iter()
			.map(|link| self.fetch_linked(base.as_ref(), link))
			.collect();

		let mut first_error = None;
		while let Some(result) = pending.next().await {
			match result {
				Ok(text) => page.append_head_block(text),
				Err(e) => {
					log::debug!("unable to embed linked document: {e}");
					if first_error.is_none() {
						first_error = Some(e)
					}
				}
			}
		}

		if let Some(e) = first_error {
			self.report_error(page, &e.to_string())
		}

		self.show_meta(page)
	}
}
