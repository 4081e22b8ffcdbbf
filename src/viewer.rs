//! JSON-LD block viewer.
//!
//! The [`JsonLdViewer`] loads one JSON-LD block, either from the page it is
//! attached to or from a remote HTML page, expands it and renders the
//! expanded document as an HTML fragment.
use crate::{fetch::Fetcher, Error};
use html_escape::encode_text;
use jsonld_embed_expansion::Expander;
use jsonld_embed_page::Page;
use serde_json::Value;
use std::fmt;
use url::Url;

/// Location designating the page the viewer is attached to.
pub const LOCAL_LOCATION: &str = ".";

/// CORS relay prefixed to remote locations when the proxy is enabled.
pub const PROXY_SERVICE: &str = "https://thingproxy.freeboard.io/fetch/";

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerOptions {
	/// Fetch remote locations through the proxy service.
	///
	/// Defaults to `false`.
	pub use_proxy: bool,

	/// Location of the page holding the block.
	///
	/// Defaults to [`LOCAL_LOCATION`], the page the viewer is attached to.
	pub location: String,

	/// Zero-based index of the block among all the blocks of the page.
	pub block_index: usize,

	/// Prefix of proxied requests.
	///
	/// Defaults to [`PROXY_SERVICE`].
	pub proxy_service: String,
}

impl ViewerOptions {
	pub fn is_local(&self) -> bool {
		self.location == LOCAL_LOCATION
	}

	/// Returns the request target for the configured location.
	pub fn request_target(&self) -> String {
		if self.use_proxy {
			format!("{}{}", self.proxy_service, self.location)
		} else {
			self.location.clone()
		}
	}
}

impl Default for ViewerOptions {
	fn default() -> Self {
		Self {
			use_proxy: false,
			location: LOCAL_LOCATION.to_owned(),
			block_index: 0,
			proxy_service: PROXY_SERVICE.to_owned(),
		}
	}
}

/// Loaded block.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerData {
	/// Parsed JSON-LD document.
	Document(Value),

	/// Message describing why a local block could not be loaded.
	Failure(String),
}

impl ViewerData {
	pub fn as_document(&self) -> Option<&Value> {
		match self {
			Self::Document(value) => Some(value),
			Self::Failure(_) => None,
		}
	}

	pub fn as_failure(&self) -> Option<&str> {
		match self {
			Self::Document(_) => None,
			Self::Failure(message) => Some(message),
		}
	}
}

impl fmt::Display for ViewerData {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Document(value) => fmt::Display::fmt(value, f),
			Self::Failure(message) => f.write_str(message),
		}
	}
}

/// JSON-LD block viewer widget.
pub struct JsonLdViewer<F, E> {
	fetcher: F,
	expander: E,
	options: ViewerOptions,
	data: Option<ViewerData>,
	document_url: Option<Url>,
	expanded: Option<Value>,
	error: String,
}

impl<F, E> JsonLdViewer<F, E> {
	/// Creates a viewer of the first block of the local page.
	pub fn new(fetcher: F, expander: E) -> Self {
		Self::with_options(fetcher, expander, ViewerOptions::default())
	}

	pub fn with_options(fetcher: F, expander: E, options: ViewerOptions) -> Self {
		Self {
			fetcher,
			expander,
			options,
			data: None,
			document_url: None,
			expanded: None,
			error: String::new(),
		}
	}

	pub fn options(&self) -> &ViewerOptions {
		&self.options
	}

	pub fn use_proxy(&self) -> bool {
		self.options.use_proxy
	}

	pub fn location(&self) -> &str {
		&self.options.location
	}

	pub fn block_index(&self) -> usize {
		self.options.block_index
	}

	/// Loaded block, if any.
	pub fn data(&self) -> Option<&ViewerData> {
		self.data.as_ref()
	}

	/// URL of the page holding the loaded block, if known.
	///
	/// Relative IRI references of the block are resolved against it.
	pub fn document_url(&self) -> Option<&Url> {
		self.document_url.as_ref()
	}

	/// Expanded document, if any.
	pub fn expanded(&self) -> Option<&Value> {
		self.expanded.as_ref()
	}

	/// Current error message, empty if none.
	pub fn error(&self) -> &str {
		&self.error
	}

	pub fn set_use_proxy(&mut self, use_proxy: bool) {
		self.options.use_proxy = use_proxy;
		self.reset()
	}

	pub fn set_location(&mut self, location: impl Into<String>) {
		self.options.location = location.into();
		self.reset()
	}

	pub fn set_block_index(&mut self, block_index: usize) {
		self.options.block_index = block_index;
		self.reset()
	}

	fn reset(&mut self) {
		self.data = None;
		self.document_url = None;
		self.expanded = None;
		self.error.clear()
	}

	/// Renders the viewer as an HTML fragment.
	pub fn render(&self) -> String {
		let expanded = match &self.expanded {
			Some(expanded) => serde_json::to_string_pretty(expanded).unwrap_or_default(),
			None => String::new(),
		};

		let mut html = format!(
			"<p>JsonLD Block {} # {}</p><pre>{}</pre>",
			encode_text(&self.options.location),
			self.options.block_index,
			encode_text(&expanded)
		);

		if !self.error.is_empty() {
			html.push_str("<pre>ERROR: ");
			html.push_str(&encode_text(&self.error));
			html.push_str("</pre>")
		}

		html
	}
}

impl<F: Fetcher, E: Expander> JsonLdViewer<F, E> {
	/// Attaches the viewer to the given page, loading and expanding the
	/// configured block.
	///
	/// Failures are never returned: they are stored in [`Self::data`] for
	/// local blocks that cannot be read, and in [`Self::error`] otherwise.
	pub async fn attach(&mut self, page: &Page) {
		self.reset();

		if self.options.is_local() {
			self.data = Some(self.load_local(page));
			self.document_url = page.url().cloned();
		} else {
			match self.load_remote(page.url()).await {
				Ok((document, url)) => {
					log::debug!("loaded block from {url}: {document}");
					self.data = Some(ViewerData::Document(document));
					self.document_url = Some(url)
				}
				Err(e) => self.error = e.to_string(),
			}
		}

		self.expand().await
	}

	fn load_local(&self, page: &Page) -> ViewerData {
		let index = self.options.block_index;
		match page.parse_block(index) {
			Ok(document) => ViewerData::Document(document),
			Err(e) => ViewerData::Failure(format!("Error: could not render block {index}: {e}")),
		}
	}

	/// Fetches the configured remote page and parses its block.
	///
	/// Relative locations are resolved against `base`. Returns the block
	/// along with the URL of the page holding it: the final response URL, or
	/// the unproxied location when the proxy is used.
	pub async fn load_remote(&self, base: Option<&Url>) -> Result<(Value, Url), Error> {
		let target = self.options.request_target();
		let url = Url::options()
			.base_url(base)
			.parse(&target)
			.map_err(|e| Error::InvalidLocation(target.clone(), e))?;

		let response = self.fetcher.fetch(&url).await?.error_for_status()?;
		let document_url = if self.options.use_proxy {
			Url::options()
				.base_url(base)
				.parse(&self.options.location)
				.unwrap_or_else(|_| response.url().clone())
		} else {
			response.url().clone()
		};

		let html = response.text()?;
		let remote_page = Page::from_html(&html, Some(document_url.clone()));
		let document = remote_page.parse_block(self.options.block_index)?;
		Ok((document, document_url))
	}

	async fn expand(&mut self) {
		if let Some(ViewerData::Document(document)) = &self.data {
			let base_url = self.document_url.as_ref();
			match self.expander.expand(document, base_url).await {
				Ok(expanded) => self.expanded = Some(expanded),
				Err(e) => self.error = e.to_string(),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_target() {
		let mut options = ViewerOptions {
			location: "https://example.com/page.html".to_owned(),
			..Default::default()
		};
		assert!(!options.is_local());
		assert_eq!(options.request_target(), "https://example.com/page.html");

		options.use_proxy = true;
		assert_eq!(
			options.request_target(),
			"https://thingproxy.freeboard.io/fetch/https://example.com/page.html"
		)
	}

	#[test]
	fn default_options() {
		let options = ViewerOptions::default();
		assert!(options.is_local());
		assert!(!options.use_proxy);
		assert_eq!(options.block_index, 0);
	}

	#[test]
	fn data_display() {
		assert_eq!(
			ViewerData::Document(serde_json::json!({ "a": 1 })).to_string(),
			r#"{"a":1}"#
		);
		assert_eq!(ViewerData::Failure("oops".to_owned()).to_string(), "oops")
	}
}
