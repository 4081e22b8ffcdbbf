//! HTML page model for the `jsonld-embed` crate.
//!
//! A [`Page`] is the document a component is granted access to. It holds the
//! JSON-LD blocks embedded in the page (`<script type="application/ld+json">`
//! elements), the links to external JSON-LD documents
//! (`<link type="application/ld+json">` elements) and the text content of
//! every element carrying an `id` attribute.
//!
//! ```
//! use jsonld_embed_page::Page;
//!
//! let page = Page::from_html(
//! 	r#"<html><head>
//! 	<script type="application/ld+json">{"@id": "https://example.com/a"}</script>
//! 	</head><body><pre id="jsonld"></pre></body></html>"#,
//! 	None,
//! );
//!
//! assert_eq!(page.blocks().len(), 1);
//! assert_eq!(page.text("jsonld"), Some(""));
//! ```
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use url::Url;

mod block;
mod error;
mod link;

pub use block::*;
pub use error::*;
pub use link::*;

/// JSON-LD media type.
pub const JSON_LD_MEDIA_TYPE: &str = "application/ld+json";

static BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
	Selector::parse(r#"script[type="application/ld+json"]"#).expect("invalid block selector")
});

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
	Selector::parse(r#"link[type="application/ld+json"]"#).expect("invalid link selector")
});

static ID_SELECTOR: Lazy<Selector> =
	Lazy::new(|| Selector::parse("[id]").expect("invalid id selector"));

/// HTML document holding JSON-LD blocks.
#[derive(Debug, Clone, Default)]
pub struct Page {
	url: Option<Url>,

	/// Blocks in document order.
	///
	/// Head blocks always come before body blocks.
	blocks: Vec<Block>,

	links: Vec<Link>,

	/// Text content of identified elements.
	elements: HashMap<String, String>,
}

impl Page {
	/// Creates an empty page.
	pub fn new(url: Option<Url>) -> Self {
		Self {
			url,
			..Default::default()
		}
	}

	/// Parses the given HTML document.
	///
	/// HTML parsing never fails: malformed input is recovered the way a
	/// browser would.
	pub fn from_html(html: &str, url: Option<Url>) -> Self {
		let document = Html::parse_document(html);

		let blocks = document
			.select(&BLOCK_SELECTOR)
			.map(|element| {
				let section = if is_in_head(&element) {
					Section::Head
				} else {
					Section::Body
				};

				Block::new(element.text().collect(), section)
			})
			.collect();

		let links = document
			.select(&LINK_SELECTOR)
			.map(|element| Link::from_element(element.value()))
			.collect();

		let mut elements = HashMap::new();
		for element in document.select(&ID_SELECTOR) {
			if let Some(id) = element.value().id() {
				// Like `getElementById`, the first element with a given id wins.
				elements
					.entry(id.to_owned())
					.or_insert_with(|| element.text().collect());
			}
		}

		Self {
			url,
			blocks,
			links,
			elements,
		}
	}

	/// URL of the page, if known.
	///
	/// Relative link references are resolved against it.
	pub fn url(&self) -> Option<&Url> {
		self.url.as_ref()
	}

	/// JSON-LD blocks in document order.
	pub fn blocks(&self) -> &[Block] {
		&self.blocks
	}

	/// Returns the block at the given zero-based `index`.
	pub fn block(&self, index: usize) -> Result<&Block, Error> {
		self.blocks.get(index).ok_or(Error::BlockNotFound {
			index,
			count: self.blocks.len(),
		})
	}

	/// Parses the block at the given zero-based `index`.
	pub fn parse_block(&self, index: usize) -> Result<serde_json::Value, Error> {
		self.block(index)?.parse()
	}

	/// Appends a new block at the end of the document head.
	pub fn append_head_block(&mut self, text: String) {
		let at = self
			.blocks
			.iter()
			.take_while(|block| block.section() == Section::Head)
			.count();
		self.blocks.insert(at, Block::new(text, Section::Head))
	}

	/// Links to external JSON-LD documents, in document order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Returns the text content of the element with the given `id`.
	pub fn text(&self, id: &str) -> Option<&str> {
		self.elements.get(id).map(String::as_str)
	}

	/// Replaces the text content of the element with the given `id`.
	///
	/// The element is created if it does not exist.
	pub fn set_text(&mut self, id: &str, text: String) {
		if !self.elements.contains_key(id) {
			log::warn!("no element `#{id}` in page, creating it");
		}

		self.elements.insert(id.to_owned(), text);
	}

	/// Appends to the text content of the element with the given `id`.
	///
	/// The element is created if it does not exist.
	pub fn append_text(&mut self, id: &str, text: &str) {
		match self.elements.get_mut(id) {
			Some(content) => content.push_str(text),
			None => self.set_text(id, text.to_owned()),
		}
	}
}

fn is_in_head(element: &ElementRef) -> bool {
	element
		.ancestors()
		.filter_map(ElementRef::wrap)
		.any(|ancestor| ancestor.value().name() == "head")
}

#[cfg(test)]
mod tests {
	use super::*;

	const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
	<title>Dataset</title>
	<link rel="describedby" type="application/ld+json" href="ds01.jsonld" />
	<link rel="stylesheet" href="style.css" />
	<script type="application/ld+json">{"@id": "https://example.com/head"}</script>
</head>
<body>
	<pre id="errors"></pre>
	<pre id="jsonld">placeholder</pre>
	<script type="application/ld+json">{"@id": "https://example.com/body"}</script>
	<script type="text/javascript">var x = 1;</script>
</body>
</html>"#;

	#[test]
	fn extract_blocks_in_document_order() {
		let page = Page::from_html(PAGE, None);
		let sections: Vec<_> = page.blocks().iter().map(Block::section).collect();
		assert_eq!(sections, [Section::Head, Section::Body]);
		assert_eq!(
			page.parse_block(1).unwrap()["@id"],
			"https://example.com/body"
		);
	}

	#[test]
	fn extract_links() {
		let page = Page::from_html(PAGE, None);
		assert_eq!(page.links().len(), 1);
		assert_eq!(page.links()[0].href(), Some("ds01.jsonld"));
		assert_eq!(page.links()[0].rel(), Some("describedby"));
	}

	#[test]
	fn extract_identified_elements() {
		let page = Page::from_html(PAGE, None);
		assert_eq!(page.text("errors"), Some(""));
		assert_eq!(page.text("jsonld"), Some("placeholder"));
		assert_eq!(page.text("missing"), None);
	}

	#[test]
	fn append_goes_to_end_of_head() {
		let mut page = Page::from_html(PAGE, None);
		page.append_head_block("{}".to_owned());
		assert_eq!(page.blocks().len(), 3);
		assert_eq!(page.blocks()[1].text(), "{}");
		assert_eq!(page.blocks()[1].section(), Section::Head);
		assert_eq!(page.blocks()[2].section(), Section::Body);
	}

	#[test]
	fn appended_block_precedes_body_blocks() {
		let mut page = Page::from_html(
			r#"<html><body><script type="application/ld+json">{"a": 1}</script></body></html>"#,
			None,
		);
		page.append_head_block(r#"{"b": 2}"#.to_owned());
		assert_eq!(page.parse_block(0).unwrap()["b"], 2);
	}

	#[test]
	fn missing_block() {
		let page = Page::from_html(PAGE, None);
		match page.block(5) {
			Err(Error::BlockNotFound { index, count }) => {
				assert_eq!(index, 5);
				assert_eq!(count, 2)
			}
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn append_text_creates_missing_element() {
		let mut page = Page::new(None);
		page.append_text("errors", "first");
		page.append_text("errors", " second");
		assert_eq!(page.text("errors"), Some("first second"));
	}
}
