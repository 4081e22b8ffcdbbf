use crate::Error;

/// Document section holding a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
	Head,
	Body,
}

/// JSON-LD block embedded in a page.
///
/// The text of a `<script type="application/ld+json">` element.
/// It is parsed again each time it is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
	text: String,
	section: Section,
}

impl Block {
	pub fn new(text: String, section: Section) -> Self {
		Self { text, section }
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn section(&self) -> Section {
		self.section
	}

	/// Parses the block content as JSON.
	pub fn parse(&self) -> Result<serde_json::Value, Error> {
		Ok(serde_json::from_str(&self.text)?)
	}
}
