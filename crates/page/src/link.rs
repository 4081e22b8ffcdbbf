use crate::Error;
use scraper::node::Element;
use url::Url;

/// Reference to an external JSON-LD document.
///
/// A `<link type="application/ld+json">` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
	href: Option<String>,
	rel: Option<String>,
	profile: Option<String>,
}

impl Link {
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: Some(href.into()),
			rel: None,
			profile: None,
		}
	}

	pub(crate) fn from_element(element: &Element) -> Self {
		Self {
			href: element.attr("href").map(ToOwned::to_owned),
			rel: element.attr("rel").map(ToOwned::to_owned),
			profile: element.attr("profile").map(ToOwned::to_owned),
		}
	}

	/// Raw value of the `href` attribute.
	pub fn href(&self) -> Option<&str> {
		self.href.as_deref()
	}

	pub fn rel(&self) -> Option<&str> {
		self.rel.as_deref()
	}

	pub fn profile(&self) -> Option<&str> {
		self.profile.as_deref()
	}

	/// Resolves the link reference against the given `base` URL.
	pub fn resolve(&self, base: Option<&Url>) -> Result<Url, Error> {
		let href = self.href.as_deref().ok_or(Error::MissingHref)?;
		Url::options()
			.base_url(base)
			.parse(href)
			.map_err(|e| Error::InvalidHref(href.to_owned(), e))
	}
}
