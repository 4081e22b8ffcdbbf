use http::HeaderValue;
use mime::Mime;

/// Parsed `Content-Type` header value.
///
/// Parameters that are not valid tokens or quoted strings are dropped, the
/// media type itself is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType(Mime);

impl ContentType {
	pub fn new(value: &HeaderValue) -> Option<Self> {
		let value = value.to_str().ok()?.trim();
		match value.parse() {
			Ok(mime) => Some(Self(mime)),
			Err(_) => {
				let essence = value.split(';').next()?.trim();
				essence.parse().ok().map(Self)
			}
		}
	}

	/// Checks if this is a JSON or JSON-LD media type.
	pub fn is_json_ld(&self) -> bool {
		matches!(
			self.0.essence_str(),
			"application/json" | "application/ld+json"
		)
	}

	pub fn is_html(&self) -> bool {
		matches!(
			self.0.essence_str(),
			"text/html" | "application/xhtml+xml"
		)
	}

	pub fn media_type(&self) -> &Mime {
		&self.0
	}

	pub fn into_media_type(self) -> Mime {
		self.0
	}

	/// JSON-LD profile parameter.
	pub fn profile(&self) -> Option<&str> {
		self.0.get_param("profile").map(|name| name.as_str())
	}

	pub fn charset(&self) -> Option<&str> {
		self.0.get_param(mime::CHARSET).map(|name| name.as_str())
	}
}
