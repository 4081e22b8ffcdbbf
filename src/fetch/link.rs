use http::HeaderValue;
use url::Url;

/// Link of a `Link` HTTP header (RFC 8288).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
	href: String,

	/// Parameters, with lowercase names.
	params: Vec<(String, String)>,
}

impl Link {
	/// Parses every link of a `Link` header value.
	///
	/// Parsing stops at the first malformed link.
	pub fn parse_all(value: &HeaderValue) -> Vec<Self> {
		let mut links = Vec::new();

		if let Ok(mut input) = value.to_str() {
			while let Some((link, rest)) = parse_link(input) {
				links.push(link);
				match rest.trim_start().strip_prefix(',') {
					Some(rest) => input = rest,
					None => break,
				}
			}
		}

		links
	}

	pub fn href(&self) -> &str {
		&self.href
	}

	/// Resolves the link target against the URL of the response holding it.
	pub fn resolve(&self, base: &Url) -> Option<Url> {
		base.join(&self.href).ok()
	}

	/// Value of the given parameter, if present.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	pub fn rel(&self) -> Option<&str> {
		self.param("rel")
	}

	pub fn type_(&self) -> Option<&str> {
		self.param("type")
	}

	/// Checks if the link points to an alternate JSON-LD representation of the
	/// resource.
	pub fn is_json_ld_alternate(&self) -> bool {
		let alternate = self.rel().is_some_and(|rel| {
			rel.split_ascii_whitespace()
				.any(|r| r.eq_ignore_ascii_case("alternate"))
		});

		alternate
			&& self
				.type_()
				.is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
	}
}

/// Parses `<href> *(; param)`, returning the link and the remaining input.
fn parse_link(input: &str) -> Option<(Link, &str)> {
	let input = input.trim_start().strip_prefix('<')?;
	let end = input.find('>')?;
	let href = input[..end].trim().to_owned();

	let mut params = Vec::new();
	let mut rest = &input[end + 1..];
	while let Some(param) = rest.trim_start().strip_prefix(';') {
		let (name, value, tail) = parse_param(param)?;
		params.push((name, value));
		rest = tail;
	}

	Some((Link { href, params }, rest))
}

/// Parses `name[=value]`, where `value` is a token or a quoted string.
fn parse_param(input: &str) -> Option<(String, String, &str)> {
	let input = input.trim_start();
	let name_end = input
		.find(|c| matches!(c, '=' | ';' | ','))
		.unwrap_or(input.len());
	let name = input[..name_end].trim().to_ascii_lowercase();
	if name.is_empty() {
		return None;
	}

	let Some(value) = input[name_end..].strip_prefix('=') else {
		return Some((name, String::new(), &input[name_end..]));
	};

	let value = value.trim_start();
	match value.strip_prefix('"') {
		Some(quoted) => {
			let end = quoted.find('"')?;
			Some((name, quoted[..end].to_owned(), &quoted[end + 1..]))
		}
		None => {
			let end = value.find([';', ',']).unwrap_or(value.len());
			Some((name, value[..end].trim().to_owned(), &value[end..]))
		}
	}
}
