use url::Url;

/// Expansion options.
#[derive(Debug, Default, Clone)]
pub struct Options {
	/// Base URL overriding the one of the expanded document.
	pub base_url: Option<Url>,

	/// Sort object entries during expansion.
	pub ordered: bool,
}
