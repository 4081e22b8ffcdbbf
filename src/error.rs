use crate::fetch;

/// Error raised while loading a JSON-LD block.
///
/// Components never return it to their caller: it is turned into its
/// `Display` string and shown on the page.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Page(#[from] jsonld_embed_page::Error),

	#[error(transparent)]
	Fetch(#[from] fetch::Error),

	#[error("invalid location `{0}`: {1}")]
	InvalidLocation(String, url::ParseError),

	#[error("{0}")]
	Json(#[from] serde_json::Error),
}
