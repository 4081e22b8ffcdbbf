/// Page error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no JSON-LD block at index {index} ({count} found)")]
	BlockNotFound { index: usize, count: usize },

	#[error("{0}")]
	InvalidJson(#[from] serde_json::Error),

	#[error("link has no `href` attribute")]
	MissingHref,

	#[error("invalid link reference `{0}`: {1}")]
	InvalidHref(String, url::ParseError),
}
