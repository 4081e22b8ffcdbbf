use url::Url;

/// Expansion error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid base IRI `{0}`")]
	InvalidBaseIri(Url),

	#[error("invalid JSON document: {0}")]
	Syntax(String),

	#[error(transparent)]
	Expansion(#[from] json_ld::ExpandError),

	#[error("unreadable expanded document: {0}")]
	Output(serde_json::Error),
}
