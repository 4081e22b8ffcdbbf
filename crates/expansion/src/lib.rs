//! JSON-LD expansion for the `jsonld-embed` crate.
//!
//! Expansion is an injected capability: components only depend on the
//! [`Expander`] trait, so any implementation (or test double) can be
//! substituted.
//!
//! This crate also provides [`JsonLdExpander`], an [`Expander`] backed by the
//! [`json_ld`] processor. Remote contexts are loaded with a [`json_ld::Loader`].
//!
//! # Example
//!
//! ```
//! use jsonld_embed_expansion::{Expander, JsonLdExpander};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let document = json!({
//! 	"@context": { "name": "http://xmlns.com/foaf/0.1/name" },
//! 	"@id": "https://www.rust-lang.org",
//! 	"name": "Rust Programming Language"
//! });
//!
//! let expanded = JsonLdExpander::default().expand(&document, None).await.unwrap();
//!
//! assert_eq!(
//! 	expanded,
//! 	json!([{
//! 		"@id": "https://www.rust-lang.org",
//! 		"http://xmlns.com/foaf/0.1/name": [{ "@value": "Rust Programming Language" }]
//! 	}])
//! );
//! # }
//! ```
use contextual::WithContext;
use iref::IriBuf;
use json_ld::{syntax::Parse, JsonLdProcessor, Loader, NoLoader, Print, RemoteDocument};
use serde_json::Value;
use url::Url;

mod error;
mod options;

pub use error::*;
pub use json_ld;
pub use options::*;

/// JSON-LD expansion capability.
///
/// Turns a raw JSON-LD document into its expanded form.
pub trait Expander {
	/// Expansion error.
	type Error: std::fmt::Display;

	/// Expands the given `document`.
	///
	/// Relative IRI references of the document (including relative remote
	/// contexts) are resolved against `base_url`, the URL the document was
	/// retrieved from.
	#[allow(async_fn_in_trait)]
	async fn expand(&self, document: &Value, base_url: Option<&Url>) -> Result<Value, Self::Error>;
}

impl<'e, E: Expander> Expander for &'e E {
	type Error = E::Error;

	async fn expand(&self, document: &Value, base_url: Option<&Url>) -> Result<Value, Self::Error> {
		E::expand(self, document, base_url).await
	}
}

/// JSON-LD expander backed by the [`json_ld`] processor.
///
/// Remote contexts are fetched with the given loader. With the default
/// [`NoLoader`], only documents with inline contexts can be expanded.
#[derive(Debug)]
pub struct JsonLdExpander<L = NoLoader> {
	loader: L,
	options: Options,
}

impl Default for JsonLdExpander {
	fn default() -> Self {
		Self::new(NoLoader)
	}
}

impl<L> JsonLdExpander<L> {
	/// Creates a new expander using the given remote context `loader`.
	pub fn new(loader: L) -> Self {
		Self::new_using(loader, Options::default())
	}

	/// Creates a new expander with the given options.
	pub fn new_using(loader: L, options: Options) -> Self {
		Self { loader, options }
	}

	pub fn loader(&self) -> &L {
		&self.loader
	}

	pub fn options(&self) -> &Options {
		&self.options
	}
}

impl<L: Loader> Expander for JsonLdExpander<L> {
	type Error = Error;

	async fn expand(&self, document: &Value, base_url: Option<&Url>) -> Result<Value, Error> {
		let base_url = self.options.base_url.as_ref().or(base_url);
		let url = base_url.map(into_iri).transpose()?;

		let (json, _) = json_ld::syntax::Value::parse_str(&document.to_string())
			.map_err(|e| Error::Syntax(e.to_string()))?;
		let document = RemoteDocument::new(url, None, json);

		let options = json_ld::Options {
			ordered: self.options.ordered,
			..Default::default()
		};

		let expanded = document.expand_using(&self.loader, options).await?;
		log::debug!("expanded {} objects", expanded.len());

		let output = expanded.with(&()).pretty_print().to_string();
		serde_json::from_str(&output).map_err(Error::Output)
	}
}

fn into_iri(url: &Url) -> Result<IriBuf, Error> {
	IriBuf::new(url.to_string()).map_err(|_| Error::InvalidBaseIri(url.clone()))
}
