//! Discover, embed and view the JSON-LD blocks of HTML pages.
//!
//! This crate provides two components operating on a [`Page`]:
//!
//!   - [`MetadataAggregator`] embeds every JSON-LD document linked from the
//!     page (`<link type="application/ld+json">`) as a new block of the page
//!     head, then displays the first block of the page pretty-printed.
//!   - [`JsonLdViewer`] loads one JSON-LD block, from the page itself or from
//!     a remote page, expands it and renders the expanded document.
//!
//! Network access is provided by a [`Fetcher`], and JSON-LD expansion by an
//! [`Expander`]. Failures never escape the components: they are displayed on
//! the page.
//!
//! # Example
//!
//! ```
//! use jsonld_embed::{fetch::NoFetcher, JsonLdExpander, JsonLdViewer, Page};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let page = Page::from_html(
//! 	r#"<script type="application/ld+json">{
//! 		"@context": { "name": "http://schema.org/name" },
//! 		"name": "Dataset"
//! 	}</script>"#,
//! 	None,
//! );
//!
//! let mut viewer = JsonLdViewer::new(NoFetcher, JsonLdExpander::default());
//! viewer.attach(&page).await;
//!
//! assert!(viewer.error().is_empty());
//! assert!(viewer.render().contains("http://schema.org/name"));
//! # }
//! ```
pub use jsonld_embed_expansion as expansion;
pub use jsonld_embed_page as page;

pub mod aggregator;
mod error;
pub mod fetch;
pub mod loader;
pub mod viewer;

pub use aggregator::MetadataAggregator;
pub use error::*;
pub use expansion::{Expander, JsonLdExpander};
pub use fetch::{Fetcher, Response};
pub use loader::FetchLoader;
pub use page::{Block, Link, Page};
pub use viewer::{JsonLdViewer, ViewerData, ViewerOptions};
