use jsonld_embed::{
	expansion::Expander,
	fetch::{self, Fetcher, NoFetcher, Response},
	viewer::PROXY_SERVICE,
	JsonLdExpander, JsonLdViewer, Page, ViewerData, ViewerOptions,
};
use http::StatusCode;
use serde_json::{json, Value};
use std::{cell::RefCell, collections::HashMap};
use url::Url;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
	<script type="application/ld+json">{
		"@context": { "name": "http://schema.org/name" },
		"@id": "https://example.com/first",
		"name": "First"
	}</script>
</head>
<body>
	<script type="application/ld+json">{
		"@context": { "@vocab": "http://schema.org/" },
		"@id": "https://example.com/second",
		"@type": "Dataset",
		"name": "Second"
	}</script>
	<script type="application/ld+json">{ broken</script>
</body>
</html>"#;

fn url(s: &str) -> Url {
	Url::parse(s).unwrap()
}

fn remote(location: &str, index: usize) -> ViewerOptions {
	ViewerOptions {
		location: location.to_owned(),
		block_index: index,
		..Default::default()
	}
}

/// Fetcher recording the requested URLs.
#[derive(Default)]
struct Recorder {
	requests: RefCell<Vec<Url>>,
}

impl Fetcher for Recorder {
	async fn fetch(&self, url: &Url) -> Result<Response, fetch::Error> {
		self.requests.borrow_mut().push(url.clone());
		Ok(Response::ok(url.clone(), "text/html", PAGE))
	}
}

/// Expander always failing.
struct Failing;

impl Expander for Failing {
	type Error = &'static str;

	async fn expand(&self, _document: &Value, _base_url: Option<&Url>) -> Result<Value, Self::Error> {
		Err("expansion <failed>")
	}
}

#[tokio::test]
async fn local_block() {
	let page = Page::from_html(PAGE, None);
	let mut viewer = JsonLdViewer::with_options(
		NoFetcher,
		JsonLdExpander::default(),
		ViewerOptions {
			block_index: 1,
			..Default::default()
		},
	);
	viewer.attach(&page).await;

	assert_eq!(viewer.error(), "");
	assert_eq!(
		viewer.data().and_then(ViewerData::as_document).unwrap()["@id"],
		"https://example.com/second"
	);
	assert_eq!(
		viewer.expanded(),
		Some(&json!([{
			"@id": "https://example.com/second",
			"@type": ["http://schema.org/Dataset"],
			"http://schema.org/name": [{ "@value": "Second" }]
		}]))
	)
}

#[tokio::test]
async fn local_block_out_of_range() {
	let page = Page::from_html(PAGE, None);
	let mut viewer = JsonLdViewer::new(NoFetcher, JsonLdExpander::default());
	viewer.set_block_index(5);
	viewer.attach(&page).await;

	assert_eq!(
		viewer.data(),
		Some(&ViewerData::Failure(
			"Error: could not render block 5: no JSON-LD block at index 5 (3 found)".to_owned()
		))
	);
	assert_eq!(viewer.error(), "");
	assert_eq!(viewer.expanded(), None);
	assert_eq!(viewer.render(), "<p>JsonLD Block . # 5</p><pre></pre>")
}

#[tokio::test]
async fn local_block_invalid_json() {
	let page = Page::from_html(PAGE, None);
	let mut viewer = JsonLdViewer::new(NoFetcher, JsonLdExpander::default());
	viewer.set_block_index(2);
	viewer.attach(&page).await;

	let failure = viewer.data().and_then(ViewerData::as_failure).unwrap();
	assert!(failure.starts_with("Error: could not render block 2: "));
	assert_eq!(viewer.error(), "");
	assert_eq!(viewer.expanded(), None)
}

#[tokio::test]
async fn remote_block() {
	let fetcher = Recorder::default();
	let mut viewer = JsonLdViewer::with_options(
		&fetcher,
		JsonLdExpander::default(),
		remote("https://example.com/page.html", 0),
	);
	viewer.attach(&Page::new(None)).await;

	assert_eq!(viewer.error(), "");
	assert_eq!(
		viewer.expanded(),
		Some(&json!([{
			"@id": "https://example.com/first",
			"http://schema.org/name": [{ "@value": "First" }]
		}]))
	);
	assert_eq!(
		*fetcher.requests.borrow(),
		[url("https://example.com/page.html")]
	);
}

#[tokio::test]
async fn proxied_remote_block() {
	let fetcher = Recorder::default();
	let mut viewer = JsonLdViewer::with_options(
		&fetcher,
		JsonLdExpander::default(),
		remote("https://example.com/page.html", 0),
	);
	viewer.set_use_proxy(true);
	viewer.attach(&Page::new(None)).await;

	assert_eq!(viewer.error(), "");
	assert_eq!(
		*fetcher.requests.borrow(),
		[url(&format!("{PROXY_SERVICE}https://example.com/page.html"))]
	);
}

#[tokio::test]
async fn relative_location() {
	let fetcher = Recorder::default();
	let mut viewer = JsonLdViewer::with_options(
		&fetcher,
		JsonLdExpander::default(),
		remote("other.html", 1),
	);
	viewer
		.attach(&Page::new(Some(url("https://example.com/dir/index.html"))))
		.await;

	assert_eq!(viewer.error(), "");
	assert_eq!(
		*fetcher.requests.borrow(),
		[url("https://example.com/dir/other.html")]
	);
}

#[tokio::test]
async fn remote_not_found() {
	let fetcher: HashMap<_, _> = [(
		url("https://example.com/missing.html"),
		Response::status_only(url("https://example.com/missing.html"), StatusCode::NOT_FOUND),
	)]
	.into_iter()
	.collect();

	let mut viewer = JsonLdViewer::with_options(
		fetcher,
		JsonLdExpander::default(),
		remote("https://example.com/missing.html", 0),
	);
	viewer.attach(&Page::new(None)).await;

	assert!(viewer.error().contains("404"));
	assert_eq!(viewer.data(), None);
	assert_eq!(viewer.expanded(), None);
	assert!(viewer.render().ends_with(
		"<pre>ERROR: ERROR 404 retrieving https://example.com/missing.html</pre>"
	))
}

#[tokio::test]
async fn remote_block_out_of_range() {
	let mut viewer = JsonLdViewer::with_options(
		Recorder::default(),
		JsonLdExpander::default(),
		remote("https://example.com/page.html", 7),
	);
	viewer.attach(&Page::new(None)).await;

	assert_eq!(viewer.error(), "no JSON-LD block at index 7 (3 found)");
	assert_eq!(viewer.data(), None)
}

#[tokio::test]
async fn expansion_failure() {
	let page = Page::from_html(PAGE, None);
	let mut viewer = JsonLdViewer::new(NoFetcher, Failing);
	viewer.attach(&page).await;

	assert!(viewer.data().and_then(ViewerData::as_document).is_some());
	assert_eq!(viewer.error(), "expansion <failed>");
	assert_eq!(
		viewer.render(),
		"<p>JsonLD Block . # 0</p><pre></pre><pre>ERROR: expansion &lt;failed&gt;</pre>"
	)
}

#[tokio::test]
async fn render_escapes_text() {
	let mut viewer = JsonLdViewer::new(NoFetcher, JsonLdExpander::default());
	viewer.set_location("<script>");
	viewer.attach(&Page::new(None)).await;

	let html = viewer.render();
	assert!(html.starts_with("<p>JsonLD Block &lt;script&gt; # 0</p>"));
	assert!(!html.contains("<script>"))
}

#[tokio::test]
async fn configuration_change_resets_state() {
	let page = Page::from_html(PAGE, None);
	let mut viewer = JsonLdViewer::new(NoFetcher, Failing);
	viewer.attach(&page).await;
	assert!(viewer.data().is_some());
	assert!(!viewer.error().is_empty());

	viewer.set_block_index(1);
	assert_eq!(viewer.data(), None);
	assert_eq!(viewer.expanded(), None);
	assert_eq!(viewer.error(), "");

	viewer.attach(&page).await;
	assert_eq!(
		viewer.data().and_then(ViewerData::as_document).unwrap()["name"],
		"Second"
	)
}

const RELATIVE: &str = r#"<script type="application/ld+json">{
	"@context": { "@vocab": "http://schema.org/" },
	"@id": "data/item",
	"name": "Item"
}</script>"#;

#[tokio::test]
async fn local_block_is_expanded_against_page_url() {
	let page = Page::from_html(RELATIVE, Some(url("https://example.com/dir/index.html")));
	let mut viewer = JsonLdViewer::new(NoFetcher, JsonLdExpander::default());
	viewer.attach(&page).await;

	assert_eq!(viewer.error(), "");
	assert_eq!(viewer.document_url(), page.url());
	assert_eq!(
		viewer.expanded().unwrap()[0]["@id"],
		"https://example.com/dir/data/item"
	)
}

#[tokio::test]
async fn proxied_block_is_expanded_against_location() {
	let proxied = url(&format!("{PROXY_SERVICE}https://example.com/dir/page.html"));
	let fetcher: HashMap<_, _> = [(
		proxied.clone(),
		Response::ok(proxied, "text/html", RELATIVE),
	)]
	.into_iter()
	.collect();

	let mut viewer = JsonLdViewer::with_options(
		fetcher,
		JsonLdExpander::default(),
		remote("https://example.com/dir/page.html", 0),
	);
	viewer.set_use_proxy(true);
	viewer.attach(&Page::new(None)).await;

	assert_eq!(viewer.error(), "");
	assert_eq!(
		viewer.document_url(),
		Some(&url("https://example.com/dir/page.html"))
	);
	assert_eq!(
		viewer.expanded().unwrap()[0]["@id"],
		"https://example.com/dir/data/item"
	)
}
