use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use jsonld_embed::{
	aggregator::{DISPLAY_ELEMENT_ID, ERRORS_ELEMENT_ID},
	fetch::{FsFetcher, ReqwestFetcher},
	viewer::LOCAL_LOCATION,
	FetchLoader, Fetcher, JsonLdExpander, JsonLdViewer, MetadataAggregator, Page, ViewerOptions,
};
use url::Url;

#[derive(Parser)]
#[command(name = "jsonld-embed", author, version, about, long_about = None)]
struct Args {
	/// Sets the level of verbosity.
	#[arg(short, long = "verbose", action = clap::ArgAction::Count)]
	verbosity: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(clap::Subcommand)]
pub enum Command {
	/// Embed the JSON-LD documents linked from the given page and print its
	/// first JSON-LD block.
	Aggregate {
		/// URL or file path of the page.
		url_or_path: UrlOrPath,

		/// Base URL to use when reading from the file system.
		#[arg(short, long)]
		base_url: Option<Url>,
	},

	/// Expand a JSON-LD block of the given page and print the rendered viewer.
	View {
		/// URL or file path of the page.
		url_or_path: UrlOrPath,

		/// Zero-based index of the block.
		#[arg(short, long, default_value_t = 0)]
		index: usize,

		/// Fetch the page through the CORS proxy.
		#[arg(short, long)]
		proxy: bool,

		/// Print the expanded document instead of the rendered HTML.
		#[arg(short, long)]
		json: bool,
	},

	/// List the JSON-LD blocks of the given page.
	Blocks {
		/// URL or file path of the page.
		url_or_path: UrlOrPath,
	},
}

#[derive(Clone)]
pub enum UrlOrPath {
	Url(Url),
	Path(PathBuf),
}

impl FromStr for UrlOrPath {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match Url::parse(s) {
			Ok(url) => Ok(Self::Url(url)),
			Err(_) => Ok(Self::Path(s.into())),
		}
	}
}

#[tokio::main]
async fn main() {
	// Parse options.
	let args = Args::parse();

	// Init logger.
	if let Err(e) = stderrlog::new().verbosity(args.verbosity as usize).init() {
		fail(e)
	}

	let fetcher = ReqwestFetcher::new();

	match args.command {
		Command::Aggregate {
			url_or_path,
			base_url,
		} => match url_or_path {
			UrlOrPath::Url(url) => {
				let page = fetch_page(&fetcher, &url).await;
				aggregate(fetcher, page).await
			}
			UrlOrPath::Path(path) => {
				let (page, fs_fetcher) = read_page(&path, base_url);
				match fs_fetcher {
					Some(fs_fetcher) => aggregate(fs_fetcher, page).await,
					None => aggregate(fetcher, page).await,
				}
			}
		},
		Command::View {
			url_or_path,
			index,
			proxy,
			json,
		} => {
			let (page, location) = match url_or_path {
				UrlOrPath::Url(url) => (Page::new(None), url.to_string()),
				UrlOrPath::Path(path) => (read_page(&path, None).0, LOCAL_LOCATION.to_owned()),
			};

			let options = ViewerOptions {
				use_proxy: proxy,
				location,
				block_index: index,
				..Default::default()
			};

			let expander = JsonLdExpander::new(FetchLoader::new(ReqwestFetcher::new()));
			let mut viewer = JsonLdViewer::with_options(fetcher, expander, options);
			viewer.attach(&page).await;

			if let Some(failure) = viewer.data().and_then(|data| data.as_failure()) {
				fail(failure)
			}

			if !viewer.error().is_empty() {
				fail(viewer.error())
			}

			if json {
				match viewer.expanded().map(serde_json::to_string_pretty) {
					Some(Ok(expanded)) => println!("{expanded}"),
					Some(Err(e)) => fail(e),
					None => (),
				}
			} else {
				println!("{}", viewer.render())
			}
		}
		Command::Blocks { url_or_path } => {
			let page = match url_or_path {
				UrlOrPath::Url(url) => fetch_page(&fetcher, &url).await,
				UrlOrPath::Path(path) => read_page(&path, None).0,
			};

			for (i, block) in page.blocks().iter().enumerate() {
				println!("# {i} ({:?})", block.section());
				match block.parse() {
					Ok(document) => match serde_json::to_string_pretty(&document) {
						Ok(text) => println!("{text}"),
						Err(e) => eprintln!("error: {e}"),
					},
					Err(e) => eprintln!("error: {e}"),
				}
			}
		}
	}
}

async fn aggregate(fetcher: impl Fetcher, mut page: Page) {
	let aggregator = MetadataAggregator::new(fetcher);
	aggregator.add_metadata(&mut page).await;

	if let Some(errors) = page.text(ERRORS_ELEMENT_ID).filter(|e| !e.is_empty()) {
		eprint!("{errors}")
	}

	log::info!("{} block(s) in page", page.blocks().len());

	if let Some(meta) = page.text(DISPLAY_ELEMENT_ID) {
		println!("{meta}")
	}
}

async fn fetch_page(fetcher: &impl Fetcher, url: &Url) -> Page {
	let response = match fetcher.fetch(url).await {
		Ok(response) => response,
		Err(e) => fail(e),
	};

	log::info!("page URL: {}", response.url());

	match response.error_for_status().and_then(|r| Ok((r.text()?, r.url().clone()))) {
		Ok((html, url)) => Page::from_html(&html, Some(url)),
		Err(e) => fail(e),
	}
}

/// Reads a page from the file system.
///
/// Without a base URL, the page gets a `file:` URL and a fetcher serving its
/// directory is returned.
fn read_page(path: &Path, base_url: Option<Url>) -> (Page, Option<FsFetcher>) {
	let html = match std::fs::read_to_string(path) {
		Ok(html) => html,
		Err(e) => fail(e),
	};

	match base_url {
		Some(url) => (Page::from_html(&html, Some(url)), None),
		None => {
			let (url, fetcher) = match file_url(path) {
				Some((url, dir_url, dir)) => {
					let mut fetcher = FsFetcher::new();
					fetcher.mount(dir_url, dir);
					(Some(url), Some(fetcher))
				}
				None => (None, None),
			};

			(Page::from_html(&html, url), fetcher)
		}
	}
}

fn file_url(path: &Path) -> Option<(Url, Url, PathBuf)> {
	let path = std::fs::canonicalize(path).ok()?;
	let dir = path.parent()?.to_owned();
	let url = Url::from_file_path(&path).ok()?;
	let dir_url = Url::from_directory_path(&dir).ok()?;
	Some((url, dir_url, dir))
}

fn fail(e: impl fmt::Display) -> ! {
	eprintln!("error: {e}");
	std::process::exit(1)
}
