use super::{Error, Fetcher, Response};
use http::StatusCode;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use url::Url;

/// Files served for directory URLs, in order of preference.
const INDEX_FILES: [&str; 2] = ["index.htm", "index.html"];

/// File-system fetcher.
///
/// Serves documents from the file system by attaching a directory to
/// specific URL prefixes, the way a static file server would: missing files
/// are answered with a `404 Not Found` response, directories are answered
/// with their index file and the content type is guessed from the file
/// extension.
///
/// Files are not cached: a new file system read is made each time an URL is
/// fetched even if it has already been queried before.
#[derive(Debug, Default)]
pub struct FsFetcher {
	mount_points: Vec<(PathBuf, Url)>,
}

impl FsFetcher {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind the given URL prefix to the given path.
	///
	/// Any document with an URL matching the given prefix will be loaded from
	/// the referenced local directory.
	pub fn mount<P: AsRef<Path>>(&mut self, url: Url, path: P) {
		self.mount_points.push((path.as_ref().into(), url));
	}

	/// Returns the local file path associated to the given `url` if any.
	///
	/// Path segments are percent-decoded. Paths escaping the mounted
	/// directory are never returned.
	pub fn filepath(&self, url: &Url) -> Option<PathBuf> {
		for (path, target_url) in &self.mount_points {
			if let Some(suffix) = suffix(url, target_url) {
				let mut filepath = path.clone();
				for seg in suffix.split('/').filter(|s| !s.is_empty()) {
					let seg = percent_decode_str(seg).decode_utf8().ok()?;
					if seg == ".." || seg == "." || seg.contains(['/', '\\', '\0']) {
						return None;
					}

					filepath.push(seg.as_ref())
				}

				return Some(filepath);
			}
		}

		None
	}
}

/// Path suffix of `url` under `prefix`.
fn suffix<'u>(url: &'u Url, prefix: &Url) -> Option<&'u str> {
	if url.scheme() != prefix.scheme() || url.host_str() != prefix.host_str() {
		return None;
	}

	if url.port_or_known_default() != prefix.port_or_known_default() {
		return None;
	}

	let prefix_path = prefix.path().trim_end_matches('/');
	let rest = url.path().strip_prefix(prefix_path)?;
	if rest.is_empty() || rest.starts_with('/') {
		Some(rest)
	} else {
		None
	}
}

/// Guesses the media type of a file from its extension.
pub fn guess_content_type(path: &Path) -> &'static str {
	match path.extension().and_then(|e| e.to_str()) {
		Some("jsonld") => "application/ld+json",
		Some("json") => "application/json",
		Some("html" | "htm") => "text/html",
		Some("txt") => "text/plain",
		_ => "application/octet-stream",
	}
}

impl Fetcher for FsFetcher {
	async fn fetch(&self, url: &Url) -> Result<Response, Error> {
		let mut filepath = self
			.filepath(url)
			.ok_or_else(|| Error::NoMountPoint(url.clone()))?;

		if filepath.is_dir() {
			match INDEX_FILES
				.iter()
				.map(|name| filepath.join(name))
				.find(|path| path.is_file())
			{
				Some(index) => filepath = index,
				None => return Ok(Response::status_only(url.clone(), StatusCode::NOT_FOUND)),
			}
		}

		log::debug!("reading: {}", filepath.display());
		match std::fs::read(&filepath) {
			Ok(content) => Ok(Response::ok(
				url.clone(),
				guess_content_type(&filepath),
				content,
			)),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				Ok(Response::status_only(url.clone(), StatusCode::NOT_FOUND))
			}
			Err(e) => Err(Error::IO(url.clone(), e)),
		}
	}
}
