//! Asset fetchers
//!
//! A fetcher walks one kind of source (directory, zip archive or pack) and
//! yields every text asset whose extension passes its [`ExtensionFilter`],
//! keyed by asset path. Asset paths are rooted at `/` and always use `/` as
//! the separator, regardless of where the asset came from.

mod archive;
mod directory;
mod packed;

pub use archive::{find_asset_root, relative_asset_path, ZipFetcher};
pub use directory::DirectoryFetcher;
pub use packed::PakFetcher;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];

/// Lazy, single-pass sequence of fetched items
pub type Items = Box<dyn Iterator<Item = Result<RawItem>>>;

/// Something that can list text assets at a path
pub trait Fetcher {
    /// Extensions this fetcher accepts
    fn extensions(&self) -> &ExtensionFilter;

    /// Start fetching from `path`
    ///
    /// Fails up front if the source is missing or unreadable as a whole.
    /// Errors for individual assets are yielded by the iterator instead.
    fn fetch(&self, path: &Path) -> Result<Items>;
}

/// A text asset found by a fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    /// Asset path (e.g. "/items/armors/hat.head")
    pub path: String,
    /// Decoded file contents
    pub content: String,
}

impl RawItem {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Final path segment
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    /// Extension of the final path segment, without the dot
    pub fn extension(&self) -> Option<&str> {
        extension(&self.path)
    }
}

/// Set of lowercase, dot-free extensions
///
/// An empty filter accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        Self { extensions }
    }

    /// Filter that accepts every file
    pub fn all() -> Self {
        Self::default()
    }

    /// The four wearable extensions: head, chest, legs, back
    pub fn wearables() -> Self {
        Self::new(["head", "chest", "legs", "back"])
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.extensions
            .contains(&extension.trim_start_matches('.').to_ascii_lowercase())
    }

    /// Check whether a path's extension passes this filter
    pub fn matches(&self, path: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        extension(path).is_some_and(|ext| self.contains(ext))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

/// Where assets are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Directory(PathBuf),
    Zip(PathBuf),
    Pak(PathBuf),
}

impl Source {
    /// Pick a source kind from the path's extension
    ///
    /// `.pak` is a pack, `.zip` a zip archive, anything else a directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("pak") => Source::Pak(path),
            Some("zip") => Source::Zip(path),
            _ => Source::Directory(path),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Source::Directory(p) | Source::Zip(p) | Source::Pak(p) => p,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Source::Directory(_) => "directory",
            Source::Zip(_) => "zip archive",
            Source::Pak(_) => "pak archive",
        }
    }

    /// Whether the directory or file backing this source exists
    pub fn exists(&self) -> bool {
        match self {
            Source::Directory(p) => p.is_dir(),
            Source::Zip(p) | Source::Pak(p) => p.is_file(),
        }
    }

    /// Build the fetcher for this source kind
    pub fn fetcher(&self, extensions: ExtensionFilter) -> Box<dyn Fetcher> {
        match self {
            Source::Directory(_) => Box::new(DirectoryFetcher::new(extensions)),
            Source::Zip(_) => Box::new(ZipFetcher::new(extensions)),
            Source::Pak(_) => Box::new(PakFetcher::new(extensions)),
        }
    }

    pub fn fetch(&self, extensions: ExtensionFilter) -> Result<Items> {
        self.fetcher(extensions).fetch(self.path())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.path().display())
    }
}

/// Asset path of `file` relative to the asset root `root`
///
/// `asset_path("/mods/foo", "/mods/foo/items/hat.head")` is
/// `"/items/hat.head"`.
pub fn asset_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);

    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            std::path::Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();

    format!("/{}", segments.join("/"))
}

/// Normalize a logical path to asset path form
///
/// Backslashes become `/` and a leading `/` is added if missing. Already
/// normalized paths come back unchanged.
pub fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

/// Final segment of a `/` or `\` separated path
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Extension of a path's final segment, without the dot
pub fn extension(path: &str) -> Option<&str> {
    file_name(path)
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Decode fetched bytes as UTF-8 text, dropping a byte order mark
pub(crate) fn decode_text(path: String, bytes: Vec<u8>) -> Result<RawItem> {
    let bytes = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_vec(),
        None => bytes,
    };

    match String::from_utf8(bytes) {
        Ok(content) => Ok(RawItem { path, content }),
        Err(_) => Err(Error::Decode { path }),
    }
}
