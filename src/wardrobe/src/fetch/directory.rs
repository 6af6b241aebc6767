//! Asset directory fetching

use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use super::{asset_path, decode_text, ExtensionFilter, Fetcher, Items, RawItem};
use crate::{Error, Result};

/// Fetches assets from an unpacked mod directory
///
/// Files in a directory are visited before its subdirectories, each group in
/// name order.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFetcher {
    extensions: ExtensionFilter,
}

impl DirectoryFetcher {
    pub fn new(extensions: ExtensionFilter) -> Self {
        Self { extensions }
    }
}

impl Fetcher for DirectoryFetcher {
    fn extensions(&self) -> &ExtensionFilter {
        &self.extensions
    }

    fn fetch(&self, path: &Path) -> Result<Items> {
        if !path.exists() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(Error::NotADirectory(path.to_path_buf()));
        }

        let root = path.to_path_buf();
        let extensions = self.extensions.clone();

        let walker = WalkDir::new(&root)
            .follow_links(true)
            .sort_by(files_first)
            .into_iter();

        Ok(Box::new(walker.filter_map(move |entry| {
            read_entry(&root, &extensions, entry)
        })))
    }
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn read_entry(
    root: &Path,
    extensions: &ExtensionFilter,
    entry: walkdir::Result<DirEntry>,
) -> Option<Result<RawItem>> {
    let entry = match entry {
        Ok(e) => e,
        Err(e) => return Some(Err(Error::Walk(e))),
    };

    if !entry.file_type().is_file() {
        return None;
    }

    let path = asset_path(root, entry.path());
    if !extensions.matches(&path) {
        return None;
    }

    tracing::debug!("Found {}", path);

    match fs::read(entry.path()) {
        Ok(bytes) => Some(decode_text(path, bytes)),
        Err(source) => Some(Err(Error::Read { path, source })),
    }
}
