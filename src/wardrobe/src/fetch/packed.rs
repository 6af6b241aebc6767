//! Packed archive fetching

use std::path::Path;

use super::{decode_text, normalize, ExtensionFilter, Fetcher, Items, RawItem};
use crate::pak::PakReader;
use crate::Result;

/// Fetches assets from an `SBAsset6` pack
///
/// Entries come out in index order. Only the index is held in memory;
/// each payload is read when its item is pulled.
#[derive(Debug, Clone, Default)]
pub struct PakFetcher {
    extensions: ExtensionFilter,
}

impl PakFetcher {
    pub fn new(extensions: ExtensionFilter) -> Self {
        Self { extensions }
    }

    /// Fetch from an already opened pack
    pub fn fetch_reader(&self, reader: PakReader) -> Items {
        Box::new(PakItems {
            reader,
            extensions: self.extensions.clone(),
            next: 0,
        })
    }
}

impl Fetcher for PakFetcher {
    fn extensions(&self) -> &ExtensionFilter {
        &self.extensions
    }

    fn fetch(&self, path: &Path) -> Result<Items> {
        let reader = PakReader::open(path)?;
        Ok(self.fetch_reader(reader))
    }
}

struct PakItems {
    reader: PakReader,
    extensions: ExtensionFilter,
    next: usize,
}

impl Iterator for PakItems {
    type Item = Result<RawItem>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.reader.entries().get(self.next).cloned() {
            self.next += 1;

            if !self.extensions.matches(&entry.path) {
                continue;
            }

            let path = normalize(&entry.path);
            tracing::debug!("Found {} ({} bytes at {:#x})", path, entry.length, entry.offset);

            return Some(
                self.reader
                    .read(&entry)
                    .and_then(|bytes| decode_text(path, bytes)),
            );
        }

        None
    }
}
