//! Zip archive fetching
//!
//! Mods distributed as zip files usually nest their assets in a folder. The
//! folder holding `_metadata` (or `.metadata`) is the asset root; without one
//! the archive root is used.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

use super::{decode_text, file_name, ExtensionFilter, Fetcher, Items, RawItem};
use crate::{Error, Result};

const METADATA_NAMES: [&str; 2] = ["_metadata", ".metadata"];

/// Fetches assets from a zip archive
#[derive(Debug, Clone, Default)]
pub struct ZipFetcher {
    extensions: ExtensionFilter,
}

impl ZipFetcher {
    pub fn new(extensions: ExtensionFilter) -> Self {
        Self { extensions }
    }

    /// Fetch from an already opened archive
    pub fn fetch_archive<R>(&self, archive: ZipArchive<R>) -> Items
    where
        R: Read + Seek + 'static,
    {
        let root = find_asset_root(&archive);
        tracing::debug!("Zip asset root: '/{}'", root);

        Box::new(ZipItems {
            archive,
            root,
            extensions: self.extensions.clone(),
            next: 0,
        })
    }
}

impl Fetcher for ZipFetcher {
    fn extensions(&self) -> &ExtensionFilter {
        &self.extensions
    }

    fn fetch(&self, path: &Path) -> Result<Items> {
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }

        let file = BufReader::new(File::open(path)?);
        let archive = ZipArchive::new(file)?;

        Ok(self.fetch_archive(archive))
    }
}

/// Directory of the first metadata entry, without trailing slash
///
/// Returns an empty string when the archive has no metadata entry.
pub fn find_asset_root<R: Read + Seek>(archive: &ZipArchive<R>) -> String {
    archive
        .file_names()
        .map(|name| name.replace('\\', "/"))
        .find(|name| {
            let base = file_name(name).to_ascii_lowercase();
            METADATA_NAMES.contains(&base.as_str())
        })
        .and_then(|name| name.rsplit_once('/').map(|(dir, _)| dir.to_string()))
        .unwrap_or_default()
}

/// Asset path of a zip entry relative to the asset root
///
/// Entries outside the root climb out with `..` segments.
pub fn relative_asset_path(root: &str, entry: &str) -> String {
    let entry = entry.replace('\\', "/");
    let root_parts: Vec<&str> = root.split('/').filter(|s| !s.is_empty()).collect();
    let entry_parts: Vec<&str> = entry.split('/').filter(|s| !s.is_empty()).collect();

    let common = root_parts
        .iter()
        .zip(&entry_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; root_parts.len() - common];
    parts.extend_from_slice(&entry_parts[common..]);

    format!("/{}", parts.join("/"))
}

struct ZipItems<R> {
    archive: ZipArchive<R>,
    root: String,
    extensions: ExtensionFilter,
    next: usize,
}

impl<R: Read + Seek> Iterator for ZipItems<R> {
    type Item = Result<RawItem>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.archive.len() {
            let index = self.next;
            self.next += 1;

            // Filter on the central directory name before opening the entry
            let path = match self.archive.name_for_index(index) {
                Some(name) if !name.ends_with('/') && self.extensions.matches(name) => {
                    relative_asset_path(&self.root, name)
                }
                _ => continue,
            };

            let mut file = match self.archive.by_index(index) {
                Ok(f) => f,
                Err(source) => return Some(Err(Error::ZipEntry { path, source })),
            };

            if file.is_dir() {
                continue;
            }

            tracing::debug!("Found {}", path);

            let mut bytes = Vec::with_capacity(file.size().min(1 << 20) as usize);
            if let Err(source) = file.read_to_end(&mut bytes) {
                return Some(Err(Error::Read { path, source }));
            }

            return Some(decode_text(path, bytes));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn build_zip(files: &[(&str, &str)]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        for (name, contents) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }

        let cursor = writer.finish().unwrap();
        ZipArchive::new(cursor).unwrap()
    }

    #[test]
    fn test_relative_asset_path() {
        assert_eq!(relative_asset_path("", "items/hat.head"), "/items/hat.head");
        assert_eq!(
            relative_asset_path("MyMod", "MyMod/items/hat.head"),
            "/items/hat.head"
        );
        assert_eq!(
            relative_asset_path("MyMod/assets", "MyMod/other/hat.head"),
            "/../other/hat.head"
        );
        assert_eq!(
            relative_asset_path("MyMod", "MyMod\\items\\hat.head"),
            "/items/hat.head"
        );
    }

    #[test]
    fn test_find_asset_root() {
        let archive = build_zip(&[("readme.txt", "x"), ("MyMod/_METADATA", "{}")]);
        assert_eq!(find_asset_root(&archive), "MyMod");

        let archive = build_zip(&[("a/b/.metadata", "{}")]);
        assert_eq!(find_asset_root(&archive), "a/b");
    }

    #[test]
    fn test_find_asset_root_default() {
        let archive = build_zip(&[("items/hat.head", "{}")]);
        assert_eq!(find_asset_root(&archive), "");

        let archive = build_zip(&[("_metadata", "{}")]);
        assert_eq!(find_asset_root(&archive), "");
    }

    #[test]
    fn test_fetch_archive_relative_to_metadata() {
        let archive = build_zip(&[
            ("MyMod/_metadata", "{}"),
            ("MyMod/items/hat.head", r#"{"itemName":"hat"}"#),
            ("MyMod/items/hat.png", "png"),
            ("MyMod/items/shirt.chest", r#"{"itemName":"shirt"}"#),
        ]);

        let items: Vec<RawItem> = ZipFetcher::new(ExtensionFilter::wearables())
            .fetch_archive(archive)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            items,
            vec![
                RawItem::new("/items/hat.head", r#"{"itemName":"hat"}"#),
                RawItem::new("/items/shirt.chest", r#"{"itemName":"shirt"}"#),
            ]
        );
    }

    /// Mark the first entry as bzip2, which this build cannot decompress
    fn make_first_entry_unreadable(
        archive: ZipArchive<Cursor<Vec<u8>>>,
    ) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut data = archive.into_inner().into_inner();
        let bzip2 = 12u16.to_le_bytes();

        data[8..10].copy_from_slice(&bzip2);
        let central = data
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .unwrap();
        data[central + 10..central + 12].copy_from_slice(&bzip2);

        ZipArchive::new(Cursor::new(data)).unwrap()
    }

    #[test]
    fn test_unreadable_entry_outside_filter_ignored() {
        let archive = make_first_entry_unreadable(build_zip(&[
            ("items/hat.png", "png"),
            ("items/hat.head", "{}"),
        ]));

        let items: Vec<RawItem> = ZipFetcher::new(ExtensionFilter::wearables())
            .fetch_archive(archive)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(items, vec![RawItem::new("/items/hat.head", "{}")]);
    }

    #[test]
    fn test_unreadable_wearable_names_its_path() {
        let archive = make_first_entry_unreadable(build_zip(&[
            ("items/hat.head", "{}"),
            ("items/shirt.chest", "{}"),
        ]));

        let items: Vec<Result<RawItem>> = ZipFetcher::new(ExtensionFilter::wearables())
            .fetch_archive(archive)
            .collect();

        assert_eq!(items.len(), 2);
        match &items[0] {
            Err(e @ Error::ZipEntry { .. }) => assert_eq!(e.item_path(), Some("/items/hat.head")),
            other => panic!("expected ZipEntry error, got {:?}", other),
        }
        assert_eq!(
            items[1].as_ref().unwrap(),
            &RawItem::new("/items/shirt.chest", "{}")
        );
    }

    #[test]
    fn test_fetch_zip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mod.zip");
        let archive = build_zip(&[("legs/pants.legs", "{}")]);
        std::fs::write(&path, archive.into_inner().into_inner()).unwrap();

        let paths: Vec<String> = ZipFetcher::new(ExtensionFilter::wearables())
            .fetch(&path)
            .unwrap()
            .map(|item| item.unwrap().path)
            .collect();

        assert_eq!(paths, vec!["/legs/pants.legs"]);
    }

    #[test]
    fn test_fetch_missing_zip() {
        let dir = tempfile::tempdir().unwrap();
        let err = ZipFetcher::default()
            .fetch(&dir.path().join("missing.zip"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }
}
