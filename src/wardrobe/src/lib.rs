//! Wearable extraction for the Starbound Wardrobe mod
//!
//! Scans a mod's assets for `.head`, `.chest`, `.legs` and `.back` item
//! definitions and turns them into the list format Wardrobe reads.
//!
//! # Sources
//!
//! - Plain asset directories
//! - Zip archives (asset root located through `_metadata` / `.metadata`)
//! - `SBAsset6` packed archives (`.pak`), see [`pak`]
//!
//! # Output
//!
//! Either a merged object keyed by category (`head`, `chest`, `legs`,
//! `back`) or a JSON patch of `add` operations appending to those arrays.

pub mod aggregate;
pub mod fetch;
pub mod pak;
pub mod patch;
pub mod wearable;

use std::path::PathBuf;

pub use aggregate::{create_object, create_patch, Aggregator, SkippedItem, Wardrobe};
pub use fetch::{
    asset_path, DirectoryFetcher, ExtensionFilter, Fetcher, Items, PakFetcher, RawItem, Source,
    ZipFetcher,
};
pub use pak::{PakEntry, PakIndex, PakReader};
pub use patch::add_operation;
pub use wearable::{convert, parse_item, ConvertOptions, WearableType};

/// Errors from fetching and converting wearables
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to open zip entry '{path}': {source}")]
    ZipEntry {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Invalid pak magic: expected 'SBAsset6', got {0:?}")]
    InvalidPakMagic([u8; 8]),

    #[error("Invalid pak index magic: expected 'INDEX', got {0:?}")]
    InvalidIndexMagic([u8; 5]),

    #[error("Unknown pak metadata value type: {0}")]
    UnknownMetadataType(u8),

    #[error("Truncated archive entry '{path}': expected {expected} bytes, got {actual}")]
    TruncatedArchive {
        path: String,
        expected: u64,
        actual: u64,
    },

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not valid UTF-8 text")]
    Decode { path: String },

    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{path}' does not contain a JSON object")]
    NotAnObject { path: String },

    #[error("Wearable type could not be determined for extension '{0}'")]
    UnknownWearableType(String),

    #[error("Invalid patch path '{0}'")]
    InvalidPatchPath(String),
}

impl Error {
    /// Asset path of the item an error belongs to, if it names one
    pub fn item_path(&self) -> Option<&str> {
        match self {
            Error::TruncatedArchive { path, .. }
            | Error::Read { path, .. }
            | Error::ZipEntry { path, .. }
            | Error::Decode { path }
            | Error::Json { path, .. }
            | Error::NotAnObject { path } => Some(path.as_str()),
            Error::Walk(e) => e.path().and_then(|p| p.to_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
