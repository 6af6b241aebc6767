//! `SBAsset6` packed archive reading
//!
//! Starbound packs a mod's assets into a single `.pak` file. The layout is:
//!
//! ```text
//! 0x00  [u8; 8]   magic "SBAsset6"
//! 0x08  u64 BE    absolute offset of the index
//! ...             entry payloads (the data region)
//! index:
//!       [u8; 5]   magic "INDEX"
//!       map       metadata (VLQ count, then string key + dynamic value)
//!       VLQ       entry count
//!       entries   string path, u64 BE offset, u64 BE length
//! ```
//!
//! Strings are a VLQ byte length followed by UTF-8 bytes. See [`sbon`] for
//! the primitive encodings.
//!
//! Only the index is read eagerly; payloads are read on demand by seeking.

pub mod sbon;

use byteorder::{BigEndian, ReadBytesExt};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Magic bytes at the start of every pack: "SBAsset6"
pub const PAK_MAGIC: [u8; 8] = *b"SBAsset6";

/// Magic bytes at the start of the index: "INDEX"
pub const INDEX_MAGIC: [u8; 5] = *b"INDEX";

/// One file stored in a pack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PakEntry {
    /// Logical asset path (e.g. "/items/armors/hat.head")
    pub path: String,
    /// Absolute offset of the first payload byte
    pub offset: u64,
    /// Payload length in bytes
    pub length: u64,
}

impl PakEntry {
    pub fn new(path: impl Into<String>, offset: u64, length: u64) -> Self {
        Self {
            path: path.into(),
            offset,
            length,
        }
    }
}

/// Parsed pack index
#[derive(Debug, Clone, Default)]
pub struct PakIndex {
    /// Pack metadata (name, friendlyName, author, ...)
    pub metadata: Map<String, Value>,
    /// Entries in on-disk index order
    pub entries: Vec<PakEntry>,
}

/// Parse the header and index of a pack
///
/// Leaves the stream positioned after the last index entry.
pub fn read_index<R: Read + Seek>(reader: &mut R) -> Result<PakIndex> {
    reader.seek(SeekFrom::Start(0))?;

    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic)?;
    if magic != PAK_MAGIC {
        return Err(Error::InvalidPakMagic(magic));
    }

    let index_offset = reader.read_u64::<BigEndian>()?;
    reader.seek(SeekFrom::Start(index_offset))?;

    let mut index_magic = [0u8; 5];
    reader.read_exact(&mut index_magic)?;
    if index_magic != INDEX_MAGIC {
        return Err(Error::InvalidIndexMagic(index_magic));
    }

    let metadata = sbon::read_map(reader)?;

    let count = sbon::read_vlq(reader)?;
    let mut entries = Vec::with_capacity(count.min(4096) as usize);
    for _ in 0..count {
        let path = sbon::read_string(reader)?;
        let offset = reader.read_u64::<BigEndian>()?;
        let length = reader.read_u64::<BigEndian>()?;
        entries.push(PakEntry {
            path,
            offset,
            length,
        });
    }

    tracing::debug!(
        "Read pak index at {:#x}: {} entries, {} metadata keys",
        index_offset,
        entries.len(),
        metadata.len()
    );

    Ok(PakIndex { metadata, entries })
}

/// Read exactly `entry.length` bytes at `entry.offset`
pub fn read_entry_payload<R: Read + Seek>(reader: &mut R, entry: &PakEntry) -> Result<Vec<u8>> {
    // An offset the stream cannot address means the entry lies past its end
    if reader.seek(SeekFrom::Start(entry.offset)).is_err() {
        return Err(Error::TruncatedArchive {
            path: entry.path.clone(),
            expected: entry.length,
            actual: 0,
        });
    }

    let mut data = Vec::with_capacity(entry.length.min(1 << 20) as usize);
    reader.by_ref().take(entry.length).read_to_end(&mut data)?;

    let actual = data.len() as u64;
    if actual < entry.length {
        return Err(Error::TruncatedArchive {
            path: entry.path.clone(),
            expected: entry.length,
            actual,
        });
    }

    Ok(data)
}

/// Reader for a pack on disk
pub struct PakReader {
    file: BufReader<File>,
    index: PakIndex,
    path: PathBuf,
}

impl PakReader {
    /// Open a pack and read its index
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(Error::SourceNotFound(path));
        }

        let mut file = BufReader::new(File::open(&path)?);
        let index = read_index(&mut file)?;

        Ok(Self { file, index, path })
    }

    /// Get the path this pack was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.index.metadata
    }

    pub fn entries(&self) -> &[PakEntry] {
        &self.index.entries
    }

    /// Read an entry's payload
    pub fn read(&mut self, entry: &PakEntry) -> Result<Vec<u8>> {
        read_entry_payload(&mut self.file, entry)
    }
}
