//! Wearable aggregation
//!
//! Drives a fetcher over a source, converts every wearable it finds and
//! groups them by category. Items that fail to read, parse or classify are
//! skipped and recorded; they never abort the scan.

use serde_json::{Map, Value};

use crate::fetch::{ExtensionFilter, RawItem, Source};
use crate::patch::add_operation;
use crate::wearable::{convert, parse_item, ConvertOptions, WearableType};
use crate::{Error, Result};

/// An item left out of the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// Asset path, or "<unknown>" when the error did not name one
    pub path: String,
    pub reason: String,
}

/// Converted wearables grouped by category, in discovery order
#[derive(Debug, Clone, Default)]
pub struct Wardrobe {
    head: Vec<Value>,
    chest: Vec<Value>,
    legs: Vec<Value>,
    back: Vec<Value>,
    skipped: Vec<SkippedItem>,
}

impl Wardrobe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: WearableType, wearable: Value) {
        self.slot_mut(kind).push(wearable);
    }

    pub fn get(&self, kind: WearableType) -> &[Value] {
        match kind {
            WearableType::Head => &self.head,
            WearableType::Chest => &self.chest,
            WearableType::Legs => &self.legs,
            WearableType::Back => &self.back,
        }
    }

    fn slot_mut(&mut self, kind: WearableType) -> &mut Vec<Value> {
        match kind {
            WearableType::Head => &mut self.head,
            WearableType::Chest => &mut self.chest,
            WearableType::Legs => &mut self.legs,
            WearableType::Back => &mut self.back,
        }
    }

    /// Total number of wearables across all categories
    pub fn len(&self) -> usize {
        WearableType::ALL.iter().map(|&k| self.get(k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn skipped(&self) -> &[SkippedItem] {
        &self.skipped
    }

    fn skip(&mut self, path: String, error: &Error) {
        tracing::warn!("Skipped file '{}': {}", path, error);
        self.skipped.push(SkippedItem {
            path,
            reason: error.to_string(),
        });
    }

    /// Merged object with one array per category
    ///
    /// Always has exactly the keys `head`, `chest`, `legs` and `back`.
    pub fn to_object(&self) -> Value {
        let mut object = Map::new();
        for kind in WearableType::ALL {
            object.insert(kind.key().to_string(), Value::Array(self.get(kind).to_vec()));
        }
        Value::Object(object)
    }

    /// Patch appending every wearable to its category's array
    ///
    /// Operations are grouped by category (head, chest, legs, back) and keep
    /// discovery order within each group.
    pub fn to_patch(&self) -> Result<Value> {
        let mut operations = Vec::with_capacity(self.len());

        for kind in WearableType::ALL {
            let path = kind.patch_path();
            for wearable in self.get(kind) {
                operations.push(add_operation(&path, wearable.clone())?);
            }
        }

        Ok(Value::Array(operations))
    }
}

/// Converts fetched items into a [`Wardrobe`]
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    options: ConvertOptions,
    names_only: bool,
}

impl Aggregator {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            names_only: false,
        }
    }

    /// Record only each wearable's item name instead of the full object
    pub fn names_only(mut self, names_only: bool) -> Self {
        self.names_only = names_only;
        self
    }

    /// Fetch everything from `source` once and group the results
    ///
    /// Fails only when the source itself cannot be opened.
    pub fn collect(&self, source: &Source, extensions: ExtensionFilter) -> Result<Wardrobe> {
        tracing::debug!("Scanning {}", source);
        let items = source.fetch(extensions)?;
        Ok(self.collect_items(items))
    }

    /// Group already fetched items
    pub fn collect_items<I>(&self, items: I) -> Wardrobe
    where
        I: IntoIterator<Item = Result<RawItem>>,
    {
        let mut wardrobe = Wardrobe::new();

        for item in items {
            match item {
                Ok(item) => match self.handle(&item) {
                    Ok((kind, wearable)) => wardrobe.push(kind, wearable),
                    Err(e) => wardrobe.skip(item.path, &e),
                },
                Err(e) => {
                    let path = e.item_path().unwrap_or("<unknown>").to_string();
                    wardrobe.skip(path, &e);
                }
            }
        }

        tracing::debug!(
            "Collected {} wearables, skipped {}",
            wardrobe.len(),
            wardrobe.skipped.len()
        );

        wardrobe
    }

    fn handle(&self, item: &RawItem) -> Result<(WearableType, Value)> {
        let kind = WearableType::from_extension(item.extension().unwrap_or_default())?;
        let raw = parse_item(item)?;

        if self.names_only {
            let name = raw.get("itemName").cloned().unwrap_or(Value::Null);
            return Ok((kind, name));
        }

        let wearable = convert(&raw, &item.path, item.file_name(), &self.options);
        Ok((kind, Value::Object(wearable)))
    }
}

/// Build the merged wearables object for a source
pub fn create_object(
    source: &Source,
    extensions: &ExtensionFilter,
    names_only: bool,
) -> Result<Value> {
    let wardrobe = Aggregator::default()
        .names_only(names_only)
        .collect(source, extensions.clone())?;
    Ok(wardrobe.to_object())
}

/// Build the wearables patch for a source
pub fn create_patch(
    source: &Source,
    extensions: &ExtensionFilter,
    names_only: bool,
) -> Result<Value> {
    let wardrobe = Aggregator::default()
        .names_only(names_only)
        .collect(source, extensions.clone())?;
    wardrobe.to_patch()
}
