//! Wearable categories and conversion to the Wardrobe item format
//!
//! Item files keep a lot of data Wardrobe never reads. Conversion keeps the
//! fields needed to preview and spawn an item and renames a few of them:
//!
//! | item file          | output             |
//! |--------------------|--------------------|
//! | `itemName`         | `name`             |
//! | `inventoryIcon`    | `icon`             |
//! | `shortdescription` | `shortdescription` |
//! | `maleFrames`       | `maleFrames`       |
//! | `femaleFrames`     | `femaleFrames`     |
//! | `mask`             | `mask` (if set)    |
//! | `colorOptions`     | `colorOptions` (if every option is an object) |

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::fetch::RawItem;
use crate::{Error, Result};

/// Equipment slot a wearable goes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WearableType {
    Head,
    Chest,
    Legs,
    Back,
}

impl WearableType {
    /// All categories in output order
    pub const ALL: [WearableType; 4] = [
        WearableType::Head,
        WearableType::Chest,
        WearableType::Legs,
        WearableType::Back,
    ];

    /// Category for a file extension
    ///
    /// Case-insensitive; dots are ignored, so ".Head" works as well as "head".
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.replace('.', "").to_ascii_lowercase().as_str() {
            "head" => Ok(WearableType::Head),
            "chest" => Ok(WearableType::Chest),
            "legs" => Ok(WearableType::Legs),
            "back" => Ok(WearableType::Back),
            _ => Err(Error::UnknownWearableType(extension.to_string())),
        }
    }

    /// Key of this category in the merged object
    pub fn key(self) -> &'static str {
        match self {
            WearableType::Head => "head",
            WearableType::Chest => "chest",
            WearableType::Legs => "legs",
            WearableType::Back => "back",
        }
    }

    /// Patch path appending to this category's array
    pub fn patch_path(self) -> String {
        format!("/{}/-", self.key())
    }
}

impl FromStr for WearableType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
    }
}

impl fmt::Display for WearableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Optional conversion behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Extra fields copied verbatim when present and not null (e.g. "tags")
    pub parameters: Vec<String>,
    /// Prefix every color option key with '#'
    ///
    /// Starbound reads bare keys such as "0a0a0a" as numbers in some
    /// contexts; the prefix keeps them hex strings.
    pub fix_color_keys: bool,
}

/// Parse an item's text as a JSON object
///
/// Starbound tolerates `//` and `/* */` comments in asset files, so they are
/// removed before parsing.
pub fn parse_item(item: &RawItem) -> Result<Map<String, Value>> {
    let text = strip_comments(&item.content);
    let value: Value = serde_json::from_str(&text).map_err(|source| Error::Json {
        path: item.path.clone(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::NotAnObject {
            path: item.path.clone(),
        }),
    }
}

/// Remove line and block comments outside of string literals
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Convert a raw wearable into the Wardrobe item format
///
/// Missing mandatory fields come out as `null`.
pub fn convert(
    wearable: &Map<String, Value>,
    asset_path: &str,
    file_name: &str,
    options: &ConvertOptions,
) -> Map<String, Value> {
    let field = |key: &str| wearable.get(key).cloned().unwrap_or(Value::Null);

    let mut out = Map::new();
    out.insert("path".into(), Value::String(directory_of(asset_path)));
    out.insert("fileName".into(), Value::String(file_name.to_string()));
    out.insert("name".into(), field("itemName"));
    out.insert("shortdescription".into(), short_description(wearable));
    out.insert("icon".into(), field("inventoryIcon"));
    out.insert("maleFrames".into(), field("maleFrames"));
    out.insert("femaleFrames".into(), field("femaleFrames"));

    if let Some(mask) = wearable.get("mask") {
        out.insert("mask".into(), mask.clone());
    }

    if let Some(colors) = color_options(wearable, options.fix_color_keys) {
        out.insert("colorOptions".into(), colors);
    }

    for name in &options.parameters {
        match wearable.get(name) {
            Some(Value::Null) | None => {}
            Some(value) => {
                out.insert(name.clone(), value.clone());
            }
        }
    }

    out
}

/// Directory part of an asset path, with a trailing slash
///
/// `"/items/hat.head"` becomes `"/items/"`; a root-level asset gives `"/"`.
pub fn directory_of(asset_path: &str) -> String {
    let path = asset_path.replace('\\', "/");

    match path.rfind('/') {
        Some(idx) => path[..=idx].to_string(),
        None => "/".to_string(),
    }
}

// Some items spell it shortDescription.
fn short_description(wearable: &Map<String, Value>) -> Value {
    wearable
        .get("shortdescription")
        .or_else(|| {
            wearable
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("shortdescription"))
                .map(|(_, v)| v)
        })
        .cloned()
        .unwrap_or(Value::Null)
}

/// Validated color options
///
/// Dropped entirely unless the field is an array of objects.
fn color_options(wearable: &Map<String, Value>, fix_keys: bool) -> Option<Value> {
    let options = wearable.get("colorOptions")?.as_array()?;

    if !options.iter().all(Value::is_object) {
        return None;
    }

    if !fix_keys {
        return Some(Value::Array(options.clone()));
    }

    let fixed = options
        .iter()
        .filter_map(Value::as_object)
        .map(|option| {
            let prefixed: Map<String, Value> = option
                .iter()
                .map(|(key, value)| (format!("#{}", key), value.clone()))
                .collect();
            Value::Object(prefixed)
        })
        .collect();

    Some(Value::Array(fixed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(WearableType::from_extension("head").unwrap(), WearableType::Head);
        assert_eq!(WearableType::from_extension(".CHEST").unwrap(), WearableType::Chest);
        assert_eq!(WearableType::from_extension("Legs").unwrap(), WearableType::Legs);
        assert_eq!("back".parse::<WearableType>().unwrap(), WearableType::Back);
    }

    #[test]
    fn test_from_extension_unknown() {
        let err = WearableType::from_extension("pants").unwrap_err();
        assert!(matches!(err, Error::UnknownWearableType(ref e) if e == "pants"));
    }

    #[test]
    fn test_patch_path() {
        assert_eq!(WearableType::Head.patch_path(), "/head/-");
        assert_eq!(WearableType::Back.to_string(), "back");
    }

    #[test]
    fn test_directory_of() {
        assert_eq!(directory_of("/foo/bar.chest"), "/foo/");
        assert_eq!(directory_of("/a/b/c.head"), "/a/b/");
        assert_eq!(directory_of("/c.head"), "/");
        assert_eq!(directory_of("\\a\\c.head"), "/a/");
    }

    #[test]
    fn test_convert_basic() {
        let raw = object(json!({
            "itemName": "Cap",
            "inventoryIcon": "a.png",
            "maleFrames": "m.png",
            "femaleFrames": "f.png",
            "price": 100
        }));

        let out = convert(&raw, "/foo/bar.chest", "bar.chest", &ConvertOptions::default());

        assert_eq!(
            Value::Object(out),
            json!({
                "path": "/foo/",
                "fileName": "bar.chest",
                "name": "Cap",
                "shortdescription": null,
                "icon": "a.png",
                "maleFrames": "m.png",
                "femaleFrames": "f.png"
            })
        );
    }

    #[test]
    fn test_convert_key_order() {
        let raw = object(json!({"itemName": "Cap", "mask": "mask.png"}));
        let out = convert(&raw, "/a.head", "a.head", &ConvertOptions::default());

        let keys: Vec<&str> = out.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "path",
                "fileName",
                "name",
                "shortdescription",
                "icon",
                "maleFrames",
                "femaleFrames",
                "mask"
            ]
        );
    }

    #[test]
    fn test_convert_missing_fields_are_null() {
        let out = convert(&Map::new(), "/a.head", "a.head", &ConvertOptions::default());
        assert_eq!(out["name"], Value::Null);
        assert_eq!(out["icon"], Value::Null);
        assert_eq!(out["maleFrames"], Value::Null);
        assert!(!out.contains_key("mask"));
        assert!(!out.contains_key("colorOptions"));
    }

    #[test]
    fn test_short_description_case_insensitive() {
        let raw = object(json!({"shortDescription": "Fancy Hat"}));
        let out = convert(&raw, "/a.head", "a.head", &ConvertOptions::default());
        assert_eq!(out["shortdescription"], json!("Fancy Hat"));

        let raw = object(json!({"shortdescription": "exact", "SHORTDESCRIPTION": "upper"}));
        let out = convert(&raw, "/a.head", "a.head", &ConvertOptions::default());
        assert_eq!(out["shortdescription"], json!("exact"));
    }

    #[test]
    fn test_color_options_kept() {
        let raw = object(json!({"colorOptions": [{"ffca8a": "e0975c"}, {"ffca8a": "00ff00"}]}));
        let out = convert(&raw, "/a.head", "a.head", &ConvertOptions::default());
        assert_eq!(
            out["colorOptions"],
            json!([{"ffca8a": "e0975c"}, {"ffca8a": "00ff00"}])
        );
    }

    #[test]
    fn test_color_options_malformed_dropped() {
        let raw = object(json!({"colorOptions": [{"ffca8a": "e0975c"}, "ff0000"]}));
        let out = convert(&raw, "/a.head", "a.head", &ConvertOptions::default());
        assert!(!out.contains_key("colorOptions"));

        let raw = object(json!({"colorOptions": {"ffca8a": "e0975c"}}));
        let out = convert(&raw, "/a.head", "a.head", &ConvertOptions::default());
        assert!(!out.contains_key("colorOptions"));
    }

    #[test]
    fn test_color_key_fixup() {
        let raw = object(json!({"colorOptions": [{"0a0a0a": "ffffff"}, {"ffca8a": "000000"}, {"123": "456"}]}));
        let options = ConvertOptions {
            fix_color_keys: true,
            ..Default::default()
        };
        let out = convert(&raw, "/a.head", "a.head", &options);

        let colors = out["colorOptions"].as_array().unwrap();
        assert_eq!(colors.len(), 3);
        for (color, key) in colors.iter().zip(["#0a0a0a", "#ffca8a", "#123"]) {
            let color = color.as_object().unwrap();
            assert_eq!(color.len(), 1);
            assert!(color.contains_key(key));
        }
    }

    #[test]
    fn test_color_key_fixup_still_drops_malformed() {
        let raw = object(json!({"colorOptions": [{"0a0a0a": "ffffff"}, 3]}));
        let options = ConvertOptions {
            fix_color_keys: true,
            ..Default::default()
        };
        let out = convert(&raw, "/a.head", "a.head", &options);
        assert!(!out.contains_key("colorOptions"));
    }

    #[test]
    fn test_extra_parameters() {
        let raw = object(json!({"itemName": "Cap", "tags": ["hat"], "rarity": null}));
        let options = ConvertOptions {
            parameters: vec!["tags".into(), "rarity".into(), "missing".into()],
            ..Default::default()
        };
        let out = convert(&raw, "/a.head", "a.head", &options);

        assert_eq!(out["tags"], json!(["hat"]));
        assert!(!out.contains_key("rarity"));
        assert!(!out.contains_key("missing"));
    }

    #[test]
    fn test_strip_comments() {
        let text = "{\n  // line comment\n  \"a\": 1, /* block\n comment */ \"b\": \"x//y\"\n}";
        let value: Value = serde_json::from_str(&strip_comments(text)).unwrap();
        assert_eq!(value, json!({"a": 1, "b": "x//y"}));
    }

    #[test]
    fn test_strip_comments_escaped_quote() {
        let text = r#"{"a": "say \"hi\" // not a comment"}"#;
        assert_eq!(strip_comments(text), text);
    }

    #[test]
    fn test_parse_item_with_comments() {
        let item = RawItem::new("/a.head", "{\n  // the hat\n  \"itemName\": \"Cap\"\n}");
        assert_eq!(parse_item(&item).unwrap()["itemName"], json!("Cap"));
    }

    #[test]
    fn test_parse_item() {
        let item = RawItem::new("/a.head", r#"{"itemName": "Cap"}"#);
        assert_eq!(parse_item(&item).unwrap()["itemName"], json!("Cap"));

        let item = RawItem::new("/a.head", "[1, 2]");
        assert!(matches!(parse_item(&item), Err(Error::NotAnObject { .. })));

        let item = RawItem::new("/a.head", "{ not json");
        assert!(matches!(parse_item(&item), Err(Error::Json { .. })));
    }
}
