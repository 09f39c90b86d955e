use log::debug;
use serde::de::{self, Deserialize, Deserializer};
use serde::Serialize;
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{LoaderError, LoaderResult};

/// File name the loader looks for in the working directory
pub const CONFIG_FILE_NAME: &str = "gulpfile.yml";

/// Configuration loaded from `gulpfile.yml`.
///
/// The document is kept verbatim: no schema is enforced and any YAML shape is
/// accepted. A `Config` is never mutated after it is built, so consumers only
/// ever receive it by shared reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Config {
    root: Value,
}

impl Default for Config {
    fn default() -> Self {
        Self::empty()
    }
}

impl Config {
    /// The empty mapping `{}`
    pub fn empty() -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
        }
    }

    /// Load configuration from a file.
    ///
    /// Reads the whole file as UTF-8 and parses it as a single YAML document.
    /// A missing or unreadable file is a [`LoaderError::Read`], malformed YAML
    /// is a [`LoaderError::Parse`]. There is no fallback to an empty config;
    /// the caller decides what a failure means.
    pub fn load(path: &Path) -> LoaderResult<Self> {
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| LoaderError::read(path, source))?;

        let config = Self::from_yaml(&content).map_err(|source| LoaderError::parse(path, source))?;

        debug!(
            "Loaded {} top-level key(s) from {}",
            config.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse configuration from YAML text.
    ///
    /// A document with no content (empty, or only comments) is the empty mapping.
    /// Repeated keys in a mapping keep the last value, and `<<` merge keys are
    /// expanded.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if is_blank_document(text) {
            return Ok(Self::empty());
        }

        let LastWins(mut root) = serde_yaml::from_str::<LastWins>(text)?;
        root.apply_merge()?;
        let root = match root {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        };

        Ok(Self { root })
    }

    /// The parsed document as-is
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a top-level key.
    ///
    /// Returns `None` when the key is absent or when the document root is not
    /// a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.as_mapping()?.get(key)
    }

    /// Look up a top-level key holding a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Look up a dotted path such as `styles.paths.0`.
    ///
    /// Segments step into mappings by key and into sequences by index.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = match current {
                Value::Sequence(items) => items.get(segment.parse::<usize>().ok()?)?,
                Value::Tagged(tagged) => tagged.value.get(segment)?,
                other => other.get(segment)?,
            };
        }
        Some(current)
    }

    /// Top-level keys in document order
    pub fn keys(&self) -> Vec<&Value> {
        match self.root.as_mapping() {
            Some(map) => map.keys().collect(),
            None => Vec::new(),
        }
    }

    /// Number of top-level keys, or zero when the root is not a mapping
    pub fn len(&self) -> usize {
        self.root.as_mapping().map_or(0, Mapping::len)
    }

    /// True when the root has no top-level keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.root)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.root)
    }
}

/// Format a value the way it is shown on the console.
///
/// Strings print bare; everything else prints as single-line JSON, falling
/// back to YAML for values JSON can't express (e.g. non-string mapping keys).
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other)
            .or_else(|_| serde_yaml::to_string(other).map(|s| s.trim_end().to_string()))
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

/// A YAML value where a repeated mapping key overwrites the earlier entry
/// instead of failing the parse.
struct LastWins(Value);

impl<'de> Deserialize<'de> for LastWins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LastWinsVisitor)
    }
}

struct LastWinsVisitor;

impl<'de> de::Visitor<'de> for LastWinsVisitor {
    type Value = LastWins;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(LastWins(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(LastWins(Value::Number(v.into())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(LastWins(Value::Number(v.into())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(LastWins(Value::Number(v.into())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(LastWins(Value::String(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(LastWins(Value::String(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LastWins(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(LastWins(Value::Null))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        LastWins::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(LastWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(LastWins(Value::Sequence(items)))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some((LastWins(key), LastWins(value))) = map.next_entry()? {
            mapping.insert(key, value);
        }
        Ok(LastWins(Value::Mapping(mapping)))
    }

    // Custom `!tag` nodes arrive as enums keyed by the tag.
    fn visit_enum<A>(self, data: A) -> Result<Self::Value, A::Error>
    where
        A: de::EnumAccess<'de>,
    {
        let (tag, variant): (String, _) = data.variant()?;
        let LastWins(value) = de::VariantAccess::newtype_variant(variant)?;
        Ok(LastWins(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        }))))
    }
}
