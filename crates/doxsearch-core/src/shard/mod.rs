//! Shard files: naming, sections, buckets, and parsing.
//!
//! A shard is one generated `<section>_<bucket>.js` file holding the entries
//! of one index section whose keys fall into one bucket.

mod lexer;
mod parser;

pub use lexer::{Lexer, Pos, Token};
pub use parser::{Value, parse_entries, parse_values};

use crate::entry::IndexEntry;
use crate::error::{IndexError, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString};

/// Index sections the documentation generator splits its search data into.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Section {
    All,
    Classes,
    Namespaces,
    Files,
    Functions,
    Variables,
    Typedefs,
    Enums,
    Enumvalues,
    Related,
    Defines,
    Groups,
    Pages,
    Properties,
    Events,
    Concepts,
}

impl Section {
    /// Look up a section by name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self, IndexError> {
        Section::from_str(&name.to_ascii_lowercase())
            .map_err(|_| IndexError::UnknownSection(name.to_string()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Key-initial group a shard covers, as encoded in its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// All keys start with this character (`all_66.js` -> `f`).
    Char(char),
    /// Positional bucket number (`all_f.js` -> 15); key initials unknown.
    Ordinal(u32),
}

impl Bucket {
    /// Decode a file-name suffix. Only the generator's own spelling is
    /// accepted (lowercase hex, no zero padding), so distinct files never
    /// map to the same bucket.
    fn parse(suffix: &str) -> Option<Bucket> {
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(suffix, 16).ok()?;
        let bucket = match char::from_u32(value) {
            Some(c) if suffix.len() >= 2 && is_key_initial(c) => Bucket::Char(c),
            _ => Bucket::Ordinal(value),
        };
        (bucket.suffix() == suffix).then_some(bucket)
    }

    /// Whether `key` may legitimately live in this bucket.
    pub fn admits(&self, key: &str) -> bool {
        match self {
            Bucket::Char(c) => key.starts_with(*c),
            Bucket::Ordinal(_) => true,
        }
    }

    fn suffix(&self) -> String {
        match self {
            Bucket::Char(c) => format!("{:x}", *c as u32),
            Bucket::Ordinal(n) => format!("{:x}", n),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Char(c) => write!(f, "'{}'", c),
            Bucket::Ordinal(n) => write!(f, "#{}", n),
        }
    }
}

/// Characters a normalized key can start with.
fn is_key_initial(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || !c.is_ascii()
}

/// Identity of a shard: its section and bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShardName {
    pub section: Section,
    pub bucket: Bucket,
}

impl ShardName {
    pub fn new(section: Section, bucket: Bucket) -> Self {
        Self { section, bucket }
    }

    /// Decode a shard file name such as `functions_73.js` (extension optional).
    pub fn from_file_name(name: &str) -> Result<Self, ParseError> {
        let stem = name.strip_suffix(".js").unwrap_or(name);
        let invalid = || ParseError::InvalidShardName(name.to_string());

        let (section, suffix) = stem.rsplit_once('_').ok_or_else(invalid)?;
        let section = Section::from_str(section).map_err(|_| invalid())?;
        let bucket = Bucket::parse(suffix).ok_or_else(invalid)?;
        Ok(Self { section, bucket })
    }

    /// Decode the file name component of `path`.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ParseError::InvalidShardName(path.display().to_string()))?;
        Self::from_file_name(name)
    }
}

impl fmt::Display for ShardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.section, self.bucket.suffix())
    }
}

/// Unparsed shard text together with its name.
#[derive(Debug, Clone)]
pub struct ShardSource {
    pub name: ShardName,
    pub text: String,
}

impl ShardSource {
    pub fn new(name: ShardName, text: impl Into<String>) -> Self {
        Self {
            name,
            text: text.into(),
        }
    }

    /// Decode raw file contents; invalid UTF-8 is reported at the first bad byte.
    pub fn from_bytes(name: ShardName, bytes: Vec<u8>) -> Result<Self, ParseError> {
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Self::new(name, text)),
            Err(err) => {
                let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
                let valid = std::str::from_utf8(valid).unwrap_or_default();
                let line = valid.matches('\n').count() + 1;
                let column = valid.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
                Err(ParseError::Syntax {
                    shard: name.to_string(),
                    line,
                    column,
                    message: "invalid UTF-8".to_string(),
                })
            }
        }
    }

    /// Parse the source into a shard.
    pub fn parse(&self) -> Result<Shard, ParseError> {
        let entries = parse_entries(&self.name.to_string(), &self.text)?;
        Ok(Shard {
            name: self.name,
            entries,
        })
    }
}

/// A parsed shard: entries in file-declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    pub name: ShardName,
    pub entries: Vec<IndexEntry>,
}

impl Shard {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that do not belong to this shard's bucket.
    pub fn misplaced_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|e| e.key.as_str())
            .filter(|key| !self.name.bucket.admits(key))
    }
}
