//! The in-memory symbol index.
//!
//! Shards are kept in load order; a sorted key map answers prefix lookups
//! with a range scan. All queries are read-only.

use crate::entry::{IndexEntry, Target, normalize_key};
use crate::error::ParseError;
use crate::shard::{Section, Shard, ShardName, ShardSource};
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::ops::Bound;

/// Position of an entry: (shard slot, entry slot). Orders as declared.
type Location = (usize, usize);

/// Options for [`SymbolIndex::search`].
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Prefix typed by the user; normalized before matching.
    pub prefix: String,
    /// Restrict matches to shards of one section.
    pub section: Option<Section>,
    /// Maximum number of matches (not targets). `None` means unlimited.
    pub limit: Option<usize>,
}

impl QueryOptions {
    /// Create a simple prefix query
    pub fn prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            ..Default::default()
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One matching entry with the targets not already reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub section: Section,
    pub targets: Vec<&'a Target>,
}

impl fmt::Display for Match<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label, self.section)?;
        for target in &self.targets {
            write!(f, "\n  {}", target)?;
        }
        Ok(())
    }
}

/// Keys to look `input` up under: its normalized form, plus the input itself
/// when it is already a well-formed escaped key (`forward_5fh`). Empty for
/// blank input.
fn lookup_keys(input: &str) -> Vec<String> {
    let normalized = normalize_key(input);
    if normalized.is_empty() {
        return Vec::new();
    }
    let literal = input.trim().to_ascii_lowercase();
    if literal != normalized && is_escaped_key(&literal) {
        vec![normalized, literal]
    } else {
        vec![normalized]
    }
}

/// True when `s` is in key form and every `_` starts a complete `_XX` escape.
fn is_escaped_key(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'a'..=b'z' | b'0'..=b'9' => i += 1,
            b'_' if bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                i += 3
            }
            _ => return false,
        }
    }
    true
}

/// Entry and target counts, overall and per section.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub shards: usize,
    pub entries: usize,
    pub targets: usize,
    pub distinct_keys: usize,
    pub sections: BTreeMap<Section, usize>,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shards: {}, entries: {}, targets: {}, distinct keys: {}",
            self.shards, self.entries, self.targets, self.distinct_keys
        )?;
        if !self.sections.is_empty() {
            let parts: Vec<String> = self
                .sections
                .iter()
                .map(|(s, n)| format!("{} ({})", s, n))
                .collect();
            write!(f, "\n  sections: {}", parts.join(", "))?;
        }
        Ok(())
    }
}

/// Read-only prefix index over parsed shards.
#[derive(Debug, Default, Clone)]
pub struct SymbolIndex {
    shards: IndexMap<ShardName, Shard>,
    keys: BTreeMap<String, Vec<Location>>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add shard sources.
    ///
    /// Every source is parsed before anything is inserted: on a
    /// [`ParseError`] the index is left as it was. A shard whose name is
    /// already loaded is replaced in place. Returns the number of entries
    /// added by this call.
    pub fn load<I>(&mut self, sources: I) -> Result<usize, ParseError>
    where
        I: IntoIterator<Item = ShardSource>,
    {
        let shards = sources
            .into_iter()
            .map(|source| source.parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.insert_all(shards))
    }

    /// Add an already-parsed shard, replacing one with the same name.
    pub fn insert(&mut self, shard: Shard) -> usize {
        self.insert_all([shard])
    }

    fn insert_all(&mut self, shards: impl IntoIterator<Item = Shard>) -> usize {
        let mut added = 0;
        for shard in shards {
            debug!("indexed shard {} ({} entries)", shard.name, shard.len());
            added += shard.len();
            self.shards.insert(shard.name, shard);
        }
        self.rebuild_keys();
        added
    }

    fn rebuild_keys(&mut self) {
        self.keys.clear();
        for (shard_slot, shard) in self.shards.values().enumerate() {
            for (entry_slot, entry) in shard.entries.iter().enumerate() {
                self.keys
                    .entry(entry.key.clone())
                    .or_default()
                    .push((shard_slot, entry_slot));
            }
        }
    }

    /// Targets of every entry whose key starts with `prefix`.
    ///
    /// Case-insensitive; an empty or blank prefix matches nothing. Results
    /// are in declaration order: shard load order, then entry order, then
    /// target order.
    pub fn query(&self, prefix: &str) -> Vec<&Target> {
        self.locate(prefix, None)
            .into_iter()
            .flat_map(|(_, entry)| entry.targets.iter())
            .collect()
    }

    /// Grouped prefix search with section filter, limit and de-duplication.
    ///
    /// A target already reported by an earlier match (for instance the same
    /// method listed under both `all` and `functions`) is dropped; a match
    /// left with no targets is dropped too.
    pub fn search(&self, options: &QueryOptions) -> Vec<Match<'_>> {
        let limit = options.limit.unwrap_or(usize::MAX);
        let mut seen: HashSet<&Target> = HashSet::new();
        let mut matches = Vec::new();

        for (section, entry) in self.locate(&options.prefix, options.section) {
            if matches.len() >= limit {
                break;
            }
            let targets: Vec<&Target> = entry
                .targets
                .iter()
                .filter(|t| seen.insert(*t))
                .collect();
            if targets.is_empty() {
                continue;
            }
            matches.push(Match {
                key: &entry.key,
                label: &entry.label,
                section,
                targets,
            });
        }

        matches
    }

    /// Entries whose key equals `key` (after normalization), in load order,
    /// with all of their targets.
    pub fn get(&self, key: &str) -> Vec<Match<'_>> {
        let mut locations: Vec<Location> = lookup_keys(key)
            .iter()
            .filter_map(|k| self.keys.get(k))
            .flatten()
            .copied()
            .collect();
        locations.sort_unstable();
        locations.dedup();
        locations
            .into_iter()
            .filter_map(|loc| self.entry_at(loc))
            .map(|(section, entry)| Match {
                key: &entry.key,
                label: &entry.label,
                section,
                targets: entry.targets.iter().collect(),
            })
            .collect()
    }

    fn locate(&self, input: &str, section: Option<Section>) -> Vec<(Section, &IndexEntry)> {
        let mut locations: Vec<Location> = Vec::new();
        for prefix in lookup_keys(input) {
            locations.extend(
                self.keys
                    .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
                    .take_while(|(key, _)| key.starts_with(&prefix))
                    .flat_map(|(_, locs)| locs.iter().copied()),
            );
        }
        locations.sort_unstable();
        locations.dedup();

        locations
            .into_iter()
            .filter_map(|loc| self.entry_at(loc))
            .filter(|(s, _)| section.is_none_or(|wanted| wanted == *s))
            .collect()
    }

    fn entry_at(&self, (shard_slot, entry_slot): Location) -> Option<(Section, &IndexEntry)> {
        let (name, shard) = self.shards.get_index(shard_slot)?;
        Some((name.section, shard.entries.get(entry_slot)?))
    }

    /// Total number of entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.values().map(Shard::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Loaded shards in load order.
    pub fn shards(&self) -> impl Iterator<Item = &Shard> {
        self.shards.values()
    }

    /// Sections with at least one loaded shard.
    pub fn sections(&self) -> BTreeSet<Section> {
        self.shards.keys().map(|name| name.section).collect()
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            shards: self.shards.len(),
            distinct_keys: self.keys.len(),
            ..Default::default()
        };
        for (name, shard) in &self.shards {
            stats.entries += shard.len();
            stats.targets += shard.entries.iter().map(|e| e.targets.len()).sum::<usize>();
            *stats.sections.entry(name.section).or_default() += shard.len();
        }
        stats
    }
}
