//! Search directory loader.
//!
//! Reads every `<section>_<bucket>.js` file of a generated `search/`
//! directory, in file-name order, into a [`SymbolIndex`].

use crate::config::Config;
use crate::error::{IndexError, ParseError, Result};
use crate::index::SymbolIndex;
use crate::output::{LoadEvent, OutputSink};
use crate::shard::{Section, ShardName, ShardSource};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Options controlling directory loading.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Only load shards of these sections (empty = all).
    pub sections: Vec<Section>,
    /// Fail on the first malformed shard instead of skipping it.
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            strict: true,
        }
    }
}

impl From<&Config> for LoadOptions {
    fn from(config: &Config) -> Self {
        Self {
            sections: config.sections.clone(),
            strict: config.strict,
        }
    }
}

/// Outcome of validating one shard file.
#[derive(Debug)]
pub struct ShardReport {
    pub name: ShardName,
    pub path: PathBuf,
    pub result: std::result::Result<usize, ParseError>,
}

/// List shard files in `dir`, sorted by file name.
///
/// Files that are not shards are reported through `output` and skipped.
pub fn discover_shards(dir: &Path, output: &dyn OutputSink) -> Result<Vec<(ShardName, PathBuf)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| IndexError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut shards = Vec::new();
    for path in paths {
        if path.extension().and_then(|e| e.to_str()) != Some("js") {
            continue;
        }
        match ShardName::from_path(&path) {
            Ok(name) => shards.push((name, path)),
            Err(_) => {
                debug!("ignoring non-shard file {}", path.display());
                output.emit_event(LoadEvent::FileIgnored { path });
            }
        }
    }
    Ok(shards)
}

/// Read and decode one shard file. I/O failures are fatal; undecodable
/// contents are a malformed shard like any other.
fn read_source(name: ShardName, path: &Path) -> Result<std::result::Result<ShardSource, ParseError>> {
    let bytes = fs::read(path).map_err(|e| IndexError::io(path, e))?;
    Ok(ShardSource::from_bytes(name, bytes))
}

/// Load a search directory into a fresh index.
///
/// In strict mode the first malformed shard aborts the load with its
/// [`ParseError`]; otherwise it is skipped and reported as
/// [`LoadEvent::ShardSkipped`]. I/O errors always abort.
pub fn load_dir(dir: &Path, options: &LoadOptions, output: &dyn OutputSink) -> Result<SymbolIndex> {
    let mut index = SymbolIndex::new();

    for (name, path) in discover_shards(dir, output)? {
        if !options.sections.is_empty() && !options.sections.contains(&name.section) {
            output.emit_event(LoadEvent::SectionFiltered { name });
            continue;
        }

        let shard = match read_source(name, &path)?.and_then(|source| source.parse()) {
            Ok(shard) => shard,
            Err(error) if !options.strict => {
                debug!("skipping malformed shard {}: {}", path.display(), error);
                output.emit_event(LoadEvent::ShardSkipped { name, error });
                continue;
            }
            Err(error) => return Err(error.into()),
        };

        let misplaced: Vec<String> = shard.misplaced_keys().map(str::to_string).collect();
        if !misplaced.is_empty() {
            debug!(
                "shard {} holds {} key(s) outside bucket {}",
                name,
                misplaced.len(),
                name.bucket
            );
            output.emit_event(LoadEvent::MisplacedKeys {
                name,
                keys: misplaced,
            });
        }

        let entries = index.insert(shard);
        output.emit_event(LoadEvent::ShardLoaded { name, entries });
    }

    info!(
        "loaded {} entries from {} shard(s) in {}",
        index.len(),
        index.shard_count(),
        dir.display()
    );
    Ok(index)
}

/// Parse every shard in `dir` and report each outcome, without stopping at
/// the first failure.
pub fn check_dir(dir: &Path, output: &dyn OutputSink) -> Result<Vec<ShardReport>> {
    let mut reports = Vec::new();
    for (name, path) in discover_shards(dir, output)? {
        let result = read_source(name, &path)?
            .and_then(|source| source.parse())
            .map(|shard| shard.len());
        reports.push(ShardReport { name, path, result });
    }
    Ok(reports)
}
