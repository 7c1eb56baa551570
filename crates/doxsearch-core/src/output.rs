use crate::error::ParseError;
use crate::index::{IndexStats, Match};
use crate::shard::ShardName;
use std::path::PathBuf;

/// Semantic events emitted while loading and checking shards.
///
/// Core emits all variants unconditionally; clients decide which to display
/// and how to format them. Verbose-tier events are shown only when the client
/// has verbose mode enabled.
#[derive(Debug, Clone)]
pub enum LoadEvent {
    /// A shard was parsed and indexed (verbose-tier).
    ShardLoaded { name: ShardName, entries: usize },
    /// A file in the search directory is not a shard (verbose-tier).
    FileIgnored { path: PathBuf },
    /// A shard was excluded by the section allow-list (verbose-tier).
    SectionFiltered { name: ShardName },
    /// A malformed shard was skipped in non-strict mode.
    ShardSkipped { name: ShardName, error: ParseError },
    /// Keys found in a shard whose bucket does not admit them.
    MisplacedKeys { name: ShardName, keys: Vec<String> },
}

impl LoadEvent {
    /// Whether the event is only interesting in verbose mode.
    pub fn is_verbose(&self) -> bool {
        matches!(
            self,
            LoadEvent::ShardLoaded { .. }
                | LoadEvent::FileIgnored { .. }
                | LoadEvent::SectionFiltered { .. }
        )
    }
}

/// Abstraction over how command results and diagnostics are presented.
///
/// doxsearch-cli implements this with OutputHandler (text or JSON lines to stdout).
pub trait OutputSink {
    /// Emit a result string (the primary output of a command).
    fn emit_result(&self, content: &str);

    /// Emit one search match.
    fn emit_match(&self, m: &Match<'_>);

    /// Emit index statistics.
    fn emit_stats(&self, stats: &IndexStats);

    /// Emit a typed load-path event. Clients filter and format as appropriate.
    fn emit_event(&self, event: LoadEvent);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit_result(&self, _: &str) {}
    fn emit_match(&self, _: &Match<'_>) {}
    fn emit_stats(&self, _: &IndexStats) {}
    fn emit_event(&self, _: LoadEvent) {}
}

#[cfg(test)]
pub(crate) struct CaptureSink {
    pub results: std::cell::RefCell<Vec<String>>,
    pub matches: std::cell::RefCell<Vec<String>>,
    pub stats: std::cell::RefCell<Vec<IndexStats>>,
    pub events: std::cell::RefCell<Vec<LoadEvent>>,
}

#[cfg(test)]
impl CaptureSink {
    pub fn new() -> Self {
        Self {
            results: std::cell::RefCell::new(vec![]),
            matches: std::cell::RefCell::new(vec![]),
            stats: std::cell::RefCell::new(vec![]),
            events: std::cell::RefCell::new(vec![]),
        }
    }
}

#[cfg(test)]
impl OutputSink for CaptureSink {
    fn emit_result(&self, content: &str) {
        self.results.borrow_mut().push(content.to_string());
    }
    fn emit_match(&self, m: &Match<'_>) {
        self.matches.borrow_mut().push(m.label.to_string());
    }
    fn emit_stats(&self, stats: &IndexStats) {
        self.stats.borrow_mut().push(stats.clone());
    }
    fn emit_event(&self, event: LoadEvent) {
        self.events.borrow_mut().push(event);
    }
}
