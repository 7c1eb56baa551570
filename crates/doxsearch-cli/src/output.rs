//! Output handling for the CLI.
//!
//! This module provides `OutputHandler` which prints command results to
//! stdout (text or JSON lines) and load diagnostics to stderr.

use doxsearch_core::{IndexStats, LoadEvent, Match, OutputSink};
use serde::Serialize;
use serde_json::json;

/// CLI output handler: results to stdout, diagnostics to stderr.
#[derive(Default)]
pub struct OutputHandler {
    json: bool,
    verbose: bool,
}

impl OutputHandler {
    pub fn new(json: bool, verbose: bool) -> Self {
        Self { json, verbose }
    }

    fn print_json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => println!("{}", line),
            Err(e) => log::error!("failed to serialize output: {}", e),
        }
    }

    /// Text form of a load event, or `None` when it should stay hidden.
    fn format_event(&self, event: &LoadEvent) -> Option<String> {
        if event.is_verbose() && !self.verbose {
            return None;
        }
        let text = match event {
            LoadEvent::ShardLoaded { name, entries } => {
                format!("[Loaded {} ({} entries)]", name, entries)
            }
            LoadEvent::FileIgnored { path } => {
                format!("[Ignored non-shard file {}]", path.display())
            }
            LoadEvent::SectionFiltered { name } => {
                format!("[Skipped {} (section not selected)]", name)
            }
            LoadEvent::ShardSkipped { name, error } => {
                format!("[Skipped malformed shard {}: {}]", name, error)
            }
            LoadEvent::MisplacedKeys { name, keys } => format!(
                "[Shard {} holds keys outside bucket {}: {}]",
                name,
                name.bucket,
                keys.join(", ")
            ),
        };
        Some(text)
    }
}

impl OutputSink for OutputHandler {
    fn emit_result(&self, content: &str) {
        if self.json {
            self.print_json(&json!({ "result": content }));
        } else {
            println!("{}", content);
        }
    }

    fn emit_match(&self, m: &Match<'_>) {
        if self.json {
            self.print_json(m);
        } else {
            println!("{}", m);
        }
    }

    fn emit_stats(&self, stats: &IndexStats) {
        if self.json {
            self.print_json(stats);
        } else {
            println!("{}", stats);
        }
    }

    fn emit_event(&self, event: LoadEvent) {
        if let Some(text) = self.format_event(&event) {
            eprintln!("{}", text);
        }
    }
}
