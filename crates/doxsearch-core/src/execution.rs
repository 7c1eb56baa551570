//! Command execution.
//!
//! Front-ends build a [`Command`] and hand it here together with the
//! resolved [`Config`] and an [`OutputSink`]; all results go through the sink.

use crate::config::Config;
use crate::error::Result;
use crate::index::{QueryOptions, SymbolIndex};
use crate::input::Command;
use crate::loader::{LoadOptions, check_dir, load_dir};
use crate::output::OutputSink;

/// What the front-end should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEffect {
    /// Nothing further
    None,
    /// `check` found malformed shards; front-ends exit non-zero
    CheckFailed { failures: usize },
}

/// Load the index configured by `config`.
pub fn load_index(config: &Config, output: &dyn OutputSink) -> Result<SymbolIndex> {
    load_dir(&config.search_dir, &LoadOptions::from(config), output)
}

/// Execute a command, loading the index first when the command needs one.
pub fn execute_command(
    config: &Config,
    command: &Command,
    output: &dyn OutputSink,
) -> Result<CommandEffect> {
    if !command.needs_index() {
        return run_check(config, output);
    }
    let index = load_index(config, output)?;
    Ok(execute_with_index(&index, config, command, output))
}

/// Execute an index command against an already-loaded index.
///
/// `check` reads shard files directly; passed here it only re-reports the
/// loaded shards.
pub fn execute_with_index(
    index: &SymbolIndex,
    config: &Config,
    command: &Command,
    output: &dyn OutputSink,
) -> CommandEffect {
    match command {
        Command::Query {
            prefix,
            section,
            limit,
        } => {
            let options = QueryOptions {
                prefix: prefix.clone(),
                section: section.or(config.default_section),
                limit: match limit {
                    Some(0) => None,
                    Some(n) => Some(*n),
                    None => config.effective_limit(),
                },
            };
            for m in index.search(&options) {
                output.emit_match(&m);
            }
        }
        Command::Show { key } => {
            for m in index.get(key) {
                output.emit_match(&m);
            }
        }
        Command::Stats => output.emit_stats(&index.stats()),
        Command::Sections => {
            let stats = index.stats();
            for (section, entries) in &stats.sections {
                output.emit_result(&format!("{}\t{}", section, entries));
            }
        }
        Command::Check => {
            for shard in index.shards() {
                output.emit_result(&format!("ok\t{}\t{} entries", shard.name, shard.len()));
            }
        }
    }
    CommandEffect::None
}

fn run_check(config: &Config, output: &dyn OutputSink) -> Result<CommandEffect> {
    let reports = check_dir(&config.search_dir, output)?;
    let mut failures = 0;
    for report in &reports {
        match &report.result {
            Ok(entries) => {
                output.emit_result(&format!("ok\t{}\t{} entries", report.name, entries));
            }
            Err(error) => {
                failures += 1;
                output.emit_result(&format!("FAIL\t{}\t{}", report.name, error));
            }
        }
    }

    if failures > 0 {
        Ok(CommandEffect::CheckFailed { failures })
    } else {
        Ok(CommandEffect::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CaptureSink;
    use crate::shard::Section;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("all_66.js"),
            "var searchData=[\
             ['fft2d',['FFT2D',['../classgpuSignal.html#a7d',1,'gpuSignal']]],\
             ['filter',['Filter',['../classisce_1_1signal_1_1Filter.html',1,'isce::signal']]],\
             ['forward',['forward',['a.html#x',1,'isce::core::LonLat::forward()'],['b.html#y',1,'isce::core::Geocent::forward()']]]\
             ];",
        )
        .unwrap();
        fs::write(
            dir.path().join("functions_66.js"),
            "var searchData=[['forward',['forward',['a.html#x',1,'isce::core::LonLat::forward()'],['b.html#y',1,'isce::core::Geocent::forward()']]]];",
        )
        .unwrap();
        let config = Config {
            search_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        (dir, config)
    }

    fn query(prefix: &str, section: Option<Section>, limit: Option<usize>) -> Command {
        Command::Query {
            prefix: prefix.into(),
            section,
            limit,
        }
    }

    #[test]
    fn query_emits_deduplicated_matches() {
        let (_dir, config) = setup();
        let sink = CaptureSink::new();
        let effect = execute_command(&config, &query("f", None, None), &sink).unwrap();
        assert_eq!(effect, CommandEffect::None);
        // functions_66 repeats the forward targets from all_66
        assert_eq!(
            sink.matches.borrow().as_slice(),
            ["FFT2D", "Filter", "forward"]
        );
    }

    #[test]
    fn query_section_falls_back_to_config_default() {
        let (_dir, mut config) = setup();
        config.default_section = Some(Section::Functions);
        let sink = CaptureSink::new();
        execute_command(&config, &query("f", None, None), &sink).unwrap();
        assert_eq!(sink.matches.borrow().as_slice(), ["forward"]);

        let sink = CaptureSink::new();
        execute_command(&config, &query("f", Some(Section::All), None), &sink).unwrap();
        assert_eq!(sink.matches.borrow().len(), 3);
    }

    #[test]
    fn query_limit_overrides_config() {
        let (_dir, mut config) = setup();
        config.limit = 1;
        let sink = CaptureSink::new();
        execute_command(&config, &query("f", None, None), &sink).unwrap();
        assert_eq!(sink.matches.borrow().len(), 1);

        let sink = CaptureSink::new();
        execute_command(&config, &query("f", None, Some(2)), &sink).unwrap();
        assert_eq!(sink.matches.borrow().len(), 2);

        let sink = CaptureSink::new();
        execute_command(&config, &query("f", None, Some(0)), &sink).unwrap();
        assert_eq!(sink.matches.borrow().len(), 3);
    }

    #[test]
    fn show_reports_every_section() {
        let (_dir, config) = setup();
        let sink = CaptureSink::new();
        execute_command(
            &config,
            &Command::Show {
                key: "Forward".into(),
            },
            &sink,
        )
        .unwrap();
        assert_eq!(sink.matches.borrow().as_slice(), ["forward", "forward"]);
    }

    #[test]
    fn stats_and_sections() {
        let (_dir, config) = setup();
        let sink = CaptureSink::new();
        execute_command(&config, &Command::Stats, &sink).unwrap();
        let stats = sink.stats.borrow();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].entries, 4);

        let sink = CaptureSink::new();
        execute_command(&config, &Command::Sections, &sink).unwrap();
        assert_eq!(
            sink.results.borrow().as_slice(),
            ["all\t3", "functions\t1"]
        );
    }

    #[test]
    fn check_reports_failures_without_loading() {
        let (dir, config) = setup();
        fs::write(dir.path().join("classes_63.js"), "var searchData=[['cube',[]]];").unwrap();

        let sink = CaptureSink::new();
        let effect = execute_command(&config, &Command::Check, &sink).unwrap();
        assert_eq!(effect, CommandEffect::CheckFailed { failures: 1 });
        let results = sink.results.borrow();
        assert_eq!(results.len(), 3);
        assert!(results[1].starts_with("FAIL\tclasses_63\t"));
        assert!(results[1].contains("missing label"));
    }

    #[test]
    fn check_passes_on_clean_directory() {
        let (_dir, config) = setup();
        let sink = CaptureSink::new();
        let effect = execute_command(&config, &Command::Check, &sink).unwrap();
        assert_eq!(effect, CommandEffect::None);
        assert_eq!(sink.results.borrow()[0], "ok\tall_66\t3 entries");
    }

    #[test]
    fn check_against_loaded_index_lists_shards() {
        let (_dir, config) = setup();
        let index = load_index(&config, &CaptureSink::new()).unwrap();
        let sink = CaptureSink::new();
        let effect = execute_with_index(&index, &config, &Command::Check, &sink);
        assert_eq!(effect, CommandEffect::None);
        assert_eq!(sink.results.borrow().len(), 2);
    }
}
