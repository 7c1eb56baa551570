//! doxsearch-core: symbol index over generated documentation search data
//!
//! Parses the JavaScript shard files a documentation generator writes into
//! its `search/` directory and answers case-insensitive prefix queries over
//! the symbols they describe.
//!
//! # Quick Start
//!
//! ```
//! use doxsearch_core::{ShardName, ShardSource, SymbolIndex};
//!
//! let source = ShardSource::new(
//!     ShardName::from_file_name("all_66.js").unwrap(),
//!     "var searchData=[['forward',['forward',[
//!         ['isce::core::LonLat::forward','a.html#x'],
//!         ['isce::core::Geocent::forward','b.html#y']]]]];",
//! );
//!
//! let mut index = SymbolIndex::new();
//! index.load([source]).unwrap();
//!
//! let urls: Vec<&str> = index.query("for").iter().map(|t| t.url.as_str()).collect();
//! assert_eq!(urls, ["a.html#x", "b.html#y"]);
//! ```
//!
//! For whole directories, see [`load_dir`].

pub mod config;
pub mod entry;
pub mod error;
pub mod execution;
pub mod index;
pub mod input;
pub mod loader;
pub mod output;
pub mod shard;

pub use config::Config;
pub use entry::{IndexEntry, Target, normalize_key};
pub use error::{IndexError, ParseError, Result};
pub use execution::{CommandEffect, execute_command, execute_with_index, load_index};
pub use index::{IndexStats, Match, QueryOptions, SymbolIndex};
pub use input::Command;
pub use loader::{LoadOptions, ShardReport, check_dir, load_dir};
pub use output::{LoadEvent, NullSink, OutputSink};
pub use shard::{Bucket, Section, Shard, ShardName, ShardSource};
