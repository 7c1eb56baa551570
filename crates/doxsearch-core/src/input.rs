//! Input types shared by front-ends.
//!
//! A [`Command`] says what to do; front-ends build one from their own
//! argument syntax and hand it to [`crate::execute_command`].

use crate::shard::Section;
use serde::{Deserialize, Serialize};

/// What operation to perform (mutually exclusive commands)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Prefix search
    Query {
        prefix: String,
        section: Option<Section>,
        limit: Option<usize>,
    },
    /// Exact key lookup
    Show { key: String },
    /// Index statistics
    Stats,
    /// Parse every shard and report failures
    Check,
    /// List loaded sections
    Sections,
}

impl Command {
    /// Whether the command needs a loaded index (`check` parses on its own).
    pub fn needs_index(&self) -> bool {
        !matches!(self, Command::Check)
    }
}
