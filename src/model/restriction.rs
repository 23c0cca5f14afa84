use std::fmt;

use serde::{Deserialize, Serialize};

/// Who may read a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionLevel {
    All,
    Friends,
    Owner,
}

impl fmt::Display for RestrictionLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use RestrictionLevel::*;
        f.write_str(match self {
            All => "all",
            Friends => "friends",
            Owner => "owner",
        })
    }
}

/// Lookup key for the resolver's per-level predicates.
///
/// `Unset` is never stored: it stands for an absent `restrictedTo`, which
/// falls back to the owner's privacy preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    All,
    Friends,
    Owner,
    Unset,
}

impl From<Option<RestrictionLevel>> for Gate {
    fn from(level: Option<RestrictionLevel>) -> Self {
        match level {
            Some(RestrictionLevel::All) => Gate::All,
            Some(RestrictionLevel::Friends) => Gate::Friends,
            Some(RestrictionLevel::Owner) => Gate::Owner,
            None => Gate::Unset,
        }
    }
}
