//! Result shape for partial-match lookups.

use serde::{Deserialize, Serialize};

/// One match or several, kept distinct so callers can tell them apart.
///
/// Serializes untagged: `One` as the bare record, `Many` as an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Matches<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Matches<T> {
    /// Collapses a result list: `None` when empty, `One` for a single item.
    pub fn from_vec(mut items: Vec<T>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop().map(Self::One),
            _ => Some(Self::Many(items)),
        }
    }
}
