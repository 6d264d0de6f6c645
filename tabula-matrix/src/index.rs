//! Index collections and row/column selectors

use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeFull};
use tabula_core::{Result, TabulaError};

/// Non-empty ordered sequence of zero-based positions
///
/// Positions need be neither contiguous nor unique; order is preserved
/// by every operation that consumes the collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct IndexCollection {
    indexes: Vec<usize>,
}

impl IndexCollection {
    pub fn from_vec(indexes: Vec<usize>) -> Result<Self> {
        if indexes.is_empty() {
            return Err(TabulaError::argument_null("indexes")
                .with_suggestion("An index collection must contain at least one position"));
        }
        Ok(Self { indexes })
    }

    pub fn from_slice(indexes: &[usize]) -> Result<Self> {
        Self::from_vec(indexes.to_vec())
    }

    /// Positions `first..=last`
    pub fn range(first: usize, last: usize) -> Result<Self> {
        if last < first {
            return Err(TabulaError::out_of_range(
                "last",
                format!("range end {} precedes range start {}", last, first),
            ));
        }
        Ok(Self { indexes: (first..=last).collect() })
    }

    /// Positions `first, first + step, ...` not exceeding `last`
    pub fn sequence(first: usize, step: usize, last: usize) -> Result<Self> {
        if step == 0 {
            return Err(TabulaError::out_of_range("step", "sequence step must be positive"));
        }
        if last < first {
            return Err(TabulaError::out_of_range(
                "last",
                format!("sequence end {} precedes sequence start {}", last, first),
            ));
        }
        Ok(Self { indexes: (first..=last).step_by(step).collect() })
    }

    /// Positions `0..=last`
    pub fn up_to(last: usize) -> Self {
        Self { indexes: (0..=last).collect() }
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Always false: collections hold at least one position
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Largest position in the collection
    pub fn max(&self) -> usize {
        self.indexes.iter().copied().max().unwrap_or(0)
    }

    pub fn get(&self, i: usize) -> Option<usize> {
        self.indexes.get(i).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indexes.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indexes
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.indexes
    }
}

impl TryFrom<Vec<usize>> for IndexCollection {
    type Error = TabulaError;

    fn try_from(indexes: Vec<usize>) -> Result<Self> {
        Self::from_vec(indexes)
    }
}

impl From<IndexCollection> for Vec<usize> {
    fn from(c: IndexCollection) -> Self {
        c.indexes
    }
}

impl<'a> IntoIterator for &'a IndexCollection {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.indexes.iter().copied()
    }
}

/// Selection of rows or columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every row (or column)
    All,
    Index(usize),
    Indexes(IndexCollection),
    Range(Range<usize>),
    Name(String),
    Names(Vec<String>),
}

impl Selector {
    pub fn all() -> Self {
        Selector::All
    }
}

impl From<usize> for Selector {
    fn from(i: usize) -> Self {
        Selector::Index(i)
    }
}

impl From<IndexCollection> for Selector {
    fn from(c: IndexCollection) -> Self {
        Selector::Indexes(c)
    }
}

impl From<&IndexCollection> for Selector {
    fn from(c: &IndexCollection) -> Self {
        Selector::Indexes(c.clone())
    }
}

impl From<Range<usize>> for Selector {
    fn from(r: Range<usize>) -> Self {
        Selector::Range(r)
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::All
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Name(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Name(name)
    }
}

impl From<&[&str]> for Selector {
    fn from(names: &[&str]) -> Self {
        Selector::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Selector {
    fn from(names: [&str; N]) -> Self {
        Selector::Names(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<String>> for Selector {
    fn from(names: Vec<String>) -> Self {
        Selector::Names(names)
    }
}
