//! Row and column names
//!
//! Names are optional labels attached to row or column positions. They are
//! not required to be unique; naming a position twice keeps the last name.
//! Lookup by name resolves to the first position carrying it.

use std::collections::BTreeMap;
use tabula_core::{Result, Scalar, TabulaError};
use crate::types::Matrix;

impl<T: Scalar> Matrix<T> {
    pub fn set_row_name(&mut self, row: usize, name: impl Into<String>) -> Result<()> {
        self.check_row(row, "row_index")?;
        self.row_names.insert(row, name.into());
        Ok(())
    }

    pub fn set_column_name(&mut self, col: usize, name: impl Into<String>) -> Result<()> {
        self.check_col(col, "column_index")?;
        self.column_names.insert(col, name.into());
        Ok(())
    }

    pub fn row_name(&self, row: usize) -> Option<&str> {
        self.row_names.get(&row).map(String::as_str)
    }

    pub fn column_name(&self, col: usize) -> Option<&str> {
        self.column_names.get(&col).map(String::as_str)
    }

    pub fn row_names(&self) -> &BTreeMap<usize, String> {
        &self.row_names
    }

    pub fn column_names(&self) -> &BTreeMap<usize, String> {
        &self.column_names
    }

    pub fn has_row_names(&self) -> bool {
        !self.row_names.is_empty()
    }

    pub fn has_column_names(&self) -> bool {
        !self.column_names.is_empty()
    }

    pub fn remove_row_names(&mut self) {
        self.row_names.clear();
    }

    pub fn remove_column_names(&mut self) {
        self.column_names.clear();
    }

    /// First row named `name`
    pub fn row_index_of(&self, name: &str) -> Result<usize> {
        find_name(&self.row_names, name).ok_or_else(|| TabulaError::name_not_found("row_name", name))
    }

    /// First column named `name`
    pub fn column_index_of(&self, name: &str) -> Result<usize> {
        find_name(&self.column_names, name)
            .ok_or_else(|| TabulaError::name_not_found("column_name", name))
    }
}

fn find_name(names: &BTreeMap<usize, String>, name: &str) -> Option<usize> {
    names.iter().find(|(_, n)| n.as_str() == name).map(|(&i, _)| i)
}

/// Names carried over to a selection: position `k` of the result takes the
/// name of `selected[k]` in the source.
pub(crate) fn select_names(names: &BTreeMap<usize, String>, selected: &[usize]) -> BTreeMap<usize, String> {
    if names.is_empty() {
        return BTreeMap::new();
    }
    selected
        .iter()
        .enumerate()
        .filter_map(|(k, i)| names.get(i).map(|n| (k, n.clone())))
        .collect()
}
