//! Delimited text sources
//!
//! Both the encoder and the discretizer read the same kind of input: an
//! optional header row followed by data rows, from which a fixed set of
//! columns is extracted. Line numbers in errors are 1-based lines of the
//! source; column numbers are the zero-based positions that were requested.

use std::io::Read;
use csv::{ReaderBuilder, StringRecord, Trim};
use tabula_core::{Result, TabulaError};
use crate::error::SourceError;

/// One data row and the source line it came from
#[derive(Debug)]
pub(crate) struct Row {
    pub line: u64,
    pub record: StringRecord,
}

impl Row {
    pub fn field(&self, column: usize) -> &str {
        self.record.get(column).unwrap_or("")
    }
}

/// Requested column names and the data rows of a source
#[derive(Debug)]
pub(crate) struct Table {
    pub names: Vec<String>,
    pub rows: Vec<Row>,
}

/// Read every row of `reader`, checking each one carries `columns`
pub(crate) fn read_table<R: Read>(reader: R, delimiter: u8, has_headers: bool, columns: &[usize]) -> Result<Table> {
    if columns.is_empty() {
        return Err(TabulaError::argument_null("columns")
            .with_suggestion("Request at least one column to extract"));
    }
    let width = columns.iter().copied().max().map_or(0, |c| c + 1);

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut names = None;
    let mut rows = Vec::new();
    for (n, record) in rdr.records().enumerate() {
        let record = record.map_err(SourceError::from)?;
        let line = record.position().map_or(n as u64 + 1, |p| p.line());
        check_width(&record, columns, width, line)?;

        if has_headers && names.is_none() {
            names = Some(header_names(&record, columns, line)?);
            continue;
        }
        rows.push(Row { line, record });
    }

    if rows.is_empty() {
        return Err(TabulaError::invalid_data("The source contains no data rows")
            .with_suggestion("Provide at least one row of values"));
    }

    let names = names.unwrap_or_else(|| columns.iter().map(|c| c.to_string()).collect());
    tracing::debug!(rows = rows.len(), columns = columns.len(), "read tabular source");
    Ok(Table { names, rows })
}

fn check_width(record: &StringRecord, columns: &[usize], width: usize, line: u64) -> Result<()> {
    if record.len() >= width {
        return Ok(());
    }
    let missing = columns.iter().copied().find(|&c| c >= record.len()).unwrap_or(width - 1);
    Err(TabulaError::invalid_data(format!(
        "Row has {} columns, column {} was requested",
        record.len(),
        missing
    ))
    .at_line(line)
    .at_column(missing))
}

fn header_names(record: &StringRecord, columns: &[usize], line: u64) -> Result<Vec<String>> {
    columns
        .iter()
        .map(|&c| {
            let name = record.get(c).unwrap_or("");
            if name.is_empty() {
                Err(TabulaError::invalid_data("Variable name is blank").at_line(line).at_column(c))
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}
