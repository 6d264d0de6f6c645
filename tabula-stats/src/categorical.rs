//! Categorical encoding of delimited text
//!
//! Each extracted column becomes a [`CategoricalVariable`]: its distinct
//! labels, coded 0, 1, 2, ... in order of first appearance. The codes of
//! every row form the data matrix of the resulting [`CategoricalDataSet`].

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tabula_core::{Result, TabulaError};
use tabula_matrix::DoubleMatrix;
use crate::error::SourceError;
use crate::format::NumberFormat;
use crate::source::read_table;

/// Maps a raw token to the label it is encoded as
pub type Categorizer = Arc<dyn Fn(&str, &NumberFormat) -> Result<String> + Send + Sync>;

/// A named variable and its labels, indexed by code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalVariable {
    pub name: String,
    pub categories: Vec<String>,
}

impl CategoricalVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), categories: Vec::new() }
    }

    /// Code of `label`, registering it when first seen
    pub fn add(&mut self, label: &str) -> usize {
        match self.code_of(label) {
            Some(code) => code,
            None => {
                self.categories.push(label.to_string());
                self.categories.len() - 1
            }
        }
    }

    pub fn code_of(&self, label: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == label)
    }

    pub fn label_of(&self, code: usize) -> Option<&str> {
        self.categories.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Encoder settings
#[derive(Clone)]
pub struct EncodeOptions {
    pub delimiter: u8,
    /// Zero-based positions of the columns to extract, in output order
    pub columns: Vec<usize>,
    pub has_headers: bool,
    /// Per-column label mapping; other columns use the raw token
    pub categorizers: HashMap<usize, Categorizer>,
    pub number_format: NumberFormat,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            columns: Vec::new(),
            has_headers: true,
            categorizers: HashMap::new(),
            number_format: NumberFormat::default(),
        }
    }
}

impl fmt::Debug for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut categorized: Vec<_> = self.categorizers.keys().collect();
        categorized.sort();
        f.debug_struct("EncodeOptions")
            .field("delimiter", &(self.delimiter as char))
            .field("columns", &self.columns)
            .field("has_headers", &self.has_headers)
            .field("categorized_columns", &categorized)
            .field("number_format", &self.number_format)
            .finish()
    }
}

impl EncodeOptions {
    pub fn new(columns: impl Into<Vec<usize>>) -> Self {
        Self { columns: columns.into(), ..Self::default() }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn categorizer(mut self, column: usize, categorizer: Categorizer) -> Self {
        self.categorizers.insert(column, categorizer);
        self
    }

    pub fn number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }
}

/// Categorical variables and the codes of every row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalDataSet {
    pub variables: Vec<CategoricalVariable>,
    /// rows × variables, each element a category code
    pub data: DoubleMatrix,
}

impl CategoricalDataSet {
    /// Encode the requested columns of a delimited source
    pub fn encode<R: Read>(reader: R, options: &EncodeOptions) -> Result<Self> {
        let table = read_table(reader, options.delimiter, options.has_headers, &options.columns)?;

        let mut variables: Vec<CategoricalVariable> =
            table.names.iter().map(|n| CategoricalVariable::new(n.as_str())).collect();
        // label -> code, per variable
        let mut lookup: Vec<HashMap<String, usize>> = vec![HashMap::new(); variables.len()];
        let mut data = DoubleMatrix::dense(table.rows.len(), options.columns.len())?;

        for (i, row) in table.rows.iter().enumerate() {
            for (j, &column) in options.columns.iter().enumerate() {
                let token = row.field(column);
                let label = match options.categorizers.get(&column) {
                    Some(categorize) => categorize(token, &options.number_format)
                        .map_err(|e| e.at_line(row.line).at_column(column))?,
                    None => token.to_string(),
                };
                if label.trim().is_empty() {
                    return Err(TabulaError::invalid_data("Category label is blank")
                        .at_line(row.line)
                        .at_column(column));
                }
                let categories = &mut variables[j].categories;
                let code = *lookup[j].entry(label).or_insert_with_key(|label| {
                    categories.push(label.clone());
                    categories.len() - 1
                });
                data.set_at(i, j, code as f64)?;
            }
        }

        for (j, variable) in variables.iter().enumerate() {
            data.set_column_name(j, variable.name.as_str())?;
        }
        tracing::debug!(
            rows = data.rows(),
            variables = variables.len(),
            "encoded categorical data set"
        );
        Ok(Self { variables, data })
    }

    /// Encode the requested columns of a file
    pub fn encode_from_path(path: impl AsRef<Path>, options: &EncodeOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(SourceError::from)?;
        tracing::debug!(path = %path.display(), "encoding file");
        Self::encode(file, options)
    }

    pub fn variable(&self, name: &str) -> Option<&CategoricalVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Codes of one variable, one per row
    pub fn codes(&self, variable: usize) -> Result<Vec<usize>> {
        let column = self.data.column(variable)?;
        Ok(column.iter().map(|v| v as usize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tabula_core::ErrorKind;

    const COLORS: &str = "COLOR,HAPPINESS,NUMBER\n\
                          Red,TRUE,-2.2\n\
                          Green,TRUE,0.0\n\
                          Red,FALSE,-3.3\n\
                          Black,TRUE,-1.1\n\
                          Black,FALSE,4.4\n";

    #[test]
    fn test_encode_colors() {
        let options = EncodeOptions::new(vec![0, 1]);
        let set = CategoricalDataSet::encode(COLORS.as_bytes(), &options).unwrap();

        assert_eq!(set.variables.len(), 2);
        let color = &set.variables[0];
        assert_eq!(color.name, "COLOR");
        assert_eq!(color.categories, vec!["Red", "Green", "Black"]);
        assert_eq!(color.code_of("Black"), Some(2));
        assert_eq!(set.codes(0).unwrap(), vec![0, 1, 0, 2, 2]);

        let happiness = set.variable("HAPPINESS").unwrap();
        assert_eq!(happiness.categories, vec!["TRUE", "FALSE"]);
        assert_eq!(set.codes(1).unwrap(), vec![0, 0, 1, 0, 1]);

        assert_eq!(set.data.shape(), (5, 2));
        assert_eq!(set.data.column_name(0), Some("COLOR"));
    }

    #[test]
    fn test_variable_add() {
        let mut v = CategoricalVariable::new("SIZE");
        assert!(v.is_empty());
        assert_eq!(v.add("small"), 0);
        assert_eq!(v.add("large"), 1);
        assert_eq!(v.add("small"), 0);
        assert_eq!(v.label_of(1), Some("large"));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_many_categories() {
        let mut text = String::from("ID\n");
        for i in 0..2000 {
            text.push_str(&format!("k{}\n", i % 250));
        }
        let set = CategoricalDataSet::encode(text.as_bytes(), &EncodeOptions::new(vec![0])).unwrap();
        let id = &set.variables[0];
        assert_eq!(id.len(), 250);
        assert_eq!(id.code_of("k17"), Some(17));
        let codes = set.codes(0).unwrap();
        assert_eq!(codes[1999], 1999 % 250);
        assert!(codes.iter().enumerate().all(|(i, &c)| c == i % 250));
    }

    #[test]
    fn test_categorizer_applies_to_its_column() {
        let sign: Categorizer = Arc::new(|token: &str, fmt: &NumberFormat| -> Result<String> {
            Ok(if fmt.parse(token)? < 0.0 { "negative".to_string() } else { "non-negative".to_string() })
        });
        let options = EncodeOptions::new(vec![2]).categorizer(2, sign);
        let set = CategoricalDataSet::encode(COLORS.as_bytes(), &options).unwrap();
        assert_eq!(set.variables[0].categories, vec!["negative", "non-negative"]);
        assert_eq!(set.codes(0).unwrap(), vec![0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_categorizer_error_gets_position() {
        let numeric: Categorizer = Arc::new(|token: &str, fmt: &NumberFormat| fmt.parse(token).map(|v| v.to_string()));
        let options = EncodeOptions::new(vec![0]).categorizer(0, numeric);
        let err = CategoricalDataSet::encode(COLORS.as_bytes(), &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidData);
        let ctx = err.context.unwrap();
        assert_eq!(ctx.line, Some(2));
        assert_eq!(ctx.column, Some(0));
    }

    #[test]
    fn test_without_header() {
        let text = "a;x\nb;x\na;y\n";
        let options = EncodeOptions::new(vec![1, 0]).delimiter(b';').has_headers(false);
        let set = CategoricalDataSet::encode(text.as_bytes(), &options).unwrap();
        assert_eq!(set.variables[0].name, "1");
        assert_eq!(set.variables[1].name, "0");
        assert_eq!(set.codes(0).unwrap(), vec![0, 0, 1]);
        assert_eq!(set.codes(1).unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn test_blank_label() {
        let text = "A,B\nx,1\n,2\n";
        let err = CategoricalDataSet::encode(text.as_bytes(), &EncodeOptions::new(vec![0])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidData);
        assert_eq!(err.context.unwrap().line, Some(3));
    }

    #[test]
    fn test_missing_columns() {
        let err = CategoricalDataSet::encode(COLORS.as_bytes(), &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArgumentNull);
        assert_eq!(err.param.as_deref(), Some("columns"));
    }

    #[test]
    fn test_encode_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(COLORS.as_bytes()).unwrap();
        let set = CategoricalDataSet::encode_from_path(file.path(), &EncodeOptions::new(vec![0])).unwrap();
        assert_eq!(set.codes(0).unwrap(), vec![0, 1, 0, 2, 2]);

        let err = CategoricalDataSet::encode_from_path("/nonexistent/colors.csv", &EncodeOptions::new(vec![0]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidData);
    }

    #[test]
    fn test_serializes() {
        let set = CategoricalDataSet::encode(COLORS.as_bytes(), &EncodeOptions::new(vec![0])).unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["variables"][0]["categories"][2], "Black");
        assert_eq!(json["data"]["rows"], 5);
    }
}
