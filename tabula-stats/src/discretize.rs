//! Entropy minimization discretization
//!
//! Numerical columns are split into intervals that best separate the classes
//! of a target column. Candidate cut points are midpoints between adjacent
//! distinct values. The cut minimizing the weighted class entropy of the two
//! sides is taken, then each side is split again, as long as the split passes
//! the minimum description length test of Fayyad and Irani (1993).
//!
//! Intervals are closed on the right: with cut points `c1 < c2` the labels
//! are `]-Inf, c1]`, `]c1, c2]` and `]c2, Inf[`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tabula_core::{Result, TabulaError};
use crate::categorical::{Categorizer, EncodeOptions};
use crate::error::SourceError;
use crate::format::NumberFormat;
use crate::source::read_table;

/// Discretizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscretizeOptions {
    pub delimiter: u8,
    pub has_headers: bool,
    /// Zero-based position of the class column
    pub target_column: usize,
    /// Zero-based positions of the columns to discretize
    pub numerical_columns: Vec<usize>,
    pub number_format: NumberFormat,
}

impl DiscretizeOptions {
    pub fn new(target_column: usize, numerical_columns: impl Into<Vec<usize>>) -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            target_column,
            numerical_columns: numerical_columns.into(),
            number_format: NumberFormat::default(),
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }
}

/// Interval boundaries selected for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discretization {
    /// Position of the column in the source
    pub column: usize,
    pub name: String,
    /// Sorted, distinct cut points
    pub cut_points: Vec<f64>,
}

impl Discretization {
    /// Label of the interval holding `value`
    pub fn label_for(&self, value: f64, format: &NumberFormat) -> String {
        let bin = self.cut_points.partition_point(|&c| c < value);
        interval_label(&self.cut_points, bin, format)
    }

    /// Every interval label, in increasing order
    pub fn labels(&self, format: &NumberFormat) -> Vec<String> {
        (0..=self.cut_points.len())
            .map(|bin| interval_label(&self.cut_points, bin, format))
            .collect()
    }

    /// Parse a raw token and label its interval
    pub fn categorize(&self, token: &str, format: &NumberFormat) -> Result<String> {
        Ok(self.label_for(format.parse(token)?, format))
    }

    /// This discretization as an encoder categorizer
    pub fn categorizer(&self) -> Categorizer {
        let this = self.clone();
        Arc::new(move |token: &str, format: &NumberFormat| this.categorize(token, format))
    }

    /// Register this discretization's categorizer for its column
    pub fn apply_to(&self, options: EncodeOptions) -> EncodeOptions {
        options.categorizer(self.column, self.categorizer())
    }
}

fn interval_label(cuts: &[f64], bin: usize, format: &NumberFormat) -> String {
    let lower = match bin {
        0 => "-Inf".to_string(),
        _ => format.format(cuts[bin - 1]),
    };
    if bin == cuts.len() {
        format!("]{}, Inf[", lower)
    } else {
        format!("]{}, {}]", lower, format.format(cuts[bin]))
    }
}

/// Supervised discretization by recursive entropy minimization
pub struct EntropyMinimization;

impl EntropyMinimization {
    /// Select cut points for every numerical column of a delimited source
    pub fn discretize<R: Read>(reader: R, options: &DiscretizeOptions) -> Result<Vec<Discretization>> {
        if options.numerical_columns.is_empty() {
            return Err(TabulaError::argument_null("numerical_columns")
                .with_suggestion("Request at least one column to discretize"));
        }
        let mut columns = vec![options.target_column];
        columns.extend(options.numerical_columns.iter().copied());
        let table = read_table(reader, options.delimiter, options.has_headers, &columns)?;

        let mut class_codes = HashMap::new();
        let mut classes = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let label = row.field(options.target_column);
            if label.is_empty() {
                return Err(TabulaError::invalid_data("Class label is blank")
                    .at_line(row.line)
                    .at_column(options.target_column));
            }
            let next = class_codes.len();
            classes.push(*class_codes.entry(label.to_string()).or_insert(next));
        }
        let class_count = class_codes.len();

        let mut result = Vec::with_capacity(options.numerical_columns.len());
        for (k, &column) in options.numerical_columns.iter().enumerate() {
            let mut points = Vec::with_capacity(table.rows.len());
            for (row, &class) in table.rows.iter().zip(&classes) {
                let value = options
                    .number_format
                    .parse(row.field(column))
                    .map_err(|e| e.at_line(row.line).at_column(column))?;
                points.push((value, class));
            }
            points.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut cut_points = Vec::new();
            split(&points, class_count, &mut cut_points);
            tracing::debug!(column, cuts = cut_points.len(), "discretized column");

            result.push(Discretization {
                column,
                name: table.names[k + 1].clone(),
                cut_points,
            });
        }
        Ok(result)
    }

    pub fn discretize_from_path(path: impl AsRef<Path>, options: &DiscretizeOptions) -> Result<Vec<Discretization>> {
        let file = File::open(path.as_ref()).map_err(SourceError::from)?;
        Self::discretize(file, options)
    }
}

// ============================================================================
// Cut selection
// ============================================================================

/// Class entropy (bits) of a count vector over `n` samples
fn entropy(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n as f64;
            -p * p.log2()
        })
        .sum()
}

fn distinct(counts: &[usize]) -> usize {
    counts.iter().filter(|&&c| c > 0).count()
}

/// Recursively add accepted cut points of sorted `points` to `cuts`, in order
fn split(points: &[(f64, usize)], class_count: usize, cuts: &mut Vec<f64>) {
    let n = points.len();
    if n < 2 {
        return;
    }
    let mut total = vec![0usize; class_count];
    for &(_, c) in points {
        total[c] += 1;
    }
    let whole = entropy(&total, n);
    if whole == 0.0 {
        return;
    }

    // (boundary, weighted entropy, left counts)
    let mut best: Option<(usize, f64, Vec<usize>)> = None;
    let mut left = vec![0usize; class_count];
    for i in 1..n {
        left[points[i - 1].1] += 1;
        if points[i - 1].0 == points[i].0 {
            continue;
        }
        let right: Vec<usize> = total.iter().zip(&left).map(|(t, l)| t - l).collect();
        let weighted = (i as f64 * entropy(&left, i) + (n - i) as f64 * entropy(&right, n - i)) / n as f64;
        if best.as_ref().map_or(true, |b| weighted < b.1) {
            best = Some((i, weighted, left.clone()));
        }
    }
    let Some((i, weighted, left)) = best else {
        return;
    };

    let right: Vec<usize> = total.iter().zip(&left).map(|(t, l)| t - l).collect();
    let (e1, e2) = (entropy(&left, i), entropy(&right, n - i));
    let (k, k1, k2) = (distinct(&total) as f64, distinct(&left) as f64, distinct(&right) as f64);
    let gain = whole - weighted;
    let delta = (3f64.powf(k) - 2.0).log2() - (k * whole - k1 * e1 - k2 * e2);
    let threshold = (((n - 1) as f64).log2() + delta) / n as f64;
    if gain <= threshold {
        return;
    }

    let cut = (points[i - 1].0 + points[i].0) / 2.0;
    tracing::trace!(cut, gain, threshold, samples = n, "accepted cut point");
    split(&points[..i], class_count, cuts);
    cuts.push(cut);
    split(&points[i..], class_count, cuts);
}
