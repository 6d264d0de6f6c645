//! Tabula command-line front end
//!
//! Commands:
//! - encode: code the categorical columns of a CSV file
//! - discretize: select entropy-minimizing cut points for numerical columns
//! - mds: classical multidimensional scaling of a dissimilarity matrix
//!
//! Results are printed to stdout as JSON. Logging goes to stderr and is
//! controlled through `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value as JsonValue};

use tabula_matrix::DoubleMatrix;
use tabula_stats::{
    CategoricalDataSet, ClassicalMds, DiscretizeOptions, EncodeOptions, EntropyMinimization, NumberFormat,
};

#[derive(Parser)]
#[command(name = "tabula", version, about = "Categorical encoding, discretization and MDS on CSV files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// How the input file is laid out
#[derive(Args, Clone)]
struct SourceArgs {
    /// Input file
    path: PathBuf,

    /// Field delimiter
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// The first row holds data, not column names
    #[arg(long)]
    no_header: bool,

    /// Decimal separator of numbers
    #[arg(long, default_value = ".")]
    decimal_separator: char,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode columns as category codes
    Encode {
        #[command(flatten)]
        source: SourceArgs,

        /// Columns to extract (zero-based, comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<usize>,

        /// Numerical columns to replace by their entropy-minimizing intervals
        #[arg(long, value_delimiter = ',', requires = "target")]
        discretize: Vec<usize>,

        /// Class column guiding the discretization
        #[arg(short, long)]
        target: Option<usize>,
    },

    /// Select cut points for numerical columns
    Discretize {
        #[command(flatten)]
        source: SourceArgs,

        /// Class column
        #[arg(short, long)]
        target: usize,

        /// Numerical columns (zero-based, comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<usize>,
    },

    /// Scale a square dissimilarity matrix
    Mds {
        #[command(flatten)]
        source: SourceArgs,

        /// Dimension of the configuration (default: every positive eigenvalue)
        #[arg(short = 'k', long)]
        dimension: Option<usize>,
    },
}

impl SourceArgs {
    fn delimiter_byte(&self) -> Result<u8> {
        parse_delimiter(self.delimiter)
    }

    fn number_format(&self) -> NumberFormat {
        NumberFormat::with_decimal_separator(self.decimal_separator)
    }

    fn discretize_options(&self, target: usize, columns: Vec<usize>) -> Result<DiscretizeOptions> {
        Ok(DiscretizeOptions::new(target, columns)
            .delimiter(self.delimiter_byte()?)
            .has_headers(!self.no_header)
            .number_format(self.number_format()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Commands::Encode { source, columns, discretize, target } => cmd_encode(&source, columns, discretize, target)?,
        Commands::Discretize { source, target, columns } => cmd_discretize(&source, target, columns)?,
        Commands::Mds { source, dimension } => cmd_mds(&source, dimension)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_encode(source: &SourceArgs, columns: Vec<usize>, discretize: Vec<usize>, target: Option<usize>) -> Result<JsonValue> {
    let mut options = EncodeOptions::new(columns)
        .delimiter(source.delimiter_byte()?)
        .has_headers(!source.no_header)
        .number_format(source.number_format());

    if let (Some(target), false) = (target, discretize.is_empty()) {
        let discretization = EntropyMinimization::discretize_from_path(
            &source.path,
            &source.discretize_options(target, discretize)?,
        )
        .with_context(|| format!("discretizing {}", source.path.display()))?;
        for d in &discretization {
            options = d.apply_to(options);
        }
    }

    let set = CategoricalDataSet::encode_from_path(&source.path, &options)
        .with_context(|| format!("encoding {}", source.path.display()))?;
    tracing::info!(rows = set.data.rows(), "encoded");
    Ok(json!({
        "variables": set.variables,
        "codes": set.data.to_nested_list(),
    }))
}

fn cmd_discretize(source: &SourceArgs, target: usize, columns: Vec<usize>) -> Result<JsonValue> {
    let format = source.number_format();
    let result = EntropyMinimization::discretize_from_path(&source.path, &source.discretize_options(target, columns)?)
        .with_context(|| format!("discretizing {}", source.path.display()))?;
    let columns: Vec<JsonValue> = result
        .iter()
        .map(|d| {
            json!({
                "column": d.column,
                "name": d.name,
                "cut_points": d.cut_points,
                "labels": d.labels(&format),
            })
        })
        .collect();
    Ok(json!({ "discretizations": columns }))
}

fn cmd_mds(source: &SourceArgs, dimension: Option<usize>) -> Result<JsonValue> {
    let proximities = read_matrix(&source.path, source.delimiter_byte()?, !source.no_header, &source.number_format())?;
    let result = ClassicalMds::analyze(&proximities, dimension).context("scaling proximities")?;
    Ok(json!({
        "configuration": result.configuration.to_nested_list(),
        "goodness_of_fit": result.goodness_of_fit,
        "eigenvalues": result.eigenvalues,
    }))
}

fn parse_delimiter(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{}'", delimiter);
    }
    Ok(delimiter as u8)
}

/// Read a numeric matrix; with a header, its names become row and column names
fn read_matrix(path: &Path, delimiter: u8, has_headers: bool, format: &NumberFormat) -> Result<DoubleMatrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let names: Vec<String> = if has_headers {
        rdr.headers()?.iter().map(str::to_string).collect()
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|token| format.parse(token))
            .collect::<tabula_core::Result<Vec<f64>>>()
            .with_context(|| format!("line {}", record.position().map_or(0, |p| p.line())))?;
        rows.push(row);
    }

    let mut matrix = DoubleMatrix::from_nested_list(&rows)?;
    for (i, name) in names.iter().enumerate().take(matrix.rows().min(matrix.cols())) {
        matrix.set_row_name(i, name.as_str())?;
        matrix.set_column_name(i, name.as_str())?;
    }
    Ok(matrix)
}
