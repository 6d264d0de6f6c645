//! Number formatting for tabular sources

use serde::{Deserialize, Serialize};
use tabula_core::{Result, TabulaError};

/// How numbers are written in a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::invariant()
    }
}

impl NumberFormat {
    /// `.` as decimal separator
    pub fn invariant() -> Self {
        Self { decimal_separator: '.' }
    }

    pub fn with_decimal_separator(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }

    /// Parse a number token
    pub fn parse(&self, token: &str) -> Result<f64> {
        let token = token.trim();
        let normalized = if self.decimal_separator == '.' {
            token.to_string()
        } else {
            token.replace(self.decimal_separator, ".")
        };
        normalized.parse::<f64>().map_err(|_| {
            TabulaError::invalid_data(format!("'{}' is not a number", token))
                .with_suggestion(format!("Numbers must use '{}' as decimal separator", self.decimal_separator))
        })
    }

    /// Write a number using this format
    pub fn format(&self, value: f64) -> String {
        let text = value.to_string();
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}
