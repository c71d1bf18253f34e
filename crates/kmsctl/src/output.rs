//! Output formatting for projected values.
//!
//! Supports text (human-readable) and JSON output formats. A `null`
//! projection prints nothing in either format.

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::Format;
use crate::error::CliError;

/// Widest a table cell is allowed to get.
const MAX_CELL_WIDTH: usize = 64;

/// Output formatter that handles both text and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                let json = serde_json::to_value(value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                if json.is_null() {
                    return Ok(());
                }
                serde_json::to_writer_pretty(&mut *writer, &json)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Text => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Text)
    }
}

/// Trait for types that can be displayed as text.
pub trait TableDisplay {
    /// Write the value in human-readable form.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TableDisplay for Value {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        match self {
            Self::Null => {}
            Self::Object(fields) => write_fields(writer, fields)?,
            Self::Array(rows) if !rows.is_empty() && rows.iter().all(Value::is_object) => {
                write_rows(writer, rows)?;
            }
            Self::Array(items) => {
                for item in items {
                    writeln!(writer, "{}", scalar(item))?;
                }
            }
            scalar_value => writeln!(writer, "{}", scalar(scalar_value))?,
        }
        Ok(())
    }
}

/// One `Name  value` line per field, names aligned.
fn write_fields<W: Write>(writer: &mut W, fields: &Map<String, Value>) -> Result<(), CliError> {
    let width = fields.keys().map(String::len).max().unwrap_or(0);
    for (name, value) in fields {
        writeln!(writer, "{name:<width$}  {}", scalar(value))?;
    }
    Ok(())
}

/// A column table; columns are the union of the rows' fields, in the order
/// first seen.
fn write_rows<W: Write>(writer: &mut W, rows: &[Value]) -> Result<(), CliError> {
    let mut columns: Vec<&str> = vec![];
    for row in rows.iter().filter_map(Value::as_object) {
        for name in row.keys() {
            if !columns.contains(&name.as_str()) {
                columns.push(name);
            }
        }
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.get(*column).map_or_else(String::new, |v| truncate(&scalar(v))))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| format!("{column:<width$}"))
        .collect();
    writeln!(writer, "{}", header.join("  ").trim_end())?;
    let rule = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(writer, "{}", "─".repeat(rule))?;

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        writeln!(writer, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}

/// Strings print bare; everything else prints as compact JSON.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        s.to_string()
    } else {
        let kept: String = s.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{kept}...")
    }
}
