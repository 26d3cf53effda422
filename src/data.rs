//! Tabular sample file reader.
//!
//! Reads columns of numbers from plain text.
//!
//! # Supported syntax
//!
//! ```text
//! # comment line
//! 0.0,999.84        (comma separated)
//! 4.0	999.97        (tab separated)
//! 10.0  999.70      (runs of spaces)
//! ```
//!
//! The delimiter is chosen from the first data line: a comma if it has one,
//! otherwise a tab, otherwise whitespace. Every data line must then use it
//! and carry the same number of columns.

use std::path::Path;

use nom::bytes::complete::take_while;
use nom::character::complete::{char, space1};
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::delimited;
use nom::IResult;
use nom::Parser;

use crate::error::{KnotworkError, Result};

/// Column separator detected for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
    Whitespace,
}

impl Delimiter {
    fn detect(line: &str) -> Self {
        if line.contains(',') {
            Delimiter::Comma
        } else if line.contains('\t') {
            Delimiter::Tab
        } else {
            Delimiter::Whitespace
        }
    }
}

/// Rows of numeric samples read from a text table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub delimiter: Delimiter,
    pub columns: usize,
    pub rows: Vec<Vec<f64>>,
}

impl Table {
    /// Copy out column `index` (0-based).
    pub fn column(&self, index: usize) -> Result<Vec<f64>> {
        if index >= self.columns {
            return Err(KnotworkError::InvalidInput(format!(
                "column {} requested but table has {} columns",
                index, self.columns
            )));
        }
        Ok(self.rows.iter().map(|row| row[index]).collect())
    }

    /// The `(x, y)` sample pair from two columns.
    pub fn xy(&self, x_column: usize, y_column: usize) -> Result<(Vec<f64>, Vec<f64>)> {
        Ok((self.column(x_column)?, self.column(y_column)?))
    }
}

/// Read and parse a table from disk.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path)?;
    let _span = tracing::debug_span!("load_table", path = %path.display()).entered();
    parse_table(&input)
}

/// Parse a table from text.
pub fn parse_table(input: &str) -> Result<Table> {
    let mut delimiter = None;
    let mut columns = 0;
    let mut rows = Vec::new();

    for (line_num, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();

        // Skip blank lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let delim = *delimiter.get_or_insert_with(|| Delimiter::detect(line));
        let values = parse_row(line, delim).map_err(|e| parse_err(line_num, raw_line, &e))?;

        if rows.is_empty() {
            if values.len() < 2 {
                return Err(parse_err(
                    line_num,
                    raw_line,
                    "expected at least 2 columns",
                ));
            }
            columns = values.len();
        } else if values.len() != columns {
            return Err(parse_err(
                line_num,
                raw_line,
                &format!("expected {} columns, found {}", columns, values.len()),
            ));
        }
        rows.push(values);
    }

    let delimiter = delimiter
        .ok_or_else(|| KnotworkError::Parse("no data rows found".to_string()))?;
    tracing::debug!(rows = rows.len(), columns, ?delimiter, "table parsed");

    Ok(Table {
        delimiter,
        columns,
        rows,
    })
}

fn parse_err(line_num: usize, raw_line: &str, detail: &str) -> KnotworkError {
    KnotworkError::Parse(format!("line {}: {} in: {}", line_num + 1, detail, raw_line))
}

// ---------------------------------------------------------------------------
// Row parsers
// ---------------------------------------------------------------------------

fn parse_row(line: &str, delimiter: Delimiter) -> std::result::Result<Vec<f64>, String> {
    let parsed: IResult<&str, Vec<f64>> = match delimiter {
        Delimiter::Comma => separated_list1(comma, double).parse(line),
        Delimiter::Tab => separated_list1(tab, double).parse(line),
        Delimiter::Whitespace => separated_list1(space1, double).parse(line),
    };
    let (rest, values) = parsed.map_err(|_| "expected a number".to_string())?;
    if !rest.is_empty() {
        return Err(format!("unexpected trailing text '{}'", rest));
    }
    Ok(values)
}

/// A comma with optional spaces on either side.
fn comma(input: &str) -> IResult<&str, char> {
    delimited(spaces, char(','), spaces).parse(input)
}

/// A tab with optional spaces (not further tabs) on either side.
fn tab(input: &str) -> IResult<&str, char> {
    delimited(spaces, char('\t'), spaces).parse(input)
}

fn spaces(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c == ' ')(input)
}
