//! Whitespace-delimited numeric tables.
//!
//! Most inputs of the report tools are plain text tables: one row per line,
//! columns separated by any run of spaces or tabs, optionally preceded by a
//! line of column names. Lines starting with `#` and blank lines are ignored.
//!
//! ```
//! use gwpost_table::{Header, NumericTable};
//!
//! let text = "# posterior samples\nmchirp  eta  logl\n1.21 0.24 -10.5\n1.19 0.25 -10.1\n";
//! let table = NumericTable::parse(text, Header::FirstLine).unwrap();
//! assert_eq!(table.names(), Some(&["mchirp".to_owned(), "eta".to_owned(), "logl".to_owned()][..]));
//! assert_eq!(table.column("eta").unwrap(), vec![0.24, 0.25]);
//! ```

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Errors raised while reading or querying a table.
///
/// Messages leave out the file path; callers that read files name it in
/// their own context.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TableError {
    #[display("Failed to read table file")]
    Io { path: PathBuf, source: io::Error },
    #[display("Line {line}: cannot parse {text:?} as a number")]
    Parse {
        line: usize,
        text: String,
    },
    #[display("Line {line}: expected {expected} columns, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[display("Column {name:?} not found")]
    MissingColumn {
        name: String,
    },
    #[display("Column index {index} out of range for a table with {width} columns")]
    ColumnOutOfRange { index: usize, width: usize },
    #[display("Table has no data rows")]
    Empty,
}

/// How the first non-comment line of a table is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    /// The first line holds column names.
    FirstLine,
    /// All lines are data.
    None,
}

/// A rectangular table of `f64` values with optional column names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericTable {
    names: Option<Vec<String>>,
    rows: Vec<Vec<f64>>,
}

impl NumericTable {
    /// Creates a table from column names and rows.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RaggedRow`] when a row's width differs from the
    /// names (or from the first row when there are no names). Line numbers
    /// are 1-based row positions.
    pub fn new(names: Option<Vec<String>>, rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let expected = names
            .as_ref()
            .map(Vec::len)
            .or_else(|| rows.first().map(Vec::len));
        if let Some(expected) = expected {
            for (i, row) in rows.iter().enumerate() {
                if row.len() != expected {
                    return Err(TableError::RaggedRow {
                        line: i + 1,
                        expected,
                        found: row.len(),
                    });
                }
            }
        }
        Ok(Self { names, rows })
    }

    /// Parses a table from text.
    pub fn parse(text: &str, header: Header) -> Result<Self, TableError> {
        let mut names = None;
        let mut rows = Vec::new();
        let mut width = None;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if header == Header::FirstLine && names.is_none() {
                let cols = trimmed
                    .split_whitespace()
                    .map(str::to_owned)
                    .collect::<Vec<_>>();
                width = Some(cols.len());
                names = Some(cols);
                continue;
            }
            let row = trimmed
                .split_whitespace()
                .map(|cell| {
                    cell.parse::<f64>().map_err(|_| TableError::Parse {
                        line: line_no,
                        text: cell.to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let expected = *width.get_or_insert(row.len());
            if row.len() != expected {
                return Err(TableError::RaggedRow {
                    line: line_no,
                    expected,
                    found: row.len(),
                });
            }
            rows.push(row);
        }

        Ok(Self { names, rows })
    }

    /// Reads and parses a table file.
    pub fn read<P>(path: P, header: Header) -> Result<Self, TableError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&text, header)
    }

    /// Column names, if the table has a header.
    #[must_use]
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns (0 for an empty table without header).
    #[must_use]
    pub fn width(&self) -> usize {
        self.names
            .as_ref()
            .map(Vec::len)
            .or_else(|| self.rows.first().map(Vec::len))
            .unwrap_or(0)
    }

    /// Position of a named column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.as_ref()?.iter().position(|n| n == name)
    }

    /// Values of a named column.
    pub fn column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| TableError::MissingColumn {
                name: name.to_owned(),
            })?;
        self.column_at(index)
    }

    /// Values of the column at `index`.
    pub fn column_at(&self, index: usize) -> Result<Vec<f64>, TableError> {
        let width = self.width();
        if index >= width {
            return Err(TableError::ColumnOutOfRange { index, width });
        }
        Ok(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Writes the table as tab-separated text, header first when present.
    ///
    /// Values use Rust's shortest round-trip formatting, so reading the
    /// output back yields identical numbers.
    pub fn write_to<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        if let Some(names) = &self.names {
            writeln!(writer, "{}", names.join("\t"))?;
        }
        for row in &self.rows {
            let cells = row.iter().map(f64::to_string).collect::<Vec<_>>();
            writeln!(writer, "{}", cells.join("\t"))?;
        }
        writer.flush()
    }
}
