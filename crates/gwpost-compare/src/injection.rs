//! The injection table.
//!
//! A whitespace table with a header line. `geocent_end_time` is required and
//! `geocent_end_time_ns` optional; every other column is the injected value
//! of a parameter.

use std::path::Path;

use gwpost_table::{Header, NumericTable, TableError};

use crate::{CompareError, gps::GpsTime};

pub const END_TIME_COLUMN: &str = "geocent_end_time";
pub const END_TIME_NS_COLUMN: &str = "geocent_end_time_ns";

/// Posterior parameter names that are stored under another column.
const ALIASES: [(&str, &str); 2] = [("ra", "longitude"), ("dec", "latitude")];

#[derive(Debug, Clone)]
pub struct InjectionTable {
    table: NumericTable,
    end_times: Vec<GpsTime>,
}

impl InjectionTable {
    pub fn new(table: NumericTable) -> Result<Self, TableError> {
        let seconds = table.column(END_TIME_COLUMN)?;
        let nanoseconds = match table.column_index(END_TIME_NS_COLUMN) {
            Some(index) => table.column_at(index)?,
            None => vec![0.0; seconds.len()],
        };
        let end_times = seconds
            .iter()
            .zip(&nanoseconds)
            .map(|(s, ns)| GpsTime::from_columns(*s, *ns))
            .collect();
        Ok(Self { table, end_times })
    }

    pub fn read<P>(path: P) -> Result<Self, CompareError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        NumericTable::read(path, Header::FirstLine)
            .and_then(Self::new)
            .map_err(CompareError::table(path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end_times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end_times.is_empty()
    }

    /// Geocentric end time of injection `index`.
    #[must_use]
    pub fn end_time(&self, index: usize) -> Option<GpsTime> {
        self.end_times.get(index).copied()
    }

    /// Injected value of `parameter` for injection `index`.
    ///
    /// ```
    /// use gwpost_compare::injection::InjectionTable;
    /// use gwpost_table::{Header, NumericTable};
    ///
    /// let table = NumericTable::parse(
    ///     "geocent_end_time longitude latitude\n966384015 1.2 -0.3\n",
    ///     Header::FirstLine,
    /// )?;
    /// let injections = InjectionTable::new(table)?;
    /// assert_eq!(injections.injected_value(0, "ra"), Some(1.2));
    /// assert_eq!(injections.injected_value(0, "latitude"), Some(-0.3));
    /// assert_eq!(injections.injected_value(0, "mchirp"), None);
    /// # Ok::<(), gwpost_table::TableError>(())
    /// ```
    #[must_use]
    pub fn injected_value(&self, index: usize, parameter: &str) -> Option<f64> {
        let row = self.table.rows().get(index)?;
        let column = self.table.column_index(parameter).or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == parameter)
                .and_then(|(_, column)| self.table.column_index(column))
        })?;
        row.get(column).copied()
    }
}
