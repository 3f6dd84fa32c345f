//! Classifier output tables.
//!
//! Every row is one event seen by a classifier: its `GPS` time, the truth
//! flag `i` (non-zero for glitches, zero for clean samples) and the
//! classifier `rank` in `[0, 1]`. Any other numeric columns are carried
//! along untouched.

use std::path::Path;

use gwpost_stats::kde::point_wise_gaussian_kde;
use gwpost_table::{Header, NumericTable, TableError};

pub const GPS_COLUMN: &str = "GPS";
pub const TRUTH_COLUMN: &str = "i";
pub const RANK_COLUMN: &str = "rank";

/// Rank-ordered cumulative counts, the input of a ROC curve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RocCounts {
    /// Distinct rank thresholds in descending order.
    pub thresholds: Vec<f64>,
    /// Number of clean samples with rank at or above each threshold.
    pub clean: Vec<u64>,
    /// Number of glitches with rank at or above each threshold.
    pub glitch: Vec<u64>,
}

/// A classifier output table with its required columns located.
#[derive(Debug, Clone)]
pub struct ClassifierOutput {
    table: NumericTable,
    gps: usize,
    truth: usize,
    rank: usize,
}

impl ClassifierOutput {
    pub fn new(table: NumericTable) -> Result<Self, TableError> {
        let locate = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| TableError::MissingColumn {
                    name: name.to_owned(),
                })
        };
        let gps = locate(GPS_COLUMN)?;
        let truth = locate(TRUTH_COLUMN)?;
        let rank = locate(RANK_COLUMN)?;
        Ok(Self {
            table,
            gps,
            truth,
            rank,
        })
    }

    /// Reads a whitespace table whose first line names the columns.
    pub fn read<P>(path: P) -> Result<Self, TableError>
    where
        P: AsRef<Path>,
    {
        Self::new(NumericTable::read(path, Header::FirstLine)?)
    }

    #[must_use]
    pub fn table(&self) -> &NumericTable {
        &self.table
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn rows(&self, glitch: bool) -> impl Iterator<Item = &Vec<f64>> {
        self.table
            .rows()
            .iter()
            .filter(move |row| (row[self.truth] != 0.0) == glitch)
    }

    /// GPS times of glitches (`glitch == true`) or clean samples.
    #[must_use]
    pub fn gps(&self, glitch: bool) -> Vec<f64> {
        self.rows(glitch).map(|row| row[self.gps]).collect()
    }

    /// GPS times of glitches ranked at or above `threshold`.
    #[must_use]
    pub fn detections(&self, threshold: f64) -> Vec<f64> {
        self.rows(true)
            .filter(|row| row[self.rank] >= threshold)
            .map(|row| row[self.gps])
            .collect()
    }

    /// Distinct ranks in ascending order with the number of events at each.
    #[must_use]
    pub fn rank_counts(&self, glitch: bool) -> (Vec<f64>, Vec<f64>) {
        let mut ranks = self.rows(glitch).map(|row| row[self.rank]).collect::<Vec<_>>();
        ranks.sort_by(f64::total_cmp);
        let mut distinct = Vec::<f64>::new();
        let mut counts = Vec::<f64>::new();
        for rank in ranks {
            if distinct.last() == Some(&rank) {
                if let Some(count) = counts.last_mut() {
                    *count += 1.0;
                }
            } else {
                distinct.push(rank);
                counts.push(1.0);
            }
        }
        (distinct, counts)
    }

    /// Splits the rows ranked at or above `threshold` into clean and glitch
    /// tables holding `columns` (all columns when `None`).
    ///
    /// ```
    /// use gwpost_idq::output::ClassifierOutput;
    /// use gwpost_table::{Header, NumericTable};
    ///
    /// let table = NumericTable::parse(
    ///     "GPS i rank\n10 1 0.9\n11 0 0.8\n12 1 0.1\n13 0 0.5\n",
    ///     Header::FirstLine,
    /// )?;
    /// let output = ClassifierOutput::new(table)?;
    /// let (clean, glitch) = output.bin_by_rank_threshold(0.5, Some(&["GPS"]))?;
    /// assert_eq!(clean.column("GPS")?, vec![11.0, 13.0]);
    /// assert_eq!(glitch.column("GPS")?, vec![10.0]);
    /// # Ok::<(), gwpost_table::TableError>(())
    /// ```
    pub fn bin_by_rank_threshold(
        &self,
        threshold: f64,
        columns: Option<&[&str]>,
    ) -> Result<(NumericTable, NumericTable), TableError> {
        let names = self.table.names().unwrap_or_default();
        let indices = match columns {
            Some(columns) => columns
                .iter()
                .map(|name| {
                    self.table
                        .column_index(name)
                        .ok_or_else(|| TableError::MissingColumn {
                            name: (*name).to_owned(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => (0..names.len()).collect(),
        };
        let selected_names = indices.iter().map(|i| names[*i].clone()).collect::<Vec<_>>();

        let mut clean = Vec::new();
        let mut glitch = Vec::new();
        for row in self.table.rows() {
            if row[self.rank] < threshold {
                continue;
            }
            let selected = indices.iter().map(|i| row[*i]).collect();
            if row[self.truth] == 0.0 {
                clean.push(selected);
            } else {
                glitch.push(selected);
            }
        }
        Ok((
            NumericTable::new(Some(selected_names.clone()), clean)?,
            NumericTable::new(Some(selected_names), glitch)?,
        ))
    }

    /// Cumulative clean and glitch counts, thresholding from the highest rank
    /// down.
    ///
    /// ```
    /// use gwpost_idq::output::ClassifierOutput;
    /// use gwpost_table::{Header, NumericTable};
    ///
    /// let table = NumericTable::parse(
    ///     "GPS i rank\n1 1 0.9\n2 0 0.9\n3 1 0.4\n4 0 0.1\n",
    ///     Header::FirstLine,
    /// )?;
    /// let counts = ClassifierOutput::new(table)?.roc_counts();
    /// assert_eq!(counts.thresholds, vec![0.9, 0.4, 0.1]);
    /// assert_eq!(counts.clean, vec![1, 1, 2]);
    /// assert_eq!(counts.glitch, vec![1, 2, 2]);
    /// # Ok::<(), gwpost_table::TableError>(())
    /// ```
    #[must_use]
    pub fn roc_counts(&self) -> RocCounts {
        let mut events = self
            .table
            .rows()
            .iter()
            .map(|row| (row[self.rank], row[self.truth] != 0.0))
            .collect::<Vec<_>>();
        events.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut counts = RocCounts::default();
        let (mut clean, mut glitch) = (0, 0);
        for (i, (rank, is_glitch)) in events.iter().enumerate() {
            if *is_glitch {
                glitch += 1;
            } else {
                clean += 1;
            }
            if events.get(i + 1).is_some_and(|next| next.0 == *rank) {
                continue;
            }
            counts.thresholds.push(*rank);
            counts.clean.push(clean);
            counts.glitch.push(glitch);
        }
        counts
    }
}

/// Point-wise Gaussian KDE of ranks `ranks` observed `counts` times each.
///
/// Falls back to a flat estimate of ones when nothing was observed.
///
/// # Panics
///
/// Panics if `ranks` and `counts` differ in length.
#[must_use]
pub fn kde_pwg(eval: &[f64], ranks: &[f64], counts: &[f64], scale: f64, s: f64) -> Vec<f64> {
    point_wise_gaussian_kde(eval, ranks, Some(counts), scale, s)
}

/// Event rate in each of `num_bins` consecutive bins of `stride` seconds
/// starting at `start`. Events outside the bins are ignored.
///
/// ```
/// use gwpost_idq::output::event_rates;
///
/// let rates = event_rates(&[0.5, 1.5, 1.7, 9.0], 0.0, 2.0, 2);
/// assert_eq!(rates, vec![((0.0, 2.0), 1.5), ((2.0, 4.0), 0.0)]);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn event_rates(
    gps: &[f64],
    start: f64,
    stride: f64,
    num_bins: usize,
) -> Vec<((f64, f64), f64)> {
    let mut counts = vec![0_u64; num_bins];
    for t in gps {
        let offset = (t - start) / stride;
        if offset >= 0.0 && offset < num_bins as f64 {
            counts[offset as usize] += 1;
        }
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = start + stride * i as f64;
            ((lo, lo + stride), count as f64 / stride)
        })
        .collect()
}
