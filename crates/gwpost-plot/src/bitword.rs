//! Coincidences between classifiers.
//!
//! Every GPS time flagged by at least one classifier gets a bit word: bit
//! `i` is set when the `i`-th classifier flagged it. The figure counts how
//! often each word occurs.

use std::{collections::BTreeMap, path::Path};

use plotters::prelude::*;

use crate::{
    PlotError,
    figure::{Area, DEFAULT_SIZE, DrawResult, count_axis_max, render_svg},
};

/// Maximum number of classifiers that can be combined.
pub const MAX_CLASSIFIERS: usize = 12;

/// Occurrence counts of classifier bit words.
///
/// ```
/// use gwpost_plot::bitword::BitwordFigure;
///
/// let mut figure = BitwordFigure::new();
/// figure.add_classifier("ovl", &[10.0, 20.0])?;
/// figure.add_classifier("mvsc", &[20.0, 30.0])?;
/// assert_eq!(figure.word_counts(), vec![0, 1, 1, 1]);
/// assert_eq!(figure.word_label(0b10), "!ovl mvsc");
/// # Ok::<(), gwpost_plot::PlotError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BitwordFigure {
    classifiers: Vec<String>,
    words: BTreeMap<u64, u32>,
}

impl BitwordFigure {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the GPS times flagged by the next classifier.
    ///
    /// Repeated times within one classifier are counted once.
    pub fn add_classifier(&mut self, name: &str, gps: &[f64]) -> Result<&mut Self, PlotError> {
        if self.classifiers.len() >= MAX_CLASSIFIERS {
            return Err(PlotError::TooManySeries {
                limit: MAX_CLASSIFIERS,
            });
        }
        let bit = 1 << self.classifiers.len();
        self.classifiers.push(name.to_owned());
        for t in gps {
            *self.words.entry(t.to_bits()).or_default() |= bit;
        }
        Ok(self)
    }

    /// Number of GPS times carrying each word, indexed by word.
    #[must_use]
    pub fn word_counts(&self) -> Vec<u64> {
        let mut counts = vec![0; 1 << self.classifiers.len()];
        for word in self.words.values() {
            counts[*word as usize] += 1;
        }
        counts
    }

    /// Tick label of `word`: the classifier names, negated with `!` when
    /// their bit is clear.
    #[must_use]
    pub fn word_label(&self, word: usize) -> String {
        self.classifiers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                if word & (1 << i) == 0 {
                    format!("!{name}")
                } else {
                    name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn save<P>(&self, path: P) -> Result<(), PlotError>
    where
        P: AsRef<Path>,
    {
        if self.classifiers.is_empty() {
            return Err(PlotError::Empty {
                what: "bit word figure",
            });
        }
        render_svg(path.as_ref(), DEFAULT_SIZE, |root| self.draw(root))
    }

    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn draw(&self, root: &Area<'_>) -> DrawResult {
        let counts = self.word_counts();
        let num_words = counts.len();
        let max_count = counts.iter().copied().max().unwrap_or(0) as f64;

        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5..num_words as f64 - 0.5, 0.0..count_axis_max(max_count))?;
        let label = |x: &f64| {
            let word = x.round();
            if (x - word).abs() < 1e-6 && word >= 0.0 {
                self.word_label(word as usize)
            } else {
                String::new()
            }
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(num_words)
            .x_label_formatter(&label)
            .y_desc("count")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(word, &count)| {
            let center = word as f64;
            Rectangle::new(
                [(center - 0.5, 0.0), (center + 0.5, count as f64)],
                BLUE.stroke_width(2),
            )
        }))?;
        Ok(())
    }
}
