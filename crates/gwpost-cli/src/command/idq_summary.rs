use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use gwpost_compare::html::{HtmlPage, escape, link_image};
use gwpost_idq::output::{
    ClassifierOutput, GPS_COLUMN, RANK_COLUMN, TRUTH_COLUMN, event_rates, kde_pwg,
};
use gwpost_plot::{
    BLUE, RED,
    bitword::BitwordFigure,
    naming::FigureNames,
    params::ParamsHistFigure,
    rank::{RankHistFigure, RankKdeFigure},
    rates::RatesFigure,
    roc::RocFigure,
    series_color,
};
use gwpost_stats::histogram::linear_space;

use crate::util::create_output_dir;

const FIGURE_TYPE: &str = "svg";
const INDEX_PAGE: &str = "index.html";
const KDE_SAMPLES: usize = 500;
const KDE_SCALE: f64 = 0.1;
const KDE_FLOOR: f64 = 0.1;
const THUMBNAIL_SIZE: (u32, u32) = (400, 300);

/// A classifier output table given as `NAME=PATH`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClassifierInput {
    name: String,
    path: PathBuf,
}

impl FromStr for ClassifierInput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, path)) = s.split_once('=') else {
            return Err(format!("expected NAME=PATH, got {s:?}"));
        };
        if name.is_empty() || path.is_empty() {
            return Err(format!("expected NAME=PATH, got {s:?}"));
        }
        Ok(Self {
            name: name.to_owned(),
            path: PathBuf::from(path),
        })
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct IdqSummaryArg {
    /// Classifier output tables
    #[arg(value_name = "NAME=PATH", required = true)]
    classifiers: Vec<ClassifierInput>,
    #[arg(long)]
    ifo: String,
    /// User tag appended to the classifier names
    #[arg(long, default_value = "")]
    tag: String,
    /// Start of the summarized stride
    #[arg(long)]
    gps_start: i64,
    /// Length of the summarized stride in seconds
    #[arg(long)]
    stride: i64,
    /// Directory to write the figures and index page into
    #[arg(short, long, value_name = "DIR")]
    output_dir: PathBuf,
    /// Rank at or above which an event counts as a detection
    #[arg(long, default_value_t = 0.5)]
    rank_threshold: f64,
    /// Number of rate bins within the stride
    #[arg(long, default_value_t = 10)]
    rate_bins: usize,
    /// Target number of events per histogram bin
    #[arg(long, default_value_t = 10)]
    per_bin: usize,
}

impl IdqSummaryArg {
    fn names(&self) -> FigureNames<'_> {
        FigureNames {
            directory: &self.output_dir,
            ifo: &self.ifo,
            tag: &self.tag,
            gps_start: self.gps_start,
            stride: self.stride,
        }
    }
}

/// Figures written for one classifier, in page order.
#[derive(Debug)]
struct ClassifierFigures {
    name: String,
    paths: Vec<PathBuf>,
}

pub(crate) fn run(arg: &IdqSummaryArg) -> anyhow::Result<()> {
    create_output_dir(&arg.output_dir)?;

    let outputs = arg
        .classifiers
        .iter()
        .map(|input| {
            log::info!("Reading {} output from {}", input.name, input.path.display());
            let output = ClassifierOutput::read(&input.path).with_context(|| {
                format!("Failed to read classifier output: {}", input.path.display())
            })?;
            Ok::<_, anyhow::Error>((input.name.as_str(), output))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let names = arg.names();
    let mut figures = Vec::new();
    for (i, (name, output)) in outputs.iter().enumerate() {
        figures.push(classifier_figures(arg, &names, name, output, i)?);
    }
    let combined = combined_figures(arg, &names, &outputs)?;

    let page = index_page(arg, &figures, &combined);
    let index = arg.output_dir.join(INDEX_PAGE);
    page.save(&index)
        .with_context(|| format!("Failed to write {}", index.display()))?;
    Ok(())
}

fn classifier_figures(
    arg: &IdqSummaryArg,
    names: &FigureNames<'_>,
    name: &str,
    output: &ClassifierOutput,
    index: usize,
) -> anyhow::Result<ClassifierFigures> {
    let mut figures = ClassifierFigures {
        name: name.to_owned(),
        paths: Vec::new(),
    };

    let counts = output.roc_counts();
    let mut roc = RocFigure::new();
    let added = roc
        .add_curve(&counts.clean, &counts.glitch, series_color(index), Some(name))
        .map(|_| ());
    match added {
        Ok(_) => {
            let path = names.roc_figure(name, FIGURE_TYPE);
            roc.save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            figures.paths.push(path);
        }
        Err(err) => log::warn!("Skipping ROC curve of {name}: {err}"),
    }

    let (glitch_ranks, glitch_counts) = output.rank_counts(true);
    let (clean_ranks, clean_counts) = output.rank_counts(false);

    #[expect(clippy::cast_precision_loss)]
    let mut hist = RankHistFigure::new(arg.per_bin as f64);
    hist.add(&glitch_ranks, &glitch_counts, RED, Some("glitch"))?
        .add(&clean_ranks, &clean_counts, BLUE, Some("clean"))?;
    let path = names.hist_figure(name, FIGURE_TYPE);
    hist.save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    figures.paths.push(path);

    let eval = linear_space(0.0, 1.0, KDE_SAMPLES);
    let glitch_pdf = kde_pwg(&eval, &glitch_ranks, &glitch_counts, KDE_SCALE, KDE_FLOOR);
    let clean_pdf = kde_pwg(&eval, &clean_ranks, &clean_counts, KDE_SCALE, KDE_FLOOR);
    let mut kde = RankKdeFigure::new();
    kde.add(&eval, &glitch_pdf, RED, Some("glitch"))?
        .add(&eval, &clean_pdf, BLUE, Some("clean"))?;
    let path = names.kde_figure(name, FIGURE_TYPE);
    kde.save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    figures.paths.push(path);

    let extra_columns = output
        .table()
        .names()
        .unwrap_or_default()
        .iter()
        .filter(|column| ![GPS_COLUMN, TRUTH_COLUMN, RANK_COLUMN].contains(&column.as_str()));
    for column in extra_columns {
        let (clean, glitch) =
            output.bin_by_rank_threshold(arg.rank_threshold, Some(&[column.as_str()]))?;
        if clean.is_empty() && glitch.is_empty() {
            log::debug!("No {name} events above rank {}", arg.rank_threshold);
            break;
        }
        let samples = [clean.column(column)?, glitch.column(column)?];
        let labels = ["clean".to_owned(), "glitch".to_owned()];
        let figure = ParamsHistFigure::new(&samples, Some(&labels), column, arg.per_bin)?;
        let path = names.params_figure(name, column, FIGURE_TYPE);
        figure
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        figures.paths.push(path);
    }
    Ok(figures)
}

fn combined_figures(
    arg: &IdqSummaryArg,
    names: &FigureNames<'_>,
    outputs: &[(&str, ClassifierOutput)],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut bitword = BitwordFigure::new();
    #[expect(clippy::cast_precision_loss)]
    let (start, width) = (
        arg.gps_start as f64,
        arg.stride as f64 / arg.rate_bins.max(1) as f64,
    );
    let mut rates = RatesFigure::new("GPS time [s]", "glitch detection rate [Hz]");
    for (i, (name, output)) in outputs.iter().enumerate() {
        let detections = output.detections(arg.rank_threshold);
        bitword.add_classifier(name, &detections)?;
        let (ranges, values) = event_rates(&detections, start, width, arg.rate_bins)
            .into_iter()
            .unzip::<_, _, Vec<_>, Vec<_>>();
        rates.add(&ranges, &values, series_color(i), Some(*name))?;
    }

    let mut paths = Vec::new();
    let path = names.bitword_figure(FIGURE_TYPE);
    bitword
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    paths.push(path);

    let path = names.rates_figure(FIGURE_TYPE);
    match rates.save(&path) {
        Ok(()) => paths.push(path),
        Err(err) => log::warn!("Skipping rate figure: {err}"),
    }
    Ok(paths)
}

fn figure_link(path: &Path) -> String {
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    link_image(&file, THUMBNAIL_SIZE.0, THUMBNAIL_SIZE.1)
}

fn index_page(
    arg: &IdqSummaryArg,
    classifiers: &[ClassifierFigures],
    combined: &[PathBuf],
) -> HtmlPage {
    let mut page = HtmlPage::new(&format!(
        "iDQ summary {}{} {}-{}",
        arg.ifo, arg.tag, arg.gps_start, arg.stride
    ));
    let section = page.add_section("All classifiers");
    section.write(&format!(
        "<p>Detections are glitches ranked at or above {}.</p>\n",
        escape(&arg.rank_threshold.to_string())
    ));
    for path in combined {
        section.write(&figure_link(path));
    }
    for figures in classifiers {
        let section = page.add_section(&figures.name);
        for path in &figures.paths {
            section.write(&figure_link(path));
        }
    }
    page
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_classifier_input() {
        let input = "ovl=/data/ovl.dat".parse::<ClassifierInput>().unwrap();
        assert_eq!(input.name, "ovl");
        assert_eq!(input.path, PathBuf::from("/data/ovl.dat"));
        assert!("ovl".parse::<ClassifierInput>().is_err());
        assert!("=x".parse::<ClassifierInput>().is_err());
    }

    const OVL: &str = "\
GPS i rank signif
100.0 1 0.95 12.0
101.0 0 0.20 1.0
102.0 1 0.60 7.5
103.0 0 0.60 3.0
104.0 0 0.05 0.5
";

    const MVSC: &str = "\
GPS i rank
100.0 1 0.90
101.0 0 0.70
102.0 1 0.30
105.0 0 0.10
";

    #[test]
    fn test_summary_figures_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let ovl = dir.path().join("ovl.dat");
        let mvsc = dir.path().join("mvsc.dat");
        fs::write(&ovl, OVL).unwrap();
        fs::write(&mvsc, MVSC).unwrap();
        let output_dir = dir.path().join("summary");

        let arg = IdqSummaryArg {
            classifiers: vec![
                format!("ovl={}", ovl.display()).parse().unwrap(),
                format!("mvsc={}", mvsc.display()).parse().unwrap(),
            ],
            ifo: "L1".to_owned(),
            tag: "_test".to_owned(),
            gps_start: 100,
            stride: 10,
            output_dir: output_dir.clone(),
            rank_threshold: 0.5,
            rate_bins: 5,
            per_bin: 1,
        };
        run(&arg).unwrap();

        let names = arg.names();
        for path in [
            names.roc_figure("ovl", "svg"),
            names.hist_figure("mvsc", "svg"),
            names.kde_figure("ovl", "svg"),
            names.params_figure("ovl", "signif", "svg"),
            names.bitword_figure("svg"),
            names.rates_figure("svg"),
        ] {
            assert!(path.exists(), "{} is missing", path.display());
        }
        assert!(!names.params_figure("mvsc", "signif", "svg").exists());

        let index = fs::read_to_string(output_dir.join(INDEX_PAGE)).unwrap();
        assert!(index.contains("<h2>ovl</h2>"));
        assert!(index.contains("L1_ovl_test_ROC-100-10.svg"));
        assert!(index.contains("L1_test_BITWORD-100-10.svg"));
    }

    #[test]
    fn test_missing_output() {
        let dir = tempfile::tempdir().unwrap();
        let arg = IdqSummaryArg {
            classifiers: vec!["ovl=missing.dat".parse().unwrap()],
            ifo: "H1".to_owned(),
            tag: String::new(),
            gps_start: 0,
            stride: 32,
            output_dir: dir.path().to_owned(),
            rank_threshold: 0.5,
            rate_bins: 4,
            per_bin: 10,
        };
        let err = run(&arg).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read classifier output"));
    }
}
