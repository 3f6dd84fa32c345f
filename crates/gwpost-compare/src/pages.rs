//! The report pages of one perturbed run.
//!
//! `posposplots.html` collects the figures; `summary.html` holds the sky
//! maps and a table of both runs linking each event to its own
//! parameter-estimation result page.

use std::path::{Path, PathBuf};

use crate::{
    CompareError,
    gps::GpsTime,
    html::{HtmlPage, link, link_image},
    paths::relative_path,
    plots::{BSN_PLOTS, ERROR_PLOTS, PARAMETERS_PLOTS, SKY_PLOTS, SNR_PLOTS},
    skymap::sky_map_file,
    snr::NETWORK,
    summary::{RunSummary, SummaryRow},
};

pub const PLOTS_PAGE: &str = "posposplots.html";
pub const SUMMARY_PAGE: &str = "summary.html";
/// Page of one event inside a result-pages directory.
pub const RESULT_PAGE: &str = "posplots.html";

const THUMB_WIDTH: u32 = 300;
const THUMB_HEIGHT: u32 = 250;
const SKY_MAP_COLUMNS: usize = 3;

fn figure_url(kind: &str, file: &str) -> String {
    format!("./{kind}/{file}")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Builds `posposplots.html` for the run whose pages live in `run_dir`.
#[must_use]
pub fn plot_page(run_dir: &Path, parameters: &[String], first_time: GpsTime) -> HtmlPage {
    let mut page = HtmlPage::new("CalibrationErrors");

    let mut errors = String::from("<table><tr>");
    for kind in ["amp", "pha"] {
        let file = format!("{kind}_{first_time}.svg");
        errors.push_str("<td>");
        if run_dir.join(ERROR_PLOTS).join(&file).is_file() {
            errors.push_str(&link_image(
                &figure_url(ERROR_PLOTS, &file),
                THUMB_WIDTH * 3 / 2,
                THUMB_HEIGHT * 3 / 2,
            ));
        } else {
            errors.push_str(&format!(
                "<p>No calibration error curves found in ./{ERROR_PLOTS}</p>"
            ));
        }
        errors.push_str("</td>");
    }
    errors.push_str("</tr></table>");
    page.add_section("Errors fit").write(&errors);

    let mut plots = String::from("<table>");
    for parameter in parameters {
        plots.push_str("<tr>");
        let figures = ["delta_", "effect_", "delta_sigma_"]
            .map(|prefix| (PARAMETERS_PLOTS, prefix))
            .into_iter()
            .chain([(SNR_PLOTS, "SNR_vs_")]);
        for (kind, prefix) in figures {
            let url = figure_url(kind, &format!("{prefix}{parameter}.svg"));
            plots.push_str(&format!(
                "<td>{}</td>",
                link_image(&url, THUMB_WIDTH, THUMB_HEIGHT)
            ));
        }
        plots.push_str("</tr>");
    }
    plots.push_str(&format!(
        "<tr><td colspan=\"2\">{}</td><td colspan=\"2\">{}</td></tr></table>",
        link_image(
            &figure_url(BSN_PLOTS, "BSN_vs_SNR.svg"),
            2 * THUMB_WIDTH,
            2 * THUMB_HEIGHT
        ),
        link_image(
            &figure_url(SKY_PLOTS, "injected_skymap_0.svg"),
            2 * THUMB_WIDTH,
            2 * THUMB_HEIGHT
        ),
    ));
    page.add_section("Summary plots")
        .write(&link(&format!("./{SUMMARY_PAGE}"), "Go to the summary table"))
        .write(&plots);
    page
}

/// Inputs of `summary.html`.
#[derive(Debug, Clone, Copy)]
pub struct SummaryPage<'a> {
    pub control: &'a RunSummary,
    pub perturbed: &'a RunSummary,
    pub ifos: &'a [String],
    pub keyword: &'a str,
    pub sky_maps: usize,
    /// Result-pages directories of the control and perturbed runs.
    pub result_pages: Option<(&'a Path, &'a Path)>,
}

impl SummaryPage<'_> {
    fn snr_columns(&self) -> Vec<&str> {
        self.ifos
            .iter()
            .map(String::as_str)
            .chain([NETWORK])
            .collect()
    }

    fn row_cells(&self, run_dir: &Path, row: &SummaryRow, pages: Option<&Path>) -> String {
        let time = row.time.to_string();
        let time_cell = match pages {
            Some(pages) => {
                let target = pages.join(&time).join(RESULT_PAGE);
                let url = relative_path(run_dir, &target);
                link(&url.to_string_lossy(), &time)
            }
            None => time,
        };
        let mut cells = format!("<td>{time_cell}</td><td>{:4.2}</td>", row.bsn);
        for ifo in self.snr_columns() {
            match row.snr.get(ifo) {
                Some(snr) => cells.push_str(&format!("<td>{snr:4.2}</td>")),
                None => cells.push_str("<td>-</td>"),
            }
        }
        cells
    }

    /// Builds the page for `run_dir`; result-page links are made relative to
    /// it, so both should be absolute or relative to the same directory.
    #[must_use]
    pub fn render(&self, run_dir: &Path) -> HtmlPage {
        let mut page = HtmlPage::new("SummaryPage");

        let sky_dir = run_dir.join(SKY_PLOTS);
        let mut maps = String::from("<table><tr>");
        for index in 0..self.sky_maps {
            let path = sky_map_file(&sky_dir, index);
            if path.is_file() {
                let file = format!("injected_skymap_{index}.svg");
                maps.push_str(&format!(
                    "<td>{}</td>",
                    link_image(&figure_url(SKY_PLOTS, &file), 500, 400)
                ));
            } else {
                maps.push_str("<td> </td>");
            }
            if (index + 1) % SKY_MAP_COLUMNS == 0 && index + 1 != self.sky_maps {
                maps.push_str("</tr><tr>");
            }
        }
        maps.push_str("</tr></table>");
        page.add_section("Skymaps").write(&maps);

        let columns = self.snr_columns();
        let span = columns.len() + 2;
        let mut header = String::from("<th> TriggerTime </th><th> BSN </th>");
        for ifo in &columns {
            header.push_str(&format!("<th>SNR_{ifo}</th>"));
        }
        let mut table = format!(
            "<table><tr><th colspan=\"{span}\"> Control Runs </th>\
             <th colspan=\"{span}\"> {} Runs </th></tr><tr>{header}{header}</tr>",
            capitalize(self.keyword)
        );
        let (control_pages, perturbed_pages) = self.result_pages.unzip();
        for (control, perturbed) in self.control.rows().iter().zip(self.perturbed.rows()) {
            table.push_str("<tr>");
            table.push_str(&self.row_cells(run_dir, control, control_pages));
            table.push_str(&self.row_cells(run_dir, perturbed, perturbed_pages));
            table.push_str("</tr>");
        }
        table.push_str("</table>");
        page.add_section("Links to postprocessing pages")
            .write(&link(&format!("./{PLOTS_PAGE}"), "Go back to the plots page"))
            .write(&table);
        page
    }
}

/// Writes both pages into `run_dir` and returns their paths.
pub fn write_pages(
    run_dir: &Path,
    parameters: &[String],
    summary: &SummaryPage<'_>,
) -> Result<(PathBuf, PathBuf), CompareError> {
    let first_time = summary
        .control
        .rows()
        .first()
        .map(|row| row.time)
        .ok_or(CompareError::NoPosteriors)?;
    let plots = run_dir.join(PLOTS_PAGE);
    plot_page(run_dir, parameters, first_time).save(&plots)?;
    let table = run_dir.join(SUMMARY_PAGE);
    summary.render(run_dir).save(&table)?;
    Ok((plots, table))
}
