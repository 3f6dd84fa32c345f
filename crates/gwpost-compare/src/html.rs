//! Minimal static HTML pages made of titled sections.

use std::{fmt, fs, path::Path};

use chrono::{DateTime, Utc};

use crate::CompareError;

const CSS: &str = "\
body{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;background:#fff;}
h1{margin:0 0 8px 0;font-size:24px;}
h2{margin:24px 0 8px 0;font-size:20px;}
table{border-collapse:collapse;}
th,td{border:1px solid #ddd;padding:4px 8px;text-align:center;}
.meta{color:#555;font-size:13px;margin-top:24px;}
";

/// Escapes text for use in element content and attribute values.
///
/// ```
/// use gwpost_compare::html::escape;
///
/// assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[must_use]
pub fn link(url: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(url), escape(text))
}

/// An image that opens in a new tab when clicked.
#[must_use]
pub fn link_image(url: &str, width: u32, height: u32) -> String {
    let url = escape(url);
    format!(
        "<a href=\"{url}\" target=\"_blank\"><img src=\"{url}\" width=\"{width}\" height=\"{height}\" /></a>"
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlSection {
    title: String,
    body: String,
}

impl HtmlSection {
    /// Appends raw markup to the section body.
    pub fn write(&mut self, html: &str) -> &mut Self {
        self.body.push_str(html);
        self
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// A page with a title, sections in insertion order, and a generation stamp.
///
/// ```
/// use gwpost_compare::html::HtmlPage;
///
/// let mut page = HtmlPage::new("SummaryPage");
/// page.add_section("Skymaps").write("<p>none</p>");
/// let html = page.to_string();
/// assert!(html.contains("<h2>Skymaps</h2>"));
/// assert!(html.contains("<p>none</p>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlPage {
    title: String,
    sections: Vec<HtmlSection>,
    generated: DateTime<Utc>,
}

impl HtmlPage {
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self::with_timestamp(title, Utc::now())
    }

    #[must_use]
    pub fn with_timestamp(title: &str, generated: DateTime<Utc>) -> Self {
        Self {
            title: title.to_owned(),
            sections: Vec::new(),
            generated,
        }
    }

    pub fn add_section(&mut self, title: &str) -> &mut HtmlSection {
        self.sections.push(HtmlSection {
            title: title.to_owned(),
            body: String::new(),
        });
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    #[must_use]
    pub fn sections(&self) -> &[HtmlSection] {
        &self.sections
    }

    pub fn save<P>(&self, path: P) -> Result<(), CompareError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        log::info!("Writing {}", path.display());
        fs::write(path, self.to_string()).map_err(CompareError::io(path))
    }
}

impl fmt::Display for HtmlPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = escape(&self.title);
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "<meta charset=\"utf-8\"/>")?;
        writeln!(f, "<title>{title}</title>")?;
        writeln!(f, "<style>\n{CSS}</style>")?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "<h1>{title}</h1>")?;
        for section in &self.sections {
            writeln!(f, "<div class=\"section\">")?;
            writeln!(f, "<h2>{}</h2>", escape(&section.title))?;
            writeln!(f, "{}", section.body)?;
            writeln!(f, "</div>")?;
        }
        writeln!(
            f,
            "<p class=\"meta\">Produced on {}</p>",
            self.generated.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn test_render_order_and_stamp() {
        let stamp = Utc.with_ymd_and_hms(2011, 3, 14, 9, 26, 53).unwrap();
        let mut page = HtmlPage::with_timestamp("Calibration <errors>", stamp);
        page.add_section("first").write("<p>1</p>").write("<p>2</p>");
        page.add_section("second");
        let html = page.to_string();

        assert!(html.contains("<title>Calibration &lt;errors&gt;</title>"));
        let first = html.find("<h2>first</h2>").unwrap();
        let second = html.find("<h2>second</h2>").unwrap();
        assert!(first < second);
        assert!(html.contains("<p>1</p><p>2</p>"));
        assert!(html.contains("Produced on 2011-03-14 09:26:53 UTC"));
        assert_eq!(page.sections().len(), 2);
    }

    #[test]
    fn test_links() {
        assert_eq!(link("./a b.html", "go"), "<a href=\"./a b.html\">go</a>");
        assert_eq!(
            link_image("x.svg", 300, 250),
            "<a href=\"x.svg\" target=\"_blank\"><img src=\"x.svg\" width=\"300\" height=\"250\" /></a>"
        );
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        HtmlPage::new("p").save(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("<!DOCTYPE html>"));
    }
}
