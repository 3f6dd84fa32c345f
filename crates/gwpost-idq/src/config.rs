//! The iDQ configuration file.
//!
//! A TOML document whose tables are sections of options. Section order and
//! option order are kept as written, since options of the `gdb-*` sections
//! are forwarded to the helper executables in that order.
//!
//! ```toml
//! [general]
//! gdb_url = "https://gracedb.example.org/api/"
//!
//! [gdb-time-series]
//! "--verbose" = ""
//! "--window" = 64
//! ```

use std::{fs, io, path::Path, str::FromStr};

use toml::{Table, Value};

/// Section holding options shared by all tasks.
pub const GENERAL_SECTION: &str = "general";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("Failed to read config file {}", path.display())]
    Io {
        path: std::path::PathBuf,
        source: io::Error,
    },
    #[display("Invalid config file")]
    Parse { source: toml::de::Error },
    #[display("Config section [{section}] not found")]
    MissingSection { section: String },
    #[display("Config entry {section:?} is not a section")]
    NotASection { section: String },
    #[display("Option {option:?} of section [{section}] must be a string, number or boolean")]
    UnsupportedValue { section: String, option: String },
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdqConfig {
    sections: Table,
}

impl FromStr for IdqConfig {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let sections = text
            .parse::<Table>()
            .map_err(|source| ConfigError::Parse { source })?;
        Ok(Self { sections })
    }
}

impl IdqConfig {
    pub fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        text.parse()
    }

    fn section(&self, section: &str) -> Result<Option<&Table>, ConfigError> {
        match self.sections.get(section) {
            None => Ok(None),
            Some(Value::Table(table)) => Ok(Some(table)),
            Some(_) => Err(ConfigError::NotASection {
                section: section.to_owned(),
            }),
        }
    }

    /// Returns `true` when `section` exists.
    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        matches!(self.sections.get(section), Some(Value::Table(_)))
    }

    /// Value of one option rendered as text, `None` when absent.
    pub fn option(&self, section: &str, option: &str) -> Result<Option<String>, ConfigError> {
        let Some(table) = self.section(section)? else {
            return Ok(None);
        };
        table
            .get(option)
            .map(|value| render_value(section, option, value))
            .transpose()
    }

    /// URL of the GraceDB server, from `[general] gdb_url`.
    pub fn gdb_url(&self) -> Result<Option<String>, ConfigError> {
        self.option(GENERAL_SECTION, "gdb_url")
    }

    /// All options of `section` in file order, values rendered as text.
    pub fn section_items(&self, section: &str) -> Result<Vec<(String, String)>, ConfigError> {
        let table = self
            .section(section)?
            .ok_or_else(|| ConfigError::MissingSection {
                section: section.to_owned(),
            })?;
        table
            .iter()
            .map(|(option, value)| Ok((option.clone(), render_value(section, option, value)?)))
            .collect()
    }
}

fn render_value(section: &str, option: &str, value: &Value) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        Value::Array(_) | Value::Table(_) => Err(ConfigError::UnsupportedValue {
            section: section.to_owned(),
            option: option.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[general]
gdb_url = "https://gracedb.example.org/api/"
classifiers = ["ovl", "mvsc"]

[gdb-time-series]
"--verbose" = ""
"--window" = 64
"--fap-thr" = 0.25
"--skip-gracedb-upload" = true

[gdb-glitch-tables]
"--verbose" = ""
"#;

    #[test]
    fn test_items_keep_file_order() {
        let config = CONFIG.parse::<IdqConfig>().unwrap();
        let items = config.section_items("gdb-time-series").unwrap();
        assert_eq!(
            items,
            vec![
                ("--verbose".to_owned(), String::new()),
                ("--window".to_owned(), "64".to_owned()),
                ("--fap-thr".to_owned(), "0.25".to_owned()),
                ("--skip-gracedb-upload".to_owned(), "true".to_owned()),
            ]
        );
    }

    #[test]
    fn test_gdb_url() {
        let config = CONFIG.parse::<IdqConfig>().unwrap();
        assert_eq!(
            config.gdb_url().unwrap().as_deref(),
            Some("https://gracedb.example.org/api/")
        );
        let config = "[general]\n".parse::<IdqConfig>().unwrap();
        assert_eq!(config.gdb_url().unwrap(), None);
        assert_eq!(IdqConfig::default().gdb_url().unwrap(), None);
    }

    #[test]
    fn test_unsupported_values() {
        let config = CONFIG.parse::<IdqConfig>().unwrap();
        assert!(matches!(
            config.section_items("general"),
            Err(ConfigError::UnsupportedValue { .. })
        ));
        assert!(matches!(
            config.section_items("missing"),
            Err(ConfigError::MissingSection { .. })
        ));
        let config = "general = 3\n".parse::<IdqConfig>().unwrap();
        assert!(matches!(
            config.gdb_url(),
            Err(ConfigError::NotASection { .. })
        ));
        assert!(!config.has_section("general"));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idq.toml");
        assert!(matches!(IdqConfig::load(&path), Err(ConfigError::Io { .. })));
        std::fs::write(&path, "[general\n").unwrap();
        assert!(matches!(IdqConfig::load(&path), Err(ConfigError::Parse { .. })));
        std::fs::write(&path, CONFIG).unwrap();
        assert!(IdqConfig::load(&path).unwrap().has_section("gdb-glitch-tables"));
    }
}
