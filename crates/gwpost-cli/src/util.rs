use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

/// Destination of a JSON report: a file, or stdout when the path is `-`.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        if path == Path::new("-") {
            return Ok(Output::Stdout(io::stdout().lock()));
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn describe(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    /// Writes `value` as pretty JSON followed by a newline.
    pub fn write_json<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let result = match &mut self {
            Output::Stdout(writer) => write_json_to(writer, value),
            Output::File { writer, .. } => write_json_to(writer, value),
        };
        result.with_context(|| format!("Failed to write JSON to {}", self.describe()))
    }
}

fn write_json_to<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: io::Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Creates `dir` and its parents unless it already exists.
pub fn create_output_dir(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports/run1");
        create_output_dir(&nested).unwrap();
        let path = nested.join("report.json");
        Output::create(&path)
            .unwrap()
            .write_json(&vec![1.5, 2.0])
            .unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("]\n"));
        let value: Vec<f64> = serde_json::from_str(&text).unwrap();
        assert_eq!(value, [1.5, 2.0]);
    }

    #[test]
    fn test_unwritable_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/report.json");
        let err = Output::create(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create report file"));
    }
}
