use std::{
    fs::{self, File},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use crate::CompareError;

/// Creates `path` and its parents if missing.
pub(crate) fn ensure_dir(path: &Path) -> Result<PathBuf, CompareError> {
    if !path.is_dir() {
        log::info!("Creating {}", path.display());
    }
    fs::create_dir_all(path).map_err(CompareError::io(path))?;
    Ok(path.to_owned())
}

pub(crate) fn save_json<T>(value: &T, path: &Path) -> Result<(), CompareError>
where
    T: serde::Serialize,
{
    let file = File::create(path).map_err(CompareError::io(path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| CompareError::Json {
        path: path.to_owned(),
        source,
    })?;
    writeln!(writer).map_err(CompareError::io(path))?;
    writer.flush().map_err(CompareError::io(path))
}
