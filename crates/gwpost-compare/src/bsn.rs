//! Bayes factors of the signal hypothesis against noise.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{CompareError, gps::GpsTime};

#[must_use]
pub fn bayes_factor_file(dir: &Path, time: GpsTime) -> PathBuf {
    dir.join(format!("bayesfactor_{time}.000.txt"))
}

/// Reads the BSN, the first number on the first line of `path`.
pub fn read_bsn<P>(path: P) -> Result<f64, CompareError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(CompareError::io(path))?;
    let first = text
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().next())
        .unwrap_or_default();
    first.parse().map_err(|_| CompareError::InvalidValue {
        path: path.to_owned(),
        text: first.to_owned(),
    })
}
