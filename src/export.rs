//! Persist extracted records: a CSV sheet for people, JSON with the full records.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::profile::{ProfileRecord, ProfileRow};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// `YYYYmmdd_HHMMSS` in local time, used to name export files.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Write `academics_<stamp>.csv` and `.json` into `dir`, creating it if needed.
pub fn export(records: &[ProfileRecord], dir: &Path, stamp: &str) -> Result<ExportPaths, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let paths = ExportPaths {
        csv: dir.join(format!("academics_{stamp}.csv")),
        json: dir.join(format!("academics_{stamp}.json")),
    };

    let file = create(&paths.csv)?;
    write_csv(records, file)?;

    let file = create(&paths.json)?;
    serde_json::to_writer_pretty(file, records)?;

    tracing::info!(records = records.len(), csv = %paths.csv.display(), json = %paths.json.display(), "export written");
    Ok(paths)
}

/// One header row, then one row per record in the fixed column order.
pub fn write_csv<W: Write>(records: &[ProfileRecord], out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(ProfileRow::from(record))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn create(path: &Path) -> Result<fs::File, ExportError> {
    fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
