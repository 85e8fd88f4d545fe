use std::path::PathBuf;

/// Conditions that stop a dataset from being loaded.
///
/// Per-record problems (an unparseable timestamp, a non-numeric reading)
/// never show up here; they degrade to absent fields on the record.
#[derive(Debug, thiserror::Error)]
pub enum AirError {
    #[error("data file not found at {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("no PM2.5 column found (looked for a header containing 'pm2' among: {})", columns.join(", "))]
    MissingPm25Column { columns: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AirError>;
