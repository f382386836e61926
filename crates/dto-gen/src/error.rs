use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file: {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("connection name invalid or unknown: '{name}'. Check the --cn parameter or the config file (case is sensitive!). Available connections: {list}", list = .available.join(", "))]
    UnknownConnection { name: String, available: Vec<String> },

    #[error("failed to open database: {path}: {source}")]
    DbOpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("sql error: {0}")]
    SqlError(String),

    #[error("nothing was generated, check your query")]
    NothingGenerated,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::SqlError(e.to_string())
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ConfigRead { .. } => "CONFIG_READ",
            AppError::ConfigParse { .. } => "CONFIG_PARSE",
            AppError::UnknownConnection { .. } => "UNKNOWN_CONNECTION",
            AppError::DbOpenFailed { .. } => "DB_OPEN_FAILED",
            AppError::SqlError(_) => "SQL_ERROR",
            AppError::NothingGenerated => "NOTHING_GENERATED",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
