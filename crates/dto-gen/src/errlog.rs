use std::error::Error as _;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::Local;

use crate::error::AppError;

pub const LOG_FILE: &str = "last-error.log";

/// Records a run-level failure: timestamp, full command line, and the error
/// chain. Returns the absolute path of the log file.
pub fn write_failure(err: &AppError) -> std::io::Result<PathBuf> {
    let cmdline: Vec<String> = std::env::args().collect();
    let body = format!(
        "{}: {}\n{}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        cmdline.join(" "),
        detail(err)
    );
    std::fs::write(LOG_FILE, body)?;
    std::fs::canonicalize(LOG_FILE)
}

/// Full failure text: error code, message, and the source chain.
pub fn detail(err: &AppError) -> String {
    let mut out = format!("[{}] {err}", err.code());
    let mut source = err.source();
    while let Some(s) = source {
        let _ = write!(out, "\ncaused by: {s}");
        source = s.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_includes_code_and_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::ConfigRead {
            path: PathBuf::from("connections.json"),
            source: io,
        };
        let text = detail(&err);
        assert!(text.starts_with("[CONFIG_READ]"));
        assert!(text.contains("connections.json"));
        assert!(text.contains("caused by: gone"));
    }
}
