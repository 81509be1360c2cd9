//! Append-only provider log.
//!
//! Each entry is one line: `<MM-DD HH:MM:SS>: <json>`, timestamp in UTC.
//! The file is opened in append mode for every entry. Failures are returned
//! to the caller as [`ClientError::Log`]; there is no fallback sink.

use std::path::{Path, PathBuf};

use serde::Serialize;
use time::OffsetDateTime;
use time::macros::format_description;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log file named by `config`, or the default file name.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.log_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped entry holding the JSON form of `contents`.
    pub async fn append<T: Serialize + ?Sized>(&self, contents: &T) -> Result<(), ClientError> {
        let line = format_entry(OffsetDateTime::now_utc(), contents)?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

fn format_entry<T: Serialize + ?Sized>(
    at: OffsetDateTime,
    contents: &T,
) -> Result<String, ClientError> {
    let stamp = at
        .format(format_description!("[month]-[day] [hour]:[minute]:[second]"))
        .map_err(std::io::Error::other)?;
    let json = serde_json::to_string(contents)?;
    Ok(format!("{stamp}: {json}\n"))
}
