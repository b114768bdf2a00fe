use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::future;
use tracing::{debug, instrument};

use crate::log::{merge::merge_logs, parse::parse_log, Log};

/// Reads and parses a single log file.
pub async fn read_log(path: &Path) -> Result<Log> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read log {}", path.display()))?;
    let log = parse_log(&text).with_context(|| format!("Failed to parse log {}", path.display()))?;
    debug!("Read {} weeks from {}", log.len(), path.display());
    Ok(log)
}

/// Reads all log files concurrently and merges them into one log sorted by date.
#[instrument]
pub async fn read_logs(paths: &[PathBuf]) -> Result<Log> {
    let logs = future::try_join_all(paths.iter().map(|path| read_log(path))).await?;
    Ok(merge_logs(logs))
}
