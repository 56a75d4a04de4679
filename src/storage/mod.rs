// src/storage/mod.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Best-effort append-only JSONL sink, one record per tick. Write failures
/// are logged and swallowed: telemetry must never abort a trading tick.
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(error) = std::fs::create_dir_all(parent) {
                    warn!(%error, dir = %parent.display(), "could not create journal directory");
                }
            }
        }
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append<T: Serialize>(&self, record: &T) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(error) => {
                warn!(%error, "could not serialize journal record");
                return;
            }
        };
        if let Err(error) = self.append_line(&line).await {
            warn!(%error, path = %self.path.display(), "journal write failed, continuing");
        }
    }

    async fn append_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }
}

/// Writes the end-of-session summary as pretty JSON.
pub async fn write_summary<T: Serialize>(path: &Path, summary: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let body = serde_json::to_string_pretty(summary).context("serializing summary")?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Record {
        tick: u64,
        note: String,
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("paperpilot-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn appends_one_line_per_record() {
        let path = scratch_path("journal.jsonl");
        let _ = tokio::fs::remove_file(&path).await;

        let journal = Journal::new(&path);
        for tick in 0..3 {
            journal
                .append(&Record {
                    tick,
                    note: "ok".to_string(),
                })
                .await;
        }

        let body = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 3);
        let last: Record = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last.tick, 2);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn summary_roundtrips() {
        let path = scratch_path("summary.json");
        let record = Record {
            tick: 99,
            note: "done".to_string(),
        };
        write_summary(&path, &record).await.unwrap();

        let body = tokio::fs::read_to_string(&path).await.unwrap();
        let back: Record = serde_json::from_str(&body).unwrap();
        assert_eq!(back, record);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
