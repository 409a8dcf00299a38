// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-disk cache of downloaded GPX files.
//!
//! Files are written once per activity and reused until a lazy sweep removes
//! them for being older than the retention window.

use crate::error::{AppError, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

/// Suffix counter keeping concurrent partial writes apart.
static PARTIAL_SEQ: AtomicU64 = AtomicU64::new(0);

/// GPX file store rooted at a directory.
#[derive(Debug, Clone)]
pub struct TrackStore {
    dir: PathBuf,
    max_age: Duration,
}

impl TrackStore {
    pub fn new(dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            dir: dir.into(),
            max_age,
        }
    }

    /// Create the storage directory if it does not exist.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Storage(format!("{}: {}", self.dir.display(), e)))
    }

    /// Path of the GPX file for an activity.
    pub fn path_for(&self, activity_id: u64) -> PathBuf {
        self.dir.join(format!("{}.gpx", activity_id))
    }

    /// Return the stored GPX for `activity_id`, downloading it on a miss.
    ///
    /// `download` is only awaited when no file is present.
    pub async fn load_or_download<F, Fut>(&self, activity_id: u64, download: F) -> Result<Vec<u8>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>>>,
    {
        let path = self.path_for(activity_id);

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!(activity_id, path = %path.display(), "GPX served from disk");
                return Ok(bytes);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::Storage(format!("{}: {}", path.display(), e)));
            }
        }

        let bytes = download().await?;

        self.ensure_dir().await?;
        self.write_atomic(activity_id, &path, &bytes).await?;

        tracing::info!(
            activity_id,
            bytes = bytes.len(),
            path = %path.display(),
            "GPX downloaded and stored"
        );
        Ok(bytes)
    }

    /// Write `bytes` to a sibling partial file and rename it over `path`.
    ///
    /// Readers only ever see a complete file. The partial file is removed if
    /// any step fails.
    async fn write_atomic(&self, activity_id: u64, path: &Path, bytes: &[u8]) -> Result<()> {
        let seq = PARTIAL_SEQ.fetch_add(1, Ordering::Relaxed);
        let partial = self
            .dir
            .join(format!("{}.gpx.{}.{}.part", activity_id, std::process::id(), seq));

        let written = match tokio::fs::write(&partial, bytes).await {
            Ok(()) => tokio::fs::rename(&partial, path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %partial.display(),
                        error = %cleanup,
                        "Failed to remove partial GPX file"
                    );
                }
            }
            return Err(AppError::Storage(format!("{}: {}", path.display(), e)));
        }
        Ok(())
    }

    /// Delete files whose last modification is older than the retention window.
    ///
    /// Failures are logged and skipped. Returns the number of files removed.
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(SystemTime::now()).await
    }

    /// Same as [`sweep_expired`](Self::sweep_expired) with an explicit clock.
    pub async fn sweep_expired_at(&self, now: SystemTime) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "Failed to list GPX directory");
                return 0;
            }
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read GPX directory entry");
                    break;
                }
            };

            let path = entry.path();
            let modified = match entry.metadata().await {
                Ok(meta) if meta.is_file() => meta.modified(),
                Ok(_) => continue,
                Err(e) => Err(e),
            };

            let age = match modified {
                Ok(mtime) => now.duration_since(mtime).unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to stat GPX file");
                    continue;
                }
            };

            if age <= self.max_age {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    removed += 1;
                    tracing::info!(path = %path.display(), age_secs = age.as_secs(), "Deleted expired GPX file");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to delete expired GPX file");
                }
            }
        }

        removed
    }
}
