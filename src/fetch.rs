#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Download stage: pulls the exam source files named by the source manifest
//! into the figures directory.
//!
//! Downloads run through a bounded pool so a long manifest cannot open an
//! unbounded number of connections. Files already on disk are skipped, so
//! re-running after a partial failure only fetches what is missing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use reqwest::Client;

use crate::manifest::SourceEntry;

/// Browser user agent sent with every request; the KICE file servers refuse
/// the default client string.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/91.0.4472.124 Safari/537.36";

/// Referer the KICE download endpoints expect.
const REFERER: &str = "https://www.kice.re.kr/";

/// Default number of downloads in flight at once.
pub const DEFAULT_WORKERS: usize = 4;

/// Why a single download failed.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The request failed or returned a non-success status.
    #[error("request for `{url}` failed: {source}")]
    Request {
        /// The URL that was fetched.
        url:    String,
        /// The underlying client error.
        source: reqwest::Error,
    },
    /// The response body could not be written to disk.
    #[error("could not write {}: {source}", .path.display())]
    Write {
        /// Target path of the download.
        path:   PathBuf,
        /// The underlying filesystem error.
        source: std::io::Error,
    },
}

/// What happened to one source manifest entry.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Downloaded to the figures directory.
    Downloaded(PathBuf),
    /// Already on disk; nothing was fetched.
    Skipped(PathBuf),
    /// Download failed; the rest of the batch continued.
    Failed {
        /// File name from the manifest entry.
        file:  String,
        /// Why it failed.
        error: FetchError,
    },
}

/// Downloads every source into `figures_dir`, at most `workers` at a time.
///
/// Individual failures are recorded in the returned outcomes rather than
/// aborting the batch.
pub async fn fetch_all(
    sources: &[SourceEntry],
    figures_dir: &Path,
    workers: usize,
) -> Result<Vec<FetchOutcome>> {
    tokio::fs::create_dir_all(figures_dir)
        .await
        .with_context(|| format!("Could not create {}", figures_dir.display()))?;

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Could not construct the download client")?;

    let tasks = sources.iter().map(|source| {
        let client = client.clone();
        let target = figures_dir.join(&source.file);

        async move {
            if target.exists() {
                return FetchOutcome::Skipped(target);
            }

            match fetch_one(&client, &source.url, &target).await {
                Ok(()) => {
                    tracing::info!("Downloaded {}", source.file);
                    FetchOutcome::Downloaded(target)
                }
                Err(error) => {
                    tracing::warn!("Failed to download {}: {error}", source.file);
                    FetchOutcome::Failed {
                        file: source.file.clone(),
                        error,
                    }
                }
            }
        }
    });

    Ok(stream::iter(tasks)
        .buffer_unordered(workers.max(1))
        .collect::<Vec<_>>()
        .await)
}

/// Fetches one file to `target`.
async fn fetch_one(client: &Client, url: &str, target: &Path) -> Result<(), FetchError> {
    let response = client
        .get(url)
        .header(reqwest::header::REFERER, REFERER)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let bytes = response.bytes().await.map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })?;

    tokio::fs::write(target, &bytes)
        .await
        .map_err(|source| FetchError::Write {
            path: target.to_path_buf(),
            source,
        })?;

    Ok(())
}
