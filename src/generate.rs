#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The generation pipeline: download exam sources, rasterize their pages,
//! cut out per-question images, and assemble the dataset file.
//!
//! Every stage skips work whose output already exists, so interrupting a
//! run and starting it again converges on the same workspace.

use std::{collections::HashSet, path::PathBuf};

use anyhow::Result;
use typed_builder::TypedBuilder;

use crate::{
    crop::{self, CropOutcome},
    dataset::{self, Dataset},
    fetch::{self, FetchOutcome},
    manifest,
    paths::DatasetPaths,
    render::{self, RenderOutcome},
};

/// Options for one generation run.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[builder(doc)]
pub struct GenerateOptions {
    /// Data workspace layout.
    pub paths: DatasetPaths,

    /// Source manifest override; defaults to `manifests/sources.json`.
    pub sources: Option<PathBuf>,

    /// Region manifest override; defaults to `manifests/regions.json`.
    pub regions: Option<PathBuf>,

    /// Label manifest override; defaults to `manifests/labels.json`.
    pub labels: Option<PathBuf>,

    /// Page rasterization zoom factor.
    #[builder(default = render::DEFAULT_ZOOM)]
    pub zoom: f32,

    /// Concurrent downloads.
    #[builder(default = fetch::DEFAULT_WORKERS)]
    pub workers: usize,
}

/// Runs the full pipeline and returns the assembled dataset.
pub async fn generate(options: &GenerateOptions) -> Result<Dataset> {
    let paths = &options.paths;

    let sources_file = options
        .sources
        .clone()
        .unwrap_or_else(|| paths.sources_file());
    let sources = manifest::load_sources(&sources_file)?;
    tracing::info!("[1/4] Downloading {} source files", sources.len());
    let outcomes = fetch::fetch_all(&sources, paths.figures_dir(), options.workers).await?;
    let (downloaded, skipped, failed) = summarize_fetch(&outcomes);
    tracing::info!("[1/4] {downloaded} downloaded, {skipped} already present, {failed} failed");

    tracing::info!("[2/4] Rasterizing PDF pages");
    let outcomes =
        render::render_all(paths.figures_dir(), paths.pages_dir(), options.zoom).await?;
    let (documents, pages, failed) = summarize_render(&outcomes);
    tracing::info!("[2/4] {documents} documents, {pages} new page images, {failed} failed");

    let regions_file = options
        .regions
        .clone()
        .unwrap_or_else(|| paths.regions_file());
    let regions = manifest::load_regions(&regions_file)?;
    tracing::info!("[3/4] Extracting {} question images", regions.len());
    let outcomes = crop::crop_all(&regions, paths.pages_dir(), paths.questions_dir()).await?;
    let (written, skipped, failed) = summarize_crop(&outcomes);
    tracing::info!("[3/4] {written} written, {skipped} already present, {failed} failed");

    let labels_file = options
        .labels
        .clone()
        .unwrap_or_else(|| paths.labels_file());
    let labels = manifest::load_labels(&labels_file)?;
    warn_on_mismatched_ids(&regions, &labels);

    tracing::info!("[4/4] Assembling dataset from {} label entries", labels.len());
    let outcome = dataset::assemble(&labels, paths)?;
    if !outcome.failures.is_empty() {
        tracing::warn!(
            "[4/4] {} label entries failed integrity checks",
            outcome.failures.len()
        );
    }

    let dataset_file = paths.dataset_file();
    outcome.dataset.save(&dataset_file)?;
    tracing::info!(
        "[4/4] Wrote {} questions to {}",
        outcome.dataset.len(),
        dataset_file.display()
    );

    Ok(outcome.dataset)
}

/// Warns about region/label entries whose ids never pair up.
fn warn_on_mismatched_ids(regions: &[manifest::RegionEntry], labels: &[manifest::LabelEntry]) {
    let region_ids = regions
        .iter()
        .map(|r| r.idx.as_str())
        .collect::<HashSet<_>>();
    let label_ids = labels.iter().map(|l| l.id.as_str()).collect::<HashSet<_>>();

    for id in label_ids.difference(&region_ids) {
        tracing::warn!("Label `{id}` has no region entry");
    }
    for id in region_ids.difference(&label_ids) {
        tracing::warn!("Region `{id}` has no label entry");
    }
}

/// Counts `(downloaded, skipped, failed)` download outcomes.
fn summarize_fetch(outcomes: &[FetchOutcome]) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for outcome in outcomes {
        match outcome {
            FetchOutcome::Downloaded(_) => counts.0 += 1,
            FetchOutcome::Skipped(_) => counts.1 += 1,
            FetchOutcome::Failed { .. } => counts.2 += 1,
        }
    }

    counts
}

/// Counts `(documents, new page images, failed)` rasterization outcomes.
fn summarize_render(outcomes: &[RenderOutcome]) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for outcome in outcomes {
        match outcome {
            RenderOutcome::Rendered { pages_written, .. } => {
                counts.0 += 1;
                counts.1 += pages_written;
            }
            RenderOutcome::Failed { .. } => counts.2 += 1,
        }
    }

    counts
}

/// Counts `(written, skipped, failed)` extraction outcomes.
fn summarize_crop(outcomes: &[CropOutcome]) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for outcome in outcomes {
        match outcome {
            CropOutcome::Written(_) => counts.0 += 1,
            CropOutcome::Skipped(_) => counts.1 += 1,
            CropOutcome::Failed { .. } => counts.2 += 1,
        }
    }

    counts
}
