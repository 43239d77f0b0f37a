#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Rasterization stage: turns every downloaded PDF into per-page PNG images.
//!
//! Page images are named `{stem}_{page}.png` with zero-based page numbers,
//! and region manifests give their boxes in pixels of these images, so the
//! zoom factor used here must match the one the manifests were authored
//! against.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pdfium_render::prelude::{PdfRenderConfig, Pdfium, PdfiumError};

use crate::util;

/// Default zoom factor; doubles the 72 dpi page basis.
pub const DEFAULT_ZOOM: f32 = 2.0;

/// Why a PDF or image-processing unit failed.
#[derive(thiserror::Error, Debug)]
pub enum ConversionError {
    /// A document could not be opened or one of its pages rendered.
    #[error("could not render {}: {reason}", .path.display())]
    Render {
        /// The PDF in question.
        path:   PathBuf,
        /// What pdfium reported.
        reason: String,
    },
    /// A page image referenced by a region could not be opened.
    #[error("could not open page image {}: {source}", .path.display())]
    Open {
        /// The page image path.
        path:   PathBuf,
        /// The underlying decode error.
        source: image::ImageError,
    },
    /// A rendered or cropped image could not be written.
    #[error("could not write {}: {source}", .path.display())]
    Write {
        /// Target path of the image.
        path:   PathBuf,
        /// The underlying encode error.
        source: image::ImageError,
    },
    /// A region manifest entry does not line up with its page images.
    #[error("question `{id}`: {reason}")]
    Region {
        /// Question id from the region entry.
        id:     String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Per-document rasterization result.
#[derive(Debug)]
pub enum RenderOutcome {
    /// Document processed; `pages_written` of `pages_total` were new.
    Rendered {
        /// The source PDF.
        file:          PathBuf,
        /// Pages written this run (existing ones are skipped).
        pages_written: usize,
        /// Pages in the document.
        pages_total:   usize,
    },
    /// Document failed; the batch continued.
    Failed {
        /// The source PDF.
        file:  PathBuf,
        /// Why it failed.
        error: ConversionError,
    },
}

/// Rasterizes every PDF directly under `figures_dir` into `pages_dir`.
///
/// Runs on the blocking pool since pdfium is not async-safe.
pub async fn render_all(
    figures_dir: &Path,
    pages_dir: &Path,
    zoom: f32,
) -> Result<Vec<RenderOutcome>> {
    let figures_dir = figures_dir.to_path_buf();
    let pages_dir = pages_dir.to_path_buf();

    tokio::task::spawn_blocking(move || render_all_blocking(&figures_dir, &pages_dir, zoom))
        .await
        .context("Rasterizer task panicked")?
}

/// Synchronous body of [`render_all`].
fn render_all_blocking(
    figures_dir: &Path,
    pages_dir: &Path,
    zoom: f32,
) -> Result<Vec<RenderOutcome>> {
    std::fs::create_dir_all(pages_dir)
        .with_context(|| format!("Could not create {}", pages_dir.display()))?;

    let documents = util::find_files("pdf", 0, figures_dir)?;
    let pdfium = load_pdfium()
        .map_err(|e| anyhow::anyhow!("Could not bind to a pdfium library: {e}"))?;

    let mut outcomes = Vec::with_capacity(documents.len());
    for document in documents {
        match render_document(&pdfium, &document, pages_dir, zoom) {
            Ok((pages_written, pages_total)) => {
                if pages_written > 0 {
                    tracing::info!(
                        "Rasterized {} ({pages_written}/{pages_total} pages new)",
                        document.display()
                    );
                }
                outcomes.push(RenderOutcome::Rendered {
                    file: document,
                    pages_written,
                    pages_total,
                });
            }
            Err(error) => {
                tracing::warn!("Failed to rasterize {}: {error}", document.display());
                outcomes.push(RenderOutcome::Failed {
                    file: document,
                    error,
                });
            }
        }
    }

    Ok(outcomes)
}

/// Binds pdfium from the working directory first, then the system library.
fn load_pdfium() -> Result<Pdfium, PdfiumError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
}

/// Renders one document's missing pages; returns `(written, total)`.
fn render_document(
    pdfium: &Pdfium,
    document: &Path,
    pages_dir: &Path,
    zoom: f32,
) -> Result<(usize, usize), ConversionError> {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let doc = pdfium
        .load_pdf_from_file(document, None)
        .map_err(|e| ConversionError::Render {
            path:   document.to_path_buf(),
            reason: e.to_string(),
        })?;

    let config = PdfRenderConfig::new().scale_page_by_factor(zoom);
    let pages_total = doc.pages().len() as usize;
    let mut pages_written = 0;

    for (page_index, page) in doc.pages().iter().enumerate() {
        let target = pages_dir.join(format!("{stem}_{page_index}.png"));
        if target.exists() {
            continue;
        }

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| ConversionError::Render {
                path:   document.to_path_buf(),
                reason: format!("page {page_index}: {e}"),
            })?;

        bitmap
            .as_image()
            .to_rgb8()
            .save(&target)
            .map_err(|source| ConversionError::Write {
                path: target,
                source,
            })?;
        pages_written += 1;
    }

    Ok((pages_written, pages_total))
}
