#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Extraction stage: cuts each question's boxes out of the rasterized page
//! images and writes one PNG per question.
//!
//! A question that spans multiple columns or pages has several boxes; the
//! crops are stacked top to bottom on a white canvas as wide as the widest
//! crop, in manifest order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, Rgb, RgbImage, imageops};

use crate::{manifest::RegionEntry, render::ConversionError};

/// Per-question extraction result.
#[derive(Debug)]
pub enum CropOutcome {
    /// Question image written.
    Written(PathBuf),
    /// Question image already on disk; nothing was done.
    Skipped(PathBuf),
    /// Extraction failed; the batch continued.
    Failed {
        /// Question id from the region entry.
        id:    String,
        /// Why it failed.
        error: ConversionError,
    },
}

/// Crops every region into `questions_dir`, one PNG per question.
///
/// Runs on the blocking pool; decode, crop, and encode are CPU-bound.
pub async fn crop_all(
    regions: &[RegionEntry],
    pages_dir: &Path,
    questions_dir: &Path,
) -> Result<Vec<CropOutcome>> {
    let regions = regions.to_vec();
    let pages_dir = pages_dir.to_path_buf();
    let questions_dir = questions_dir.to_path_buf();

    tokio::task::spawn_blocking(move || crop_all_blocking(&regions, &pages_dir, &questions_dir))
        .await
        .context("Region extraction task panicked")?
}

/// Synchronous body of [`crop_all`].
fn crop_all_blocking(
    regions: &[RegionEntry],
    pages_dir: &Path,
    questions_dir: &Path,
) -> Result<Vec<CropOutcome>> {
    std::fs::create_dir_all(questions_dir)
        .with_context(|| format!("Could not create {}", questions_dir.display()))?;

    let mut outcomes = Vec::with_capacity(regions.len());
    for region in regions {
        let target = questions_dir.join(format!("{}.png", region.idx));
        if target.exists() {
            outcomes.push(CropOutcome::Skipped(target));
            continue;
        }

        let written = extract_region(region, pages_dir).and_then(|image| {
            image.save(&target).map_err(|source| ConversionError::Write {
                path: target.clone(),
                source,
            })
        });

        match written {
            Ok(()) => outcomes.push(CropOutcome::Written(target)),
            Err(error) => {
                tracing::warn!("Failed to extract question {}: {error}", region.idx);
                outcomes.push(CropOutcome::Failed {
                    id: region.idx.clone(),
                    error,
                });
            }
        }
    }

    Ok(outcomes)
}

/// Crops one region's boxes out of its page images and merges them.
pub fn extract_region(
    region: &RegionEntry,
    pages_dir: &Path,
) -> Result<RgbImage, ConversionError> {
    if region.pages.len() != region.boxes.len() {
        return Err(ConversionError::Region {
            id:     region.idx.clone(),
            reason: format!(
                "{} page images but {} boxes",
                region.pages.len(),
                region.boxes.len()
            ),
        });
    }

    if region.pages.is_empty() {
        return Err(ConversionError::Region {
            id:     region.idx.clone(),
            reason: "no page images listed".to_string(),
        });
    }

    let mut crops = Vec::with_capacity(region.pages.len());
    for (page, bbox) in region.pages.iter().zip(region.boxes.iter()) {
        let path = pages_dir.join(page);
        let page_image = image::open(&path).map_err(|source| ConversionError::Open {
            path: path.clone(),
            source,
        })?;
        crops.push(crop_box(&region.idx, &page_image, *bbox)?);
    }

    if crops.len() == 1 {
        return Ok(crops.remove(0));
    }

    let width = crops.iter().map(RgbImage::width).max().unwrap_or(1);
    let height = crops.iter().map(RgbImage::height).sum();
    let mut merged = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    let mut y_offset = 0i64;
    for crop in &crops {
        imageops::replace(&mut merged, crop, 0, y_offset);
        y_offset += i64::from(crop.height());
    }

    Ok(merged)
}

/// Crops one `[x0, y0, x1, y1]` pixel box out of a page image, clamped to
/// the page bounds.
fn crop_box(id: &str, page: &DynamicImage, bbox: [f32; 4]) -> Result<RgbImage, ConversionError> {
    let [x0, y0, x1, y1] = bbox;
    let left = x0.max(0.0).floor() as u32;
    let top = y0.max(0.0).floor() as u32;
    let right = (x1.ceil() as u32).min(page.width());
    let bottom = (y1.ceil() as u32).min(page.height());

    if right <= left || bottom <= top {
        return Err(ConversionError::Region {
            id:     id.to_string(),
            reason: format!("box [{x0}, {y0}, {x1}, {y1}] lies outside the page"),
        });
    }

    Ok(page.crop_imm(left, top, right - left, bottom - top).to_rgb8())
}
