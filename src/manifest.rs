#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Typed views of the three input manifests that drive generation.
//!
//! The manifests are plain JSON arrays. `sources.json` lists what to
//! download, `regions.json` says where each question sits on the rasterized
//! pages, and `labels.json` carries the ground truth. Field names follow the
//! published benchmark files, so existing manifests load unchanged.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util;

/// One downloadable exam source file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Where to fetch the file from.
    pub url:  String,
    /// File name to store it under inside the figures directory.
    pub file: String,
}

/// One question's location on the rasterized page images.
///
/// `pages` and `boxes` run in parallel: box `i` is cut from page image `i`.
/// Boxes are `[x0, y0, x1, y1]` in pixels of the rendered page image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegionEntry {
    /// Question id; also the stem of the cropped image file name.
    pub idx:   String,
    /// Page image file names inside the pages directory.
    #[serde(rename = "img_path")]
    pub pages: Vec<String>,
    /// One pixel box per page image.
    #[serde(rename = "bbox")]
    pub boxes: Vec<[f32; 4]>,
}

/// One question's ground truth and classification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LabelEntry {
    /// Question id; must match a region entry.
    pub id: String,

    /// Exam track the question belongs to, e.g. `KoCSAT`.
    pub category: String,

    /// Question type; parsed into [`crate::dataset::QuestionKind`] during
    /// assembly.
    #[serde(rename = "type")]
    pub kind: String,

    /// Ground-truth answer. Manifests store some answers as bare numbers,
    /// so both forms are accepted.
    #[serde(deserialize_with = "string_or_number")]
    pub answer: String,

    /// Score weight, when the exam assigns one.
    #[serde(default, deserialize_with = "optional_number")]
    pub point: Option<f64>,

    /// Free-form annotation carried through to the dataset.
    #[serde(default)]
    pub note: Option<String>,
}

/// Loads the source manifest.
pub fn load_sources(path: &Path) -> Result<Vec<SourceEntry>> {
    util::read_json(path)
        .with_context(|| format!("Could not load source manifest {}", path.display()))
}

/// Loads the region manifest.
pub fn load_regions(path: &Path) -> Result<Vec<RegionEntry>> {
    util::read_json(path)
        .with_context(|| format!("Could not load region manifest {}", path.display()))
}

/// Loads the label manifest.
pub fn load_labels(path: &Path) -> Result<Vec<LabelEntry>> {
    util::read_json(path)
        .with_context(|| format!("Could not load label manifest {}", path.display()))
}

/// Accepts a JSON string or bare number and stores it as a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Accepts a JSON number, a numeric string, or null.
fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }

            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("`{s}` is not a number")))
        }
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a number, found {other}"
        ))),
    }
}
