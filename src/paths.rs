#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Central structs for all filesystem paths inside a benchmark data
//! workspace.
//!
//! Every stage of the pipeline resolves its inputs and outputs through
//! [`DatasetPaths`] so that path layout decisions live in one place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Holds every directory the generator and evaluator touch inside one
/// data workspace.
pub struct DatasetPaths {
    /// Workspace root; all other directories default to children of it.
    root_dir:      PathBuf,
    /// Where downloaded exam source files (PDFs) land.
    figures_dir:   PathBuf,
    /// Where rasterized page images land.
    pages_dir:     PathBuf,
    /// Where cropped per-question images land.
    questions_dir: PathBuf,
    /// Where the input manifests live.
    manifests_dir: PathBuf,
}

impl DatasetPaths {
    /// Creates a layout rooted at `root_dir` with the default directory
    /// names for everything else.
    pub fn new(root_dir: PathBuf) -> Self {
        Self::build_with_defaults(root_dir, None, None, None, None)
    }

    /// Creates a layout with explicit overrides; `None` falls back to the
    /// default child of `root_dir`.
    pub fn from_parts(
        root_dir: PathBuf,
        figures_dir: Option<PathBuf>,
        pages_dir: Option<PathBuf>,
        questions_dir: Option<PathBuf>,
        manifests_dir: Option<PathBuf>,
    ) -> Self {
        Self::build_with_defaults(root_dir, figures_dir, pages_dir, questions_dir, manifests_dir)
    }
}

impl DatasetPaths {
    /// Resolves any missing directory to its default location under
    /// `root_dir`.
    fn build_with_defaults(
        root_dir: PathBuf,
        figures_dir: Option<PathBuf>,
        pages_dir: Option<PathBuf>,
        questions_dir: Option<PathBuf>,
        manifests_dir: Option<PathBuf>,
    ) -> Self {
        let figures_dir = figures_dir.unwrap_or_else(|| root_dir.join("figures"));
        let pages_dir = pages_dir.unwrap_or_else(|| root_dir.join("images"));
        let questions_dir = questions_dir.unwrap_or_else(|| root_dir.join("images_problem"));
        let manifests_dir = manifests_dir.unwrap_or_else(|| root_dir.join("manifests"));

        Self {
            root_dir,
            figures_dir,
            pages_dir,
            questions_dir,
            manifests_dir,
        }
    }

    /// Returns the workspace root.
    pub fn root_dir(&self) -> &Path {
        self.root_dir.as_path()
    }

    /// Returns the exam source (PDF) directory.
    pub fn figures_dir(&self) -> &Path {
        self.figures_dir.as_path()
    }

    /// Returns the rasterized page image directory.
    pub fn pages_dir(&self) -> &Path {
        self.pages_dir.as_path()
    }

    /// Returns the per-question image directory.
    pub fn questions_dir(&self) -> &Path {
        self.questions_dir.as_path()
    }

    /// Returns the manifest directory.
    pub fn manifests_dir(&self) -> &Path {
        self.manifests_dir.as_path()
    }

    /// Path of the source manifest (`manifests/sources.json`).
    pub fn sources_file(&self) -> PathBuf {
        self.manifests_dir.join("sources.json")
    }

    /// Path of the region manifest (`manifests/regions.json`).
    pub fn regions_file(&self) -> PathBuf {
        self.manifests_dir.join("regions.json")
    }

    /// Path of the label manifest (`manifests/labels.json`).
    pub fn labels_file(&self) -> PathBuf {
        self.manifests_dir.join("labels.json")
    }

    /// Path of the assembled dataset file (`dataset.json`).
    pub fn dataset_file(&self) -> PathBuf {
        self.root_dir.join("dataset.json")
    }

    /// Path of the cropped image for question `id`.
    pub fn question_image(&self, id: &str) -> PathBuf {
        self.questions_dir.join(format!("{id}.png"))
    }

    /// Creates the generated-output directories if they do not exist yet.
    pub fn ensure_generated_dirs(&self) -> Result<()> {
        for dir in [&self.figures_dir, &self.pages_dir, &self.questions_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create {}", dir.display()))?;
        }

        Ok(())
    }
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self::new(PathBuf::from("data"))
    }
}
