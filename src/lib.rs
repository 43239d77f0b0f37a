#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # konet
//!
//! Tooling for the KoNET benchmark: builds a multimodal question-answering
//! dataset out of Korean national exam PDFs, and grades submissions against
//! it with per-category accuracy reports.

/// Judge credentials read from the environment
pub mod config;
/// Extraction of per-question images from rasterized pages
pub mod crop;
/// Dataset records and the assembler that builds them
pub mod dataset;
/// The evaluation pipeline: submissions, matching, judging, reporting
pub mod eval;
/// Manifest-driven download of exam source files
pub mod fetch;
/// The generation pipeline, download through assembled dataset
pub mod generate;
/// Typed views of the input manifests
pub mod manifest;
/// Filesystem layout of a data workspace
pub mod paths;
/// PDF page rasterization
pub mod render;
/// Utility functions for convenience
pub mod util;
