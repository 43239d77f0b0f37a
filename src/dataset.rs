#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The assembled benchmark dataset: one record per exam question, tying the
//! cropped question image to its category, type, and ground-truth answer.

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{manifest::LabelEntry, paths::DatasetPaths, util};

/// Exam tracks the benchmark covers, in report order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Korean elementary school GED.
    KoEGED,
    /// Korean middle school GED.
    KoMGED,
    /// Korean high school GED.
    KoHGED,
    /// Korean college scholastic ability test.
    KoCSAT,
}

impl Category {
    /// Every category, in the order score reports list them.
    pub const ALL: [Category; 4] = [
        Category::KoEGED,
        Category::KoMGED,
        Category::KoHGED,
        Category::KoCSAT,
    ];

    /// The category's canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::KoEGED => "KoEGED",
            Category::KoMGED => "KoMGED",
            Category::KoHGED => "KoHGED",
            Category::KoCSAT => "KoCSAT",
        }
    }

    /// Position in [`Category::ALL`], used to index per-category tallies.
    pub(crate) fn index(&self) -> usize {
        match self {
            Category::KoEGED => 0,
            Category::KoMGED => 1,
            Category::KoHGED => 2,
            Category::KoCSAT => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "koeged" => Ok(Category::KoEGED),
            "komged" => Ok(Category::KoMGED),
            "kohged" => Ok(Category::KoHGED),
            "kocsat" => Ok(Category::KoCSAT),
            _ => Err(format!(
                "unknown category `{s}`, expected one of KoEGED, KoMGED, KoHGED, KoCSAT"
            )),
        }
    }
}

/// A question type named in a label manifest that the benchmark does not
/// know about. Treated as fatal: a bad type means the manifest itself is
/// broken, not just one entry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown question type `{0}`, expected one of multiple_choice, short_answer, listening")]
pub struct UnknownQuestionType(pub String);

/// How a question is answered, which decides how submissions are matched.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum QuestionKind {
    /// Numbered options; answers are option indices in some notation.
    MultipleChoice,
    /// Free-form text or numeric answer.
    ShortAnswer,
    /// Audio-based question; graded as correct since no audio is shown.
    Listening,
}

impl QuestionKind {
    /// The kind's canonical manifest spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::Listening => "listening",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = UnknownQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple_choice" | "multiple-choice" => Ok(QuestionKind::MultipleChoice),
            "short_answer" | "short-answer" => Ok(QuestionKind::ShortAnswer),
            "listening" => Ok(QuestionKind::Listening),
            _ => Err(UnknownQuestionType(s.to_string())),
        }
    }
}

impl TryFrom<String> for QuestionKind {
    type Error = UnknownQuestionType;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One fully assembled benchmark question.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    /// Stable question id, shared with the manifests and submissions.
    pub id: String,

    /// Exam track the question counts toward.
    pub category: Category,

    /// How submissions to this question are matched.
    pub kind: QuestionKind,

    /// Ground-truth answer.
    pub answer: String,

    /// Cropped question image, relative to the workspace root.
    pub image: PathBuf,

    /// Score weight, when the exam assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<f64>,

    /// Free-form annotation from the label manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The assembled dataset, in label-manifest order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Every question that passed integrity checks.
    pub questions: Vec<Question>,
}

impl Dataset {
    /// Number of questions in the dataset.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the dataset holds no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Writes the dataset to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        util::write_json_pretty(path, self)
    }

    /// Loads a previously assembled dataset from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        util::read_json(path).with_context(|| {
            format!(
                "Could not load dataset {} (run `konet generate` first)",
                path.display()
            )
        })
    }
}

/// Why one label entry could not become a dataset question.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The cropped image for the question does not exist on disk.
    #[error("question `{id}`: cropped image {} is missing", .path.display())]
    MissingAsset {
        /// Question id from the label entry.
        id:   String,
        /// Where the image was expected.
        path: PathBuf,
    },
    /// The label entry itself is malformed.
    #[error("label entry {index}: {reason}")]
    Manifest {
        /// Zero-based position in the label manifest.
        index:  usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// What assembly produced: the usable dataset plus every entry it skipped.
#[derive(Debug)]
pub struct AssembleOutcome {
    /// Questions that passed every check, in manifest order.
    pub dataset:  Dataset,
    /// Entries that were skipped, with the reason for each.
    pub failures: Vec<DatasetError>,
}

/// Builds dataset records from label entries, checking that every referenced
/// question image exists.
///
/// Entry-level problems (missing image, bad category, blank fields, repeated
/// ids) skip the entry and continue; an unknown question type aborts because
/// it means the manifest is from an incompatible source.
pub fn assemble(labels: &[LabelEntry], paths: &DatasetPaths) -> Result<AssembleOutcome> {
    let mut questions = Vec::with_capacity(labels.len());
    let mut failures = Vec::new();
    let mut seen = HashSet::with_capacity(labels.len());

    for (index, entry) in labels.iter().enumerate() {
        let kind = QuestionKind::from_str(&entry.kind)?;

        // A repeated id would grade one submitted answer twice; the first
        // occurrence wins.
        let checked = if seen.contains(entry.id.as_str()) {
            Err(DatasetError::Manifest {
                index,
                reason: format!("duplicate question id `{}`", entry.id),
            })
        } else {
            assemble_entry(index, entry, kind, paths)
        };

        match checked {
            Ok(question) => {
                seen.insert(question.id.clone());
                questions.push(question);
            }
            Err(e) => {
                tracing::warn!("Skipping label entry {index}: {e}");
                failures.push(e);
            }
        }
    }

    Ok(AssembleOutcome {
        dataset: Dataset { questions },
        failures,
    })
}

/// Checks and converts a single label entry.
fn assemble_entry(
    index: usize,
    entry: &LabelEntry,
    kind: QuestionKind,
    paths: &DatasetPaths,
) -> Result<Question, DatasetError> {
    if entry.id.trim().is_empty() {
        return Err(DatasetError::Manifest {
            index,
            reason: "blank question id".to_string(),
        });
    }

    if entry.answer.trim().is_empty() {
        return Err(DatasetError::Manifest {
            index,
            reason: format!("question `{}` has a blank ground-truth answer", entry.id),
        });
    }

    let category = entry
        .category
        .parse::<Category>()
        .map_err(|reason| DatasetError::Manifest { index, reason })?;

    let image = paths.question_image(&entry.id);
    if !image.exists() {
        return Err(DatasetError::MissingAsset {
            id:   entry.id.clone(),
            path: image,
        });
    }

    // Stored relative to the root so the workspace can be moved wholesale.
    let image = image
        .strip_prefix(paths.root_dir())
        .map(Path::to_path_buf)
        .unwrap_or(image);

    Ok(Question {
        id: entry.id.clone(),
        category,
        kind,
        answer: entry.answer.clone(),
        image,
        point: entry.point,
        note: entry.note.clone(),
    })
}
