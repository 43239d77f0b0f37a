#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Loading of submission files.
//!
//! Two layouts are accepted: the plain mapping form `{"id": "answer", ...}`
//! and the record-array form `[{"id": ..., "response": ...}, ...]` that
//! older harnesses emit. Both normalize to the same [`Submission`].

use std::{collections::BTreeMap, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::util;

/// One record in the array-form submission layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEntry {
    /// Question id the answer belongs to.
    pub id:       String,
    /// The submitted answer; `null` means the question was left blank.
    #[serde(default)]
    pub response: Option<String>,
}

/// The two accepted submission file layouts.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum SubmissionFile {
    /// `{"id": "answer", ...}`
    Map(BTreeMap<String, Option<String>>),
    /// `[{"id": ..., "response": ...}, ...]`
    Entries(Vec<SubmissionEntry>),
}

/// A parsed submission: question id to submitted answer.
///
/// Questions the submission never mentions, and entries whose answer was
/// `null`, are simply absent here; the evaluator counts them as incorrect
/// rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Answers keyed by question id.
    answers: BTreeMap<String, String>,
}

impl Submission {
    /// Reads a submission file in either accepted layout.
    pub fn load(path: &Path) -> Result<Self> {
        let file: SubmissionFile = util::read_json(path)?;

        Ok(match file {
            SubmissionFile::Map(map) => Self {
                answers: map
                    .into_iter()
                    .filter_map(|(id, response)| response.map(|r| (id, r)))
                    .collect(),
            },
            SubmissionFile::Entries(entries) => {
                let mut answers = BTreeMap::new();
                for entry in entries {
                    let Some(response) = entry.response else {
                        continue;
                    };
                    if answers.insert(entry.id.clone(), response).is_some() {
                        tracing::warn!(
                            "Duplicate submission entry for `{}`; keeping the last one",
                            entry.id
                        );
                    }
                }

                Self { answers }
            }
        })
    }

    /// Builds a submission from in-memory pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            answers: pairs.into_iter().collect(),
        }
    }

    /// The submitted answer for `id`, when one was given.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.answers.get(id).map(String::as_str)
    }

    /// Every submitted question id, in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.answers.keys().map(String::as_str)
    }

    /// Number of answered questions.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Whether the submission answers nothing.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}
