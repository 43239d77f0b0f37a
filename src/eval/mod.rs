#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The evaluation pipeline: load a submission, grade every dataset question,
//! aggregate per-category scores, and write the per-question judgements out.
//!
//! Grading is total: every question in the dataset contributes to its
//! category's denominator, whether or not the submission answered it.
//! Partial or malformed-in-places submissions therefore lower the score
//! instead of aborting the run.

pub mod judge;
pub mod matcher;
pub mod report;
pub mod submission;

use std::{
    collections::{BTreeMap, HashSet},
    path::PathBuf,
    str::FromStr,
};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use self::{
    judge::{ApiJudge, CORRECT_REPLY, INCORRECT_REPLY},
    report::{Report, Tally},
    submission::Submission,
};
use crate::{
    config::JudgeConfig,
    dataset::{Category, Dataset, Question, QuestionKind},
    paths::DatasetPaths,
    util,
};

/// Judgement recorded for a question the submission left unanswered.
const NO_ANSWER: &str = "No answer submitted.";

/// Which comparator grades non-listening questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JudgeMode {
    /// Deterministic matching; no network, no credentials.
    #[default]
    Rules,
    /// A vision model compares the answers; needs credentials.
    Api,
}

impl FromStr for JudgeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rules" => Ok(JudgeMode::Rules),
            "api" => Ok(JudgeMode::Api),
            _ => Err(format!("unknown judge mode `{s}`, expected `rules` or `api`")),
        }
    }
}

/// The grading outcome for one question.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Question id.
    pub id: String,

    /// Category the question counts toward.
    pub category: Category,

    /// Whether the submission was accepted.
    pub correct: bool,

    /// Ground-truth answer, echoed for the record.
    pub answer: String,

    /// The submitted answer, when one was present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Raw judgement: `Correct.`, `Incorrect.`, a judge error message, or
    /// the no-answer marker.
    pub judgement: String,
}

/// Options for one evaluation run.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[builder(doc)]
pub struct EvalOptions {
    /// Where the per-question judgements and score block are written.
    #[builder(default = PathBuf::from("evaluation_output.json"))]
    pub output: PathBuf,

    /// Comparator for non-listening questions.
    pub mode: JudgeMode,

    /// Judge credentials; required when `mode` is [`JudgeMode::Api`].
    pub judge: Option<JudgeConfig>,
}

/// Shape of the evaluation output file.
#[derive(Serialize, Debug)]
struct EvalOutput<'a> {
    /// Per-category score block, keyed by category name.
    meta:    BTreeMap<String, Tally>,
    /// Per-question judgements, in dataset order.
    results: &'a [Verdict],
}

/// Grades `submission` against `dataset`, writes the output file, and
/// returns the aggregated report.
pub async fn evaluate(
    dataset: &Dataset,
    submission: &Submission,
    paths: &DatasetPaths,
    options: &EvalOptions,
) -> Result<Report> {
    let api_judge = match options.mode {
        JudgeMode::Api => {
            let config = options
                .judge
                .as_ref()
                .context("API judging requested without judge credentials")?;
            Some(ApiJudge::new(config))
        }
        JudgeMode::Rules => None,
    };

    let total = dataset.len();
    let mut verdicts = Vec::with_capacity(total);

    for (index, question) in dataset.questions.iter().enumerate() {
        let verdict = match (submission.get(&question.id), &api_judge) {
            (None, _) => verdict_for(question, false, NO_ANSWER.to_string(), None),
            (Some(submitted), None) => {
                let correct = question.kind.matches(&question.answer, submitted);
                let judgement = if correct {
                    CORRECT_REPLY
                } else {
                    INCORRECT_REPLY
                };
                verdict_for(question, correct, judgement.to_string(), Some(submitted))
            }
            (Some(submitted), Some(judge)) => {
                // Listening questions are auto-passed without a request,
                // same as under the rules comparator.
                if question.kind == QuestionKind::Listening {
                    verdict_for(question, true, CORRECT_REPLY.to_string(), Some(submitted))
                } else {
                    tracing::info!("[{}/{}] Judging {}", index + 1, total, question.id);
                    let image = paths.root_dir().join(&question.image);
                    match judge.judge(question, submitted, &image).await {
                        Ok(reply) => {
                            let correct = reply.trim() == CORRECT_REPLY;
                            verdict_for(question, correct, reply, Some(submitted))
                        }
                        // A failed request grades this one question as
                        // incorrect; the run keeps going.
                        Err(e) => {
                            tracing::warn!("Judge request for {} failed: {e:#}", question.id);
                            verdict_for(question, false, format!("{e:#}"), Some(submitted))
                        }
                    }
                }
            }
        };
        verdicts.push(verdict);
    }

    let known = dataset
        .questions
        .iter()
        .map(|q| q.id.as_str())
        .collect::<HashSet<_>>();
    let unmatched = submission
        .ids()
        .filter(|id| !known.contains(id))
        .map(str::to_string)
        .collect::<Vec<_>>();
    if !unmatched.is_empty() {
        tracing::warn!(
            "{} submission ids matched no question: {}",
            unmatched.len(),
            unmatched.iter().join(", ")
        );
    }

    let report = Report::new(&verdicts, unmatched);

    util::write_json_pretty(
        &options.output,
        &EvalOutput {
            meta:    report.scores(),
            results: &verdicts,
        },
    )?;
    tracing::info!(
        "Wrote {} judgements to {}",
        verdicts.len(),
        options.output.display()
    );

    Ok(report)
}

/// Assembles one verdict record for `question`.
fn verdict_for(
    question: &Question,
    correct: bool,
    judgement: String,
    response: Option<&str>,
) -> Verdict {
    Verdict {
        id: question.id.clone(),
        category: question.category,
        correct,
        answer: question.answer.clone(),
        response: response.map(str::to_string),
        judgement,
    }
}
