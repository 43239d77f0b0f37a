#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Score aggregation and the two human-readable renderings of it: the
//! plain-text block and the category table.

use std::{collections::BTreeMap, fmt};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use super::Verdict;
use crate::dataset::Category;

/// Correct and total counts for one slice of the dataset.
///
/// Serialized field names match the published score block, so output files
/// stay comparable across implementations.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Questions answered correctly.
    #[serde(rename = "acc")]
    pub correct: usize,
    /// Questions graded.
    #[serde(rename = "cnt")]
    pub total:   usize,
}

impl Tally {
    /// Fraction correct, or `None` when nothing was graded.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| self.correct as f64 / self.total as f64)
    }

    /// Adds one graded question.
    fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accuracy() {
            Some(fraction) => write!(
                f,
                "{:.2}% ({}/{})",
                fraction * 100.0,
                self.correct,
                self.total
            ),
            None => write!(f, "N/A ({}/{})", self.correct, self.total),
        }
    }
}

/// Aggregated scores for one evaluation run.
#[derive(Debug, Clone)]
pub struct Report {
    /// Per-category tallies, indexed by [`Category::index`].
    tallies:   [Tally; 4],
    /// Submission ids that matched no dataset question, sorted.
    unmatched: Vec<String>,
}

impl Report {
    /// Aggregates verdicts into per-category tallies.
    pub fn new(verdicts: &[Verdict], unmatched: Vec<String>) -> Self {
        let mut tallies = [Tally::default(); 4];
        for verdict in verdicts {
            tallies[verdict.category.index()].record(verdict.correct);
        }

        Self { tallies, unmatched }
    }

    /// Tally for one category.
    pub fn category(&self, category: Category) -> Tally {
        self.tallies[category.index()]
    }

    /// Tally across every category.
    pub fn overall(&self) -> Tally {
        let mut overall = Tally::default();
        for tally in &self.tallies {
            overall.correct += tally.correct;
            overall.total += tally.total;
        }

        overall
    }

    /// Submission ids that matched no dataset question.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    /// Per-category tallies keyed by category name, as written to the
    /// output file's score block.
    pub fn scores(&self) -> BTreeMap<String, Tally> {
        Category::ALL
            .iter()
            .map(|category| (category.to_string(), self.category(*category)))
            .collect()
    }

    /// Renders the plain-text score block: one line per category, then the
    /// overall KoNET line.
    pub fn render(&self) -> String {
        let rule = "=".repeat(30);
        let mut lines = vec![rule.clone()];

        for category in Category::ALL {
            lines.push(format!("{category} Acc: {}", self.category(category)));
        }
        lines.push(format!("KoNET Acc: {}", self.overall()));

        if !self.unmatched.is_empty() {
            lines.push(format!(
                "Unmatched submission ids ({}): {}",
                self.unmatched.len(),
                self.unmatched.iter().join(", ")
            ));
        }
        lines.push(rule);

        lines.join("\n")
    }

    /// Renders the category table shown after an evaluation.
    pub fn table(&self) -> String {
        let rows = Category::ALL
            .iter()
            .map(|category| CategoryRow::new(*category, self.category(*category)))
            .collect::<Vec<_>>();

        Table::new(&rows)
            .with(Panel::header("Evaluation Overview"))
            .with(Panel::footer(format!("KoNET: {}", self.overall())))
            .with(Modify::new(Rows::new(1..)).with(Width::wrap(24).keep_words(true)))
            .with(
                Modify::new(Rows::first())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(
                Modify::new(Rows::last())
                    .with(Alignment::center())
                    .with(Alignment::center_vertical()),
            )
            .with(Style::modern())
            .to_string()
    }
}

/// One row of the category table.
#[derive(Tabled)]
struct CategoryRow {
    /// Category name.
    #[tabled(rename = "Category")]
    category: &'static str,
    /// Correct count.
    #[tabled(rename = "Correct")]
    correct:  usize,
    /// Graded count.
    #[tabled(rename = "Total")]
    total:    usize,
    /// Formatted accuracy.
    #[tabled(rename = "Accuracy")]
    accuracy: String,
}

impl CategoryRow {
    /// Builds a row from one category's tally.
    fn new(category: Category, tally: Tally) -> Self {
        let accuracy = match tally.accuracy() {
            Some(fraction) => format!("{:.2}%", fraction * 100.0),
            None => "N/A".to_string(),
        };

        Self {
            category: category.as_str(),
            correct: tally.correct,
            total: tally.total,
            accuracy,
        }
    }
}
