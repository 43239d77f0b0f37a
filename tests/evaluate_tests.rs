use std::{fs, path::PathBuf};

use konet::{
    dataset::{Category, Dataset, Question, QuestionKind},
    eval::{self, EvalOptions, report::Tally, submission::Submission},
    paths::DatasetPaths,
};
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("konet-eval-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn question(id: &str, category: Category, kind: QuestionKind, answer: &str) -> Question {
    Question {
        id: id.to_string(),
        category,
        kind,
        answer: answer.to_string(),
        image: PathBuf::from("images_problem").join(format!("{id}.png")),
        point: None,
        note: None,
    }
}

fn sample_dataset() -> Dataset {
    Dataset {
        questions: vec![
            question("q1", Category::KoEGED, QuestionKind::MultipleChoice, "A"),
            question("q2", Category::KoMGED, QuestionKind::ShortAnswer, "7"),
            question("q3", Category::KoHGED, QuestionKind::ShortAnswer, "Seoul"),
            question("q4", Category::KoCSAT, QuestionKind::Listening, "2"),
        ],
    }
}

fn options_in(root: &PathBuf) -> EvalOptions {
    EvalOptions::builder()
        .output(root.join("evaluation_output.json"))
        .build()
}

#[tokio::test]
async fn fully_correct_submission_scores_everywhere() {
    let root = temp_root();
    let paths = DatasetPaths::new(root.clone());
    let dataset = sample_dataset();

    let submission_file = root.join("submission.json");
    fs::write(
        &submission_file,
        r#"{"q1": "1", "q2": "7.0", "q3": " seoul ", "q4": "no idea"}"#,
    )
    .expect("write submission");
    let submission = Submission::load(&submission_file).expect("load submission");

    let report = eval::evaluate(&dataset, &submission, &paths, &options_in(&root))
        .await
        .expect("evaluate");

    for category in Category::ALL {
        assert_eq!(
            report.category(category),
            Tally {
                correct: 1,
                total:   1,
            }
        );
    }
    assert_eq!(
        report.overall(),
        Tally {
            correct: 4,
            total:   4,
        }
    );
    assert!(report.unmatched().is_empty());

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn missing_answers_count_toward_the_denominator() {
    let root = temp_root();
    let paths = DatasetPaths::new(root.clone());
    let dataset = sample_dataset();

    let submission = Submission::from_pairs([
        ("q1".to_string(), "1".to_string()),
        ("q2".to_string(), "7".to_string()),
        ("q4".to_string(), "x".to_string()),
    ]);

    let report = eval::evaluate(&dataset, &submission, &paths, &options_in(&root))
        .await
        .expect("evaluate");

    assert_eq!(
        report.overall(),
        Tally {
            correct: 3,
            total:   4,
        }
    );
    assert_eq!(
        report.category(Category::KoHGED),
        Tally {
            correct: 0,
            total:   1,
        }
    );

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn unanswered_listening_questions_are_incorrect() {
    let root = temp_root();
    let paths = DatasetPaths::new(root.clone());
    let dataset = Dataset {
        questions: vec![question(
            "q1",
            Category::KoEGED,
            QuestionKind::Listening,
            "3",
        )],
    };

    let report = eval::evaluate(&dataset, &Submission::default(), &paths, &options_in(&root))
        .await
        .expect("evaluate");

    assert_eq!(
        report.overall(),
        Tally {
            correct: 0,
            total:   1,
        }
    );

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn unmatched_submission_ids_are_reported_not_dropped() {
    let root = temp_root();
    let paths = DatasetPaths::new(root.clone());
    let dataset = sample_dataset();

    let submission = Submission::from_pairs([
        ("q1".to_string(), "1".to_string()),
        ("ghost".to_string(), "9".to_string()),
    ]);

    let report = eval::evaluate(&dataset, &submission, &paths, &options_in(&root))
        .await
        .expect("evaluate");

    assert_eq!(report.unmatched(), ["ghost"]);
    // The ghost answer must not inflate any tally.
    assert_eq!(report.overall().total, 4);

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn output_file_carries_scores_and_judgements() {
    let root = temp_root();
    let paths = DatasetPaths::new(root.clone());
    let dataset = sample_dataset();

    let submission = Submission::from_pairs([
        ("q1".to_string(), "1".to_string()),
        ("q2".to_string(), "8".to_string()),
        ("q4".to_string(), "x".to_string()),
    ]);

    eval::evaluate(&dataset, &submission, &paths, &options_in(&root))
        .await
        .expect("evaluate");

    let raw = fs::read_to_string(root.join("evaluation_output.json")).expect("read output");
    let output: serde_json::Value = serde_json::from_str(&raw).expect("parse output");

    assert_eq!(output["meta"]["KoEGED"]["acc"], 1);
    assert_eq!(output["meta"]["KoEGED"]["cnt"], 1);
    assert_eq!(output["meta"]["KoMGED"]["acc"], 0);
    assert_eq!(output["meta"]["KoCSAT"]["acc"], 1);

    let results = output["results"].as_array().expect("results array");
    assert_eq!(results.len(), 4);

    // Records stay in dataset order.
    let ids: Vec<&str> = results
        .iter()
        .map(|record| record["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, ["q1", "q2", "q3", "q4"]);

    assert_eq!(results[0]["judgement"], "Correct.");
    assert_eq!(results[1]["judgement"], "Incorrect.");
    assert_eq!(results[2]["judgement"], "No answer submitted.");
    assert!(results[2].get("response").is_none());
    assert_eq!(results[3]["judgement"], "Correct.");

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn empty_dataset_still_produces_a_report() {
    let root = temp_root();
    let paths = DatasetPaths::new(root.clone());

    let report = eval::evaluate(
        &Dataset::default(),
        &Submission::default(),
        &paths,
        &options_in(&root),
    )
    .await
    .expect("evaluate");

    assert_eq!(report.overall(), Tally::default());
    assert!(report.render().contains("KoNET Acc: N/A (0/0)"));

    let _ = fs::remove_dir_all(root);
}
