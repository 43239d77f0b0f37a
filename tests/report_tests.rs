use konet::{
    dataset::Category,
    eval::{
        Verdict,
        report::{Report, Tally},
    },
};

fn verdict(id: &str, category: Category, correct: bool) -> Verdict {
    Verdict {
        id: id.to_string(),
        category,
        correct,
        answer: "1".to_string(),
        response: Some("1".to_string()),
        judgement: if correct { "Correct." } else { "Incorrect." }.to_string(),
    }
}

#[test]
fn tallies_split_by_category() {
    let verdicts = vec![
        verdict("a", Category::KoEGED, true),
        verdict("b", Category::KoEGED, false),
        verdict("c", Category::KoCSAT, true),
    ];

    let report = Report::new(&verdicts, Vec::new());

    assert_eq!(
        report.category(Category::KoEGED),
        Tally {
            correct: 1,
            total:   2,
        }
    );
    assert_eq!(
        report.category(Category::KoCSAT),
        Tally {
            correct: 1,
            total:   1,
        }
    );
    assert_eq!(
        report.overall(),
        Tally {
            correct: 2,
            total:   3,
        }
    );
}

#[test]
fn empty_categories_render_not_applicable() {
    let report = Report::new(&[verdict("a", Category::KoCSAT, true)], Vec::new());

    let komged = report.category(Category::KoMGED);
    assert_eq!(komged.accuracy(), None);
    assert_eq!(komged.to_string(), "N/A (0/0)");
}

#[test]
fn score_lines_use_two_decimal_percentages() {
    let verdicts = vec![
        verdict("a", Category::KoHGED, true),
        verdict("b", Category::KoHGED, true),
        verdict("c", Category::KoHGED, false),
    ];

    let report = Report::new(&verdicts, Vec::new());

    assert_eq!(
        report.category(Category::KoHGED).to_string(),
        "66.67% (2/3)"
    );
}

#[test]
fn render_lists_every_category_then_the_overall_line() {
    let report = Report::new(&[verdict("a", Category::KoEGED, true)], Vec::new());
    let rendered = report.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "=".repeat(30));
    assert_eq!(lines[1], "KoEGED Acc: 100.00% (1/1)");
    assert_eq!(lines[2], "KoMGED Acc: N/A (0/0)");
    assert_eq!(lines[3], "KoHGED Acc: N/A (0/0)");
    assert_eq!(lines[4], "KoCSAT Acc: N/A (0/0)");
    assert_eq!(lines[5], "KoNET Acc: 100.00% (1/1)");
    assert_eq!(lines[6], "=".repeat(30));
    assert_eq!(lines.len(), 7);
}

#[test]
fn unmatched_ids_are_surfaced_in_the_render() {
    let report = Report::new(
        &[verdict("a", Category::KoEGED, true)],
        vec!["ghost_1".to_string(), "ghost_2".to_string()],
    );

    assert_eq!(report.unmatched(), ["ghost_1", "ghost_2"]);
    assert!(
        report
            .render()
            .contains("Unmatched submission ids (2): ghost_1, ghost_2")
    );
}

#[test]
fn scores_map_is_keyed_by_category_name() {
    let verdicts = vec![
        verdict("a", Category::KoMGED, true),
        verdict("b", Category::KoMGED, false),
    ];

    let scores = Report::new(&verdicts, Vec::new()).scores();

    assert_eq!(scores.len(), 4);
    assert_eq!(
        scores["KoMGED"],
        Tally {
            correct: 1,
            total:   2,
        }
    );
    assert_eq!(
        scores["KoCSAT"],
        Tally {
            correct: 0,
            total:   0,
        }
    );
}

#[test]
fn table_includes_every_category_and_the_overall_footer() {
    let report = Report::new(&[verdict("a", Category::KoCSAT, true)], Vec::new());
    let table = report.table();

    for category in Category::ALL {
        assert!(table.contains(category.as_str()));
    }
    assert!(table.contains("KoNET: 100.00% (1/1)"));
}
