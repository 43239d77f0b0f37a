use konet::{dataset::QuestionKind, eval::matcher};

#[test]
fn choice_notations_name_the_same_option() {
    let kind = QuestionKind::MultipleChoice;

    assert!(kind.matches("2", "2"));
    assert!(kind.matches("2", "B"));
    assert!(kind.matches("2", "b"));
    assert!(kind.matches("2", "②"));
    assert!(kind.matches("2", "２"));
    assert!(kind.matches("②", "B"));
    assert!(kind.matches("2", " 02 "));
}

#[test]
fn choice_mismatches_are_rejected() {
    let kind = QuestionKind::MultipleChoice;

    assert!(!kind.matches("2", "3"));
    assert!(!kind.matches("2", "C"));
    assert!(!kind.matches("2", "③"));
    assert!(!kind.matches("1", ""));
}

#[test]
fn free_text_options_fall_back_to_string_comparison() {
    let kind = QuestionKind::MultipleChoice;

    assert!(kind.matches("모두 정답", "모두  정답"));
    assert!(!kind.matches("모두 정답", "4"));
}

#[test]
fn numeric_short_answers_compare_as_numbers() {
    let kind = QuestionKind::ShortAnswer;

    assert!(kind.matches("3", "3.0"));
    assert!(kind.matches("3", "03"));
    assert!(kind.matches("3", " 3 "));
    assert!(kind.matches("-12.5", "-12.50"));
    assert!(!kind.matches("3", "three"));
    assert!(!kind.matches("3", "4"));
}

#[test]
fn text_short_answers_fold_case_and_whitespace() {
    let kind = QuestionKind::ShortAnswer;

    assert!(kind.matches("Seoul", "seoul"));
    assert!(kind.matches("han river", "Han  River"));
    assert!(kind.matches("  서울  ", "서울"));
    assert!(!kind.matches("Seoul", "Busan"));
}

#[test]
fn listening_accepts_anything() {
    let kind = QuestionKind::Listening;

    assert!(kind.matches("3", "1"));
    assert!(kind.matches("3", ""));
    assert!(kind.matches("3", "no idea"));
}

#[test]
fn choice_index_recognizes_the_documented_notations() {
    assert_eq!(matcher::choice_index("1"), Some(1));
    assert_eq!(matcher::choice_index("05"), Some(5));
    assert_eq!(matcher::choice_index("A"), Some(1));
    assert_eq!(matcher::choice_index("e"), Some(5));
    assert_eq!(matcher::choice_index("③"), Some(3));
    assert_eq!(matcher::choice_index("４"), Some(4));

    assert_eq!(matcher::choice_index("0"), None);
    assert_eq!(matcher::choice_index("F"), None);
    assert_eq!(matcher::choice_index("AB"), None);
    assert_eq!(matcher::choice_index(""), None);
    assert_eq!(matcher::choice_index("정답"), None);
}

#[test]
fn numeric_rejects_non_finite_values() {
    assert_eq!(matcher::numeric("3.5"), Some(3.5));
    assert_eq!(matcher::numeric("inf"), None);
    assert_eq!(matcher::numeric("NaN"), None);
    assert_eq!(matcher::numeric("abc"), None);
}

#[test]
fn canonical_folds_case_and_whitespace() {
    assert_eq!(matcher::canonical("  Han\t River \n"), "han river");
    assert_eq!(matcher::canonical("SEOUL"), "seoul");
}
