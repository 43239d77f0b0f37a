use std::{fs, path::PathBuf};

use konet::paths::DatasetPaths;
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("konet-paths-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

#[test]
fn dataset_paths_defaults_are_consistent() {
    let root = temp_root();

    let via_new = DatasetPaths::new(root.clone());
    let via_parts = DatasetPaths::from_parts(root.clone(), None, None, None, None);

    let snapshot = |p: &DatasetPaths| {
        (
            p.root_dir().to_path_buf(),
            p.figures_dir().to_path_buf(),
            p.pages_dir().to_path_buf(),
            p.questions_dir().to_path_buf(),
            p.manifests_dir().to_path_buf(),
        )
    };

    assert_eq!(snapshot(&via_new), snapshot(&via_parts));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn derived_file_paths_follow_the_layout() {
    let root = temp_root();
    let paths = DatasetPaths::new(root.clone());

    assert_eq!(
        paths.sources_file(),
        root.join("manifests").join("sources.json")
    );
    assert_eq!(
        paths.regions_file(),
        root.join("manifests").join("regions.json")
    );
    assert_eq!(
        paths.labels_file(),
        root.join("manifests").join("labels.json")
    );
    assert_eq!(paths.dataset_file(), root.join("dataset.json"));
    assert_eq!(
        paths.question_image("kocsat_2024_01"),
        root.join("images_problem").join("kocsat_2024_01.png")
    );

    let _ = fs::remove_dir_all(root);
}

#[test]
fn ensure_generated_dirs_creates_the_stage_outputs() {
    let root = temp_root();
    let paths = DatasetPaths::new(root.clone());

    paths.ensure_generated_dirs().expect("create dirs");
    assert!(paths.figures_dir().is_dir());
    assert!(paths.pages_dir().is_dir());
    assert!(paths.questions_dir().is_dir());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn overrides_replace_only_their_directory() {
    let root = temp_root();
    let custom = root.join("elsewhere");

    let paths = DatasetPaths::from_parts(root.clone(), None, Some(custom.clone()), None, None);
    assert_eq!(paths.pages_dir(), custom.as_path());
    assert_eq!(paths.figures_dir(), root.join("figures").as_path());

    let _ = fs::remove_dir_all(root);
}
