use std::{fs, path::PathBuf};

use konet::{
    fetch::{self, FetchOutcome},
    manifest::SourceEntry,
};
use uuid::Uuid;

fn temp_figures_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("konet-fetch-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create figures dir");
    dir
}

fn source(url: &str, file: &str) -> SourceEntry {
    SourceEntry {
        url:  url.to_string(),
        file: file.to_string(),
    }
}

#[tokio::test]
async fn existing_files_are_skipped_without_a_request() {
    let figures_dir = temp_figures_dir();
    let target = figures_dir.join("kocsat_2024.pdf");
    fs::write(&target, b"already here").expect("write existing file");

    // The URL cannot even parse, so a skip outcome means no request was
    // attempted for it.
    let sources = vec![source("not a url", "kocsat_2024.pdf")];
    let outcomes = fetch::fetch_all(&sources, &figures_dir, 2)
        .await
        .expect("fetch batch");

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(&outcomes[0], FetchOutcome::Skipped(path) if path == &target));
    assert_eq!(fs::read(&target).expect("read file"), b"already here");

    let _ = fs::remove_dir_all(figures_dir);
}

#[tokio::test]
async fn a_failed_download_does_not_abort_the_batch() {
    let figures_dir = temp_figures_dir();
    let existing = figures_dir.join("koeged_2023.pdf");
    fs::write(&existing, b"kept").expect("write existing file");

    let sources = vec![
        source("not a url", "broken.pdf"),
        source("also not a url", "koeged_2023.pdf"),
    ];
    let outcomes = fetch::fetch_all(&sources, &figures_dir, 2)
        .await
        .expect("fetch batch");

    assert_eq!(outcomes.len(), 2);
    assert!(
        outcomes
            .iter()
            .any(|o| matches!(o, FetchOutcome::Failed { file, .. } if file == "broken.pdf"))
    );
    assert!(
        outcomes
            .iter()
            .any(|o| matches!(o, FetchOutcome::Skipped(path) if path == &existing))
    );
    assert!(!figures_dir.join("broken.pdf").exists());
    assert_eq!(fs::read(&existing).expect("read file"), b"kept");

    let _ = fs::remove_dir_all(figures_dir);
}
