use dupesweep::actions::{resolve_dir, Quarantine, RelocateError};
use dupesweep::duplicates::DuplicatePair;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn pair_for(duplicate: &Path, original: &Path) -> DuplicatePair {
    DuplicatePair {
        duplicate: duplicate.to_path_buf(),
        original: original.to_path_buf(),
        hash: [0u8; 32],
        size: fs::metadata(duplicate).map(|m| m.len()).unwrap_or(0),
    }
}

#[test]
fn test_collision_suffixes_count_up() {
    let dir = tempdir().unwrap();
    let quarantine_dir = dir.path().join("duplicates");
    fs::create_dir(&quarantine_dir).unwrap();
    fs::write(quarantine_dir.join("report.txt"), "old").unwrap();

    let mut quarantine = Quarantine::new(&quarantine_dir);
    let mut destinations = Vec::new();
    for i in 0..2 {
        let sub = dir.path().join(format!("d{i}"));
        fs::create_dir(&sub).unwrap();
        let file = sub.join("report.txt");
        fs::write(&file, format!("copy {i}")).unwrap();

        let moved = quarantine
            .relocate(&pair_for(&file, &dir.path().join("report.txt")))
            .unwrap();
        destinations.push(moved.destination);
    }

    assert_eq!(
        destinations,
        vec![
            quarantine_dir.join("report_1.txt"),
            quarantine_dir.join("report_2.txt")
        ]
    );
    assert_eq!(fs::read_to_string(quarantine_dir.join("report.txt")).unwrap(), "old");
    assert_eq!(
        fs::read_to_string(quarantine_dir.join("report_2.txt")).unwrap(),
        "copy 1"
    );
}

#[test]
fn test_suffix_goes_before_last_extension() {
    let dir = tempdir().unwrap();
    let quarantine_dir = dir.path().join("q");
    fs::create_dir(&quarantine_dir).unwrap();
    fs::write(quarantine_dir.join("archive.tar.gz"), "").unwrap();
    fs::write(quarantine_dir.join("README"), "").unwrap();

    let quarantine = Quarantine::new(&quarantine_dir);

    assert_eq!(
        quarantine
            .unique_destination(OsStr::new("archive.tar.gz"))
            .unwrap(),
        quarantine_dir.join("archive.tar_1.gz")
    );
    assert_eq!(
        quarantine.unique_destination(OsStr::new("README")).unwrap(),
        quarantine_dir.join("README_1")
    );
}

#[test]
fn test_bounded_suffix_is_exhausted() {
    let dir = tempdir().unwrap();
    let quarantine_dir = dir.path().join("q");
    fs::create_dir(&quarantine_dir).unwrap();
    for name in ["x.txt", "x_1.txt", "x_2.txt"] {
        fs::write(quarantine_dir.join(name), "").unwrap();
    }
    let source = dir.path().join("x.txt");
    fs::write(&source, "payload").unwrap();

    let mut quarantine = Quarantine::new(&quarantine_dir).with_max_suffix(2);
    let err = quarantine
        .relocate(&pair_for(&source, &dir.path().join("other.txt")))
        .unwrap_err();

    assert!(matches!(
        err,
        RelocateError::NameCollisionExhausted { max_suffix: 2, .. }
    ));
    assert!(source.exists());
}

#[test]
fn test_dry_run_plans_distinct_names_without_moving() {
    let dir = tempdir().unwrap();
    let quarantine_dir = dir.path().join("duplicates");
    let first = dir.path().join("a/same.txt");
    let second = dir.path().join("b/same.txt");
    for file in [&first, &second] {
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, "z").unwrap();
    }

    let mut quarantine = Quarantine::new(&quarantine_dir).with_dry_run(true);
    quarantine.ensure_exists().unwrap();
    let original = dir.path().join("same.txt");
    let one = quarantine.relocate(&pair_for(&first, &original)).unwrap();
    let two = quarantine.relocate(&pair_for(&second, &original)).unwrap();

    assert!(one.dry_run && two.dry_run);
    assert_eq!(one.destination, quarantine_dir.join("same.txt"));
    assert_eq!(two.destination, quarantine_dir.join("same_1.txt"));
    assert!(first.exists() && second.exists());
    assert!(!quarantine_dir.exists());
}

#[test]
fn test_missing_source_is_reported() {
    let dir = tempdir().unwrap();
    let mut quarantine = Quarantine::new(&dir.path().join("q"));
    quarantine.ensure_exists().unwrap();

    let missing = dir.path().join("gone.txt");
    let err = quarantine
        .relocate(&pair_for(&missing, &dir.path().join("a.txt")))
        .unwrap_err();

    assert!(matches!(err, RelocateError::NotFound(ref p) if p == &missing));
}

#[test]
fn test_resolve_dir() {
    let root = PathBuf::from("/data");
    assert_eq!(
        resolve_dir(&root, Path::new("duplicates")),
        PathBuf::from("/data/duplicates")
    );
    assert_eq!(
        resolve_dir(&root, Path::new("/elsewhere/q")),
        PathBuf::from("/elsewhere/q")
    );
}
