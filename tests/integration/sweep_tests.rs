use dupesweep::config::Config;
use dupesweep::sweep::Sweeper;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use walkdir::WalkDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn list_files(root: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

fn sweep(root: &Path, config: Config) -> dupesweep::sweep::RunReport {
    Sweeper::new(root, config).run(|_| Ok(())).unwrap()
}

#[test]
fn test_end_to_end_single_pair() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "hello");
    write(dir.path(), "sub/b.txt", "hello");
    write(dir.path(), "c.txt", "world");

    let report = sweep(dir.path(), Config::default());

    assert_eq!(report.moved_count(), 1);
    let moved = &report.moves[0];
    assert_eq!(moved.pair.duplicate, dir.path().join("sub/b.txt"));
    assert_eq!(moved.pair.original, dir.path().join("a.txt"));
    assert_eq!(moved.result.destination, dir.path().join("duplicates/b.txt"));

    assert_eq!(
        fs::read_to_string(dir.path().join("duplicates/b.txt")).unwrap(),
        "hello"
    );
    assert!(!dir.path().join("sub/b.txt").exists());
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("c.txt").exists());
}

#[test]
fn test_originals_survive_and_duplicates_leave() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/one.txt", "1");
    write(dir.path(), "b/one.txt", "1");
    write(dir.path(), "c/one.txt", "1");
    write(dir.path(), "a/two.bin", "22");
    write(dir.path(), "b/deep/two.bin", "22");
    write(dir.path(), "solo.txt", "3");

    let report = sweep(dir.path(), Config::default());

    assert_eq!(report.moved_count(), 3);
    for moved in &report.moves {
        assert!(moved.pair.original.exists());
        assert!(!moved.pair.duplicate.exists());
        assert!(moved.result.destination.starts_with(dir.path().join("duplicates")));
        assert!(moved.result.destination.exists());
    }

    let remaining: BTreeSet<PathBuf> = list_files(dir.path())
        .into_iter()
        .filter(|p| !p.starts_with("duplicates"))
        .collect();
    let expected: BTreeSet<PathBuf> = ["a/one.txt", "a/two.bin", "solo.txt"]
        .iter()
        .map(PathBuf::from)
        .collect();
    assert_eq!(remaining, expected);

    let quarantined = list_files(&dir.path().join("duplicates"));
    let expected: BTreeSet<PathBuf> = ["one.txt", "one_1.txt", "two.bin"]
        .iter()
        .map(PathBuf::from)
        .collect();
    assert_eq!(quarantined, expected);
}

#[test]
fn test_second_run_finds_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "same");
    write(dir.path(), "b.txt", "same");

    let first = sweep(dir.path(), Config::default());
    let second = sweep(dir.path(), Config::default());

    assert_eq!(first.moved_count(), 1);
    assert_eq!(second.moved_count(), 0);
    assert_eq!(second.summary.total_files, 1);
}

#[test]
fn test_empty_files_are_swept() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x/empty.log", "");
    write(dir.path(), "y/empty.log", "");

    let report = sweep(dir.path(), Config::default());

    assert_eq!(report.moved_count(), 1);
    assert_eq!(report.moved_bytes(), 0);
    assert!(dir.path().join("duplicates/empty.log").exists());
}

#[test]
fn test_dry_run_leaves_tree_untouched() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/same.txt", "z");
    write(dir.path(), "b/same.txt", "z");
    write(dir.path(), "c/same.txt", "z");
    let before = list_files(dir.path());

    let report = Sweeper::new(dir.path(), Config::default())
        .with_dry_run(true)
        .run(|_| Ok(()))
        .unwrap();

    assert_eq!(list_files(dir.path()), before);
    assert!(!dir.path().join("duplicates").exists());
    assert!(report.dry_run);

    let planned: Vec<PathBuf> = report
        .moves
        .iter()
        .map(|m| m.result.destination.clone())
        .collect();
    assert_eq!(
        planned,
        vec![
            dir.path().join("duplicates/same.txt"),
            dir.path().join("duplicates/same_1.txt")
        ]
    );
}

#[test]
fn test_include_quarantine_reprocesses_quarantined_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "hello");
    write(dir.path(), "duplicates/a.txt", "hello");

    let config = Config {
        include_quarantine: true,
        ..Config::default()
    };
    let report = sweep(dir.path(), config);

    assert_eq!(report.moved_count(), 1);
    assert_eq!(
        report.moves[0].pair.duplicate,
        dir.path().join("duplicates/a.txt")
    );
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("duplicates/a.txt").exists());
    assert!(dir.path().join("duplicates/a_1.txt").exists());
}

#[test]
fn test_quarantine_excluded_by_default() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "hello");
    write(dir.path(), "duplicates/a.txt", "hello");

    let report = sweep(dir.path(), Config::default());

    assert_eq!(report.moved_count(), 0);
    assert!(dir.path().join("duplicates/a.txt").exists());
}

#[test]
fn test_custom_quarantine_name() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "q");
    write(dir.path(), "b.txt", "q");

    let config = Config {
        quarantine_dir: PathBuf::from("trash/dupes"),
        ..Config::default()
    };
    let report = sweep(dir.path(), config);

    assert_eq!(report.quarantine, dir.path().join("trash/dupes"));
    assert!(dir.path().join("trash/dupes/b.txt").exists());
}

#[test]
fn test_absolute_quarantine_outside_root() {
    let root = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();
    write(root.path(), "a.txt", "q");
    write(root.path(), "b.txt", "q");

    let config = Config {
        quarantine_dir: elsewhere.path().join("q"),
        ..Config::default()
    };
    let report = sweep(root.path(), config);

    assert_eq!(report.moved_count(), 1);
    assert!(elsewhere.path().join("q/b.txt").exists());
    assert!(!root.path().join("duplicates").exists());
}

#[test]
fn test_name_collision_exhaustion_aborts_run() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.txt", "v");
    write(dir.path(), "b/x.txt", "v");
    write(dir.path(), "c/x.txt", "v");
    write(dir.path(), "d/x.txt", "v");

    let config = Config {
        max_suffix: 1,
        ..Config::default()
    };
    let result = Sweeper::new(dir.path(), config).run(|_| Ok(()));

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("x.txt"));
    // Earlier moves are kept
    assert!(dir.path().join("duplicates/x.txt").exists());
    assert!(dir.path().join("duplicates/x_1.txt").exists());
    assert!(dir.path().join("d/x.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_symlink_to_duplicate_content_is_moved() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "target");
    std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("link.txt")).unwrap();

    let report = sweep(dir.path(), Config::default());

    assert_eq!(report.moved_count(), 1);
    assert_eq!(report.moves[0].pair.original, dir.path().join("a.txt"));
    assert_eq!(report.moves[0].pair.duplicate, dir.path().join("link.txt"));
    // The link itself is moved; its target stays
    let moved = dir.path().join("duplicates/link.txt");
    assert!(fs::symlink_metadata(&moved).unwrap().file_type().is_symlink());
    assert!(fs::symlink_metadata(dir.path().join("link.txt")).is_err());
    assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "target");
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_fails_the_run() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", "x");
    write(dir.path(), "b.txt", "x");
    std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("c_link")).unwrap();

    let result = Sweeper::new(dir.path(), Config::default()).run(|_| Ok(()));

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("c_link"));
    // Scanning happens before any move
    assert!(dir.path().join("b.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_is_not_swept() {
    let dir = tempdir().unwrap();
    write(dir.path(), "real/a.txt", "inside");
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

    let report = sweep(dir.path(), Config::default());

    assert_eq!(report.moved_count(), 0);
    assert!(dir.path().join("real/a.txt").exists());
}
