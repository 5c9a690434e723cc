use clap::Parser;
use dupesweep::cli::Cli;
use dupesweep::error::ExitCode;
use dupesweep::run_app;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(root: &Path, extra: &[&str]) -> Cli {
    let mut args = vec![
        "dupesweep".to_string(),
        root.to_string_lossy().into_owned(),
        "--quiet".to_string(),
        "--no-progress".to_string(),
        "--no-color".to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_run_app_moves_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();

    let code = run_app(cli(dir.path(), &[])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("duplicates/b.txt").exists());
}

#[test]
fn test_run_app_json_dry_run() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();

    let code = run_app(cli(dir.path(), &["--dry-run", "--output", "json"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dir.path().join("b.txt").exists());
    assert!(!dir.path().join("duplicates").exists());
}

#[test]
fn test_run_app_reads_config_file() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.txt"), "x").unwrap();
    fs::write(root.join("b.txt"), "x").unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "quarantine_dir = \"dupes\"\n").unwrap();

    run_app(cli(&root, &["-c", config_path.to_str().unwrap()])).unwrap();

    assert!(root.join("dupes/b.txt").exists());
    assert!(!root.join("duplicates").exists());
}

#[test]
fn test_cli_flag_beats_config_file() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("root");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a.txt"), "x").unwrap();
    fs::write(root.join("b.txt"), "x").unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "quarantine_dir = \"dupes\"\n").unwrap();

    run_app(cli(
        &root,
        &["-c", config_path.to_str().unwrap(), "-d", "flagged"],
    ))
    .unwrap();

    assert!(root.join("flagged/b.txt").exists());
    assert!(!root.join("dupes").exists());
}

#[test]
fn test_run_app_rejects_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "max_suffix = 0\n").unwrap();

    let err = run_app(cli(dir.path(), &["-c", config_path.to_str().unwrap()])).unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::GeneralError);
    assert!(!dir.path().join("duplicates").exists());
}

#[test]
fn test_run_app_missing_root_is_general_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = run_app(cli(&missing, &[])).unwrap_err();

    assert_eq!(ExitCode::from_error(&err), ExitCode::GeneralError);
    assert!(!missing.exists());
}
