use clap::Parser;
use dupescan::cli::{Cli, Commands, OutputFormat};
use dupescan::config::Config;
use dupescan::duplicates::ScanMode;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all DUPESCAN_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("DUPESCAN_") {
            std::env::remove_var(key);
        }
    }
}

fn merge_cli(config: &mut Config, argv: &[&str]) {
    let cli = Cli::try_parse_from(argv).unwrap();
    if let Commands::Scan(args) = &cli.command {
        config.merge_scan_args(args);
    }
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    let config = Config::load_from_path(dir.path().join("absent.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_explicit_missing_file_falls_back() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let typo = dir.path().join("dupescan.tmol");

    assert!(Config::load_explicit(&typo).is_err());
    assert_eq!(Config::load(Some(typo.as_path())), Config::default());

    std::env::set_var("DUPESCAN_WORKERS", "6");
    let config = Config::load(Some(typo.as_path()));
    clear_env();
    assert_eq!(config.workers, 6);
}

#[test]
fn test_config_explicit_file_is_loaded() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "mode = \"combined\"\n").unwrap();

    let config = Config::load_explicit(&path).unwrap();
    assert_eq!(config.mode, ScanMode::Combined);
    assert_eq!(Config::load(Some(path.as_path())), config);
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
mode = "combined"
workers = 8
follow_symlinks = true
output = "json"
progress = false
"#,
    )
    .unwrap();

    let config = Config::load_from_path(path);

    assert_eq!(config.mode, ScanMode::Combined);
    assert_eq!(config.workers, 8);
    assert!(config.follow_symlinks);
    assert_eq!(config.output, OutputFormat::Json);
    assert!(!config.progress);
}

#[test]
fn test_config_invalid_toml_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "workers = \"many\"").unwrap();

    assert_eq!(Config::load_from_path(path), Config::default());
}

#[test]
fn test_config_zero_workers_clamped() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "workers = 0").unwrap();

    assert_eq!(Config::load_from_path(path).workers, 1);
}

#[test]
fn test_config_hierarchy_defaults_file_env_cli() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    // File overrides defaults
    fs::write(&path, "mode = \"name_size\"\nworkers = 8\n").unwrap();

    // Environment overrides the file
    std::env::set_var("DUPESCAN_WORKERS", "16");

    let mut config = Config::load_from_path(path);
    assert_eq!(config.mode, ScanMode::NameSize);
    assert_eq!(config.workers, 16);

    // CLI overrides the environment
    merge_cli(&mut config, &["dupescan", "scan", ".", "--workers", "2"]);
    assert_eq!(config.workers, 2);
    assert_eq!(config.mode, ScanMode::NameSize);

    merge_cli(&mut config, &["dupescan", "scan", ".", "--mode", "hash"]);
    assert_eq!(config.mode, ScanMode::Hash);
    assert_eq!(config.workers, 2);

    std::env::remove_var("DUPESCAN_WORKERS");
}

#[test]
fn test_boolean_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    fs::write(&path, "follow_symlinks = true").unwrap();
    let mut config = Config::load_from_path(path);
    assert!(config.follow_symlinks);

    merge_cli(&mut config, &["dupescan", "scan", ".", "--no-follow-symlinks"]);
    assert!(!config.follow_symlinks);

    merge_cli(&mut config, &["dupescan", "scan", ".", "--follow-symlinks"]);
    assert!(config.follow_symlinks);

    merge_cli(&mut config, &["dupescan", "scan", "."]);
    assert!(config.follow_symlinks);
}

#[test]
fn test_config_save_round_trip() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("saved.toml");

    let config = Config {
        mode: ScanMode::NameSize,
        workers: 3,
        output: OutputFormat::Csv,
        ..Config::default()
    };
    config.save_to(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("mode = \"name_size\""));
    assert!(content.contains("output = \"csv\""));

    assert_eq!(Config::load_from_path(path), config);
}
