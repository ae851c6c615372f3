use dupescan::duplicates::{DuplicateFinder, FinderConfig, ScanMode};
use dupescan::error::ExitCode;
use dupescan::output::{CsvOutput, JsonOutput, TextOutput};
use std::fs;
use tempfile::tempdir;

fn scan_fixture(mode: ScanMode) -> (tempfile::TempDir, DuplicateFinder) {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a.txt"), b"XXXXXXXXXX").unwrap();
    fs::write(dir.path().join("sub").join("a.txt"), b"XXXXXXXXXX").unwrap();
    fs::write(dir.path().join("c.txt"), b"YYYYYYYYYY").unwrap();
    let finder = DuplicateFinder::new(FinderConfig::default().with_mode(mode));
    (dir, finder)
}

#[test]
fn test_json_export_of_real_scan() {
    let (dir, finder) = scan_fixture(ScanMode::Hash);
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    let exit_code = ExitCode::for_scan(groups.len(), summary.error_count());

    let output = JsonOutput::new(&groups, &summary, finder.counters().snapshot(), exit_code);
    let value: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();

    assert_eq!(value["mode"], "hash");
    assert_eq!(value["duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(value["duplicates"][0]["size"], 10);
    assert_eq!(value["duplicates"][0]["files"].as_array().unwrap().len(), 2);
    assert_eq!(value["summary"]["total_files"], 3);
    assert_eq!(value["summary"]["exit_code_name"], "DS000");
    assert_eq!(value["counters"]["files_scanned"], 3);
    assert_eq!(value["counters"]["duplicate_groups_found"], 1);
    assert_eq!(value["counters"]["errors_encountered"], 0);
}

#[test]
fn test_csv_export_of_real_scan() {
    let (dir, finder) = scan_fixture(ScanMode::Combined);
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    let csv = CsvOutput::new(&groups).to_string().unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "group_id,digest,name,path,size,modified");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1,"));
    assert!(lines[1].contains(",a.txt,"));
    assert!(!lines[1].contains("unknown"));
}

#[test]
fn test_text_export_of_real_scan() {
    let (dir, finder) = scan_fixture(ScanMode::NameSize);
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    let text = TextOutput::new(&groups, &summary, finder.counters().snapshot(), false)
        .to_string()
        .unwrap();

    assert!(text.contains("Group 1: 2 files"));
    assert!(text.contains("a.txt (10 bytes)"));
    assert!(text.contains("3 files scanned, 1 duplicate group"));
}

#[test]
fn test_exit_code_no_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only"), b"one").unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(
        ExitCode::for_scan(groups.len(), summary.error_count()),
        ExitCode::NoDuplicates
    );
}
