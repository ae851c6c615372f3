use dupescan::duplicates::{DuplicateFinder, FinderConfig, GroupKey, ScanMode};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn finder(mode: ScanMode) -> DuplicateFinder {
    DuplicateFinder::new(FinderConfig::default().with_mode(mode).with_workers(2))
}

#[test]
fn test_name_size_scenario_distinct_names() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"XXXXXXXXXX");
    write_file(&dir.path().join("b.txt"), b"XXXXXXXXXX");
    write_file(&dir.path().join("c.txt"), b"YYYYYYYYYY");

    let finder = finder(ScanMode::NameSize);
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(finder.counters().snapshot().duplicate_groups_found, 0);
    assert_eq!(summary.files_hashed, 0);
}

#[test]
fn test_name_size_groups_without_reading_content() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("x/photo.jpg"), b"1234");
    write_file(&dir.path().join("y/photo.jpg"), b"abcd");
    write_file(&dir.path().join("z/photo.jpg"), b"abcdef");

    let finder = finder(ScanMode::NameSize);
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].key,
        GroupKey::NameSize {
            name: "photo.jpg".into(),
            size: 4
        }
    );
    assert!(groups[0].files.iter().all(|f| f.digest.as_hex().is_none()));

    let snapshot = finder.counters().snapshot();
    assert_eq!(snapshot.files_to_hash, 0);
    assert_eq!(snapshot.files_hashed, 0);
    assert_eq!(snapshot.duplicate_groups_found, 1);
}

#[test]
fn test_combined_same_name_different_content() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("one/notes.md"), b"first draft");
    write_file(&dir.path().join("two/notes.md"), b"final draft");

    let (name_size_groups, _) = finder(ScanMode::NameSize)
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(name_size_groups.len(), 1);

    let combined = finder(ScanMode::Combined);
    let (groups, summary) = combined.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.files_hashed, 2);
    assert_eq!(combined.counters().snapshot().duplicate_groups_found, 0);
}

#[test]
fn test_combined_requires_matching_names() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a/report.pdf"), b"same bytes");
    write_file(&dir.path().join("b/report.pdf"), b"same bytes");
    write_file(&dir.path().join("c/copy.pdf"), b"same bytes");

    let (hash_groups, _) = finder(ScanMode::Hash).find_duplicates(dir.path()).unwrap();
    assert_eq!(hash_groups.len(), 1);
    assert_eq!(hash_groups[0].len(), 3);

    let (groups, _) = finder(ScanMode::Combined)
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert!(matches!(groups[0].key, GroupKey::NameDigest { ref name, .. } if name == "report.pdf"));
}

#[test]
fn test_hash_mode_ignores_names() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("holiday.jpg"), b"pixels");
    write_file(&dir.path().join("IMG_0001.JPG"), b"pixels");

    let (groups, _) = finder(ScanMode::Hash).find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    let digest = groups[0].digest().unwrap();
    assert_eq!(digest.len(), 64);
    assert!(groups[0]
        .files
        .iter()
        .all(|f| f.digest.as_hex() == Some(digest)));
}

#[test]
fn test_hash_mode_same_size_different_content() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a"), b"aaaa");
    write_file(&dir.path().join("b"), b"bbbb");

    let (groups, summary) = finder(ScanMode::Hash).find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.candidate_groups, 1);
    assert_eq!(summary.files_hashed, 2);
}

#[cfg(unix)]
#[test]
fn test_name_keys_compare_raw_file_name_bytes() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let dir = tempdir().unwrap();
    let name = |bytes: &[u8]| dir.path().join(OsString::from_vec(bytes.to_vec()));
    write_file(&name(b"report\xff.txt"), b"aaaa");
    write_file(&name(b"report\xfe.txt"), b"bbbb");
    write_file(&name(b"twin\xff.txt"), b"same");
    fs::create_dir_all(dir.path().join("copy")).unwrap();
    write_file(
        &dir.path().join("copy").join(OsString::from_vec(b"twin\xff.txt".to_vec())),
        b"same",
    );

    let (groups, _) = finder(ScanMode::NameSize)
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1, "distinct names grouped: {:?}", groups);
    assert_eq!(
        groups[0].key,
        GroupKey::NameSize {
            name: OsString::from_vec(b"twin\xff.txt".to_vec()),
            size: 4
        }
    );

    let (groups, _) = finder(ScanMode::Combined)
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}
