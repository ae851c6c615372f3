use dupescan::duplicates::{DuplicateFinder, FinderConfig, ScanMode};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn names(group: &dupescan::duplicates::DuplicateGroup) -> Vec<&str> {
    group.files.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(finder.counters().snapshot().files_scanned, 0);
}

#[test]
fn test_scan_hash_mode_scenario() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"XXXXXXXXXX");
    write_file(&dir.path().join("b.txt"), b"XXXXXXXXXX");
    write_file(&dir.path().join("c.txt"), b"YYYYYYYYYY");

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_mode(ScanMode::Hash)
            .with_workers(2),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(names(&groups[0]), vec!["a.txt", "b.txt"]);
    assert!(groups
        .iter()
        .all(|g| g.files.iter().all(|f| f.name != "c.txt")));

    let snapshot = finder.counters().snapshot();
    assert_eq!(snapshot.duplicate_groups_found, 1);
    assert_eq!(snapshot.files_scanned, 3);
    assert_eq!(snapshot.errors_encountered, 0);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 10);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("one").join("two").join("three");
    fs::create_dir_all(&deep).unwrap();

    write_file(&dir.path().join("top.bin"), b"nested duplicate");
    write_file(&deep.join("bottom.bin"), b"nested duplicate");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.total_files, 2);
    assert!(groups[0].paths().contains(&deep.join("bottom.bin")));
}

#[test]
fn test_scan_multiple_groups_sorted_by_size() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("s1"), b"ab");
    write_file(&dir.path().join("s2"), b"ab");
    write_file(&dir.path().join("l1"), b"abcdefgh");
    write_file(&dir.path().join("l2"), b"abcdefgh");
    write_file(&dir.path().join("l3"), b"abcdefgh");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].size(), 8);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(groups[1].size(), 2);
    assert_eq!(summary.duplicate_files, 3);
    assert_eq!(summary.reclaimable_space, 2 * 8 + 2);
}

#[test]
fn test_scan_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size(), 0);
    assert_eq!(groups[0].wasted_space(), 0);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        write_file(
            &dir.path().join(format!("f{:02}", i)),
            format!("content-{}", i % 4).as_bytes(),
        );
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_workers(4));
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let first_counters = finder.counters().snapshot();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();
    let second_counters = finder.counters().snapshot();

    let as_sets = |groups: &[dupescan::duplicates::DuplicateGroup]| -> BTreeSet<Vec<_>> {
        groups.iter().map(|g| g.paths()).collect()
    };
    assert_eq!(as_sets(&first), as_sets(&second));
    assert_eq!(first_counters, second_counters);
    assert_eq!(first.len(), 4);
}

#[test]
fn test_scan_worker_count_does_not_change_result() {
    let dir = tempdir().unwrap();
    for i in 0..40 {
        write_file(
            &dir.path().join(format!("file{}.dat", i)),
            format!("{:08}", i % 5).as_bytes(),
        );
    }

    let run = |workers: usize| {
        DuplicateFinder::new(FinderConfig::default().with_workers(workers))
            .find_duplicates(dir.path())
            .unwrap()
            .0
    };

    let single = run(1);
    assert_eq!(single.len(), 5);
    for workers in [2, 3, 8, 64] {
        assert_eq!(run(workers), single, "workers = {}", workers);
    }
}

#[test]
fn test_counters_readable_from_another_thread() {
    let dir = tempdir().unwrap();
    for i in 0..50 {
        write_file(&dir.path().join(format!("f{}", i)), b"same");
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_workers(4));
    let counters = finder.counters();

    std::thread::scope(|s| {
        let observer = s.spawn(|| {
            let mut last = 0;
            for _ in 0..100 {
                let snapshot = counters.snapshot();
                assert!(snapshot.files_hashed <= 50);
                last = last.max(snapshot.files_scanned);
            }
            last
        });
        finder.find_duplicates(dir.path()).unwrap();
        assert!(observer.join().unwrap() <= 50);
    });

    let snapshot = counters.snapshot();
    assert_eq!(snapshot.files_scanned, 50);
    assert_eq!(snapshot.files_hashed, 50);
    assert_eq!(snapshot.duplicate_groups_found, 1);
}

#[cfg(unix)]
#[test]
fn test_scan_symlinks_ignored_by_default() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("real.txt"), b"linked");
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);

    let (groups, _) = DuplicateFinder::new(FinderConfig::default().with_follow_symlinks(true))
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1);
}
