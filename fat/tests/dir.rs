mod common;

use fat::volume::CLUSTER_DIRENTS;
use fat::{ClusterId, ShortDirEntry, format_name};
use vfs::DirEntryType;

use self::common::fresh;

fn dirent(name: &str, id: usize) -> ShortDirEntry {
    ShortDirEntry::new(format_name(name), DirEntryType::Regular, ClusterId::new(id), 0)
}

fn names(entries: &[ShortDirEntry]) -> Vec<String> {
    entries.iter().map(|d| d.name().to_string()).collect()
}

#[test]
fn add_find_remove() {
    let (_disk, mut fs) = fresh();
    let root = ClusterId::ROOT;

    fs.add_entry(root, &dirent("a.txt", 6)).unwrap();
    let found = fs.find_entry(root, "A.TXT").unwrap().unwrap();
    assert_eq!(ClusterId::new(6), found.cluster_id());
    assert_eq!(Some(found), fs.find_entry(root, "a.txt").unwrap());
    assert_eq!(None, fs.find_entry(root, "b.txt").unwrap());

    assert!(fs.remove_entry(root, "a.txt").unwrap());
    assert_eq!(None, fs.find_entry(root, "a.txt").unwrap());
    assert!(!fs.remove_entry(root, "a.txt").unwrap());
}

#[test]
fn removal_only_clears_first_byte() {
    let (disk, mut fs) = fresh();
    let root = ClusterId::ROOT;
    fs.add_entry(root, &dirent("a.txt", 6)).unwrap();
    fs.add_entry(root, &dirent("b.txt", 7)).unwrap();

    fs.remove_entry(root, "a.txt").unwrap();
    let image = disk.snapshot();
    let slot = &image[5 * 1024..5 * 1024 + 32];
    assert_eq!(0x00, slot[0]);
    assert_eq!(b"       TXT", &slot[1..11]);
    assert_eq!(b"B       TXT", &image[5 * 1024 + 32..5 * 1024 + 43]);
    assert_eq!(vec!["B.TXT"], names(&fs.list_entries(root).unwrap()));
}

#[test]
fn freed_slot_is_reused() {
    let (_disk, mut fs) = fresh();
    let root = ClusterId::ROOT;
    for (i, name) in ["a", "b", "c"].into_iter().enumerate() {
        fs.add_entry(root, &dirent(name, 6 + i)).unwrap();
    }

    fs.remove_entry(root, "b").unwrap();
    fs.add_entry(root, &dirent("d", 9)).unwrap();
    assert_eq!(
        vec!["A", "D", "C"],
        names(&fs.list_entries(root).unwrap())
    );
}

#[test]
fn full_directory_grows() {
    let (_disk, mut fs) = fresh();
    let root = ClusterId::ROOT;
    for i in 0..=CLUSTER_DIRENTS {
        fs.add_entry(root, &dirent(&format!("f{i}"), 100 + i)).unwrap();
    }

    let chain = fs.fat().follow(root).unwrap();
    assert_eq!(vec![ClusterId::ROOT, ClusterId::MIN], chain);
    assert_eq!(CLUSTER_DIRENTS + 1, fs.list_entries(root).unwrap().len());

    let last = format!("f{CLUSTER_DIRENTS}");
    let found = fs.find_entry(root, &last).unwrap().unwrap();
    assert_eq!(ClusterId::new(100 + CLUSTER_DIRENTS), found.cluster_id());
}

#[test]
fn new_directory_is_empty() {
    let (_disk, mut fs) = fresh();
    let sub = fs.create_dir(ClusterId::ROOT, "sub").unwrap();

    assert!(sub.is_dir());
    assert!(fs.list_entries(sub.cluster_id()).unwrap().is_empty());
}
