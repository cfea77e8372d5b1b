use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_store")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn normalize_rel_path_rejects_escape_and_absolute() {
    assert_eq!(normalize_rel_path("a/./b//c.png").unwrap(), "a/b/c.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn missing_source_is_source_not_found() {
    let store = InputStore::new(scratch("missing"));
    assert!(matches!(
        store.read("nope.png"),
        Err(IconStackError::SourceNotFound(_))
    ));
    assert!(matches!(
        store.read("../nope.png"),
        Err(IconStackError::Validation(_))
    ));
}

#[test]
fn input_store_reads_relative_files() {
    let dir = scratch("read");
    std::fs::write(dir.join("a.bin"), [1u8, 2, 3]).unwrap();
    let store = InputStore::new(&dir);
    assert_eq!(store.read("./a.bin").unwrap(), vec![1, 2, 3]);
}

#[test]
fn output_store_creates_dir_and_leaves_no_temp_file() {
    let dir = scratch("write").join("nested/out");
    let store = OutputStore::create(&dir).unwrap();
    let path = store.write("x.png", b"hello").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    assert!(!dir.join("x.png.tmp").exists());

    store.write("x.png", b"again").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"again");
}
