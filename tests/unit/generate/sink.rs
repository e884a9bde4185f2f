use super::*;

#[test]
fn in_memory_sink_keeps_order() {
    let mut sink = InMemorySink::new();
    sink.deliver("first").unwrap();
    sink.deliver("second").unwrap();
    assert_eq!(sink.delivered(), ["first", "second"]);
}

#[test]
fn file_sink_creates_missing_directories() {
    let path = PathBuf::from("target/lampreel_sink_tests/nested/out.txt");
    let _ = std::fs::remove_dir_all("target/lampreel_sink_tests");
    let mut sink = FileSink::new(&path);
    sink.deliver("0eNqrVkrKz88pVrKKjtVRKs9ILcpLTVWyMjIxMtVRKkotLs0pUbIyNDUw0lHKTS1JTCrMzEmtUrKqBgA8Lw4r").unwrap();
    assert_eq!(sink.path(), path.as_path());
    assert!(std::fs::read_to_string(&path).unwrap().starts_with("0eNq"));
}

#[test]
fn bare_file_name_needs_no_parent() {
    ensure_parent_dir(Path::new("out.txt")).unwrap();
}
