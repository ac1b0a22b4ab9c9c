use piccull::undo::*;
use std::path::PathBuf;

#[test]
fn take_returns_record_once() {
    let mut log = UndoLog::new();
    assert!(!log.can_undo());
    assert!(log.take().is_none());

    log.record_delete(
        PathBuf::from("/pics"),
        PathBuf::from("/pics/.deleted/a.jpg"),
        2,
        "a.jpg".into(),
    );
    assert!(log.can_undo());
    let record = log.take().unwrap();
    assert_eq!(record.original_index, 2);
    assert_eq!(record.original_name, "a.jpg");
    assert!(log.take().is_none());
}

#[test]
fn newer_delete_overwrites_record() {
    let mut log = UndoLog::new();
    log.record_delete("/p".into(), "/p/.deleted/a.jpg".into(), 0, "a.jpg".into());
    log.record_delete("/p".into(), "/p/.deleted/b.jpg".into(), 1, "b.jpg".into());
    assert_eq!(log.peek().unwrap().moved_to, PathBuf::from("/p/.deleted/b.jpg"));
    log.take().unwrap();
    assert!(!log.can_undo());
}

#[test]
fn clear_discards_record() {
    let mut log = UndoLog::new();
    log.record_delete("/p".into(), "/p/.deleted/a.jpg".into(), 0, "a.jpg".into());
    log.clear();
    assert!(log.peek().is_none());
}
