use piccull::collection::*;
use std::path::PathBuf;
use tempfile::tempdir;

mod common;
use common::{file_names, populate};

fn collection_of(n: usize) -> Collection {
    let mut collection = Collection::new();
    let images = (0..n).map(|i| PathBuf::from(format!("/pics/{i}.png"))).collect();
    collection.replace(PathBuf::from("/pics"), images);
    collection
}

#[test]
fn select_reads_folder_and_selects_first() {
    let tmp = tempdir().unwrap();
    populate(tmp.path(), &["b.png", "A.jpg", "a.JPG"]);
    let mut collection = Collection::new();
    collection.select(tmp.path());
    assert_eq!(file_names(collection.images()), ["A.jpg", "a.JPG", "b.png"]);
    assert_eq!(collection.index(), Some(0));
    assert_eq!(collection.folder(), Some(tmp.path()));
}

#[test]
fn select_empty_folder_has_no_selection() {
    let tmp = tempdir().unwrap();
    let mut collection = collection_of(3);
    collection.select(tmp.path());
    assert!(collection.is_empty());
    assert_eq!(collection.index(), None);
    assert!(collection.current().is_none());
}

#[test]
fn advance_clamps_without_wrapping() {
    let mut collection = collection_of(3);
    assert!(!collection.has_prev());
    assert!(!collection.advance(Direction::Prev));
    assert_eq!(collection.index(), Some(0));

    assert!(collection.advance(Direction::Next));
    assert!(collection.advance(Direction::Next));
    assert!(!collection.has_next());
    assert!(!collection.advance(Direction::Next));
    assert_eq!(collection.index(), Some(2));
}

#[test]
fn navigation_sequences_stay_in_bounds() {
    let mut collection = collection_of(4);
    let moves = [
        Direction::Next,
        Direction::Next,
        Direction::Next,
        Direction::Next,
        Direction::Next,
        Direction::Prev,
        Direction::Prev,
        Direction::Prev,
        Direction::Prev,
        Direction::Prev,
        Direction::Prev,
        Direction::Next,
    ];
    for direction in moves {
        collection.advance(direction);
        let idx = collection.index().unwrap();
        assert!(idx < collection.len());
    }
    assert_eq!(collection.index(), Some(1));

    let mut empty = collection_of(0);
    assert!(!empty.advance(Direction::Next));
    assert_eq!(empty.index(), None);
}

#[test]
fn step_clamps_large_offsets() {
    let mut collection = collection_of(10);
    assert!(collection.step(4));
    assert_eq!(collection.index(), Some(4));
    assert!(collection.step(100));
    assert_eq!(collection.index(), Some(9));
    assert!(collection.step(-100));
    assert_eq!(collection.index(), Some(0));
}

#[test]
fn jump_to_validates_range() {
    let mut collection = collection_of(3);
    collection.advance(Direction::Next);
    for bad in ["0", "4", "abc", "", "-1", "2.5"] {
        assert!(collection.jump_to_input(bad).is_err(), "{bad} accepted");
        assert_eq!(collection.index(), Some(1));
    }
    assert_eq!(
        collection.jump_to(4),
        Err(JumpError::OutOfRange { requested: 4, len: 3 })
    );
    assert_eq!(
        collection.jump_to_input("abc"),
        Err(JumpError::NotANumber("abc".into()))
    );
    collection.jump_to_input(" 3 ").unwrap();
    assert_eq!(collection.index(), Some(2));
    collection.jump_to(1).unwrap();
    assert_eq!(collection.index(), Some(0));
}

#[test]
fn remove_current_reclamps_selection() {
    let mut collection = collection_of(3);
    collection.jump_to(3).unwrap();
    let (idx, removed) = collection.remove_current().unwrap();
    assert_eq!(idx, 2);
    assert_eq!(removed, PathBuf::from("/pics/2.png"));
    assert_eq!(collection.index(), Some(1));

    collection.jump_to(1).unwrap();
    collection.remove_current().unwrap();
    assert_eq!(collection.index(), Some(0));
    assert_eq!(collection.current(), Some(PathBuf::from("/pics/1.png").as_path()));

    collection.remove_current().unwrap();
    assert_eq!(collection.index(), None);
    assert!(collection.remove_current().is_none());
}

#[test]
fn restore_inserts_at_clamped_index() {
    let mut collection = collection_of(2);
    let at = collection.restore(1, PathBuf::from("/pics/x.png"));
    assert_eq!(at, 1);
    assert_eq!(collection.index(), Some(1));
    assert_eq!(file_names(collection.images()), ["0.png", "x.png", "1.png"]);

    let at = collection.restore(99, PathBuf::from("/pics/y.png"));
    assert_eq!(at, 3);
    assert_eq!(collection.index(), Some(3));

    let mut empty = collection_of(0);
    assert_eq!(empty.restore(5, PathBuf::from("/pics/z.png")), 0);
    assert_eq!(empty.index(), Some(0));
}
