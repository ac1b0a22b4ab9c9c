use std::{
    ffi::OsString,
    path::PathBuf,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoRecord {
    pub original_folder: PathBuf,
    pub moved_to: PathBuf,
    pub original_index: usize,
    pub original_name: OsString,
}

/// One level of undo: only the most recent delete is kept.
#[derive(Default)]
pub struct UndoLog {
    record: Option<UndoRecord>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_delete(
        &mut self,
        original_folder: PathBuf,
        moved_to: PathBuf,
        original_index: usize,
        original_name: OsString,
    ) {
        self.record = Some(UndoRecord {
            original_folder,
            moved_to,
            original_index,
            original_name,
        });
    }

    pub fn peek(&self) -> Option<&UndoRecord> {
        self.record.as_ref()
    }

    pub fn take(&mut self) -> Option<UndoRecord> {
        self.record.take()
    }

    pub fn can_undo(&self) -> bool {
        self.record.is_some()
    }

    pub fn clear(&mut self) {
        self.record = None;
    }
}
