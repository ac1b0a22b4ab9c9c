pub mod app;
pub mod collection;
pub mod fs_utils;
pub mod image_utils;
pub mod session;
pub mod thumbnails;
pub mod ui;
pub mod undo;
