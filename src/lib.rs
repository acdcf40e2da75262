pub mod app;
pub mod config;
pub mod diff_file;
pub mod document;
pub mod engine;
pub mod logging;
pub mod plain;
pub mod store;
pub mod ui;


pub use diff_file::{DiffFile, DiffLine, DiffResult, DiffStats, FileStatus, LineType};
pub use engine::{LineDiffEngine, diff};
