pub mod json;
pub mod sqlite;

pub use json::{write_run_files, RunFiles};
pub use sqlite::Storage;
