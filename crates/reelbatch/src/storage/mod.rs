pub mod cursor;
pub mod filesystem;

pub use cursor::{CursorStore, FileCursorStore};
pub use filesystem::{scratch_dir, write_atomic};
