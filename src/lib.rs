use thiserror::Error;

pub mod cleanup;
mod diff;
pub mod differ;

pub use cleanup::{
    cleanup_efficiency, cleanup_merge, cleanup_semantic, cleanup_semantic_lossless,
    cleanup_word_semantic, is_word_char, Cleanup, DEFAULT_EDIT_COST,
};
pub use diff::{levenshtein, text_new, text_old, x_index, Diff, Ops};
pub use differ::{
    common_overlap, common_prefix, common_suffix, compare, Differ, DEFAULT_TIMEOUT,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid timeout: {0} is not a number of seconds")]
    InvalidTimeout(f64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}
