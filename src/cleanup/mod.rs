mod efficiency;
mod merge;
mod semantic;
mod word;

use tracing::debug;

use crate::Diff;

pub use efficiency::{cleanup_efficiency, DEFAULT_EDIT_COST};
pub use merge::cleanup_merge;
pub use semantic::{cleanup_semantic, cleanup_semantic_lossless};
pub use word::{cleanup_word_semantic, is_word_char};

/// Post-processing applied to a freshly computed diff
#[derive(Debug, Clone, Copy, Default)]
pub enum Cleanup {
    /// Keep the raw, minimal diff
    #[default]
    None,
    /// Human readable: eliminate coincidental equalities and align edits
    /// with natural boundaries
    Semantic,
    /// Machine oriented: trade extra characters for fewer edit operations,
    /// where the value is the cost of one edit in characters
    Efficiency(usize),
    /// Replace whole words only. A negative `edit_cost` runs semantic
    /// cleanup first, a positive one efficiency cleanup.
    WordSemantic {
        edit_cost: i32,
        is_word: fn(char) -> bool,
    },
}

impl Cleanup {
    /// Whole-word cleanup on top of semantic cleanup, with letters and
    /// digits as word characters
    pub fn word_semantic() -> Self {
        Cleanup::WordSemantic {
            edit_cost: -1,
            is_word: is_word_char,
        }
    }

    pub fn apply(&self, diffs: &mut Vec<Diff>) {
        let before = diffs.len();
        match *self {
            Cleanup::None => return,
            Cleanup::Semantic => cleanup_semantic(diffs),
            Cleanup::Efficiency(edit_cost) => cleanup_efficiency(diffs, edit_cost),
            Cleanup::WordSemantic { edit_cost, is_word } => {
                cleanup_word_semantic(diffs, edit_cost, is_word)
            }
        }
        debug!(cleanup = ?self, before, after = diffs.len(), "applied cleanup");
    }
}
