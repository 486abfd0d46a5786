//! Treebank readers.

mod conll;
pub use conll::{ConllReader, PosColumn};

mod spmrl;
pub use spmrl::SpmrlReader;

use crate::sentence::Sentence;

/// Warn about sentences whose heads do not form a tree.
fn check_tree(sentence: &Sentence, line: usize) {
    if !sentence.is_tree() {
        log::warn!(
            "Sentence starting at line {} is not a tree:\n{}",
            line + 1,
            sentence
        );
    }
}
