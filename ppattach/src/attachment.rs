//! Extracted PP-attachment samples.

use std::collections::HashMap;

/// Position of an attachment in its source corpus.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub(crate) start_line: Option<usize>,
    pub(crate) prep: usize,
    pub(crate) heads: Vec<usize>,
}

impl Position {
    /// The 0-based line of the first token of the sentence.
    pub fn start_line(&self) -> Option<usize> {
        self.start_line
    }

    /// The 0-based index of the preposition in the sentence.
    pub fn prep(&self) -> usize {
        self.prep
    }

    /// The 0-based indices of the candidate heads in the sentence.
    pub fn heads(&self) -> &[usize] {
        &self.heads
    }
}

/// A PP-attachment sample.
///
/// The PP is stored as a small tree: `pp_words` starts with the
/// preposition and `pp_parents` holds the head of every word within
/// the PP, where `0` is the head of the preposition itself and `n`
/// refers to `pp_words[n - 1]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attachment {
    pub(crate) heads: Vec<String>,
    pub(crate) gold: Option<usize>,
    pub(crate) pp_words: Vec<String>,
    pub(crate) pp_parents: Vec<usize>,
    pub(crate) heads_pos: Option<Vec<String>>,
    pub(crate) heads_next: Option<Vec<String>>,
    pub(crate) heads_next_pos: Option<Vec<String>>,
    pub(crate) position: Position,
}

impl Attachment {
    /// The candidate heads, in sentence order.
    pub fn heads(&self) -> &[String] {
        &self.heads
    }

    /// The 1-based rank of the gold head among the candidate heads.
    ///
    /// `None` when the governor of the preposition is not a candidate.
    pub fn gold(&self) -> Option<usize> {
        self.gold
    }

    pub fn prep(&self) -> &str {
        &self.pp_words[0]
    }

    /// The first word governed by the preposition.
    pub fn child(&self) -> &str {
        &self.pp_words[1]
    }

    pub fn pp_words(&self) -> &[String] {
        &self.pp_words
    }

    pub fn pp_parents(&self) -> &[usize] {
        &self.pp_parents
    }

    /// Part-of-speech tags of the candidate heads.
    pub fn heads_pos(&self) -> Option<&[String]> {
        self.heads_pos.as_deref()
    }

    /// Words that follow the candidate heads.
    pub fn heads_next(&self) -> Option<&[String]> {
        self.heads_next.as_deref()
    }

    /// Part-of-speech tags of the words that follow the candidate heads.
    pub fn heads_next_pos(&self) -> Option<&[String]> {
        self.heads_next_pos.as_deref()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The 0-based line of the preposition in the source corpus.
    ///
    /// Requires a corpus with one token per line.
    pub fn predicted_line(&self) -> Option<usize> {
        self.position
            .start_line
            .map(|start_line| start_line + self.position.prep)
    }

    /// Map a 1-based candidate rank to the 1-based sentence index of
    /// the candidate.
    pub fn predicted_head(&self, rank: usize) -> Option<usize> {
        rank.checked_sub(1)
            .and_then(|idx| self.position.heads.get(idx))
            .map(|&head| head + 1)
    }

    /// The largest number of dependents of a single node in the PP.
    ///
    /// The head of the preposition counts as a node with the
    /// preposition as its only dependent.
    pub fn children_per_node_max(&self) -> usize {
        let mut counts = HashMap::new();
        for &parent in &self.pp_parents {
            *counts.entry(parent).or_insert(0) += 1;
        }

        counts.values().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Attachment, Position};

    pub(crate) fn attachment(pp_words: &[&str], pp_parents: &[usize]) -> Attachment {
        Attachment {
            heads: vec!["saw".to_string(), "man".to_string()],
            gold: Some(2),
            pp_words: pp_words.iter().map(ToString::to_string).collect(),
            pp_parents: pp_parents.to_vec(),
            heads_pos: None,
            heads_next: None,
            heads_next_pos: None,
            position: Position {
                start_line: Some(7),
                prep: 3,
                heads: vec![0, 2],
            },
        }
    }

    #[test]
    fn prep_and_child() {
        let attachment = attachment(&["with", "telescope"], &[0, 1]);
        assert_eq!(attachment.prep(), "with");
        assert_eq!(attachment.child(), "telescope");
    }

    #[test]
    fn predictions_map_to_source_positions() {
        let attachment = attachment(&["with", "telescope"], &[0, 1]);
        assert_eq!(attachment.predicted_line(), Some(10));
        assert_eq!(attachment.predicted_head(1), Some(1));
        assert_eq!(attachment.predicted_head(2), Some(3));
        assert_eq!(attachment.predicted_head(0), None);
        assert_eq!(attachment.predicted_head(3), None);
    }

    #[test]
    fn children_per_node() {
        assert_eq!(
            attachment(&["with", "telescope"], &[0, 1]).children_per_node_max(),
            1
        );
        assert_eq!(
            attachment(&["with", "telescope", "big", "old"], &[0, 1, 2, 2])
                .children_per_node_max(),
            2
        );
    }
}
