//! Dependency-annotated sentences.

use std::fmt;
use std::ops::AddAssign;

use itertools::Itertools;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{node_index, DiGraph};
use thiserror::Error;

use crate::dialect::Dialect;
use crate::lemma;

/// Packed morphological feature that marks definiteness.
pub const DEFINITE_FEATURE: &str = "DT:t";

/// Sentence construction errors.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SentenceError {
    /// An annotation layer does not have one value per token.
    #[error("layer '{layer}' has {len} values, sentence has {expected} tokens")]
    LengthMismatch {
        layer: &'static str,
        len: usize,
        expected: usize,
    },

    /// The head of a token is not a token of the sentence.
    #[error("head {head} of token {token} is out of bounds (sentence length: {len})")]
    HeadOutOfBounds { token: usize, head: usize, len: usize },

    /// A one-time annotation was assigned twice.
    #[error("annotation '{0}' was already set")]
    AlreadySet(&'static str),
}

/// Numbers of left and right arcs in a sentence.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ArcDirections {
    /// Arcs where the head follows the dependent.
    pub left: usize,

    /// Arcs where the head precedes the dependent.
    pub right: usize,
}

impl AddAssign for ArcDirections {
    fn add_assign(&mut self, rhs: Self) {
        self.left += rhs.left;
        self.right += rhs.right;
    }
}

/// A dependency-annotated sentence.
///
/// Token annotations are stored as parallel layers. Heads use the
/// CoNLL convention: `0` is the root, otherwise the head is the
/// 1-based index of the governing token. All other indices passed to
/// and returned by methods are 0-based, unless documented otherwise.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sentence {
    tokens: Vec<String>,
    poses: Vec<String>,
    labels: Vec<String>,
    parents: Vec<usize>,
    morphs: Option<Vec<String>>,
    lemmas: Option<Vec<String>>,
    dialect: Dialect,
    start_line: Option<usize>,
}

impl Sentence {
    /// Construct a sentence from its annotation layers.
    pub fn new(
        tokens: Vec<String>,
        poses: Vec<String>,
        labels: Vec<String>,
        parents: Vec<usize>,
        dialect: Dialect,
    ) -> Result<Self, SentenceError> {
        let len = tokens.len();
        check_len("poses", poses.len(), len)?;
        check_len("labels", labels.len(), len)?;
        check_len("parents", parents.len(), len)?;

        if let Some((token, &head)) = parents.iter().enumerate().find(|(_, &head)| head > len) {
            return Err(SentenceError::HeadOutOfBounds { token, head, len });
        }

        Ok(Sentence {
            tokens,
            poses,
            labels,
            parents,
            morphs: None,
            lemmas: None,
            dialect,
            start_line: None,
        })
    }

    /// Add packed morphological analyses.
    ///
    /// The lemmas of the sentence are decoded from the analyses. A token
    /// whose analysis has no lemma gets an empty lemma.
    pub fn with_morphs(mut self, morphs: Vec<String>) -> Result<Self, SentenceError> {
        check_len("morphs", morphs.len(), self.len())?;

        let lemmas = morphs
            .iter()
            .map(|morph| {
                lemma::decode(morph).unwrap_or_else(|err| {
                    log::warn!("{}", err);
                    String::new()
                })
            })
            .collect();

        self.set_lemmas(lemmas)?;
        self.morphs = Some(morphs);

        Ok(self)
    }

    /// Set the lemmas of the sentence.
    ///
    /// Lemmas can only be set once.
    pub fn set_lemmas(&mut self, lemmas: Vec<String>) -> Result<(), SentenceError> {
        if self.lemmas.is_some() {
            return Err(SentenceError::AlreadySet("lemmas"));
        }
        check_len("lemmas", lemmas.len(), self.len())?;

        self.lemmas = Some(lemmas);

        Ok(())
    }

    /// Set the 0-based line in the source file where the sentence starts.
    pub fn set_start_line(&mut self, start_line: usize) -> Result<(), SentenceError> {
        if self.start_line.is_some() {
            return Err(SentenceError::AlreadySet("start line"));
        }

        self.start_line = Some(start_line);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn poses(&self) -> &[String] {
        &self.poses
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Heads of the tokens (1-based, `0` is the root).
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    pub fn morphs(&self) -> Option<&[String]> {
        self.morphs.as_deref()
    }

    pub fn start_line(&self) -> Option<usize> {
        self.start_line
    }

    /// Get the lemma of a token.
    ///
    /// If no lemmas were set and the dialect uses surface forms as
    /// lemmas, the token is returned.
    pub fn lemma(&self, idx: usize) -> Option<&str> {
        match &self.lemmas {
            Some(lemmas) => lemmas.get(idx).map(String::as_str),
            None if self.dialect.tokens_are_lemmas() => self.tokens.get(idx).map(String::as_str),
            None => None,
        }
    }

    /// Check whether lemmas are available, either set explicitly or
    /// through the tokens of the dialect.
    pub fn has_lemmas(&self) -> bool {
        self.lemmas.is_some() || self.dialect.tokens_are_lemmas()
    }

    /// Get the 0-based index of the head of a token.
    ///
    /// Returns `None` when the token is attached to the root or when
    /// `idx` is not a token of the sentence.
    pub fn parent(&self, idx: usize) -> Option<usize> {
        match self.parents.get(idx) {
            Some(&head) if head != 0 => Some(head - 1),
            _ => None,
        }
    }

    /// Get the dependents of a token.
    ///
    /// Both `idx` and the returned indices are 1-based, `0` is the
    /// root. Dependents are returned in sentence order.
    pub fn children_of(&self, idx: usize) -> Vec<usize> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, &head)| head == idx)
            .map(|(dependent, _)| dependent + 1)
            .collect()
    }

    /// Check whether `node` is `ancestor` or one of its descendants.
    ///
    /// Both indices are 1-based, `0` is the root. The walk up the head
    /// chain is bounded by the sentence length, so that a cyclic head
    /// chain results in `false`.
    pub fn is_reachable(&self, ancestor: usize, node: usize) -> bool {
        let mut node = node;

        for _ in 0..=self.len() {
            if node == ancestor {
                return true;
            }

            node = match node.checked_sub(1).and_then(|idx| self.parents.get(idx)) {
                Some(&head) => head,
                None => return false,
            };
        }

        false
    }

    /// Check whether the dependency tree is projective.
    ///
    /// A tree is projective when every token between a head and its
    /// dependent is dominated by the head.
    pub fn is_projective(&self) -> bool {
        for (idx, &head) in self.parents.iter().enumerate() {
            let dependent = idx + 1;

            if head == 0 {
                continue;
            }

            if head == dependent {
                log::error!("Token {} is its own head:\n{}", dependent, self);
                continue;
            }

            let (left, right) = if head < dependent {
                (head, dependent)
            } else {
                (dependent, head)
            };

            if !((left + 1)..right).all(|between| self.is_reachable(head, between)) {
                return false;
            }
        }

        true
    }

    /// Check whether a token is marked as definite.
    ///
    /// Tokens without a morphological analysis are not definite.
    pub fn is_definite(&self, idx: usize) -> bool {
        self.morphs
            .as_ref()
            .and_then(|morphs| morphs.get(idx))
            .map(|morph| lemma::has_feature(morph, DEFINITE_FEATURE))
            .unwrap_or(false)
    }

    /// Check whether two tokens agree in definiteness.
    pub fn det_agree(&self, idx1: usize, idx2: usize) -> bool {
        self.is_definite(idx1) == self.is_definite(idx2)
    }

    /// Check that the head chains of all tokens end in the root.
    pub fn is_tree(&self) -> bool {
        let mut graph = DiGraph::<(), ()>::with_capacity(self.len() + 1, self.len());
        for _ in 0..=self.len() {
            graph.add_node(());
        }

        for (idx, &head) in self.parents.iter().enumerate() {
            graph.add_edge(node_index(head), node_index(idx + 1), ());
        }

        !is_cyclic_directed(&graph)
    }

    /// Count left and right arcs, ignoring attachments to the root.
    pub fn arc_directions(&self) -> ArcDirections {
        let mut directions = ArcDirections::default();

        for (idx, &head) in self.parents.iter().enumerate() {
            let dependent = idx + 1;
            if head == 0 {
                continue;
            }

            if head > dependent {
                directions.left += 1;
            } else if head < dependent {
                directions.right += 1;
            } else {
                log::warn!("Token {} is its own head", dependent);
            }
        }

        directions
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.tokens.join("\t"))?;
        writeln!(f, "{}", self.poses.join("\t"))?;
        writeln!(f, "{}", self.labels.join("\t"))?;

        writeln!(f, "{}", self.parents.iter().join("\t"))?;

        if let Some(morphs) = &self.morphs {
            writeln!(f, "{}", morphs.join("\t"))?;
        }

        Ok(())
    }
}

fn check_len(layer: &'static str, len: usize, expected: usize) -> Result<(), SentenceError> {
    if len != expected {
        return Err(SentenceError::LengthMismatch {
            layer,
            len,
            expected,
        });
    }

    Ok(())
}
