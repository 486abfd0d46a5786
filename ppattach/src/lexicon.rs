//! Lexicons for word coverage filtering.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io::BufRead;

use ndarray::{Array2, ArrayView1};

use crate::error::LexiconError;

/// A set of known words.
pub trait Lexicon {
    /// Check whether the lexicon contains `word`.
    fn contains(&self, word: &str) -> bool;
}

impl Lexicon for HashSet<String> {
    fn contains(&self, word: &str) -> bool {
        HashSet::contains(self, word)
    }
}

impl<V> Lexicon for HashMap<String, V> {
    fn contains(&self, word: &str) -> bool {
        self.contains_key(word)
    }
}

/// Word embeddings in the word2vec text format.
#[derive(Debug)]
pub struct WordVectors {
    indices: HashMap<String, usize>,
    vectors: Array2<f32>,
}

impl WordVectors {
    /// Read word embeddings in the word2vec text format.
    ///
    /// The optional `<words> <dims>` header is skipped. Lines with
    /// components that are not numbers are skipped with a warning.
    pub fn read_text<R>(read: R) -> Result<Self, LexiconError>
    where
        R: BufRead,
    {
        let mut indices = HashMap::new();
        let mut data = Vec::new();
        let mut dims = None;

        for (line_no, line) in read.lines().enumerate() {
            let line = line?;
            let mut parts = line.split_whitespace();

            let word = match parts.next() {
                Some(word) => word,
                None => continue,
            };

            let vector: Result<Vec<f32>, _> = parts.map(str::parse).collect();
            let vector = match vector {
                Ok(vector) => vector,
                Err(err) => {
                    log::warn!("Skipping vector on line {}: {}", line_no + 1, err);
                    continue;
                }
            };

            if line_no == 0 && vector.len() == 1 && word.parse::<usize>().is_ok() {
                continue;
            }

            let expected = *dims.get_or_insert(vector.len());
            if vector.len() != expected {
                return Err(LexiconError::Dimensionality {
                    line: line_no + 1,
                    expected,
                    found: vector.len(),
                });
            }

            let idx = indices.len();
            match indices.entry(word.to_owned()) {
                Entry::Occupied(_) => {
                    log::warn!("Duplicate word on line {}: {}", line_no + 1, word)
                }
                Entry::Vacant(entry) => {
                    entry.insert(idx);
                    data.extend(vector);
                }
            }
        }

        let dims = dims.ok_or(LexiconError::Empty)?;
        let vectors = Array2::from_shape_vec((indices.len(), dims), data)?;

        Ok(WordVectors { indices, vectors })
    }

    /// The number of words.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The dimensionality of the vectors.
    pub fn dims(&self) -> usize {
        self.vectors.ncols()
    }

    /// Get the vector of a word.
    pub fn vector(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        self.indices.get(word).map(|&idx| self.vectors.row(idx))
    }
}

impl Lexicon for WordVectors {
    fn contains(&self, word: &str) -> bool {
        self.indices.contains_key(word)
    }
}
