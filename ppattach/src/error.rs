use std::io;

use ndarray::ShapeError;
use thiserror::Error;

use crate::dialect::{Dialect, UnsupportedDialectError};
use crate::extract::Variant;
use crate::lemma::MalformedMorphError;
use crate::sentence::SentenceError;

/// Invalid extraction configuration.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    #[error("the child-grandchild variant does not support a maximum span")]
    ChildGrandchildWithSpan,

    #[error("variant '{variant}' requires the child that follows the preposition")]
    RequiresAdjacentChild { variant: Variant },

    #[error("the extended noun phrase variant requires adjectives, which dialect '{0}' lacks")]
    NoAdjectives(Dialect),

    #[error("lemmas are extracted, but CoNLL corpora of dialect '{0}' only provide them with `lemmas = true`")]
    NoLemmas(Dialect),

    #[error("the maximum head distance must be positive")]
    ZeroHeadDistance,

    #[error(transparent)]
    UnsupportedDialect(#[from] UnsupportedDialectError),
}

/// Corpus reading errors.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Conllu(#[from] conllu::Error),

    #[error("sentence ending at line {line}: {source}")]
    InvalidSentence {
        line: usize,
        #[source]
        source: SentenceError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("token {token} of sentence {sentence} lacks {layer}")]
    MissingAnnotation {
        sentence: usize,
        token: usize,
        layer: &'static str,
    },
}

/// Lexicon reading errors.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("line {line}: expected a vector of {expected} components, got {found}")]
    Dimensionality {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("the lexicon does not contain any vectors")]
    Empty,

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Gold/prediction comparison errors.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EvalError {
    #[error("gold sentence has {gold} tokens, predicted sentence has {pred}")]
    LengthMismatch { gold: usize, pred: usize },
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PpAttachError {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    EvalError(#[from] EvalError),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    LexiconError(#[from] LexiconError),

    #[error(transparent)]
    MalformedMorphError(#[from] MalformedMorphError),

    #[error(transparent)]
    ReadError(#[from] ReadError),

    #[error("Cannot relativize path: {0}")]
    RelativizePathError(String),

    #[error(transparent)]
    SentenceError(#[from] SentenceError),

    #[error(transparent)]
    TomlDeserializationError(#[from] toml::de::Error),

    #[error(transparent)]
    UnsupportedDialectError(#[from] UnsupportedDialectError),
}
