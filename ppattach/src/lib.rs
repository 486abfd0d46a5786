//! Prepositional phrase attachment samples from dependency treebanks.
//!
//! Sentences are read from SPMRL or CoNLL treebanks. For every
//! preposition, the [`Extractor`](extract::Extractor) collects the
//! nouns and verbs that precede it as candidate heads, records the
//! rank of the gold governor and extracts the words of the
//! prepositional phrase.

pub mod attachment;

pub mod config;

pub mod dialect;

pub mod error;

pub mod eval;

pub mod extract;

pub mod io;

pub mod lemma;

pub mod lexicon;

pub mod sentence;
