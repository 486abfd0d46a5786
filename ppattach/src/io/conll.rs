use std::io::BufRead;

use conllu::io::{ReadSentence, Reader};
use serde::{Deserialize, Serialize};
use udgraph::graph::Sentence as DepSentence;

use crate::dialect::Dialect;
use crate::error::ReadError;
use crate::io::check_tree;
use crate::sentence::Sentence;

/// The column that holds the part-of-speech tags.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PosColumn {
    /// Coarse-grained tags (CoNLL-U UPOS, CoNLL-X CPOSTAG).
    Upos,

    /// Fine-grained tags (CoNLL-U XPOS, CoNLL-X POSTAG).
    Xpos,
}

impl PosColumn {
    /// The column that is conventionally used for a dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::English | Dialect::AtbStanford => PosColumn::Upos,
            _ => PosColumn::Xpos,
        }
    }
}

/// Reader for treebanks in the CoNLL-X or CoNLL-U format.
pub struct ConllReader<R> {
    reader: Reader<R>,
    dialect: Dialect,
    pos_column: PosColumn,
    lemmas: bool,
    lowercase: bool,
    line: usize,
    sentence: usize,
}

impl<R> ConllReader<R>
where
    R: BufRead,
{
    pub fn new(read: R, dialect: Dialect) -> Self {
        ConllReader {
            reader: Reader::new(read),
            dialect,
            pos_column: PosColumn::for_dialect(dialect),
            lemmas: false,
            lowercase: false,
            line: 0,
            sentence: 0,
        }
    }

    /// Read part-of-speech tags from the given column.
    pub fn pos_column(mut self, pos_column: PosColumn) -> Self {
        self.pos_column = pos_column;
        self
    }

    /// Read lemmas from the lemma column.
    pub fn lemmas(mut self, lemmas: bool) -> Self {
        self.lemmas = lemmas;
        self
    }

    /// Lowercase tokens.
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    fn convert(&self, dep_sentence: &DepSentence) -> Result<Sentence, ReadError> {
        let len = dep_sentence.len() - 1;
        let mut tokens = Vec::with_capacity(len);
        let mut poses = Vec::with_capacity(len);
        let mut labels = Vec::with_capacity(len);
        let mut parents = Vec::with_capacity(len);
        let mut lemmas = Vec::with_capacity(len);

        for idx in 1..dep_sentence.len() {
            let token = match dep_sentence[idx].token() {
                Some(token) => token,
                None => continue,
            };

            let missing = |layer| ReadError::MissingAnnotation {
                sentence: self.sentence,
                token: idx,
                layer,
            };

            let form = if self.lowercase {
                token.form().to_lowercase()
            } else {
                token.form().to_owned()
            };
            tokens.push(form);

            let pos = match self.pos_column {
                PosColumn::Upos => token.upos(),
                PosColumn::Xpos => token.xpos(),
            };
            poses.push(pos.ok_or_else(|| missing("a part-of-speech tag"))?.to_owned());

            let triple = dep_sentence
                .dep_graph()
                .head(idx)
                .ok_or_else(|| missing("a head"))?;
            parents.push(triple.head());
            labels.push(triple.relation().unwrap_or("_").to_owned());

            if self.lemmas {
                lemmas.push(token.lemma().unwrap_or_default().to_owned());
            }
        }

        let end = self.line + dep_sentence.comments().len() + len;
        let mut sentence = Sentence::new(tokens, poses, labels, parents, self.dialect)
            .map_err(|source| ReadError::InvalidSentence { line: end, source })?;

        if self.lemmas {
            sentence
                .set_lemmas(lemmas)
                .map_err(|source| ReadError::InvalidSentence { line: end, source })?;
        }

        let start = self.line + dep_sentence.comments().len();
        sentence
            .set_start_line(start)
            .map_err(|source| ReadError::InvalidSentence { line: end, source })?;

        check_tree(&sentence, start);

        Ok(sentence)
    }
}

impl<R> Iterator for ConllReader<R>
where
    R: BufRead,
{
    type Item = Result<Sentence, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let dep_sentence = match self.reader.read_sentence() {
            Ok(Some(dep_sentence)) => dep_sentence,
            Ok(None) => return None,
            Err(err) => return Some(Err(err.into())),
        };

        let sentence = self.convert(&dep_sentence);

        // Comments, tokens and the separating empty line.
        self.line += dep_sentence.comments().len() + dep_sentence.len();
        self.sentence += 1;

        Some(sentence)
    }
}
