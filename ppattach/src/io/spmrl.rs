use std::io::{BufRead, Lines};

use crate::dialect::Dialect;
use crate::error::ReadError;
use crate::io::check_tree;
use crate::sentence::Sentence;

/// Reader for treebanks in the SPMRL line format.
///
/// Every sentence is a block of tab-separated lines with the tokens,
/// part-of-speech tags, dependency labels, heads and optionally packed
/// morphological analyses. Blocks are separated by empty lines.
pub struct SpmrlReader<R> {
    lines: Lines<R>,
    line: usize,
    dialect: Dialect,
}

impl<R> SpmrlReader<R>
where
    R: BufRead,
{
    pub fn new(read: R, dialect: Dialect) -> Self {
        SpmrlReader {
            lines: read.lines(),
            line: 0,
            dialect,
        }
    }

    fn read_block(&mut self) -> Result<Option<(usize, Vec<String>)>, ReadError> {
        let mut block = Vec::new();
        let mut start = self.line;

        for line in &mut self.lines {
            let line = line?;
            self.line += 1;

            if line.trim().is_empty() {
                if block.is_empty() {
                    start = self.line;
                    continue;
                }

                break;
            }

            block.push(line);
        }

        if block.is_empty() {
            return Ok(None);
        }

        Ok(Some((start, block)))
    }

    fn parse_block(&self, start: usize, block: Vec<String>) -> Result<Sentence, ReadError> {
        if block.len() != 4 && block.len() != 5 {
            return Err(ReadError::Malformed {
                line: start + 1,
                message: format!("expected 4 or 5 annotation lines, found {}", block.len()),
            });
        }

        let mut layers = block
            .iter()
            .map(|line| line.split('\t').map(ToOwned::to_owned).collect::<Vec<_>>());

        let mut next_layer = || layers.next().unwrap_or_default();
        let tokens = next_layer();
        let poses = next_layer();
        let labels = next_layer();
        let parents = next_layer()
            .iter()
            .map(|head| {
                head.parse::<usize>().map_err(|err| ReadError::Malformed {
                    line: start + 4,
                    message: format!("cannot parse head '{}': {}", head, err),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let morphs = layers.next();

        let end = start + block.len();
        let sentence = Sentence::new(tokens, poses, labels, parents, self.dialect)
            .map_err(|source| ReadError::InvalidSentence { line: end, source })?;

        let mut sentence = match morphs {
            Some(morphs) => sentence
                .with_morphs(morphs)
                .map_err(|source| ReadError::InvalidSentence { line: end, source })?,
            None => sentence,
        };

        sentence
            .set_start_line(start)
            .map_err(|source| ReadError::InvalidSentence { line: end, source })?;

        check_tree(&sentence, start);

        Ok(sentence)
    }
}

impl<R> Iterator for SpmrlReader<R>
where
    R: BufRead,
{
    type Item = Result<Sentence, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_block() {
            Ok(Some((start, block))) => Some(self.parse_block(start, block)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
