use std::io::{BufRead, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::{ConfigError, PpAttachError, ReadError};
use crate::extract::{ExtractConfig, Extractor, WordForm};
use crate::io::{ConllReader, PosColumn, SpmrlReader};
use crate::sentence::Sentence;

/// Treebank file format.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// CoNLL-X or CoNLL-U.
    Conll,

    /// SPMRL line format.
    Spmrl,
}

/// Corpus configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    /// The treebank format.
    pub format: Format,

    /// The part-of-speech tag set.
    pub dialect: Dialect,

    /// CoNLL column with the part-of-speech tags.
    ///
    /// Defaults to the conventional column of the dialect.
    #[serde(default)]
    pub pos_column: Option<PosColumn>,

    /// Read lemmas from the CoNLL lemma column.
    #[serde(default)]
    pub lemmas: bool,

    /// Lowercase CoNLL tokens.
    #[serde(default)]
    pub lowercase: bool,
}

impl CorpusConfig {
    /// Read the sentences of a treebank.
    pub fn sentences<'a, R>(
        &self,
        read: R,
    ) -> Box<dyn Iterator<Item = Result<Sentence, ReadError>> + 'a>
    where
        R: BufRead + 'a,
    {
        match self.format {
            Format::Conll => {
                let pos_column = self
                    .pos_column
                    .unwrap_or_else(|| PosColumn::for_dialect(self.dialect));
                Box::new(
                    ConllReader::new(read, self.dialect)
                        .pos_column(pos_column)
                        .lemmas(self.lemmas)
                        .lowercase(self.lowercase),
                )
            }
            Format::Spmrl => Box::new(SpmrlReader::new(read, self.dialect)),
        }
    }

    /// Check whether sentences of this corpus can carry lemmas.
    ///
    /// SPMRL sentences carry lemmas when they have morphological
    /// analyses, which can only be checked per sentence.
    pub fn provides_lemmas(&self) -> bool {
        match self.format {
            Format::Conll => self.lemmas || self.dialect.tokens_are_lemmas(),
            Format::Spmrl => true,
        }
    }
}

/// Attachment extraction configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Configuration of the treebank.
    pub corpus: CorpusConfig,

    /// Configuration of the extractor.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Word embeddings in word2vec text format for the coverage filter.
    pub lexicon: Option<String>,
}

impl Config {
    /// Make configuration paths relative to the configuration file.
    pub fn relativize_paths<P>(&mut self, config_path: P) -> Result<(), PpAttachError>
    where
        P: AsRef<Path>,
    {
        let config_path = config_path.as_ref();

        if let Some(ref mut lexicon) = self.lexicon {
            *lexicon = relativize_path(config_path, lexicon)?;
        }

        Ok(())
    }

    /// Construct an extractor without a lexicon.
    ///
    /// Fails when extraction options are incompatible with each other or
    /// with the corpus.
    pub fn extractor<'a>(&self) -> Result<Extractor<'a>, ConfigError> {
        if self.extract.words == WordForm::Lemma && !self.corpus.provides_lemmas() {
            return Err(ConfigError::NoLemmas(self.corpus.dialect));
        }

        Extractor::new(self.extract.clone(), self.corpus.dialect)
    }
}

pub trait TomlRead
where
    Self: Sized,
{
    fn from_toml_read(read: impl Read) -> Result<Self, PpAttachError>;
}

impl TomlRead for Config {
    fn from_toml_read(mut read: impl Read) -> Result<Self, PpAttachError> {
        let mut data = String::new();
        read.read_to_string(&mut data)?;
        let table: toml::Table = toml::from_str(&data)?;

        // Report unknown dialects as such, rather than as a generic
        // deserialization error.
        if let Some(dialect) = table
            .get("corpus")
            .and_then(|corpus| corpus.get("dialect"))
            .and_then(toml::Value::as_str)
        {
            dialect.parse::<Dialect>().map_err(ConfigError::from)?;
        }

        let config: Config = toml::Value::Table(table).try_into()?;
        Ok(config)
    }
}

fn relativize_path(config_path: &Path, filename: &str) -> Result<String, PpAttachError> {
    if filename.is_empty() {
        return Ok(filename.to_owned());
    }

    let path = Path::new(&filename);

    // Don't touch absolute paths.
    if path.is_absolute() {
        return Ok(filename.to_owned());
    }

    let abs_config_path = config_path.canonicalize()?;
    Ok(abs_config_path
        .parent()
        .ok_or_else(|| {
            PpAttachError::RelativizePathError(format!(
                "Cannot get parent path of the configuration file: {}",
                abs_config_path.to_string_lossy()
            ))
        })?
        .join(path)
        .to_str()
        .ok_or_else(|| {
            PpAttachError::RelativizePathError(format!(
                "Cannot convert parent path to string: {}",
                abs_config_path.to_string_lossy()
            ))
        })?
        .to_owned())
}
