use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use ppattach::config::{Config, CorpusConfig, TomlRead};
use ppattach::error::ReadError;
use ppattach::extract::Extractor;
use ppattach::lexicon::{Lexicon, WordVectors};
use ppattach::sentence::Sentence;

use crate::progress::ReadProgress;

pub fn load_config(config_path: &str) -> Result<Config> {
    let config_file = File::open(config_path)
        .context(format!("Cannot open configuration file '{}'", &config_path))?;
    let mut config = Config::from_toml_read(config_file)
        .context(format!("Cannot parse configuration file: {}", config_path))?;
    config.relativize_paths(config_path).context(format!(
        "Cannot relativize paths in configuration file: {}",
        config_path
    ))?;

    Ok(config)
}

/// Load the word embeddings of the coverage filter, if configured.
pub fn load_lexicon(config: &Config) -> Result<Option<WordVectors>> {
    let path = match config.lexicon {
        Some(ref path) => path,
        None => return Ok(None),
    };

    let f = File::open(path).context(format!("Cannot open lexicon file: {}", path))?;
    let lexicon = WordVectors::read_text(BufReader::new(f))
        .context(format!("Cannot read lexicon from: {}", path))?;

    log::info!(
        "Loaded lexicon with {} words ({} dimensions)",
        lexicon.len(),
        lexicon.dims()
    );

    Ok(Some(lexicon))
}

/// Construct the extractor of a configuration.
///
/// Samples are restricted to the lexicon when one is given. Every
/// subcommand that numbers samples must construct its extractor here,
/// so that the numbering agrees between subcommands.
pub fn extractor<'a, L>(config: &Config, lexicon: Option<&'a L>) -> Result<Extractor<'a>>
where
    L: Lexicon + Sync,
{
    let extractor = config
        .extractor()
        .context("Invalid extraction configuration")?;

    Ok(match lexicon {
        Some(lexicon) => extractor.with_lexicon(lexicon),
        None => extractor,
    })
}

/// Read all sentences of a treebank.
///
/// Sentences that cannot be constructed are logged and replaced by
/// `None`, so that the positions of the other sentences are retained.
pub fn read_treebank(config: &CorpusConfig, path: &str) -> Result<Vec<Option<Sentence>>> {
    let f = File::open(path).context(format!("Cannot open treebank: {}", path))?;
    let read = BufReader::new(
        ReadProgress::new(f).context(format!("Cannot determine size of treebank: {}", path))?,
    );

    let mut sentences = Vec::new();
    for sentence in config.sentences(read) {
        match sentence {
            Ok(sentence) => sentences.push(Some(sentence)),
            Err(
                err @ ReadError::InvalidSentence { .. }
                | err @ ReadError::Malformed { .. }
                | err @ ReadError::MissingAnnotation { .. },
            ) => {
                log::error!("Skipping sentence in {}: {}", path, err);
                sentences.push(None);
            }
            Err(err) => return Err(err).context(format!("Cannot read treebank: {}", path)),
        }
    }

    Ok(sentences)
}
