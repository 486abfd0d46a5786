//! Extraction of PP-attachment samples from dependency trees.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attachment::{Attachment, Position};
use crate::dialect::Dialect;
use crate::error::ConfigError;
use crate::lemma;
use crate::lexicon::Lexicon;
use crate::sentence::Sentence;

pub mod candidates;
use candidates::{candidate_heads, window_nouns};

mod filter;

pub mod quadruple;
use quadruple::{quadruple, verb_preps};

pub mod subtree;
use subtree::Subtree;

pub mod validity;
pub use validity::is_valid_instance;

/// The phrase that is extracted for a preposition.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// The preposition and its child.
    Minimal,

    /// The preposition and every following token that it dominates.
    FullSubtree,

    /// The preposition, its child and its grandchild.
    ChildGrandchild,

    /// The preposition, its child and agreeing adjectives or annexed
    /// nouns.
    ExtendedNp,

    /// A verb, the single noun that follows it, a preposition and the
    /// noun child of the preposition. The candidate heads are the verb
    /// and the noun.
    Quadruple,
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Minimal
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Variant::*;
        let name = match self {
            Minimal => "minimal",
            FullSubtree => "full_subtree",
            ChildGrandchild => "child_grandchild",
            ExtendedNp => "extended_np",
            Quadruple => "quadruple",
        };
        f.write_str(name)
    }
}

/// How the child of a preposition is found.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildSource {
    /// The token that follows the preposition.
    Adjacent,

    /// Every dependent of the preposition, each giving a sample.
    Dependents,
}

impl Default for ChildSource {
    fn default() -> Self {
        ChildSource::Adjacent
    }
}

/// The representation of extracted words.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WordForm {
    Form,
    Lemma,
}

impl Default for WordForm {
    fn default() -> Self {
        WordForm::Form
    }
}

/// The representation of the part-of-speech of candidate heads.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PosEncoding {
    /// The tag itself.
    Tag,

    /// `1` for verbs and `-1` for nouns.
    VerbNoun,
}

impl Default for PosEncoding {
    fn default() -> Self {
        PosEncoding::Tag
    }
}

/// The words of a sample that must be in the lexicon.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    /// Candidate heads and the words of the phrase.
    All,

    /// Only the candidate heads.
    Heads,
}

impl Default for Coverage {
    fn default() -> Self {
        Coverage::All
    }
}

/// Extraction configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    #[serde(default)]
    pub variant: Variant,

    #[serde(default)]
    pub child: ChildSource,

    /// Maximum distance between a preposition and its governor. This
    /// is also the size of the window in which candidate heads are
    /// searched. Quadruples use it as the maximum distance between the
    /// verb and the preposition.
    #[serde(default = "default_max_head_distance")]
    pub max_head_distance: usize,

    /// Maximum distance between a preposition and its child.
    #[serde(default)]
    pub max_child_distance: Option<usize>,

    /// Maximum number of words that a full sub-tree may add to the
    /// preposition.
    #[serde(default)]
    pub max_span: Option<usize>,

    #[serde(default)]
    pub words: WordForm,

    /// Extract the words that follow the candidate heads.
    #[serde(default)]
    pub heads_next: bool,

    /// Extract the part-of-speech tags of the candidate heads.
    #[serde(default)]
    pub heads_pos: bool,

    #[serde(default)]
    pub heads_pos_encoding: PosEncoding,

    /// Extract the part-of-speech tags of the words that follow the
    /// candidate heads.
    #[serde(default)]
    pub heads_next_pos: bool,

    /// Reject samples with more than one noun in the head window.
    #[serde(default)]
    pub single_intervening_noun: bool,

    /// Skip sentences with a non-projective dependency tree.
    #[serde(default)]
    pub projective_only: bool,

    #[serde(default)]
    pub coverage: Coverage,

    /// Maximum number of dependents of a word in the phrase.
    #[serde(default)]
    pub max_children: Option<usize>,
}

fn default_max_head_distance() -> usize {
    10
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            variant: Variant::default(),
            child: ChildSource::default(),
            max_head_distance: default_max_head_distance(),
            max_child_distance: None,
            max_span: None,
            words: WordForm::default(),
            heads_next: false,
            heads_pos: false,
            heads_pos_encoding: PosEncoding::default(),
            heads_next_pos: false,
            single_intervening_noun: false,
            projective_only: false,
            coverage: Coverage::default(),
            max_children: None,
        }
    }
}

/// Inconsistency found during extraction.
///
/// Token indices are 0-based. The instance that a diagnostic refers to
/// is skipped.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Diagnostic {
    #[error("token {child} is not a dependent of preposition {prep}")]
    ChildParentMismatch { prep: usize, child: usize },

    #[error("sentence has dialect '{found}', expected '{expected}'")]
    DialectMismatch { expected: Dialect, found: Dialect },

    #[error("preposition {prep} does not have a child")]
    MissingChild { prep: usize },

    #[error("lemmas are extracted, but the sentence does not have lemmas")]
    MissingLemmas,

    #[error("preposition {prep} is its own head")]
    SelfAttachment { prep: usize },

    #[error("head of token {token} is outside the phrase of preposition {prep}")]
    SpanEscape { prep: usize, token: usize },
}

/// Whether a Buckwalter lemma loses its trailing proclitic marker.
#[derive(Clone, Copy, Eq, PartialEq)]
enum Strip {
    Keep,
    CliticMarker,
}

/// PP-attachment sample extractor.
pub struct Extractor<'a> {
    config: ExtractConfig,
    dialect: Dialect,
    lexicon: Option<&'a (dyn Lexicon + Sync)>,
}

impl<'a> Extractor<'a> {
    /// Construct an extractor for sentences of the given dialect.
    pub fn new(config: ExtractConfig, dialect: Dialect) -> Result<Self, ConfigError> {
        if config.max_head_distance == 0 {
            return Err(ConfigError::ZeroHeadDistance);
        }

        if config.variant == Variant::ChildGrandchild && config.max_span.is_some() {
            return Err(ConfigError::ChildGrandchildWithSpan);
        }

        if !matches!(config.variant, Variant::Minimal | Variant::Quadruple)
            && config.child == ChildSource::Dependents
        {
            return Err(ConfigError::RequiresAdjacentChild {
                variant: config.variant,
            });
        }

        if config.variant == Variant::ExtendedNp && !dialect.supports_adjectives() {
            return Err(ConfigError::NoAdjectives(dialect));
        }

        Ok(Extractor {
            config,
            dialect,
            lexicon: None,
        })
    }

    /// Only extract samples whose words are in the lexicon.
    pub fn with_lexicon(mut self, lexicon: &'a (dyn Lexicon + Sync)) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Extract the samples of a sentence.
    ///
    /// Samples are extracted lazily, in the order of their
    /// prepositions. Quadruples are extracted in the order of their
    /// verbs.
    pub fn attachments<'s>(&'s self, sentence: &'s Sentence) -> Attachments<'s, 'a> {
        Attachments {
            extractor: self,
            sentence,
            checked_sentence: false,
            next_token: 0,
            prep: 0,
            children: Vec::new().into_iter(),
        }
    }

    /// Count the verb and preposition pairs of a sentence.
    ///
    /// Every preposition that depends on a verb gives a pair. Verbs
    /// without preposition dependents are paired with `None`. Verbs
    /// with an empty word are skipped.
    pub fn verb_prep_counts(&self, sentence: &Sentence) -> HashMap<(String, Option<String>), usize> {
        let mut counts = HashMap::new();

        for (verb, prep) in verb_preps(sentence, self.dialect) {
            let verb = self.word(sentence, verb, Strip::Keep);
            if verb.trim().is_empty() {
                continue;
            }

            let prep = prep.map(|prep| self.word(sentence, prep, Strip::CliticMarker));
            *counts.entry((verb, prep)).or_insert(0) += 1;
        }

        counts
    }

    /// Check whether samples can be extracted from a sentence at all.
    fn check_sentence(&self, sentence: &Sentence) -> Result<bool, Diagnostic> {
        if sentence.dialect() != self.dialect {
            return Err(Diagnostic::DialectMismatch {
                expected: self.dialect,
                found: sentence.dialect(),
            });
        }

        if self.config.words == WordForm::Lemma && !sentence.has_lemmas() {
            return Err(Diagnostic::MissingLemmas);
        }

        if self.config.projective_only && !sentence.is_projective() {
            log::debug!("Skipping non-projective sentence:\n{}", sentence);
            return Ok(false);
        }

        Ok(true)
    }

    /// Get the children of a preposition that can form a sample.
    fn prep_children(&self, sentence: &Sentence, prep: usize) -> Result<Vec<usize>, Diagnostic> {
        if !self.dialect.is_prep(&sentence.poses()[prep]) {
            return Ok(Vec::new());
        }

        if sentence.parent(prep) == Some(prep) {
            return Err(Diagnostic::SelfAttachment { prep });
        }

        if !validity::governor_is_valid(sentence, self.dialect, prep, self.config.max_head_distance)
        {
            log::trace!("Governor of preposition {} is not a candidate", prep);
            return Ok(Vec::new());
        }

        let children: Vec<usize> = match self.config.child {
            ChildSource::Adjacent => Some(prep + 1)
                .filter(|&child| child < sentence.len())
                .into_iter()
                .collect(),
            ChildSource::Dependents => sentence
                .children_of(prep + 1)
                .into_iter()
                .map(|child| child - 1)
                .collect(),
        };

        if children.is_empty() {
            return Err(Diagnostic::MissingChild { prep });
        }

        Ok(children)
    }

    fn extract(
        &self,
        sentence: &Sentence,
        prep: usize,
        child: usize,
    ) -> Result<Option<Attachment>, Diagnostic> {
        if !validity::child_is_valid(
            sentence,
            self.dialect,
            prep,
            child,
            self.config.max_child_distance,
            self.config.child == ChildSource::Dependents,
        )? {
            log::trace!("Child {} of preposition {} is not a noun", child, prep);
            return Ok(None);
        }

        let subtree = match self.subtree(sentence, prep, child)? {
            Some(subtree) => subtree,
            None => return Ok(None),
        };

        let candidates = candidate_heads(sentence, self.dialect, prep, self.config.max_head_distance);
        if candidates.len() <= 1 {
            log::trace!("Preposition {} has an unambiguous attachment", prep);
            return Ok(None);
        }

        if self.config.single_intervening_noun
            && window_nouns(sentence, self.dialect, prep, self.config.max_head_distance) > 1
        {
            log::trace!("Preposition {} has more than one preceding noun", prep);
            return Ok(None);
        }

        if candidates.gold.is_none() {
            log::warn!(
                "Could not find the governor of preposition {} among the candidates:\n{}",
                prep,
                sentence
            );
        }

        Ok(self.sample(sentence, candidates.indices, candidates.gold, subtree))
    }

    /// Extract the quadruple that starts with a verb.
    fn extract_quadruple(&self, sentence: &Sentence, verb: usize) -> Option<Attachment> {
        let quadruple = quadruple(
            sentence,
            self.dialect,
            verb,
            self.config.max_head_distance,
            self.config.child == ChildSource::Dependents,
        )?;

        let gold = if quadruple.noun_attachment { 2 } else { 1 };

        self.sample(
            sentence,
            vec![quadruple.verb, quadruple.noun],
            Some(gold),
            subtree::minimal(quadruple.prep, quadruple.child),
        )
    }

    /// Construct a sample from its candidate heads and phrase.
    ///
    /// Returns `None` when the sample has an empty word or is filtered.
    fn sample(
        &self,
        sentence: &Sentence,
        heads: Vec<usize>,
        gold: Option<usize>,
        subtree: Subtree,
    ) -> Option<Attachment> {
        let prep = subtree.indices[0];

        let head_words: Vec<String> = heads
            .iter()
            .map(|&idx| self.word(sentence, idx, Strip::Keep))
            .collect();
        let pp_words: Vec<String> = subtree
            .indices
            .iter()
            .enumerate()
            .map(|(position, &idx)| self.word(sentence, idx, self.phrase_strip(position)))
            .collect();

        if filter::has_empty_word(head_words.iter().chain(&pp_words)) {
            log::trace!("Sample of preposition {} has an empty word", prep);
            return None;
        }

        let attachment = Attachment {
            heads_pos: self.config.heads_pos.then(|| {
                heads
                    .iter()
                    .map(|&idx| self.head_pos(&sentence.poses()[idx]))
                    .collect()
            }),
            heads_next: self.config.heads_next.then(|| {
                heads
                    .iter()
                    .map(|&idx| self.word(sentence, idx + 1, Strip::CliticMarker))
                    .collect()
            }),
            heads_next_pos: self.config.heads_next_pos.then(|| {
                heads
                    .iter()
                    .map(|&idx| sentence.poses()[idx + 1].clone())
                    .collect()
            }),
            heads: head_words,
            gold,
            pp_words,
            pp_parents: subtree.parents,
            position: Position {
                start_line: sentence.start_line(),
                prep,
                heads,
            },
        };

        if let Some(max_children) = self.config.max_children {
            if attachment.children_per_node_max() > max_children {
                log::trace!("Phrase of preposition {} has too many dependents", prep);
                return None;
            }
        }

        if let Some(lexicon) = self.lexicon {
            if !filter::is_covered(lexicon, self.config.coverage, &attachment) {
                log::trace!("Sample of preposition {} is not covered by the lexicon", prep);
                return None;
            }
        }

        Some(attachment)
    }

    fn subtree(
        &self,
        sentence: &Sentence,
        prep: usize,
        child: usize,
    ) -> Result<Option<Subtree>, Diagnostic> {
        match self.config.variant {
            Variant::Minimal | Variant::Quadruple => Ok(Some(subtree::minimal(prep, child))),
            Variant::FullSubtree => subtree::full_subtree(sentence, prep, self.config.max_span),
            Variant::ChildGrandchild => subtree::child_grandchild(sentence, prep).map(Some),
            Variant::ExtendedNp => Ok(Some(subtree::extended_np(
                sentence,
                self.dialect,
                prep,
                child,
            ))),
        }
    }

    /// Full sub-trees only strip the marker from the preposition.
    fn phrase_strip(&self, position: usize) -> Strip {
        if position == 0 || self.config.variant != Variant::FullSubtree {
            Strip::CliticMarker
        } else {
            Strip::Keep
        }
    }

    fn head_pos(&self, tag: &str) -> String {
        match self.config.heads_pos_encoding {
            PosEncoding::Tag => tag.to_owned(),
            PosEncoding::VerbNoun if self.dialect.is_verb(tag) => "1".to_owned(),
            PosEncoding::VerbNoun => "-1".to_owned(),
        }
    }

    fn word(&self, sentence: &Sentence, idx: usize, strip: Strip) -> String {
        match self.config.words {
            WordForm::Form => sentence.tokens()[idx].clone(),
            WordForm::Lemma => {
                let lemma = sentence.lemma(idx).unwrap_or_default();
                if sentence.dialect().has_buckwalter_lemmas() {
                    lemma::normalize(lemma, strip == Strip::CliticMarker)
                } else {
                    lemma.to_owned()
                }
            }
        }
    }
}

/// Iterator over the samples of a sentence.
pub struct Attachments<'s, 'a> {
    extractor: &'s Extractor<'a>,
    sentence: &'s Sentence,
    checked_sentence: bool,
    next_token: usize,
    prep: usize,
    children: std::vec::IntoIter<usize>,
}

impl<'s, 'a> Attachments<'s, 'a> {
    fn next_quadruple(&mut self) -> Option<Attachment> {
        while self.next_token < self.sentence.len() {
            let verb = self.next_token;
            self.next_token += 1;

            if let Some(attachment) = self.extractor.extract_quadruple(self.sentence, verb) {
                return Some(attachment);
            }
        }

        None
    }
}

impl<'s, 'a> Iterator for Attachments<'s, 'a> {
    type Item = Result<Attachment, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.checked_sentence {
            self.checked_sentence = true;

            match self.extractor.check_sentence(self.sentence) {
                Ok(true) => (),
                Ok(false) => self.next_token = self.sentence.len(),
                Err(diagnostic) => {
                    self.next_token = self.sentence.len();
                    return Some(Err(diagnostic));
                }
            }
        }

        if self.extractor.config.variant == Variant::Quadruple {
            return self.next_quadruple().map(Ok);
        }

        loop {
            for child in &mut self.children {
                match self.extractor.extract(self.sentence, self.prep, child) {
                    Ok(Some(attachment)) => return Some(Ok(attachment)),
                    Ok(None) => (),
                    Err(diagnostic) => return Some(Err(diagnostic)),
                }
            }

            if self.next_token >= self.sentence.len() {
                return None;
            }

            self.prep = self.next_token;
            self.next_token += 1;

            match self.extractor.prep_children(self.sentence, self.prep) {
                Ok(children) => self.children = children.into_iter(),
                Err(diagnostic) => return Some(Err(diagnostic)),
            }
        }
    }
}
