use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{self, Write};

use ndarray::Array1;
use ppattach::attachment::Attachment;
use ppattach::extract::Extractor;
use ppattach::sentence::{ArcDirections, Sentence};

/// Marker for verbs without preposition dependents.
const NO_PREP: &str = "na";

/// Summary statistics of extracted samples.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachmentStats {
    pub n_attachments: usize,
    pub heads_mean: f32,
    pub heads_std: f32,
    pub vocab_heads: usize,
    pub vocab_preps: usize,
    pub vocab_children: usize,
    pub vocab_first_children: usize,
    pub vocab_all: usize,
}

impl AttachmentStats {
    pub fn new(attachments: &[Attachment]) -> Self {
        let n_heads: Array1<f32> = attachments
            .iter()
            .map(|attachment| attachment.heads().len() as f32)
            .collect();
        let (heads_mean, heads_std) = match n_heads.mean() {
            Some(mean) => (mean, n_heads.std(0.)),
            None => (0., 0.),
        };

        let mut heads = HashSet::new();
        let mut preps = HashSet::new();
        let mut children = HashSet::new();
        let mut first_children = HashSet::new();
        for attachment in attachments {
            heads.extend(attachment.heads().iter().map(String::as_str));
            preps.insert(attachment.prep());
            first_children.insert(attachment.child());
            children.extend(attachment.pp_words()[1..].iter().map(String::as_str));
        }

        // Heads, prepositions and first children.
        let vocab_all = heads
            .iter()
            .chain(preps.iter())
            .chain(first_children.iter())
            .collect::<HashSet<_>>()
            .len();

        AttachmentStats {
            n_attachments: attachments.len(),
            heads_mean,
            heads_std,
            vocab_heads: heads.len(),
            vocab_preps: preps.len(),
            vocab_children: children.len(),
            vocab_first_children: first_children.len(),
            vocab_all,
        }
    }
}

impl fmt::Display for AttachmentStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Attachments: {}", self.n_attachments)?;
        writeln!(
            f,
            "Candidate heads: {:.2} (std: {:.2})",
            self.heads_mean, self.heads_std
        )?;
        write!(
            f,
            "Vocabulary sizes: heads: {}, preps: {}, children: {}, first children: {}, heads+preps+first children: {}",
            self.vocab_heads,
            self.vocab_preps,
            self.vocab_children,
            self.vocab_first_children,
            self.vocab_all
        )
    }
}

/// Summary statistics of the trees of a treebank.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreebankStats {
    pub n_sentences: usize,
    pub n_non_projective: usize,
    pub arcs: ArcDirections,
    pub verb_preps: HashMap<(String, Option<String>), usize>,
}

impl TreebankStats {
    pub fn new(extractor: &Extractor<'_>, sentences: &[Sentence]) -> Self {
        let mut stats = TreebankStats::default();

        for sentence in sentences {
            stats.n_sentences += 1;
            if !sentence.is_projective() {
                stats.n_non_projective += 1;
            }
            stats.arcs += sentence.arc_directions();

            for (pair, count) in extractor.verb_prep_counts(sentence) {
                *stats.verb_preps.entry(pair).or_insert(0) += count;
            }
        }

        stats
    }

    /// Write verb and preposition counts, most frequent first.
    pub fn write_verb_preps(&self, mut write: impl Write) -> io::Result<()> {
        let mut counts: Vec<_> = self.verb_preps.iter().collect();
        counts.sort_by(|(pair1, count1), (pair2, count2)| {
            count2.cmp(count1).then_with(|| pair1.cmp(pair2))
        });

        for ((verb, prep), count) in counts {
            writeln!(
                write,
                "{}\t{}\t{}",
                verb,
                prep.as_deref().unwrap_or(NO_PREP),
                count
            )?;
        }

        write.flush()
    }
}

impl fmt::Display for TreebankStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Sentences: {} ({} non-projective)",
            self.n_sentences, self.n_non_projective
        )?;
        writeln!(
            f,
            "Arcs: left: {}, right: {}",
            self.arcs.left, self.arcs.right
        )?;
        write!(f, "Verb-preposition pairs: {}", self.verb_preps.len())
    }
}
