//! Lemmas from packed morphological analyses.
//!
//! Morphological analyses are packed as `L:<lemma>[||<feature>:<value>]*`,
//! for example `L:kitAb||G:m||N:s`. Some corpora prefix the analysis with
//! the token index and tag and suffix it with the head index, as in
//! `12-N-L:kl||G:m||N:s-14` or `49-P-L:l+-47`.

use thiserror::Error;

const LEMMA_MARKER: &str = "L:";

const FEATURE_SEPARATOR: &str = "||";

/// Escape that corpora use for a literal pipe in lemmas.
const PIPE_ESCAPE: &str = "PIPE";

/// The morphological analysis does not contain a lemma.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot find lemma marker in morphological analysis: '{morph}'")]
pub struct MalformedMorphError {
    pub morph: String,
}

/// Decode the lemma from a packed morphological analysis.
pub fn decode(morph: &str) -> Result<String, MalformedMorphError> {
    let start = morph
        .find(LEMMA_MARKER)
        .ok_or_else(|| MalformedMorphError {
            morph: morph.to_owned(),
        })?
        + LEMMA_MARKER.len();

    let rest = &morph[start..];

    let lemma = match rest.find(FEATURE_SEPARATOR) {
        Some(end) => &rest[..end],
        None => match head_suffix_start(rest) {
            Some(end) => &rest[..end],
            None => rest,
        },
    };

    Ok(lemma.replace(PIPE_ESCAPE, "|"))
}

/// Find the start of a trailing `-<digits>` head reference.
fn head_suffix_start(s: &str) -> Option<usize> {
    let digits_start = s.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits_start == s.len() {
        return None;
    }

    s[..digits_start]
        .ends_with('-')
        .then(|| digits_start - 1)
}

/// Check whether a packed analysis carries the given feature.
///
/// The feature is given in packed form, e.g. `DT:t`.
pub fn has_feature(morph: &str, feature: &str) -> bool {
    morph
        .split(FEATURE_SEPARATOR)
        .skip(1)
        .any(|f| f == feature)
}

/// Normalize an Arabic (Buckwalter) lemma.
///
/// A final alif maqsura `Y` is written as `y`. If `strip_clitic_marker`
/// is set, trailing `+` proclitic markers are removed first.
pub fn normalize(lemma: &str, strip_clitic_marker: bool) -> String {
    let lemma = if strip_clitic_marker {
        lemma.trim_end_matches('+')
    } else {
        lemma
    };

    match lemma.strip_suffix('Y') {
        Some(prefix) => format!("{}y", prefix),
        None => lemma.to_owned(),
    }
}
