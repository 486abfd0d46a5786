//! Verb, noun, preposition and noun quadruples.

use crate::dialect::Dialect;
use crate::sentence::Sentence;

/// 0-based sentence indices of a quadruple.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Quadruple {
    pub verb: usize,
    pub noun: usize,
    pub prep: usize,
    pub child: usize,

    /// The preposition is governed by the noun rather than the verb.
    pub noun_attachment: bool,
}

/// Find the quadruple that starts with the given verb.
///
/// The preposition must follow the verb within `window` tokens, without
/// an intervening verb, and its child must be a noun. Exactly one noun
/// may occur between the verb and the preposition. The preposition must
/// be governed by either the verb or the noun.
///
/// If `dependents` is set, a noun dependent of the preposition is used
/// as the child when the token that follows the preposition is not.
pub fn quadruple(
    sentence: &Sentence,
    dialect: Dialect,
    verb: usize,
    window: usize,
    dependents: bool,
) -> Option<Quadruple> {
    let poses = sentence.poses();
    if !dialect.is_verb(&poses[verb]) {
        return None;
    }

    // Use the last of consecutive verbs.
    if verb + 1 < sentence.len() && dialect.is_verb(&poses[verb + 1]) {
        return None;
    }

    let (prep, child) = prep_with_noun_child(sentence, dialect, verb, window, dependents)?;

    let mut nouns = (verb + 1..prep).filter(|&idx| dialect.is_noun(&poses[idx]));
    let noun = nouns.next()?;
    if nouns.next().is_some() {
        log::trace!("More than one noun between verb {} and preposition {}", verb, prep);
        return None;
    }

    let noun_attachment = match sentence.parent(prep) {
        Some(governor) if governor == noun => true,
        Some(governor) if governor == verb => false,
        _ => return None,
    };

    Some(Quadruple {
        verb,
        noun,
        prep,
        child,
        noun_attachment,
    })
}

fn prep_with_noun_child(
    sentence: &Sentence,
    dialect: Dialect,
    verb: usize,
    window: usize,
    dependents: bool,
) -> Option<(usize, usize)> {
    let poses = sentence.poses();

    for prep in verb + 2..=verb + window {
        if prep + 1 >= sentence.len() || dialect.is_verb(&poses[prep]) {
            break;
        }

        if !dialect.is_prep(&poses[prep]) {
            continue;
        }

        let next = prep + 1;
        if dialect.is_noun(&poses[next]) && sentence.parent(next) == Some(prep) {
            return Some((prep, next));
        }

        if dependents {
            let child = sentence
                .children_of(prep + 1)
                .into_iter()
                .map(|child| child - 1)
                .find(|&child| dialect.is_noun(&poses[child]));
            if let Some(child) = child {
                return Some((prep, child));
            }
        }
    }

    None
}

/// Pair every verb with its preposition dependents.
///
/// Verbs without preposition dependents are paired with `None`. Pairs
/// are ordered by verb, then by preposition.
pub fn verb_preps(sentence: &Sentence, dialect: Dialect) -> Vec<(usize, Option<usize>)> {
    let poses = sentence.poses();
    let mut pairs = Vec::new();

    for verb in (0..sentence.len()).filter(|&idx| dialect.is_verb(&poses[idx])) {
        let n_pairs = pairs.len();

        pairs.extend(
            sentence
                .children_of(verb + 1)
                .into_iter()
                .map(|dependent| dependent - 1)
                .filter(|&dependent| dialect.is_prep(&poses[dependent]))
                .map(|prep| (verb, Some(prep))),
        );

        if pairs.len() == n_pairs {
            pairs.push((verb, None));
        }
    }

    pairs
}
