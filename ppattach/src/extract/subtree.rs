use std::collections::HashMap;

use crate::dialect::Dialect;
use crate::extract::Diagnostic;
use crate::sentence::Sentence;

/// The phrase governed by a preposition.
///
/// `indices` holds the sentence indices of the phrase, starting with
/// the preposition. `parents` holds the 1-based head of each word
/// within the phrase, the preposition has head `0`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subtree {
    pub indices: Vec<usize>,
    pub parents: Vec<usize>,
}

impl Subtree {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// The preposition and its child.
pub fn minimal(prep: usize, child: usize) -> Subtree {
    Subtree {
        indices: vec![prep, child],
        parents: vec![0, 1],
    }
}

/// The preposition and all following tokens that it dominates.
///
/// Heads are positions within the phrase, not offsets from the
/// preposition in the sentence. The two only differ when the phrase has
/// gaps, in which case the words after a gap are renumbered.
///
/// Returns `Ok(None)` when the phrase is longer than `max_span + 1`
/// words. A preposition that does not dominate any tokens and phrases
/// with a word whose head lies outside the phrase are reported.
pub fn full_subtree(
    sentence: &Sentence,
    prep: usize,
    max_span: Option<usize>,
) -> Result<Option<Subtree>, Diagnostic> {
    let indices: Vec<usize> = std::iter::once(prep)
        .chain((prep + 1..sentence.len()).filter(|&idx| sentence.is_reachable(prep + 1, idx + 1)))
        .collect();

    if indices.len() == 1 {
        return Err(Diagnostic::MissingChild { prep });
    }

    if let Some(max_span) = max_span {
        if indices.len() > max_span + 1 {
            log::trace!(
                "Phrase of preposition {} spans {} words, maximum is {}",
                prep,
                indices.len(),
                max_span + 1
            );
            return Ok(None);
        }
    }

    let local: HashMap<usize, usize> = indices
        .iter()
        .enumerate()
        .map(|(local, &idx)| (idx, local + 1))
        .collect();

    let mut parents = Vec::with_capacity(indices.len());
    parents.push(0);
    for &idx in &indices[1..] {
        let head = sentence
            .parent(idx)
            .and_then(|governor| local.get(&governor))
            .ok_or(Diagnostic::SpanEscape { prep, token: idx })?;
        parents.push(*head);
    }

    Ok(Some(Subtree { indices, parents }))
}

/// The preposition, the following token and the token after that.
///
/// The tokens must form a chain of dependents. The grandchild is
/// optional.
pub fn child_grandchild(sentence: &Sentence, prep: usize) -> Result<Subtree, Diagnostic> {
    let child = prep + 1;
    if child >= sentence.len() || sentence.parent(child) != Some(prep) {
        return Err(Diagnostic::MissingChild { prep });
    }

    let mut subtree = minimal(prep, child);

    let grandchild = child + 1;
    if grandchild < sentence.len() && sentence.parent(grandchild) == Some(child) {
        subtree.indices.push(grandchild);
        subtree.parents.push(2);
    }

    Ok(subtree)
}

/// The preposition, its child and a short extension of the child's
/// noun phrase.
///
/// The child is extended by an adjective that agrees with it in
/// definiteness, or by an annexed noun if the child is not definite.
/// The annexed noun may itself be followed by an agreeing adjective.
pub fn extended_np(sentence: &Sentence, dialect: Dialect, prep: usize, child: usize) -> Subtree {
    let mut subtree = minimal(prep, child);
    let poses = sentence.poses();

    let next = child + 1;
    if next >= sentence.len() {
        return subtree;
    }

    if dialect.is_adj(&poses[next]) {
        if sentence.det_agree(child, next) {
            push_dependent(&mut subtree, next);
        }
    } else if dialect.is_noun(&poses[next]) && !sentence.is_definite(child) {
        push_dependent(&mut subtree, next);

        let adj = next + 1;
        if adj < sentence.len() && dialect.is_adj(&poses[adj]) && sentence.det_agree(next, adj) {
            push_dependent(&mut subtree, adj);
        }
    }

    subtree
}

/// Add a token that depends on the last word of the phrase.
fn push_dependent(subtree: &mut Subtree, idx: usize) {
    subtree.parents.push(subtree.len());
    subtree.indices.push(idx);
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    use super::{child_grandchild, extended_np, full_subtree, minimal, Subtree};
    use crate::dialect::Dialect;
    use crate::extract::Diagnostic;
    use crate::sentence::Sentence;

    fn spmrl(tokens: &str, poses: &str, parents: &[usize], morphs: Option<&str>) -> Sentence {
        let tokens: Vec<String> = tokens.split_whitespace().map(ToOwned::to_owned).collect();
        let len = tokens.len();
        let sentence = Sentence::new(
            tokens,
            poses.split_whitespace().map(ToOwned::to_owned).collect(),
            vec!["---".to_string(); len],
            parents.to_vec(),
            Dialect::Spmrl,
        )
        .unwrap();

        match morphs {
            Some(morphs) => sentence
                .with_morphs(morphs.split_whitespace().map(ToOwned::to_owned).collect())
                .unwrap(),
            None => sentence,
        }
    }

    #[test]
    fn minimal_phrase() {
        assert_eq!(
            minimal(3, 5),
            Subtree {
                indices: vec![3, 5],
                parents: vec![0, 1]
            }
        );
    }

    #[test]
    fn full_subtree_rebases_parents() {
        let sentence = spmrl(
            "ktb Tlb AlktAb fy Albyt Alkbyr .",
            "V N N P N AJ PNX",
            &[0, 1, 1, 1, 4, 5, 1],
            None,
        );

        assert_eq!(
            full_subtree(&sentence, 3, None),
            Ok(Some(Subtree {
                indices: vec![3, 4, 5],
                parents: vec![0, 1, 2]
            }))
        );
        assert_eq!(
            full_subtree(&sentence, 3, Some(2)).unwrap().map(|s| s.len()),
            Some(3)
        );
        assert_eq!(full_subtree(&sentence, 3, Some(1)), Ok(None));
    }

    #[test]
    fn full_subtree_head_at_span_boundary() {
        // The first word after the preposition depends on the last word
        // of the phrase, its head equals the phrase length.
        let sentence = spmrl("ktb fy kl Albyt", "V P N N", &[0, 1, 4, 2], None);
        assert_eq!(
            full_subtree(&sentence, 1, None),
            Ok(Some(Subtree {
                indices: vec![1, 2, 3],
                parents: vec![0, 3, 1]
            }))
        );
    }

    #[test]
    fn full_subtree_head_outside_span() {
        // "AlkbyrAn" depends on "Tlb", which precedes the preposition.
        let sentence = spmrl(
            "ktb Tlb fy Albyt AlkbyrAn",
            "V N P N AJ",
            &[0, 4, 1, 3, 2],
            None,
        );
        assert_eq!(
            full_subtree(&sentence, 2, None),
            Err(Diagnostic::SpanEscape { prep: 2, token: 4 })
        );
    }

    #[test]
    fn full_subtree_with_gap() {
        let sentence = spmrl("ktb fy Albyt Tlb Alkbyr", "V P N N AJ", &[0, 1, 2, 1, 3], None);
        assert_eq!(
            full_subtree(&sentence, 1, None),
            Ok(Some(Subtree {
                indices: vec![1, 2, 4],
                parents: vec![0, 1, 2]
            }))
        );
    }

    #[test]
    fn sentence_final_preposition() {
        let sentence = spmrl("ktb Tlb fy", "V N P", &[0, 1, 1], None);
        assert_eq!(
            full_subtree(&sentence, 2, None),
            Err(Diagnostic::MissingChild { prep: 2 })
        );
        assert_eq!(
            child_grandchild(&sentence, 2),
            Err(Diagnostic::MissingChild { prep: 2 })
        );
    }

    #[test]
    fn full_subtree_parents_stay_in_phrase() {
        let mut rng = XorShiftRng::seed_from_u64(13);

        for _ in 0..200 {
            let len = rng.gen_range(2..20);
            // Heads precede their dependents, so descendants follow the preposition.
            let parents: Vec<usize> = (0..len).map(|idx| rng.gen_range(0..=idx)).collect();
            let sentence = Sentence::new(
                vec!["w".to_string(); len],
                vec!["N".to_string(); len],
                vec!["_".to_string(); len],
                parents,
                Dialect::Spmrl,
            )
            .unwrap();

            let prep = rng.gen_range(0..len);
            match full_subtree(&sentence, prep, None) {
                Ok(Some(subtree)) => {
                    assert_eq!(subtree.parents[0], 0);
                    assert_eq!(subtree.indices[0], prep);
                    for (local, &head) in subtree.parents.iter().enumerate().skip(1) {
                        assert!(head >= 1 && head <= subtree.len());
                        assert_ne!(head, local + 1);
                    }
                }
                Ok(None) => panic!("Phrase without maximum span was rejected"),
                Err(Diagnostic::MissingChild { .. }) => {
                    assert!(sentence.children_of(prep + 1).is_empty())
                }
                Err(err) => panic!("Unexpected diagnostic: {}", err),
            }
        }
    }

    #[test]
    fn child_and_grandchild() {
        let sentence = spmrl("ktb fy byt Alrjl .", "V P N N PNX", &[0, 1, 2, 3, 1], None);
        assert_eq!(
            child_grandchild(&sentence, 1),
            Ok(Subtree {
                indices: vec![1, 2, 3],
                parents: vec![0, 1, 2]
            })
        );

        let sentence = spmrl("ktb fy byt .", "V P N PNX", &[0, 1, 2, 1], None);
        assert_eq!(child_grandchild(&sentence, 1), Ok(minimal(1, 2)));

        let sentence = spmrl("ktb fy byt", "V P N", &[0, 1, 1], None);
        assert_eq!(
            child_grandchild(&sentence, 1),
            Err(Diagnostic::MissingChild { prep: 1 })
        );
    }

    #[test]
    fn extended_np_agreeing_adjective() {
        let sentence = spmrl(
            "ktb fy Albyt Alkbyr",
            "V P N AJ",
            &[0, 1, 2, 3],
            Some("L:katab L:fiy L:bayt||DT:t L:kabiyr||DT:t"),
        );
        assert_eq!(
            extended_np(&sentence, Dialect::Spmrl, 1, 2),
            Subtree {
                indices: vec![1, 2, 3],
                parents: vec![0, 1, 2]
            }
        );

        let sentence = spmrl(
            "ktb fy Albyt kbyr",
            "V P N AJ",
            &[0, 1, 2, 1],
            Some("L:katab L:fiy L:bayt||DT:t L:kabiyr"),
        );
        assert_eq!(extended_np(&sentence, Dialect::Spmrl, 1, 2), minimal(1, 2));
    }

    #[test]
    fn extended_np_annexed_noun() {
        let sentence = spmrl(
            "ktb fy byt Alrjl Alkbyr",
            "V P N N AJ",
            &[0, 1, 2, 3, 4],
            Some("L:katab L:fiy L:bayt L:rajul||DT:t L:kabiyr||DT:t"),
        );
        assert_eq!(
            extended_np(&sentence, Dialect::Spmrl, 1, 2),
            Subtree {
                indices: vec![1, 2, 3, 4],
                parents: vec![0, 1, 2, 3]
            }
        );

        // A definite child does not take an annexed noun.
        let sentence = spmrl(
            "ktb fy Albyt Alrjl",
            "V P N N",
            &[0, 1, 2, 1],
            Some("L:katab L:fiy L:bayt||DT:t L:rajul||DT:t"),
        );
        assert_eq!(extended_np(&sentence, Dialect::Spmrl, 1, 2), minimal(1, 2));
    }
}
