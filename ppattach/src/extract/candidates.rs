use std::ops::Range;

use crate::dialect::Dialect;
use crate::sentence::Sentence;

/// Candidate heads of a preposition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidates {
    /// 0-based sentence indices of the candidates, in sentence order.
    pub indices: Vec<usize>,

    /// 1-based rank of the governor of the preposition among the
    /// candidates.
    pub gold: Option<usize>,
}

impl Candidates {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// The tokens preceding a preposition that are searched for heads.
pub fn window(prep: usize, max_head_distance: usize) -> Range<usize> {
    prep.saturating_sub(max_head_distance)..prep
}

/// Find the nouns and verbs in the head window of a preposition.
pub fn candidate_heads(
    sentence: &Sentence,
    dialect: Dialect,
    prep: usize,
    max_head_distance: usize,
) -> Candidates {
    let indices: Vec<usize> = window(prep, max_head_distance)
        .filter(|&idx| dialect.is_head_candidate(&sentence.poses()[idx]))
        .collect();

    let gold = sentence
        .parent(prep)
        .and_then(|governor| indices.iter().position(|&idx| idx == governor))
        .map(|rank| rank + 1);

    Candidates { indices, gold }
}

/// Count the nouns in the head window of a preposition.
pub fn window_nouns(
    sentence: &Sentence,
    dialect: Dialect,
    prep: usize,
    max_head_distance: usize,
) -> usize {
    window(prep, max_head_distance)
        .filter(|&idx| dialect.is_noun(&sentence.poses()[idx]))
        .count()
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    use super::{candidate_heads, window, window_nouns, Candidates};
    use crate::dialect::Dialect;
    use crate::sentence::tests::telescope;
    use crate::sentence::Sentence;

    #[test]
    fn telescope_candidates() {
        let sentence = telescope(&[0, 3, 1, 3, 6, 4]);
        assert_eq!(
            candidate_heads(&sentence, Dialect::English, 3, 3),
            Candidates {
                indices: vec![0, 2],
                gold: Some(2)
            }
        );

        let sentence = telescope(&[0, 3, 1, 1, 6, 4]);
        assert_eq!(candidate_heads(&sentence, Dialect::English, 3, 3).gold, Some(1));
    }

    #[test]
    fn governor_outside_window() {
        let sentence = telescope(&[0, 3, 1, 1, 6, 4]);
        assert_eq!(
            candidate_heads(&sentence, Dialect::English, 3, 2),
            Candidates {
                indices: vec![2],
                gold: None
            }
        );
    }

    #[test]
    fn window_is_clamped() {
        assert_eq!(window(3, 10), 0..3);
        assert_eq!(window(5, 2), 3..5);
        assert!(window(0, 2).is_empty());
    }

    #[test]
    fn count_window_nouns() {
        let sentence = telescope(&[0, 3, 1, 3, 6, 4]);
        assert_eq!(window_nouns(&sentence, Dialect::English, 3, 3), 1);
        assert_eq!(window_nouns(&sentence, Dialect::English, 2, 2), 0);
        assert_eq!(window_nouns(&sentence, Dialect::English, 6, 6), 2);
    }

    #[test]
    fn candidates_are_window_heads_in_order() {
        let mut rng = XorShiftRng::seed_from_u64(7);
        let tags = ["V", "N", "P", "AJ", "D", "PNX"];

        for _ in 0..100 {
            let len = rng.gen_range(1..25);
            let poses: Vec<String> = (0..len)
                .map(|_| tags.choose(&mut rng).unwrap().to_string())
                .collect();
            let sentence = Sentence::new(
                vec!["w".to_string(); len],
                poses.clone(),
                vec!["_".to_string(); len],
                vec![0; len],
                Dialect::Spmrl,
            )
            .unwrap();

            let prep = rng.gen_range(0..len);
            let max_head_distance = rng.gen_range(1..10);
            let candidates = candidate_heads(&sentence, Dialect::Spmrl, prep, max_head_distance);

            let expected: Vec<usize> = window(prep, max_head_distance)
                .filter(|&idx| poses[idx] == "N" || poses[idx] == "V")
                .collect();
            assert_eq!(candidates.indices, expected);
            assert!(candidates.indices.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(candidates.gold, None);
        }
    }
}
