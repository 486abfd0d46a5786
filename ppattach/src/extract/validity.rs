use crate::dialect::Dialect;
use crate::extract::Diagnostic;
use crate::sentence::Sentence;

/// Tag that stands in for the part-of-speech of the root.
pub const ROOT_TAG: &str = "ROOT";

/// Distance between a preposition and its governor.
///
/// The root is treated as a token preceding the first token.
pub fn head_distance(sentence: &Sentence, prep: usize) -> usize {
    match sentence.parent(prep) {
        Some(governor) if governor > prep => governor - prep,
        Some(governor) => prep - governor,
        None => prep + 1,
    }
}

/// Check the governor side of an attachment instance.
///
/// The governor must be within `max_head_distance` of the
/// preposition, precede it, and be a noun or a verb.
pub fn governor_is_valid(
    sentence: &Sentence,
    dialect: Dialect,
    prep: usize,
    max_head_distance: usize,
) -> bool {
    if head_distance(sentence, prep) > max_head_distance {
        return false;
    }

    let governor_tag = match sentence.parent(prep) {
        Some(governor) if governor > prep => return false,
        Some(governor) => sentence.poses()[governor].as_str(),
        None => ROOT_TAG,
    };

    dialect.is_head_candidate(governor_tag)
}

/// Check the child side of an attachment instance.
///
/// When `check_parent` is set, the child must be a dependent of the
/// preposition. A violation is reported rather than filtered, since it
/// indicates an inconsistent sentence.
pub fn child_is_valid(
    sentence: &Sentence,
    dialect: Dialect,
    prep: usize,
    child: usize,
    max_child_distance: Option<usize>,
    check_parent: bool,
) -> Result<bool, Diagnostic> {
    if check_parent && sentence.parent(child) != Some(prep) {
        return Err(Diagnostic::ChildParentMismatch { prep, child });
    }

    if let Some(max_child_distance) = max_child_distance {
        let distance = if child > prep {
            child - prep
        } else {
            prep - child
        };

        if distance > max_child_distance {
            return Ok(false);
        }
    }

    Ok(dialect.is_noun(&sentence.poses()[child]))
}

/// Check whether a preposition and its dependent form a valid
/// attachment instance.
pub fn is_valid_instance(
    sentence: &Sentence,
    prep: usize,
    child: usize,
    max_head_distance: usize,
    max_child_distance: Option<usize>,
) -> Result<bool, Diagnostic> {
    let dialect = sentence.dialect();

    if !child_is_valid(sentence, dialect, prep, child, max_child_distance, true)? {
        return Ok(false);
    }

    Ok(governor_is_valid(sentence, dialect, prep, max_head_distance))
}

#[cfg(test)]
mod tests {
    use super::{head_distance, is_valid_instance};
    use crate::extract::Diagnostic;
    use crate::sentence::tests::{english, telescope};

    #[test]
    fn noun_governor() {
        let sentence = telescope(&[0, 3, 1, 3, 6, 4]);
        assert_eq!(head_distance(&sentence, 3), 1);
        assert_eq!(is_valid_instance(&sentence, 3, 5, 3, None), Ok(true));
    }

    #[test]
    fn distant_governor() {
        let sentence = telescope(&[0, 3, 1, 1, 6, 4]);
        assert_eq!(head_distance(&sentence, 3), 3);
        assert_eq!(is_valid_instance(&sentence, 3, 5, 3, None), Ok(true));
        assert_eq!(is_valid_instance(&sentence, 3, 5, 2, None), Ok(false));
    }

    #[test]
    fn child_distance() {
        let sentence = telescope(&[0, 3, 1, 3, 6, 4]);
        assert_eq!(is_valid_instance(&sentence, 3, 5, 3, Some(2)), Ok(true));
        assert_eq!(is_valid_instance(&sentence, 3, 5, 3, Some(1)), Ok(false));
    }

    #[test]
    fn child_must_depend_on_prep() {
        let sentence = telescope(&[0, 3, 1, 6, 6, 1]);
        assert_eq!(
            is_valid_instance(&sentence, 3, 5, 3, None),
            Err(Diagnostic::ChildParentMismatch { prep: 3, child: 5 })
        );
    }

    #[test]
    fn governor_must_precede() {
        // "with" attaches to the following "man".
        let sentence = english("saw with telescope man", "VBD IN NN NN", &[0, 4, 2, 1]);
        assert_eq!(is_valid_instance(&sentence, 1, 2, 3, None), Ok(false));
    }

    #[test]
    fn root_governor() {
        let sentence = english("with telescope man", "IN NN NN", &[0, 1, 1]);
        assert_eq!(head_distance(&sentence, 0), 1);
        assert_eq!(is_valid_instance(&sentence, 0, 1, 3, None), Ok(false));
    }

    #[test]
    fn governor_and_child_categories() {
        // Determiner governor.
        let sentence = english("the with telescope", "DT IN NN", &[0, 1, 2]);
        assert_eq!(is_valid_instance(&sentence, 1, 2, 3, None), Ok(false));

        // Pronoun child.
        let sentence = english("saw with him", "VBD IN PRP", &[0, 1, 2]);
        assert_eq!(is_valid_instance(&sentence, 1, 2, 3, None), Ok(false));

        let sentence = english("saw with telescopes", "VBD IN NNS", &[0, 1, 2]);
        assert_eq!(is_valid_instance(&sentence, 1, 2, 3, None), Ok(true));
    }
}
