use crate::attachment::Attachment;
use crate::extract::Coverage;
use crate::lexicon::Lexicon;

/// Check whether any of the words is empty or whitespace.
pub fn has_empty_word<'a>(words: impl IntoIterator<Item = &'a String>) -> bool {
    words.into_iter().any(|word| word.trim().is_empty())
}

/// Check whether the lexicon covers the words of an attachment.
pub fn is_covered(lexicon: &dyn Lexicon, coverage: Coverage, attachment: &Attachment) -> bool {
    let heads_covered = attachment
        .heads()
        .iter()
        .all(|head| lexicon.contains(head));

    match coverage {
        Coverage::Heads => heads_covered,
        Coverage::All => {
            heads_covered
                && attachment
                    .pp_words()
                    .iter()
                    .all(|word| lexicon.contains(word))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use maplit::hashset;

    use super::{has_empty_word, is_covered};
    use crate::attachment::tests::attachment;
    use crate::extract::Coverage;

    #[test]
    fn empty_words() {
        let words = vec!["saw".to_string(), " ".to_string()];
        assert!(has_empty_word(&words));
        assert!(has_empty_word(&["".to_string()]));
        assert!(!has_empty_word(&words[..1]));
    }

    #[test]
    fn coverage() {
        let attachment = attachment(&["with", "telescope"], &[0, 1]);

        let heads: HashSet<String> = hashset! {"saw".to_string(), "man".to_string()};
        assert!(is_covered(&heads, Coverage::Heads, &attachment));
        assert!(!is_covered(&heads, Coverage::All, &attachment));

        let mut all = heads;
        all.insert("with".to_string());
        all.insert("telescope".to_string());
        assert!(is_covered(&all, Coverage::All, &attachment));
    }
}
