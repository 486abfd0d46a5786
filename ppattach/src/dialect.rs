//! Part-of-speech dialects of the supported treebanks.

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a tag is compared against the tags of a tag set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagMatch {
    /// The tag must be equal to a tag in the set.
    Exact,

    /// The tag must contain a tag in the set. Used for tag sets that
    /// combine a part-of-speech with other markers, such as `DT+NN`.
    Substring,
}

/// A set of tags for one part-of-speech category.
#[derive(Debug)]
pub struct TagSet {
    tags: &'static [&'static str],
    matching: TagMatch,
}

impl TagSet {
    const fn exact(tags: &'static [&'static str]) -> Self {
        TagSet {
            tags,
            matching: TagMatch::Exact,
        }
    }

    const fn substring(tags: &'static [&'static str]) -> Self {
        TagSet {
            tags,
            matching: TagMatch::Substring,
        }
    }

    /// Check whether `tag` is a member of this set.
    pub fn contains(&self, tag: &str) -> bool {
        match self.matching {
            TagMatch::Exact => self.tags.iter().any(|&t| t == tag),
            TagMatch::Substring => self.tags.iter().any(|&t| tag.contains(t)),
        }
    }

    pub fn tags(&self) -> &'static [&'static str] {
        self.tags
    }

    pub fn matching(&self) -> TagMatch {
        self.matching
    }
}

/// The part-of-speech categories of a dialect.
#[derive(Debug)]
pub struct TagSets {
    pub verb: TagSet,
    pub noun: TagSet,
    pub prep: TagSet,
    pub adj: Option<TagSet>,
}

static SPMRL_TAGS: TagSets = TagSets {
    verb: TagSet::exact(&["V"]),
    noun: TagSet::exact(&["N"]),
    prep: TagSet::exact(&["P"]),
    adj: Some(TagSet::exact(&["AJ"])),
};

static ATB_NATIVE_TAGS: TagSets = TagSets {
    verb: TagSet::exact(&["VB", "VBD", "VBN", "VBP"]),
    noun: TagSet::substring(&["NN"]),
    prep: TagSet::exact(&["IN"]),
    adj: None,
};

static PTB_TAGS: TagSets = TagSets {
    verb: TagSet::exact(&["VB", "VBD", "VBN", "VBP", "VBZ"]),
    noun: TagSet::exact(&["NN", "NNS"]),
    prep: TagSet::exact(&["IN", "TO"]),
    adj: None,
};

static ANCORA_TAGS: TagSets = TagSets {
    verb: TagSet::exact(&["va", "vm", "vs"]),
    noun: TagSet::exact(&["nc"]),
    prep: TagSet::exact(&["sp"]),
    adj: None,
};

static SPMRL_CONLL_TAGS: TagSets = TagSets {
    verb: TagSet::exact(&["V"]),
    noun: TagSet::exact(&["N"]),
    prep: TagSet::exact(&["P"]),
    adj: None,
};

/// Unknown dialect identifier.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unsupported dialect: '{0}'")]
pub struct UnsupportedDialectError(pub String);

/// Treebank part-of-speech dialect.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Dialect {
    /// SPMRL Arabic treebank in its native format.
    Spmrl,

    /// Arabic treebank with its native (Penn-style, compound) tags.
    AtbNative,

    /// Arabic treebank preprocessed with the Stanford scripts and
    /// converted to CoNLL.
    AtbStanford,

    /// English Penn treebank (WSJ) dependency conversion.
    English,

    /// CoNLL shared task Spanish.
    Spanish,

    /// CoNLL shared task Catalan.
    Catalan,

    /// SPMRL Arabic converted to CoNLL.
    ArabicSpmrl,
}

impl Dialect {
    /// The tag sets of this dialect.
    pub fn tag_sets(self) -> &'static TagSets {
        use Dialect::*;
        match self {
            Spmrl => &SPMRL_TAGS,
            AtbNative => &ATB_NATIVE_TAGS,
            AtbStanford | English => &PTB_TAGS,
            Spanish | Catalan => &ANCORA_TAGS,
            ArabicSpmrl => &SPMRL_CONLL_TAGS,
        }
    }

    pub fn is_verb(self, tag: &str) -> bool {
        self.tag_sets().verb.contains(tag)
    }

    pub fn is_noun(self, tag: &str) -> bool {
        self.tag_sets().noun.contains(tag)
    }

    pub fn is_prep(self, tag: &str) -> bool {
        self.tag_sets().prep.contains(tag)
    }

    /// Check whether the tag is an adjective.
    ///
    /// Always `false` for dialects without an adjective tag set.
    pub fn is_adj(self, tag: &str) -> bool {
        self.tag_sets()
            .adj
            .as_ref()
            .map(|adj| adj.contains(tag))
            .unwrap_or(false)
    }

    /// Check whether the tag is a noun or a verb.
    pub fn is_head_candidate(self, tag: &str) -> bool {
        self.is_noun(tag) || self.is_verb(tag)
    }

    pub fn supports_adjectives(self) -> bool {
        self.tag_sets().adj.is_some()
    }

    /// Surface forms stand in for lemmas in this dialect.
    pub fn tokens_are_lemmas(self) -> bool {
        matches!(self, Dialect::English | Dialect::AtbStanford)
    }

    /// Lemmas are Buckwalter-transliterated SPMRL lemmas.
    pub(crate) fn has_buckwalter_lemmas(self) -> bool {
        matches!(self, Dialect::Spmrl | Dialect::ArabicSpmrl)
    }

    fn name(self) -> &'static str {
        use Dialect::*;
        match self {
            Spmrl => "spmrl",
            AtbNative => "atb",
            AtbStanford => "atb_stanford",
            English => "english",
            Spanish => "spanish",
            Catalan => "catalan",
            ArabicSpmrl => "arabic_spmrl",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = UnsupportedDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Dialect::*;
        match s {
            "spmrl" => Ok(Spmrl),
            "atb" | "atb_native" => Ok(AtbNative),
            "atb_stanford" => Ok(AtbStanford),
            "english" | "wsj" => Ok(English),
            "spanish" => Ok(Spanish),
            "catalan" => Ok(Catalan),
            "arabic_spmrl" => Ok(ArabicSpmrl),
            unknown => Err(UnsupportedDialectError(unknown.to_owned())),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = UnsupportedDialectError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::{Dialect, UnsupportedDialectError};

    #[test]
    fn spmrl_tags() {
        let dialect = Dialect::Spmrl;
        assert!(dialect.is_verb("V"));
        assert!(dialect.is_noun("N"));
        assert!(!dialect.is_noun("PN"));
        assert!(dialect.is_prep("P"));
        assert!(!dialect.is_prep("PNX"));
        assert!(dialect.is_adj("AJ"));
        assert!(dialect.supports_adjectives());
    }

    #[test]
    fn atb_native_nouns_match_compound_tags() {
        let dialect = Dialect::AtbNative;
        assert!(dialect.is_noun("NN"));
        assert!(dialect.is_noun("DT+NN"));
        assert!(dialect.is_noun("NNS"));
        assert!(!dialect.is_verb("VBZ"));
        assert!(dialect.is_prep("IN"));
        assert!(!dialect.is_prep("TO"));
    }

    #[test]
    fn english_tags() {
        let dialect = Dialect::English;
        assert!(dialect.is_verb("VBZ"));
        assert!(dialect.is_noun("NNS"));
        assert!(!dialect.is_noun("NNP"));
        assert!(!dialect.is_noun("DT+NN"));
        assert!(dialect.is_prep("TO"));
        assert!(!dialect.is_adj("JJ"));
        assert!(!dialect.supports_adjectives());
        assert!(dialect.tokens_are_lemmas());
    }

    #[test]
    fn spanish_and_catalan_share_tags() {
        for dialect in &[Dialect::Spanish, Dialect::Catalan] {
            assert!(dialect.is_verb("vm"));
            assert!(dialect.is_noun("nc"));
            assert!(!dialect.is_noun("np"));
            assert!(dialect.is_prep("sp"));
        }
    }

    #[test]
    fn parse_dialect() {
        assert_eq!("wsj".parse::<Dialect>(), Ok(Dialect::English));
        assert_eq!("arabic_spmrl".parse::<Dialect>(), Ok(Dialect::ArabicSpmrl));
        assert_eq!(
            "klingon".parse::<Dialect>(),
            Err(UnsupportedDialectError("klingon".to_string()))
        );
    }

    #[test]
    fn display_roundtrips() {
        for dialect in &[
            Dialect::Spmrl,
            Dialect::AtbNative,
            Dialect::AtbStanford,
            Dialect::English,
            Dialect::Spanish,
            Dialect::Catalan,
            Dialect::ArabicSpmrl,
        ] {
            assert_eq!(dialect.to_string().parse::<Dialect>(), Ok(*dialect));
        }
    }
}
