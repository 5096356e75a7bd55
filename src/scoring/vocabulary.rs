//! Weighted keyword vocabulary.
//!
//! A [`Vocabulary`] is an ordered list of `(term, weight)` entries. Each entry
//! is compiled once into a case-insensitive whole-word matcher, so phrases
//! such as `daddy's` or multi-word terms match as a bounded unit and `cam`
//! never fires inside `camgirl`.
//!
//! Entries are independent: a vocabulary holding both `daddy` and `daddy's`
//! scores both when the text contains `daddy's`.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};

/// A single weighted vocabulary term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Term or short phrase, matched case-insensitively.
    pub term: String,
    /// Points added to the score when the term is present.
    pub weight: u32,
}

impl VocabularyEntry {
    /// Create a new vocabulary entry.
    pub fn new<S: Into<String>>(term: S, weight: u32) -> Self {
        VocabularyEntry {
            term: term.into(),
            weight,
        }
    }
}

/// An immutable, ordered keyword vocabulary with compiled matchers.
#[derive(Clone)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
    matchers: Vec<Regex>,
}

impl Vocabulary {
    /// Build a vocabulary from entries in declaration order.
    ///
    /// Empty terms and exact duplicate terms are rejected. Terms differing
    /// only by case are kept as separate entries.
    pub fn new(entries: Vec<VocabularyEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut matchers = Vec::with_capacity(entries.len());

        for entry in &entries {
            if entry.term.trim().is_empty() {
                return Err(RiskError::invalid_vocabulary("terms must not be empty"));
            }
            if !seen.insert(entry.term.as_str()) {
                return Err(RiskError::invalid_vocabulary(format!(
                    "duplicate term '{}'",
                    entry.term
                )));
            }

            let pattern = format!(r"\b{}\b", regex::escape(&entry.term.to_lowercase()));
            let matcher = Regex::new(&pattern).map_err(|e| {
                RiskError::invalid_vocabulary(format!("term '{}': {e}", entry.term))
            })?;
            matchers.push(matcher);
        }

        Ok(Vocabulary { entries, matchers })
    }

    /// Build a vocabulary from `(term, weight)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(term, weight)| VocabularyEntry::new(term, weight))
            .collect();
        Self::new(entries)
    }

    /// Load a vocabulary from a JSON file holding an array of
    /// `{"term": ..., "weight": ...}` objects.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let entries: Vec<VocabularyEntry> = serde_json::from_str(&content)?;
        log::info!(
            "Loaded {} vocabulary terms from {}",
            entries.len(),
            path.as_ref().display()
        );
        Self::new(entries)
    }

    /// The built-in keyword table used to label comments.
    pub fn default_keywords() -> Result<Self> {
        Self::from_pairs(DEFAULT_KEYWORDS.iter().copied())
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the vocabulary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries paired with their compiled matcher.
    pub(crate) fn matchers(&self) -> impl Iterator<Item = (&VocabularyEntry, &Regex)> {
        self.entries.iter().zip(self.matchers.iter())
    }
}

impl std::fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vocabulary")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Default weighted keyword table, in declaration order.
pub const DEFAULT_KEYWORDS: &[(&str, u32)] = &[
    // Predatory/sexual terms
    ("meetup", 8),
    ("private", 5),
    ("dm", 8),
    ("old", 5),
    ("soyjak", 100),
    ("whatsapp", 8),
    ("loli", 30),
    ("child", 5),
    ("teen", 5),
    ("cutie", 9),
    ("young", 5),
    ("discord", 10),
    ("snapchat", 8),
    ("telegram", 10),
    ("snap", 8),
    ("instagram", 5),
    ("tiktok", 5),
    ("onlyfans", 10),
    ("email", 5),
    ("phone", 5),
    ("blacked", 8),
    ("blowjob", 8),
    ("bdsm", 8),
    ("fetish", 8),
    ("camgirl", 10),
    ("camslut", 15),
    ("camwhore", 15),
    ("rape", 15),
    ("incest", 20),
    ("shota", 20),
    ("furry", 3),
    ("futa", 10),
    ("futanari", 10),
    ("guro", 15),
    ("vore", 10),
    ("yiff", 10),
    ("hentai", 8),
    ("anime", 3),
    ("BBC", 10),
    ("MILF", 10),
    ("Pawg", 10),
    ("thicc", 5),
    ("thot", 8),
    ("gilf", 10),
    ("childporn", 5),
    // Explicit/offensive terms
    ("sex", 8),
    ("sexy", 8),
    ("nude", 10),
    ("naked", 10),
    ("cum", 8),
    ("nigger", 15),
    ("faggot", 15),
    ("chink", 15),
    ("cracker", 15),
    ("spic", 15),
    ("gook", 15),
    ("pajeet", 15),
    ("shitskin", 15),
    ("mutt", 15),
    ("amerimutt", 15),
    ("euromutt", 15),
    ("meximutt", 15),
    ("jap", 15),
    ("troon", 10),
    ("tranny", 15),
    ("kike", 15),
    ("cock", 10),
    ("pussy", 10),
    ("dick", 10),
    ("fuck", 8),
    ("shit", 5),
    ("bitch", 8),
    ("slut", 8),
    ("whore", 8),
    ("porn", 10),
    ("xxx", 10),
    ("asshole", 8),
    ("clanker", 8),
    ("KYS", 15),
    ("retard", 5),
    ("autist", 5),
    ("autistic", 5),
    ("cripple", 5),
    ("crippled", 5),
    ("kys", 15),
    // Drug/violence terms
    ("drugs", 5),
    ("alcohol", 5),
    ("weed", 5),
    ("coke", 8),
    ("meth", 8),
    ("heroin", 8),
    ("kill", 5),
    ("murder", 8),
    ("abuse", 8),
    ("harm", 5),
    ("die", 5),
    ("suicide", 8),
    ("bash", 5),
    ("gun", 5),
    ("pistol", 5),
    ("rifle", 5),
    ("knife", 5),
    ("bomb", 10),
    // Context-dependent terms
    ("love", 1),
    ("want", 1),
    ("please", 1),
    ("alone", 3),
    ("baby", 3),
    ("kitten", 3),
    ("daddy", 4),
    ("daddy's", 8),
    ("girl", 3),
    ("boy", 3),
    ("cute", 3),
    ("hookup", 8),
    ("date", 5),
    ("yourself", 2),
    ("touch", 5),
    ("touching", 5),
    ("body", 2),
];
