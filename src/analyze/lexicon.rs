//! Fixed word lists used by the analysis pipeline.
//!
//! A [`Lexicon`] bundles everything language-specific: stop words, the
//! punctuation set, abbreviations the sentence splitter must not break on,
//! and the two tone word lists. It is built once at startup and shared
//! read-only (`Arc<Lexicon>`) by every analysis call.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

/// Standard English stop-word list (179 entries).
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// ASCII punctuation plus the typographic marks OCR output tends to contain.
const PUNCTUATION: &[char] = &[
    '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<',
    '=', '>', '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2013}', '\u{2014}', '\u{2026}', '\u{00AB}',
    '\u{00BB}',
];

/// Lowercased words (without the trailing dot) that do not end a sentence.
const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "co", "corp", "no", "fig", "approx", "dept", "est", "jan", "feb", "mar", "apr", "jun", "jul",
    "aug", "sep", "sept", "oct", "nov", "dec",
];

const POSITIVE_WORDS: &[&str] = &["good", "great", "excellent", "amazing", "positive", "love"];
const NEGATIVE_WORDS: &[&str] = &["bad", "poor", "terrible", "negative", "hate"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexiconError {
    #[error("unsupported analysis language: {0}")]
    UnsupportedLanguage(String),
}

/// Overrides applied on top of the built-in word lists (the `[lexicon]` config section).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub language: Option<String>,
    pub extra_stopwords: Vec<String>,
    /// Replaces the built-in positive list when non-empty. Entries with
    /// spaces or punctuation ("not bad") only ever match with
    /// `tone_match = "substring"`; word matching compares single tokens.
    pub positive: Vec<String>,
    /// Replaces the built-in negative list when non-empty. Same matching
    /// limit as `positive`.
    pub negative: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    language: String,
    stopwords: HashSet<String>,
    punctuation: HashSet<String>,
    abbreviations: HashSet<String>,
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}

impl Lexicon {
    pub fn english() -> Self {
        Self {
            language: "english".to_string(),
            stopwords: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            punctuation: PUNCTUATION.iter().map(|c| c.to_string()).collect(),
            abbreviations: ENGLISH_ABBREVIATIONS.iter().map(|w| w.to_string()).collect(),
            positive: POSITIVE_WORDS.iter().map(|w| w.to_string()).collect(),
            negative: NEGATIVE_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Built-in lists for `language`. Only English ships today.
    pub fn for_language(language: &str) -> Result<Self, LexiconError> {
        match language.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Self::english()),
            other => Err(LexiconError::UnsupportedLanguage(other.to_string())),
        }
    }

    pub fn from_config(cfg: &LexiconConfig) -> Result<Self, LexiconError> {
        let mut lex = Self::for_language(cfg.language.as_deref().unwrap_or("english"))?;
        lex.stopwords
            .extend(clean_words(&cfg.extra_stopwords).iter().map(|w| fold_apostrophes(w)));
        let positive = clean_words(&cfg.positive);
        if !positive.is_empty() {
            lex.positive = positive;
        }
        let negative = clean_words(&cfg.negative);
        if !negative.is_empty() {
            lex.negative = negative;
        }
        Ok(lex)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Typographic apostrophes (`’`) match the ASCII forms in the list.
    pub fn is_stopword(&self, token: &str) -> bool {
        if token.contains(CURLY_APOSTROPHE) {
            self.stopwords.contains(&fold_apostrophes(token))
        } else {
            self.stopwords.contains(token)
        }
    }

    #[inline]
    pub fn is_punctuation(&self, token: &str) -> bool {
        self.punctuation.contains(token)
    }

    /// A content token is neither a stop word nor punctuation.
    #[inline]
    pub fn is_content(&self, token: &str) -> bool {
        !self.is_stopword(token) && !self.is_punctuation(token)
    }

    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbreviations.contains(word)
    }

    pub fn positive(&self) -> &[String] {
        &self.positive
    }

    pub fn negative(&self) -> &[String] {
        &self.negative
    }
}

const CURLY_APOSTROPHE: char = '\u{2019}';

fn fold_apostrophes(word: &str) -> String {
    word.replace(CURLY_APOSTROPHE, "'")
}

/// Trim + lowercase, drop empties and duplicates (first spelling wins).
fn clean_words(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty() && seen.insert(w.clone()))
        .collect()
}
