//! Lexicon-based tone classifier.
//!
//! Each lexicon word that occurs in the lowercased text counts one hit for its
//! side (presence, not number of occurrences). More positive hits → Positive,
//! more negative → Negative, anything else (ties, 0/0) → Neutral.
//!
//! Two matching modes:
//! - `Substring` (default): plain containment, so "goodness" counts as "good".
//! - `Word`: the lexicon word must match a whole token, so multi-word or
//!   punctuated entries never match in this mode.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::tokenize::{TokenKind, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Positive => "Positive",
            Tone::Negative => "Negative",
            Tone::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMatch {
    #[default]
    Substring,
    Word,
}

/// Raw hit counts behind a tone label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToneScore {
    pub positive: usize,
    pub negative: usize,
}

impl ToneScore {
    pub fn label(self) -> Tone {
        match self.positive.cmp(&self.negative) {
            std::cmp::Ordering::Greater => Tone::Positive,
            std::cmp::Ordering::Less => Tone::Negative,
            std::cmp::Ordering::Equal => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ToneClassifier<'l> {
    tokenizer: Tokenizer<'l>,
    mode: ToneMatch,
}

impl<'l> ToneClassifier<'l> {
    pub fn new(tokenizer: Tokenizer<'l>, mode: ToneMatch) -> Self {
        Self { tokenizer, mode }
    }

    pub fn score(&self, text: &str) -> ToneScore {
        let lexicon = self.tokenizer.lexicon();
        let lowered = text.to_lowercase();
        match self.mode {
            ToneMatch::Substring => ToneScore {
                positive: count_contained(&lowered, lexicon.positive()),
                negative: count_contained(&lowered, lexicon.negative()),
            },
            ToneMatch::Word => {
                let words: HashSet<String> = self
                    .tokenizer
                    .words(&lowered)
                    .filter(|t| t.kind == TokenKind::Word)
                    .map(|t| t.text)
                    .collect();
                ToneScore {
                    positive: lexicon.positive().iter().filter(|w| words.contains(*w)).count(),
                    negative: lexicon.negative().iter().filter(|w| words.contains(*w)).count(),
                }
            }
        }
    }

    pub fn detect(&self, text: &str) -> Tone {
        self.score(text).label()
    }
}

fn count_contained(haystack: &str, words: &[String]) -> usize {
    words.iter().filter(|w| haystack.contains(w.as_str())).count()
}
