//! Frequency-based extractive summarizer.
//!
//! Policy:
//! - trimmed input shorter than `min_chars` → [`INSUFFICIENT_TEXT`]
//! - at most `max_sentences` sentences → the original text, byte for byte
//! - otherwise the top `max_sentences` distinct sentences by score, emitted in
//!   document order and joined with a single space
//!
//! Ranking is a stable sort on descending score, so equal scores keep
//! document order. Sentences without any content token never rank.

use std::collections::HashSet;

use super::frequency::FrequencyTable;
use super::tokenize::Tokenizer;

/// Returned instead of a summary when the input is too short to summarize.
pub const INSUFFICIENT_TEXT: &str = "(Not enough text to summarize)";

pub const DEFAULT_MIN_CHARS: usize = 50;

/// One entry of the sentence score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredSentence<'a> {
    pub text: &'a str,
    /// Position of the sentence in the document.
    pub index: usize,
    pub score: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Summarizer<'l> {
    tokenizer: Tokenizer<'l>,
    min_chars: usize,
}

impl<'l> Summarizer<'l> {
    pub fn new(tokenizer: Tokenizer<'l>) -> Self {
        Self {
            tokenizer,
            min_chars: DEFAULT_MIN_CHARS,
        }
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// `max_sentences` of 0 is treated as 1.
    pub fn summarize(&self, text: &str, max_sentences: usize) -> String {
        let max_sentences = max_sentences.max(1);
        if text.trim().chars().count() < self.min_chars {
            return INSUFFICIENT_TEXT.to_string();
        }

        let sentences = self.tokenizer.sentences(text);
        if sentences.clone().count() <= max_sentences {
            return text.to_string();
        }

        let table = FrequencyTable::from_text(text, &self.tokenizer);
        let mut ranked = self.score_sentences(text, &table);
        if ranked.is_empty() {
            // Nothing but stop words and punctuation: no basis to pick sentences.
            return text.to_string();
        }

        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(max_sentences);
        ranked.sort_by_key(|s| s.index);

        ranked
            .iter()
            .map(|s| s.text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sentence score table in document order. Repeated sentences appear once
    /// (first occurrence); zero-score sentences are left out.
    pub fn score_sentences<'a>(
        &self,
        text: &'a str,
        table: &FrequencyTable,
    ) -> Vec<ScoredSentence<'a>>
    where
        'l: 'a,
    {
        let mut seen = HashSet::new();
        self.tokenizer
            .sentences(text)
            .enumerate()
            .filter(|(_, s)| seen.insert(s.text))
            .filter_map(|(index, s)| {
                let score = table.score_sentence(s.text, &self.tokenizer);
                (score > 0).then_some(ScoredSentence {
                    text: s.text,
                    index,
                    score,
                })
            })
            .collect()
    }
}
