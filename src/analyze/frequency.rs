//! Term-frequency table and sentence scoring.
//!
//! Counts are plain integers (no normalization or weighting). Each term also
//! remembers where it was first seen so rankings can break ties by document
//! order instead of hash order.

use std::collections::HashMap;

use super::tokenize::{Token, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TermStat {
    count: usize,
    first_seen: usize,
}

/// Content token → occurrence count. Only holds tokens actually present in the input.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    terms: HashMap<String, TermStat>,
}

impl FrequencyTable {
    /// Count every token that the lexicon considers content.
    pub fn build<I>(tokens: I, tokenizer: &Tokenizer<'_>) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        let lexicon = tokenizer.lexicon();
        let mut terms: HashMap<String, TermStat> = HashMap::new();
        for tok in tokens {
            if !lexicon.is_content(&tok.text) {
                continue;
            }
            let next = terms.len();
            terms
                .entry(tok.text)
                .or_insert(TermStat {
                    count: 0,
                    first_seen: next,
                })
                .count += 1;
        }
        Self { terms }
    }

    /// Frequency table over the whole of `text`.
    pub fn from_text(text: &str, tokenizer: &Tokenizer<'_>) -> Self {
        Self::build(tokenizer.words(text), tokenizer)
    }

    /// Count for `term`, zero when absent.
    pub fn get(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, |s| s.count)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms by descending count; equal counts keep first-occurrence order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut rows: Vec<(&str, TermStat)> =
            self.terms.iter().map(|(k, s)| (k.as_str(), *s)).collect();
        rows.sort_by_key(|(_, s)| s.first_seen);
        rows.sort_by(|a, b| b.1.count.cmp(&a.1.count));
        rows.into_iter().map(|(k, s)| (k, s.count)).collect()
    }

    /// Sum of table counts over the sentence's tokens. A term repeated inside
    /// the sentence contributes once per repetition.
    pub fn score_sentence(&self, sentence: &str, tokenizer: &Tokenizer<'_>) -> usize {
        tokenizer
            .words(sentence)
            .map(|t| self.get(&t.text))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::lexicon::Lexicon;

    #[test]
    fn counts_content_tokens_only() {
        let lex = Lexicon::english();
        let tk = Tokenizer::new(&lex);
        let table = FrequencyTable::from_text("The cat and the other cat. A dog!", &tk);
        assert_eq!(table.get("cat"), 2);
        assert_eq!(table.get("dog"), 1);
        assert_eq!(table.get("the"), 0);
        assert_eq!(table.get("."), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn degenerate_input_builds_empty_table() {
        let lex = Lexicon::english();
        let tk = Tokenizer::new(&lex);
        assert!(FrequencyTable::from_text("", &tk).is_empty());
        assert!(FrequencyTable::from_text("It is what it is... !", &tk).is_empty());
    }

    #[test]
    fn ranking_breaks_ties_by_first_occurrence() {
        let lex = Lexicon::english();
        let tk = Tokenizer::new(&lex);
        let table = FrequencyTable::from_text("zebra apple mango apple zebra kiwi", &tk);
        let ranked: Vec<_> = table.ranked().into_iter().map(|(t, _)| t).collect();
        assert_eq!(ranked, vec!["zebra", "apple", "mango", "kiwi"]);
    }

    #[test]
    fn sentence_score_uses_multiplicity() {
        let lex = Lexicon::english();
        let tk = Tokenizer::new(&lex);
        let table = FrequencyTable::from_text("rust rust safe. rust safe.", &tk);
        // rust=3, safe=2
        assert_eq!(table.score_sentence("Rust rust safe.", &tk), 3 + 3 + 2);
        assert_eq!(table.score_sentence("The end.", &tk), 0);
    }
}
