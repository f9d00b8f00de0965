// src/analyze/mod.rs
//! Analysis pipeline entry: summary, keyword tags and tone for one document text.
//!
//! Every step is total over strings (empty input included) and touches no
//! shared mutable state; the only shared piece is the read-only [`Lexicon`].

pub mod frequency;
pub mod keywords;
pub mod lexicon;
pub mod summarize;
pub mod tokenize;
pub mod tone;

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Re-export convenient types.
pub use crate::analyze::frequency::FrequencyTable;
pub use crate::analyze::keywords::{extract_keywords, to_hashtags, DEFAULT_TOP_N};
pub use crate::analyze::lexicon::{Lexicon, LexiconConfig, LexiconError};
pub use crate::analyze::summarize::{Summarizer, DEFAULT_MIN_CHARS, INSUFFICIENT_TEXT};
pub use crate::analyze::tokenize::{Sentence, Token, TokenKind, Tokenizer};
pub use crate::analyze::tone::{Tone, ToneClassifier, ToneMatch, ToneScore};

pub const DEFAULT_MAX_SENTENCES: usize = 3;

fn default_max_sentences() -> usize {
    DEFAULT_MAX_SENTENCES
}
fn default_top_n() -> usize {
    DEFAULT_TOP_N
}
fn default_min_summary_chars() -> usize {
    DEFAULT_MIN_CHARS
}

/// Tunables for one analyzer (the `[analysis]` config section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisParams {
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_min_summary_chars")]
    pub min_summary_chars: usize,
    #[serde(default)]
    pub tone_match: ToneMatch,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_MAX_SENTENCES,
            top_n: DEFAULT_TOP_N,
            min_summary_chars: DEFAULT_MIN_CHARS,
            tone_match: ToneMatch::Substring,
        }
    }
}

/// Output of one `analyze` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    /// Plain content tokens, most frequent first.
    pub keywords: Vec<String>,
    pub tone: Tone,
}

impl AnalysisResult {
    pub fn hashtags(&self) -> Vec<String> {
        to_hashtags(&self.keywords)
    }
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    lexicon: Arc<Lexicon>,
    params: AnalysisParams,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::english()), AnalysisParams::default())
    }
}

impl Analyzer {
    pub fn new(lexicon: Arc<Lexicon>, params: AnalysisParams) -> Self {
        Self { lexicon, params }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn tokenizer(&self) -> Tokenizer<'_> {
        Tokenizer::new(&self.lexicon)
    }

    pub fn summarize(&self, text: &str, max_sentences: usize) -> String {
        Summarizer::new(self.tokenizer())
            .with_min_chars(self.params.min_summary_chars)
            .summarize(text, max_sentences)
    }

    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<String> {
        extract_keywords(&self.tokenizer(), text, top_n)
    }

    pub fn detect_tone(&self, text: &str) -> Tone {
        ToneClassifier::new(self.tokenizer(), self.params.tone_match).detect(text)
    }

    /// Summary, keywords and tone with the configured parameters.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let result = AnalysisResult {
            summary: self.summarize(text, self.params.max_sentences),
            keywords: self.extract_keywords(text, self.params.top_n),
            tone: self.detect_tone(text),
        };
        // Never log raw text. Only hashed id + shape of the result.
        debug!(
            target: "analyze",
            id = %anon_hash(text),
            chars = text.len(),
            keywords = result.keywords.len(),
            tone = %result.tone,
            "document analyzed"
        );
        result
    }
}

static DEFAULT_ANALYZER: Lazy<Analyzer> = Lazy::new(Analyzer::default);

/// English analysis with default parameters (3 sentences, 5 keywords).
pub fn analyze(text: &str) -> AnalysisResult {
    DEFAULT_ANALYZER.analyze(text)
}

/// Short, stable identifier for a text that does not reveal its content.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_total() {
        let r = analyze("");
        assert_eq!(r.summary, INSUFFICIENT_TEXT);
        assert!(r.keywords.is_empty());
        assert_eq!(r.tone, Tone::Neutral);
    }

    #[test]
    fn params_flow_into_each_step() {
        let params = AnalysisParams {
            max_sentences: 1,
            top_n: 2,
            min_summary_chars: 10,
            tone_match: ToneMatch::Word,
        };
        let an = Analyzer::new(Arc::new(Lexicon::english()), params);
        let r = an.analyze("Goodness, cats nap. Cats purr loudly. Dogs nap.");
        assert_eq!(r.summary, "Goodness, cats nap.");
        assert_eq!(r.keywords, vec!["cats", "nap"]);
        assert_eq!(r.tone, Tone::Neutral);
        assert_eq!(r.hashtags(), vec!["#cats", "#nap"]);
    }

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("hello");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("hello"));
        assert_ne!(a, anon_hash("hello!"));
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: AnalysisParams = toml::from_str("top_n = 8\ntone_match = \"word\"").unwrap();
        assert_eq!(p.top_n, 8);
        assert_eq!(p.max_sentences, DEFAULT_MAX_SENTENCES);
        assert_eq!(p.tone_match, ToneMatch::Word);
    }
}
