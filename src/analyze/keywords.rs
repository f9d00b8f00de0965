//! Keyword extraction: the most frequent content tokens of a document.

use super::frequency::FrequencyTable;
use super::tokenize::Tokenizer;

pub const DEFAULT_TOP_N: usize = 5;

/// Up to `top_n` content tokens, most frequent first. Equal counts keep the
/// order in which the tokens first appear in `text`.
pub fn extract_keywords(tokenizer: &Tokenizer<'_>, text: &str, top_n: usize) -> Vec<String> {
    let table = FrequencyTable::from_text(text, tokenizer);
    top_terms(&table, top_n)
}

pub fn top_terms(table: &FrequencyTable, top_n: usize) -> Vec<String> {
    table
        .ranked()
        .into_iter()
        .take(top_n)
        .map(|(term, _)| term.to_string())
        .collect()
}

/// Presentation form used in responses and history: `#token`.
pub fn to_hashtags<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| format!("#{}", k.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::lexicon::Lexicon;

    fn keywords(text: &str, n: usize) -> Vec<String> {
        let lex = Lexicon::english();
        extract_keywords(&Tokenizer::new(&lex), text, n)
    }

    #[test]
    fn most_frequent_first() {
        let text = "Invoice total due. Invoice number 42. Pay the invoice total today.";
        assert_eq!(keywords(text, 3), vec!["invoice", "total", "due"]);
    }

    #[test]
    fn respects_top_n_and_short_vocabularies() {
        assert_eq!(keywords("The cat sat.", 5), vec!["cat", "sat"]);
        assert_eq!(keywords("one two three four five six", 5).len(), 5);
        assert!(keywords("one two", 0).is_empty());
    }

    #[test]
    fn empty_and_stopword_only_text_have_no_keywords() {
        assert!(keywords("", 5).is_empty());
        assert!(keywords("It is what it is.", 5).is_empty());
    }

    #[test]
    fn hashtags_prefix_each_keyword() {
        assert_eq!(to_hashtags(&["cat", "sat"]), vec!["#cat", "#sat"]);
    }
}
