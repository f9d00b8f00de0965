//! Sentence segmentation and word tokenization.
//!
//! Both iterators are lazy. `Sentences` is `Clone`, so a caller can restart
//! segmentation from the beginning without re-scanning anything up front.
//! Sentence spans tile the input: every byte belongs to exactly one sentence
//! (trailing whitespace is attached to the sentence before it).

use once_cell::sync::Lazy;
use regex::Regex;

use super::lexicon::Lexicon;

const TERMINATORS: [char; 3] = ['.', '!', '?'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}', '\u{00BB}'];

// Words may carry inner apostrophes/hyphens ("don't", "state-of-the-art");
// any other non-space character is a token of its own.
static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?u)\w+(?:['\x{2019}\-]\w+)*|[^\w\s]").expect("word tokenizer regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Punct,
}

/// A lowercased token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn is_punct(&self) -> bool {
        self.kind == TokenKind::Punct
    }
}

/// One segmented sentence: `text` is the trimmed content, `start..end` the
/// byte span it owns in the source (including surrounding whitespace).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'l> {
    lexicon: &'l Lexicon,
}

impl<'l> Tokenizer<'l> {
    pub fn new(lexicon: &'l Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &'l Lexicon {
        self.lexicon
    }

    /// Empty or whitespace-only input yields no sentences.
    pub fn sentences<'a>(&self, text: &'a str) -> Sentences<'a>
    where
        'l: 'a,
    {
        Sentences {
            text,
            pos: 0,
            lexicon: self.lexicon,
        }
    }

    pub fn words<'a>(&self, text: &'a str) -> Words<'a> {
        Words {
            matches: WORD_RE.find_iter(text),
        }
    }

    /// Words that are neither stop words nor punctuation.
    pub fn content_words<'a>(&self, text: &'a str) -> impl Iterator<Item = Token> + 'a
    where
        'l: 'a,
    {
        let lexicon = self.lexicon;
        self.words(text).filter(move |t| lexicon.is_content(&t.text))
    }
}

#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    text: &'a str,
    pos: usize,
    lexicon: &'a Lexicon,
}

impl<'a> Sentences<'a> {
    /// Byte offset (relative to `rest`) just past the end of the current sentence body.
    fn boundary(&self, rest: &str) -> usize {
        let mut iter = rest.char_indices().peekable();
        while let Some((i, c)) = iter.next() {
            if !TERMINATORS.contains(&c) {
                continue;
            }
            let mut end = i + c.len_utf8();
            let mut run = 1;
            while let Some(&(j, n)) = iter.peek() {
                if !TERMINATORS.contains(&n) {
                    break;
                }
                end = j + n.len_utf8();
                run += 1;
                iter.next();
            }
            while let Some(&(j, n)) = iter.peek() {
                if !CLOSERS.contains(&n) {
                    break;
                }
                end = j + n.len_utf8();
                iter.next();
            }

            let after = &rest[end..];
            match after.chars().next() {
                None => return end,
                Some(n) if n.is_whitespace() => {
                    if c == '.' && run == 1 && self.abbreviation_before(&rest[..i]) {
                        continue;
                    }
                    if after
                        .trim_start()
                        .chars()
                        .next()
                        .is_some_and(char::is_lowercase)
                    {
                        continue;
                    }
                    return end;
                }
                // "3.14", "example.com", "?!x" - not a boundary
                Some(_) => continue,
            }
        }
        rest.len()
    }

    fn abbreviation_before(&self, head: &str) -> bool {
        let Some(last) = head.split_whitespace().last() else {
            return false;
        };
        let word = last
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        let mut chars = word.chars();
        let single_letter = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
        single_letter || self.lexicon.is_abbreviation(&word)
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = Sentence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        if rest.trim().is_empty() {
            self.pos = self.text.len();
            return None;
        }

        let start = self.pos;
        let body_end = start + self.boundary(rest);
        let tail = &self.text[body_end..];
        let end = body_end + (tail.len() - tail.trim_start().len());
        self.pos = end;

        Some(Sentence {
            text: self.text[start..end].trim(),
            start,
            end,
        })
    }
}

#[derive(Debug)]
pub struct Words<'a> {
    matches: regex::Matches<'static, 'a>,
}

impl Iterator for Words<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.matches.next()?;
        let raw = m.as_str();
        let kind = if raw.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            TokenKind::Word
        } else {
            TokenKind::Punct
        };
        Some(Token {
            text: raw.to_lowercase(),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        let lex = Lexicon::english();
        Tokenizer::new(&lex)
            .sentences(text)
            .map(|s| s.text.to_string())
            .collect()
    }

    fn words(text: &str) -> Vec<String> {
        let lex = Lexicon::english();
        Tokenizer::new(&lex).words(text).map(|t| t.text).collect()
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(
            split("Hello there. How are you? Great!"),
            vec!["Hello there.", "How are you?", "Great!"]
        );
    }

    #[test]
    fn keeps_abbreviations_decimals_and_initials_together() {
        assert_eq!(
            split("Dr. Smith paid 3.50 dollars. J. Doe agreed, e.g. twice. Done."),
            vec!["Dr. Smith paid 3.50 dollars.", "J. Doe agreed, e.g. twice.", "Done."]
        );
    }

    #[test]
    fn closing_quotes_stay_with_their_sentence() {
        assert_eq!(
            split("He said \"stop.\" Then he left!!  Really?"),
            vec!["He said \"stop.\"", "Then he left!!", "Really?"]
        );
    }

    #[test]
    fn spans_tile_the_input() {
        let lex = Lexicon::english();
        let text = "  First one. Second one!\n\nThird without end";
        let spans: Vec<_> = Tokenizer::new(&lex).sentences(text).collect();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].start, 0);
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(spans[2].end, text.len());
        assert_eq!(spans[2].text, "Third without end");
    }

    #[test]
    fn sentences_iterator_is_restartable() {
        let lex = Lexicon::english();
        let it = Tokenizer::new(&lex).sentences("One. Two. Three.");
        let first: Vec<_> = it.clone().collect();
        let second: Vec<_> = it.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_input_has_no_sentences() {
        assert!(split("").is_empty());
        assert!(split(" \n\t ").is_empty());
    }

    #[test]
    fn words_are_lowercased_and_punctuation_is_separate() {
        assert_eq!(
            words("The Cat's toy, state-of-the-art!"),
            vec!["the", "cat's", "toy", ",", "state-of-the-art", "!"]
        );
        let lex = Lexicon::english();
        let toks: Vec<_> = Tokenizer::new(&lex).words("Hi.").collect();
        assert_eq!(toks[0].kind, TokenKind::Word);
        assert!(toks[1].is_punct());
    }

    #[test]
    fn curly_apostrophes_keep_their_spelling() {
        assert_eq!(words("Mary\u{2019}s"), vec!["mary\u{2019}s"]);
        let lex = Lexicon::english();
        let content: Vec<_> = Tokenizer::new(&lex)
            .content_words("Don\u{2019}t panic")
            .map(|t| t.text)
            .collect();
        assert_eq!(content, vec!["panic"]);
    }

    #[test]
    fn content_words_drop_stopwords_and_punctuation() {
        let lex = Lexicon::english();
        let content: Vec<_> = Tokenizer::new(&lex)
            .content_words("The cat sat.")
            .map(|t| t.text)
            .collect();
        assert_eq!(content, vec!["cat", "sat"]);
    }
}
