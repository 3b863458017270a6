//! Engines put a concrete vocabulary on top of the generic tries: they decide what the values
//! are, how text is normalized, and how it is split into tokens.

use std::borrow::Cow;

use regex::Regex;
use tracing::debug;

use crate::error::{check_weight, Result};
use crate::trie::{Autocompleter, TrieVariant};
use crate::weight::WeightMode;

/// Which trie an engine builds and how it aggregates weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub variant: TrieVariant,
    pub mode: WeightMode,
}

impl EngineConfig {
    pub fn new(variant: TrieVariant, mode: WeightMode) -> Self {
        EngineConfig { variant, mode }
    }

    pub fn build<V, T>(self) -> Box<dyn Autocompleter<V, T>>
    where
        V: PartialEq + 'static,
        T: PartialEq + Clone + 'static,
    {
        self.variant.build(self.mode)
    }
}

/// Normalizes free text to lowercase letters, digits and single spaces.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    whitespace: Regex,
    disallowed: Regex,
}

impl Sanitizer {
    pub fn new() -> Result<Self> {
        Ok(Sanitizer {
            whitespace: Regex::new(r"\s+")?,
            disallowed: Regex::new(r"[^a-z0-9 ]")?,
        })
    }

    /// `"  Hello,   World!"` becomes `"hello world"`. Text without any letter or digit becomes empty.
    pub fn clean(&self, text: &str) -> String {
        let lowercase = text.to_lowercase();
        let spaced = self.whitespace.replace_all(&lowercase, " ");
        let kept = self.disallowed.replace_all(&spaced, "");
        self.whitespace.replace_all(&kept, " ").trim().to_string()
    }
}

/// Splits (normalized) text into the tokens that make up a key.
pub trait Tokenizer {
    type Token: PartialEq + Clone + 'static;

    fn tokenize(&self, text: &str) -> Vec<Self::Token>;

    /// Renders tokens as text again, e.g., to show the labels of a trie.
    fn join(&self, tokens: &[Self::Token]) -> String;
}

/// Every character is a token, spaces included.
#[derive(Debug, Clone, Copy, Default)]
pub struct Letters;

impl Tokenizer for Letters {
    type Token = char;

    fn tokenize(&self, text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn join(&self, tokens: &[char]) -> String {
        tokens.iter().collect()
    }
}

/// Tokens are the non-empty parts between matches of a delimiter.
#[derive(Debug, Clone)]
pub struct Words {
    delimiter: Regex,
}

impl Words {
    /// Fails with [`Error::Pattern`](crate::Error::Pattern) if `delimiter` is not a valid regex.
    pub fn new(delimiter: &str) -> Result<Self> {
        Ok(Words::with_delimiter(Regex::new(delimiter)?))
    }

    /// Words separated by whitespace.
    pub fn whitespace() -> Result<Self> {
        Words::new(r"\s+")
    }

    pub fn with_delimiter(delimiter: Regex) -> Self {
        Words { delimiter }
    }
}

impl Tokenizer for Words {
    type Token = String;

    fn tokenize(&self, text: &str) -> Vec<String> {
        self.delimiter
            .split(text)
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Joins with a single space, since the delimiter is a pattern.
    fn join(&self, tokens: &[String]) -> String {
        tokens.join(" ")
    }
}

/// Autocompletes lines of text. Stored values are the (normalized) lines themselves.
pub struct TextEngine<K: Tokenizer> {
    tokenizer: K,
    sanitizer: Option<Sanitizer>,
    tree: Box<dyn Autocompleter<String, K::Token>>,
}

impl<K: Tokenizer> TextEngine<K> {
    /// An engine that stores lines verbatim.
    pub fn new(tokenizer: K, config: EngineConfig) -> Self {
        TextEngine {
            tokenizer,
            sanitizer: None,
            tree: config.build(),
        }
    }

    /// Normalizes inserted lines and queries with `sanitizer` from now on.
    pub fn sanitized(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    /// `None` if sanitizing leaves nothing of a non-empty text.
    fn normalize<'a>(&self, text: &'a str) -> Option<Cow<'a, str>> {
        match &self.sanitizer {
            None => Some(Cow::Borrowed(text)),
            Some(sanitizer) => {
                let clean = sanitizer.clean(text);
                if clean.is_empty() && !text.is_empty() {
                    None
                } else {
                    Some(Cow::Owned(clean))
                }
            }
        }
    }

    /// Inserts `line` with `weight` and returns whether it was stored. With a sanitizer, lines
    /// without any letters or digits are skipped.
    pub fn insert(&mut self, line: &str, weight: f64) -> Result<bool> {
        check_weight(weight)?;
        let Some(line) = self.normalize(line) else {
            debug!(line, "skipped line without letters or digits");
            return Ok(false);
        };
        let key = self.tokenizer.tokenize(&line);
        self.tree.insert(line.into_owned(), weight, &key)?;
        Ok(true)
    }

    /// Inserts all `lines` and returns how many were stored.
    pub fn load<'a>(&mut self, lines: impl IntoIterator<Item = (&'a str, f64)>) -> Result<usize> {
        let mut inserted = 0;
        let mut skipped = 0;
        for (line, weight) in lines {
            if self.insert(line, weight)? {
                inserted += 1;
            } else {
                skipped += 1;
            }
        }
        debug!(inserted, skipped, values = self.len(), "loaded lines");
        Ok(inserted)
    }

    pub fn autocomplete(&self, query: &str, limit: Option<usize>) -> Result<Vec<(&str, f64)>> {
        let Some(query) = self.normalize(query) else {
            // Still reject an invalid limit.
            return self.tree.autocomplete(&[], limit).map(|_| Vec::new());
        };
        let prefix = self.tokenizer.tokenize(&query);
        let matches = self.tree.autocomplete(&prefix, limit)?;
        Ok(matches.into_iter().map(|(value, weight)| (value.as_str(), weight)).collect())
    }

    /// Removes all lines that start with `query` and returns how many were removed.
    pub fn remove(&mut self, query: &str) -> usize {
        let Some(query) = self.normalize(query) else {
            return 0;
        };
        let prefix = self.tokenizer.tokenize(&query);
        self.tree.remove(&prefix)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn tokenizer(&self) -> &K {
        &self.tokenizer
    }

    pub fn tree(&self) -> &dyn Autocompleter<String, K::Token> {
        self.tree.as_ref()
    }
}

/// A named sequence of `(pitch, duration)` notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Melody {
    pub name: String,
    pub notes: Vec<(i32, u32)>,
}

impl Melody {
    pub fn new(name: impl Into<String>, notes: Vec<(i32, u32)>) -> Self {
        Melody { name: name.into(), notes }
    }

    /// Pitch differences between consecutive notes. Transposed melodies have the same intervals.
    pub fn intervals(&self) -> Vec<i32> {
        self.notes.windows(2).map(|pair| pair[1].0 - pair[0].0).collect()
    }
}

/// Autocompletes melodies from the first few intervals. Every insertion counts with weight 1.
pub struct MelodyEngine {
    tree: Box<dyn Autocompleter<Melody, i32>>,
}

impl MelodyEngine {
    pub fn new(config: EngineConfig) -> Self {
        MelodyEngine { tree: config.build() }
    }

    pub fn load(config: EngineConfig, melodies: impl IntoIterator<Item = Melody>) -> Result<Self> {
        let mut engine = MelodyEngine::new(config);
        for melody in melodies {
            engine.insert(melody)?;
        }
        debug!(melodies = engine.len(), "loaded melodies");
        Ok(engine)
    }

    pub fn insert(&mut self, melody: Melody) -> Result<()> {
        let intervals = melody.intervals();
        self.tree.insert(melody, 1.0, &intervals)
    }

    pub fn autocomplete(&self, intervals: &[i32], limit: Option<usize>) -> Result<Vec<(&Melody, f64)>> {
        self.tree.autocomplete(intervals, limit)
    }

    pub fn remove(&mut self, intervals: &[i32]) -> usize {
        self.tree.remove(intervals)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn tree(&self) -> &dyn Autocompleter<Melody, i32> {
        self.tree.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn configs() -> Vec<EngineConfig> {
        let mut configs = Vec::new();
        for variant in [TrieVariant::Simple, TrieVariant::Compressed] {
            for mode in [WeightMode::Sum, WeightMode::Average] {
                configs.push(EngineConfig::new(variant, mode));
            }
        }
        configs
    }

    #[test]
    fn sanitize() {
        let sanitizer = Sanitizer::new().unwrap();
        assert_eq!(sanitizer.clean("  Hello,   World!"), "hello world");
        assert_eq!(sanitizer.clean("a - b\tC3PO"), "a b c3po");
        assert_eq!(sanitizer.clean("Déjà vu"), "dj vu");
        assert_eq!(sanitizer.clean("?!  ..."), "");
        assert_eq!(sanitizer.clean(""), "");
    }

    #[test]
    fn words() {
        assert_eq!(Words::whitespace().unwrap().tokenize(" how  to\tcook "), ["how", "to", "cook"]);
        assert_eq!(Words::new("/").unwrap().tokenize("/usr/local/bin"), ["usr", "local", "bin"]);
        assert!(matches!(Words::new("("), Err(Error::Pattern(_))));
        assert_eq!(Letters.tokenize("a b"), ['a', ' ', 'b']);
        assert_eq!(Letters.join(&['a', ' ', 'b']), "a b");
        let words = Words::new("/").unwrap();
        assert_eq!(words.join(&words.tokenize("usr/bin")), "usr bin");
    }

    #[test]
    fn letter_engine() {
        for config in configs() {
            let mut engine = TextEngine::new(Letters, config).sanitized(Sanitizer::new().unwrap());
            let inserted = engine
                .load([("Car", 1.0), ("car!", 1.0), ("cat", 1.0), ("--", 1.0), ("care", 1.0)])
                .unwrap();
            assert_eq!(inserted, 4);
            assert_eq!(engine.len(), 3);

            let expected_car = match config.mode {
                WeightMode::Sum => 2.0,
                WeightMode::Average => 1.0,
            };
            let matches = engine.autocomplete("CA", None).unwrap();
            assert_eq!(matches.len(), 3);
            assert!(matches.contains(&("car", expected_car)));
            assert_eq!(engine.autocomplete("car", Some(1)).unwrap()[0].0, "car");
            assert!(engine.autocomplete("?", None).unwrap().is_empty());
            assert_eq!(engine.autocomplete("?", Some(0)), Err(Error::InvalidLimit(0)));

            assert_eq!(engine.remove("!!"), 0);
            assert_eq!(engine.remove("Car"), 2);
            assert_eq!(engine.autocomplete("", None).unwrap(), [("cat", 1.0)]);
        }
    }

    #[test]
    fn verbatim_lines() {
        let mut engine = TextEngine::new(Letters, EngineConfig::default());
        assert!(engine.insert("", 1.0).unwrap());
        assert!(engine.insert("C:\\", 2.0).unwrap());
        assert_eq!(engine.insert("x", 0.0), Err(Error::InvalidWeight(0.0)));
        assert_eq!(engine.autocomplete("", None).unwrap(), [("C:\\", 2.0), ("", 1.0)]);
        assert!(engine.autocomplete("c", None).unwrap().is_empty());
    }

    #[test]
    fn sentence_engine() {
        for config in configs() {
            let mut engine = TextEngine::new(Words::whitespace().unwrap(), config)
                .sanitized(Sanitizer::new().unwrap());
            engine
                .load([("How to cook rice?", 3.0), ("how to bake", 5.0), ("How are you", 4.0)])
                .unwrap();

            assert_eq!(
                engine.autocomplete("how  TO", None).unwrap(),
                [("how to bake", 5.0), ("how to cook rice", 3.0)]
            );
            // Only whole words match.
            assert!(engine.autocomplete("how to c", None).unwrap().is_empty());
            assert_eq!(engine.remove("how to"), 2);
            assert_eq!(engine.autocomplete("how", None).unwrap(), [("how are you", 4.0)]);
        }
    }

    #[test]
    fn melody_engine() {
        let ode = Melody::new("Ode to Joy", vec![(64, 1), (64, 1), (65, 1), (67, 1)]);
        let transposed = Melody::new("Ode to Joy (in D)", vec![(62, 1), (62, 1), (63, 1), (65, 1)]);
        let scale = Melody::new("Scale", vec![(60, 1), (62, 1), (64, 1), (65, 1)]);
        assert_eq!(ode.intervals(), [0, 1, 2]);
        assert!(Melody::new("Single", vec![(60, 4)]).intervals().is_empty());

        for config in configs() {
            let mut engine =
                MelodyEngine::load(config, [ode.clone(), scale.clone(), transposed.clone(), ode.clone()]).unwrap();
            assert_eq!(engine.len(), 3);

            let expected_ode = match config.mode {
                WeightMode::Sum => 2.0,
                WeightMode::Average => 1.0,
            };
            // Same intervals, so both versions of the melody match.
            assert_eq!(
                engine.autocomplete(&[0, 1], None).unwrap(),
                [(&ode, expected_ode), (&transposed, 1.0)]
            );
            assert_eq!(engine.autocomplete(&[2], None).unwrap(), [(&scale, 1.0)]);
            assert_eq!(engine.autocomplete(&[], Some(1)).unwrap().len(), 1);

            assert_eq!(engine.remove(&[0]), 2);
            assert_eq!(engine.autocomplete(&[], None).unwrap(), [(&scale, 1.0)]);
        }
    }
}
