//! Weighted autocompletion with prefix trees.
//!
//! Values are stored under keys, i.e., sequences of tokens (characters, words, intervals, ...),
//! together with a positive weight. [`Autocompleter::autocomplete`] returns the heaviest values
//! whose key starts with a given prefix. Two layouts are available:
//! [`SimplePrefixTree`] with one token per level, and the path-compressed [`CompressedPrefixTree`].
//!
//! ```
//! use autocomplete_trie::{Autocompleter, CompressedPrefixTree, WeightMode};
//!
//! let mut tree = CompressedPrefixTree::new(WeightMode::Sum);
//! for (word, weight) in [("car", 2.0), ("cat", 2.5), ("care", 3.0), ("dog", 5.0)] {
//!     let key: Vec<char> = word.chars().collect();
//!     tree.insert(word, weight, &key)?;
//! }
//! let matches = tree.autocomplete(&['c', 'a'], Some(2))?;
//! assert_eq!(matches, [(&"care", 3.0), (&"cat", 2.5)]);
//! # Ok::<(), autocomplete_trie::Error>(())
//! ```

pub mod common_prefix;
pub mod engine;
pub mod error;
pub mod ordering;
pub mod trie;
pub mod weight;

pub use engine::{EngineConfig, Letters, Melody, MelodyEngine, Sanitizer, TextEngine, Tokenizer, Words};
pub use error::{Error, Result};
pub use trie::{Autocompleter, CompressedPrefixTree, Node, SimplePrefixTree, TrieVariant};
pub use weight::WeightMode;
