use std::num::ParseFloatError;
use std::path::PathBuf;
use std::str::FromStr;

use autocomplete_trie::{TrieVariant, WeightMode};
use clap::Parser;
use clap::ValueHint;
use regex::Regex;

#[derive(Parser, Debug)]
#[clap(
    author = clap::crate_authors!(),
    version = clap::crate_version!(),
    about = clap::crate_description!(),
)]
pub struct Options {
    /// Input file to read the lines from. [default: stdin]
    #[clap(value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Output file to write the results to. [default: stdout]
    #[clap(short, long = "out", value_name = "file", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Trim leading and trailing whitespace from each line.
    /// [default: false]
    #[clap(short, long)]
    pub trim_input: bool,

    /// Each input line starts with the weight of the following string.
    /// Example: "2.5 foo" inserts the string "foo" with weight 2.5.
    /// [default: false, i.e., every line has weight 1]
    #[clap(short, long)]
    pub counted_input: bool,

    /// Lowercase lines and queries and remove everything except letters, digits, and single spaces.
    /// Lines without letters or digits are skipped.
    /// [default: false]
    #[clap(short, long)]
    pub sanitize: bool,

    /// Use whole words as tokens, so only complete words of a query match.
    /// [default: false, i.e., every character is a token]
    #[clap(short, long)]
    pub words: bool,

    /// Split words at the given regex pattern (implies --words).
    /// For example, -d/ builds a trie of path components.
    /// [default: whitespace]
    #[clap(short = 'd', long, value_name = "regex")]
    pub split_delimiter: Option<Regex>,

    /// Layout of the prefix tree.
    #[clap(long, default_value = "compressed", value_name = "s[imple]|c[ompressed]")]
    pub tree: TrieVariant,

    /// Whether the weight of repeated lines and of subtrees is the sum or the average.
    #[clap(long, default_value = "sum", value_name = "s[um]|a[verage]")]
    pub weights: WeightMode,

    /// Remove all lines starting with the given prefix before answering queries. Can be repeated.
    #[clap(short, long, value_name = "prefix")]
    pub remove: Vec<String>,

    /// Show the lines starting with the given prefix, heaviest first. Can be repeated.
    /// [default: the empty prefix, unless --show-tree is given]
    #[clap(short, long, value_name = "prefix")]
    pub query: Vec<String>,

    /// Show at most this many results per query. [default: all]
    #[clap(short, long, value_name = "n")]
    pub limit: Option<usize>,

    /// Do not show results (or subtries) below a <weight> or below a <percent>% share of the total.
    /// [default: disabled]
    #[clap(short, long, value_name = "weight|percent%")]
    pub min: Option<Threshold>,

    /// Character(s) with which to indent results and levels of the tree. [default: "  "]
    #[clap(short, long, default_value = "  ", value_name = "string", hide_default_value = true)]
    pub indent_with: String,

    /// Show a percentage next to the weight. [default: false]
    #[clap(short, long)]
    pub percent: bool,

    /// Show a textual barchart next to the weight. [default: false]
    #[clap(short, long)]
    pub bar: bool,

    /// Print the prefix tree after loading (and removing). [default: false]
    #[clap(long)]
    pub show_tree: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum Threshold {
    Weight(f64),
    Share(ProperFraction),
}

impl Threshold {
    pub fn hides(&self, weight: f64, share: ProperFraction) -> bool {
        match *self {
            Threshold::Weight(threshold) => weight < threshold,
            Threshold::Share(threshold) => share < threshold,
        }
    }
}

impl FromStr for Threshold {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(percent) = s.strip_suffix('%') {
            let percent: f64 = percent
                .parse()
                .map_err(|_| "percentage must be a decimal value, e.g., 10% or 2.5%")?;
            let fraction = ProperFraction::from(percent / 100.0).ok_or("percentage must be in range [0%, 100%]")?;
            Ok(Threshold::Share(fraction))
        } else {
            let weight = s.parse().map_err(|_| "threshold must be a weight or a percentage, e.g., 3 or 10%")?;
            Ok(Threshold::Weight(weight))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ProperFraction(pub f64);

impl ProperFraction {
    /// `part / total`, or the full fraction if there is nothing to divide.
    pub fn of(part: f64, total: f64) -> Self {
        if total > 0.0 {
            ProperFraction((part / total).clamp(0.0, 1.0))
        } else {
            ProperFraction(1.0)
        }
    }

    pub fn from(f: f64) -> Option<Self> {
        if !(0.0..=1.0).contains(&f) {
            None
        } else {
            Some(ProperFraction(f))
        }
    }

    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

/// A line of counted input: the weight and the rest of the line after the first whitespace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountedLine<'a>(pub f64, pub &'a str);

impl<'a> CountedLine<'a> {
    pub fn parse(line: &'a str) -> Result<Self, ParseFloatError> {
        let line = line.trim_start();
        let (weight, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        Ok(CountedLine(weight.parse()?, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_line() {
        assert_eq!(CountedLine::parse("3 foo bar").unwrap(), CountedLine(3.0, "foo bar"));
        assert_eq!(CountedLine::parse("  2.5\tfoo").unwrap(), CountedLine(2.5, "foo"));
        assert_eq!(CountedLine::parse("7").unwrap(), CountedLine(7.0, ""));
        assert!(CountedLine::parse("foo 3").is_err());
        assert!(CountedLine::parse("").is_err());
    }

    #[test]
    fn threshold() {
        assert!(matches!("2.5".parse::<Threshold>(), Ok(Threshold::Weight(w)) if w == 2.5));
        assert!(matches!("10%".parse::<Threshold>(), Ok(Threshold::Share(ProperFraction(f))) if f == 0.1));
        assert!("110%".parse::<Threshold>().is_err());
        assert!("x".parse::<Threshold>().is_err());

        let threshold = Threshold::Share(ProperFraction(0.25));
        assert!(threshold.hides(1.0, ProperFraction::of(1.0, 5.0)));
        assert!(!threshold.hides(1.0, ProperFraction::of(1.0, 4.0)));
        assert!(Threshold::Weight(2.0).hides(1.5, ProperFraction(1.0)));
    }

    #[test]
    fn parse_options() {
        let options = Options::parse_from(["ac", "-w", "-q", "how", "-q", "what", "--tree=simple", "in.txt"]);
        assert!(options.words);
        assert_eq!(options.query, ["how", "what"]);
        assert_eq!(options.tree, TrieVariant::Simple);
        assert_eq!(options.weights, WeightMode::Sum);
        assert_eq!(options.indent_with, "  ");
        assert_eq!(options.input, Some(PathBuf::from("in.txt")));
    }
}
