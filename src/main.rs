use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::Context;
use autocomplete_trie::{EngineConfig, Letters, Node, Sanitizer, TextEngine, Tokenizer, Words};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::options::{CountedLine, Options, ProperFraction};

mod options;
mod unicode_bar;

const BAR_WIDTH: usize = 20;
const TARGET_MAX_LINE_WIDTH: usize = 100;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, so that stdout only contains the results.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let options = Options::parse();
    debug!(?options, "parsed options");

    let config = EngineConfig::new(options.tree, options.weights);
    if let Some(delimiter) = &options.split_delimiter {
        run(TextEngine::new(Words::with_delimiter(delimiter.clone()), config), &options)
    } else if options.words {
        run(TextEngine::new(Words::whitespace()?, config), &options)
    } else {
        run(TextEngine::new(Letters, config), &options)
    }
}

fn run<K: Tokenizer>(mut engine: TextEngine<K>, options: &Options) -> anyhow::Result<()> {
    if options.sanitize {
        engine = engine.sanitized(Sanitizer::new()?);
    }

    // Read lines from input and insert into the trie.
    let input: Box<dyn io::BufRead> = if let Some(file) = &options.input {
        let file = File::open(file).with_context(|| format!("could not open input file {}", file.display()))?;
        Box::new(BufReader::new(file))
    } else {
        Box::new(io::stdin().lock())
    };

    let mut skipped = 0;
    for (i, line) in input.lines().enumerate() {
        let line = line.context("could not read input")?;
        let mut line = line.as_str();

        // Optionally trim leading and trailing whitespace.
        if options.trim_input {
            line = line.trim();
        }

        // Optionally use weights from beginning of line.
        let CountedLine(weight, line) = if options.counted_input {
            CountedLine::parse(line).with_context(|| {
                format!("input line {}: expected a weight, got '{line}'", i + 1)
            })?
        } else {
            CountedLine(1.0, line)
        };

        if !engine
            .insert(line, weight)
            .with_context(|| format!("input line {}", i + 1))?
        {
            skipped += 1;
        }
    }
    debug!(values = engine.len(), skipped, "loaded input");

    for prefix in &options.remove {
        let removed = engine.remove(prefix);
        info!(prefix = prefix.as_str(), removed, "removed lines");
    }

    // Write results to output.
    let mut output: Box<dyn io::Write> = if let Some(file) = &options.output {
        let file = File::create(file).with_context(|| format!("could not create output file {}", file.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(io::stdout().lock())
    };

    if options.show_tree {
        let root = engine.tree().root();
        print_tree(&mut output, &engine, root, 0, options, root.weight())?;
    }

    let default_query = [String::new()];
    let queries = if options.query.is_empty() && !options.show_tree {
        &default_query[..]
    } else {
        &options.query[..]
    };
    for query in queries {
        print_matches(&mut output, &engine, query, options)?;
    }

    output.flush()?;
    Ok(())
}

fn print_matches<K: Tokenizer>(
    output: &mut impl io::Write,
    engine: &TextEngine<K>,
    query: &str,
    options: &Options,
) -> anyhow::Result<()> {
    // Shares are relative to all matches, not only the shown ones.
    let all_matches = engine.autocomplete(query, None)?;
    let total_weight: f64 = all_matches.iter().map(|(_, weight)| weight).sum();
    let matches = engine.autocomplete(query, options.limit)?;

    writeln!(output, "'{query}' ({} matches)", all_matches.len())?;
    for (value, weight) in matches {
        let share = ProperFraction::of(weight, total_weight);
        if options.min.map_or(false, |min| min.hides(weight, share)) {
            continue;
        }
        let line = format!("{}{weight} {}'{value}'", options.indent_with, percent(share, options));
        print_line(output, line, share, options)?;
    }
    Ok(())
}

/// Interior nodes show their label in brackets, leafs their value in quotes.
fn print_tree<K: Tokenizer>(
    output: &mut impl io::Write,
    engine: &TextEngine<K>,
    node: &Node<String, K::Token>,
    level: usize,
    options: &Options,
    total_weight: f64,
) -> io::Result<()> {
    if node.is_empty() {
        return Ok(());
    }
    let share = ProperFraction::of(node.weight(), total_weight);
    if options.min.map_or(false, |min| min.hides(node.weight(), share)) {
        return Ok(());
    }

    let indent = options.indent_with.repeat(level);
    let name = match (node.value(), node.label()) {
        (Some(value), _) => format!("'{value}'"),
        (None, Some(label)) => format!("[{}]", engine.tokenizer().join(label)),
        (None, None) => String::new(),
    };
    let line = format!("{indent}{} {}{name}", node.weight(), percent(share, options));
    print_line(output, line, share, options)?;

    for child in node.children() {
        print_tree(output, engine, child, level + 1, options, total_weight)?;
    }
    Ok(())
}

fn percent(share: ProperFraction, options: &Options) -> String {
    if options.percent {
        format!("({:.1}%) ", share.percent())
    } else {
        String::new()
    }
}

fn print_line(output: &mut impl io::Write, line: String, share: ProperFraction, options: &Options) -> io::Result<()> {
    if options.bar {
        let bar = unicode_bar::unicode_bar(share, BAR_WIDTH);
        // Put bar right of the other information and align such that total width is not exceeded.
        writeln!(output, "{:width$}{}", line, bar, width = TARGET_MAX_LINE_WIDTH - BAR_WIDTH)
    } else {
        writeln!(output, "{line}")
    }
}
