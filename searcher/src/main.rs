use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use engine::corpus::{parse_corpus, read_latin1_lines};
use engine::{expand_query, load_synonyms, CorpusIndex, SynonymMap};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Boolean search over a movie plot.list corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single query and print the matching header lines
    Query {
        /// Path to the plot.list corpus file
        #[arg(long)]
        corpus: PathBuf,
        /// Optional JSON synonym map used to expand terms into OR-groups
        #[arg(long)]
        synonyms: Option<PathBuf>,
        /// e.g. title:"die hard" AND type:movie
        query: String,
    },
    /// Replay a query file, optionally checking against expected results
    Batch {
        /// Path to the plot.list corpus file
        #[arg(long)]
        corpus: PathBuf,
        /// File with one query per line (Latin-1, like the corpus)
        #[arg(long)]
        queries: PathBuf,
        /// Expected results file: per query a count line, then that many
        /// header lines
        #[arg(long)]
        expected: Option<PathBuf>,
        /// Optional JSON synonym map used to expand terms into OR-groups
        #[arg(long)]
        synonyms: Option<PathBuf>,
        /// Emit a JSON report instead of the human-readable transcript
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Serialize)]
struct QueryReport {
    query: String,
    took_s: f64,
    expected: Option<Vec<String>>,
    actual: Vec<String>,
    passed: Option<bool>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            corpus,
            synonyms,
            query,
        } => run_query(&corpus, synonyms.as_deref(), &query),
        Commands::Batch {
            corpus,
            queries,
            expected,
            synonyms,
            json,
        } => run_batch(
            &corpus,
            &queries,
            expected.as_deref(),
            synonyms.as_deref(),
            json,
        ),
    }
}

fn load_index(corpus: &Path) -> Result<CorpusIndex> {
    let start = Instant::now();
    let docs = parse_corpus(corpus)?;
    tracing::info!(num_docs = docs.len(), took_s = start.elapsed().as_secs_f64(), "parsed corpus");

    let start = Instant::now();
    let index = CorpusIndex::build(docs);
    tracing::info!(took_s = start.elapsed().as_secs_f64(), "built indices");
    Ok(index)
}

fn load_optional_synonyms(path: Option<&Path>) -> Result<Option<SynonymMap>> {
    path.map(load_synonyms).transpose()
}

fn apply_expansion(synonyms: Option<&SynonymMap>, query: &str) -> String {
    match synonyms {
        Some(map) => expand_query(map, query),
        None => query.to_string(),
    }
}

fn sorted(set: &HashSet<String>) -> Vec<String> {
    let mut list: Vec<String> = set.iter().cloned().collect();
    list.sort();
    list
}

fn run_query(corpus: &Path, synonyms: Option<&Path>, query: &str) -> Result<()> {
    let synonyms = load_optional_synonyms(synonyms)?;
    let index = load_index(corpus)?;

    let result = index.evaluate(&apply_expansion(synonyms.as_ref(), query));
    for line in sorted(&result) {
        println!("{line}");
    }
    tracing::info!(hits = result.len(), "query done");
    Ok(())
}

/// Expected results come as one count line per query followed by that many
/// header lines.
fn parse_expected(path: &Path) -> Result<Vec<HashSet<String>>> {
    let lines = read_latin1_lines(path)?;
    let mut expected = Vec::new();
    let mut iter = lines.into_iter();
    while let Some(count_line) = iter.next() {
        let count: usize = count_line
            .trim()
            .parse()
            .with_context(|| format!("bad result count line: {count_line:?}"))?;
        let mut set = HashSet::new();
        for _ in 0..count {
            match iter.next() {
                Some(line) => {
                    set.insert(line);
                }
                None => bail!("expected results file ended mid-block"),
            }
        }
        expected.push(set);
    }
    Ok(expected)
}

fn run_batch(
    corpus: &Path,
    queries: &Path,
    expected: Option<&Path>,
    synonyms: Option<&Path>,
    json: bool,
) -> Result<()> {
    let synonyms = load_optional_synonyms(synonyms)?;
    let expected = expected.map(parse_expected).transpose()?;
    let index = load_index(corpus)?;

    let queries = read_latin1_lines(queries)?;
    let mut reports = Vec::with_capacity(queries.len());
    let mut failures = 0usize;

    for (i, query) in queries.iter().enumerate() {
        let start = Instant::now();
        let actual = index.evaluate(&apply_expansion(synonyms.as_ref(), query));
        let took_s = start.elapsed().as_secs_f64();

        let expected_set = expected.as_ref().map(|all| {
            all.get(i).cloned().unwrap_or_default()
        });
        let passed = expected_set.as_ref().map(|e| *e == actual);
        if passed == Some(false) {
            failures += 1;
        }

        reports.push(QueryReport {
            query: query.clone(),
            took_s,
            expected: expected_set.as_ref().map(|e| sorted(e)),
            actual: sorted(&actual),
            passed,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!();
            println!("query:           {}", report.query);
            println!("runtime:         {:.6} s", report.took_s);
            if let Some(expected) = &report.expected {
                println!("expected result: {expected:?}");
            }
            println!("actual result:   {:?}", report.actual);
            match report.passed {
                Some(true) => println!("SUCCESS"),
                Some(false) => println!("FAILURE"),
                None => {}
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} queries failed", reports.len());
    }
    Ok(())
}
