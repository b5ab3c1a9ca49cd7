use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Term -> synonyms, as supplied by an external synonym source.
pub type SynonymMap = HashMap<String, Vec<String>>;

lazy_static! {
    static ref OPERATORS: Regex = Regex::new("AND|OR|NOT").expect("valid regex");
}

/// Load a synonym map from a JSON object of the shape
/// `{"term": ["synonym", ...], ...}`.
pub fn load_synonyms(path: &Path) -> Result<SynonymMap> {
    let file =
        File::open(path).with_context(|| format!("cannot open synonym file {}", path.display()))?;
    let map: SynonymMap = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid synonym file {}", path.display()))?;
    Ok(map)
}

/// Rewrite every `field:term` whose term has synonyms into the OR-group
/// `(field:term OR field:syn1 OR ... OR field:synN)`, leaving the operators
/// between clauses untouched. Each distinct `field:term` pair is rewritten
/// once, across all of its occurrences.
pub fn expand_query(synonyms: &SynonymMap, query: &str) -> String {
    let mut expanded = query.to_string();
    let mut rewritten: HashSet<String> = HashSet::new();

    for part in OPERATORS.split(query) {
        let cleaned = part.trim().replace(['(', ')'], "");
        let Some((field, term)) = cleaned.split_once(':') else {
            continue;
        };
        let Some(entries) = synonyms.get(term) else {
            continue;
        };
        if entries.is_empty() {
            continue;
        }

        let pair = format!("{field}:{term}");
        if !rewritten.insert(pair.clone()) {
            continue;
        }

        let mut group = format!("({pair}");
        for synonym in entries {
            group.push_str(&format!(" OR {field}:{synonym}"));
        }
        group.push(')');

        debug!(%pair, synonyms = entries.len(), "expanding clause");
        expanded = expanded.replace(&pair, &group);
    }

    expanded
}
