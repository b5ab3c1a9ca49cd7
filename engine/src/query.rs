use crate::document::{DocId, Field};
use crate::index::CorpusIndex;
use crate::tokenizer::tokenize;
use std::collections::HashSet;
use tracing::debug;

/// A single `field:value` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAtom {
    pub field: Field,
    pub value: QueryValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Term(String),
    /// Tokenized interior of a double-quoted value; matches a document when
    /// the tokens occur contiguously and in order in the field.
    Phrase(Vec<String>),
}

/// One AND-separated part of a query: either a bare atom or a parenthesized
/// OR-group as produced by synonym expansion. OR is not a general operator;
/// it is only accepted in this already-expanded group form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Single(QueryAtom),
    AnyOf(Vec<QueryAtom>),
}

/// Split `input` on a bare operator word, case-insensitively, treating
/// quoted regions as opaque so a phrase containing the word is never split.
fn split_on_operator(input: &str, operator: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_phrase = false;
    for word in input.split_whitespace() {
        if !in_phrase && word.eq_ignore_ascii_case(operator) {
            parts.push(current.trim().to_string());
            current.clear();
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        for c in word.chars() {
            if c == '"' {
                in_phrase = !in_phrase;
            }
        }
    }
    parts.push(current.trim().to_string());
    parts
}

fn parse_atom(raw: &str) -> Option<QueryAtom> {
    let (keyword, value) = raw.split_once(':')?;
    let field = Field::parse(keyword.trim())?;
    let value = value.trim();
    let value = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        QueryValue::Phrase(tokenize(&value[1..value.len() - 1]))
    } else {
        QueryValue::Term(value.to_string())
    };
    Some(QueryAtom { field, value })
}

fn parse_clause(raw: &str) -> Option<Clause> {
    let lowered = raw.to_lowercase();
    let part = lowered.trim();
    if part.starts_with('(') && part.ends_with(')') && part.len() >= 2 {
        let inner = &part[1..part.len() - 1];
        let atoms: Vec<QueryAtom> = split_on_operator(inner, "or")
            .iter()
            .filter_map(|a| parse_atom(a))
            .collect();
        if atoms.is_empty() {
            return None;
        }
        return Some(Clause::AnyOf(atoms));
    }
    parse_atom(part).map(Clause::Single)
}

/// Parse a raw query into its understood clauses. Malformed clauses (no
/// colon) and unknown fields are dropped; the rest of the query still
/// applies.
pub fn parse_query(query: &str) -> Vec<Clause> {
    split_on_operator(query, "and")
        .iter()
        .filter_map(|part| {
            let clause = parse_clause(part);
            if clause.is_none() && !part.trim().is_empty() {
                debug!(clause = %part, "skipping clause with no usable field:value");
            }
            clause
        })
        .collect()
}

impl CorpusIndex {
    /// Evaluate a conjunctive boolean query and return the verbatim header
    /// lines of every matching document. Clause results are intersected
    /// progressively with an empty short-circuit; a query with no understood
    /// clauses yields the empty set. Evaluation is read-only and idempotent.
    pub fn evaluate(&self, query: &str) -> HashSet<String> {
        let clauses = parse_query(query);
        if clauses.is_empty() {
            return HashSet::new();
        }

        let mut result: Option<HashSet<DocId>> = None;
        for clause in &clauses {
            let ids = self.eval_clause(clause);
            let merged = match result {
                None => ids,
                Some(acc) => acc.intersection(&ids).copied().collect(),
            };
            if merged.is_empty() {
                return HashSet::new();
            }
            result = Some(merged);
        }

        result
            .unwrap_or_default()
            .into_iter()
            .map(|id| self.document(id).title_id.clone())
            .collect()
    }

    fn eval_clause(&self, clause: &Clause) -> HashSet<DocId> {
        match clause {
            Clause::Single(atom) => self.eval_atom(atom),
            Clause::AnyOf(atoms) => {
                let mut union = HashSet::new();
                for atom in atoms {
                    union.extend(self.eval_atom(atom));
                }
                union
            }
        }
    }

    fn eval_atom(&self, atom: &QueryAtom) -> HashSet<DocId> {
        let postings = self.postings(atom.field);
        match &atom.value {
            QueryValue::Term(term) => postings.get(term).cloned().unwrap_or_default(),
            QueryValue::Phrase(tokens) => {
                // A phrase cannot match a document that lacks its first
                // token, so that token's posting set is the candidate pool.
                let Some(first) = tokens.first() else {
                    return HashSet::new();
                };
                let Some(candidates) = postings.get(first) else {
                    return HashSet::new();
                };
                candidates
                    .iter()
                    .copied()
                    .filter(|&id| {
                        contains_phrase(&self.document(id).field_tokens(atom.field), tokens)
                    })
                    .collect()
            }
        }
    }
}

/// Contiguous in-order subsequence check over a field's token sequence.
fn contains_phrase(tokens: &[&str], phrase: &[String]) -> bool {
    if phrase.is_empty() || tokens.len() < phrase.len() {
        return false;
    }
    tokens
        .windows(phrase.len())
        .any(|window| window.iter().zip(phrase).all(|(t, p)| *t == p.as_str()))
}
