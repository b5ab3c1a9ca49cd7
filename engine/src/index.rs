use crate::document::{DocId, Document, Field};
use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Token -> ids of the documents containing it in one field.
pub type FieldIndex = HashMap<String, HashSet<DocId>>;

/// The five field indices plus the document table, built in one pass over a
/// parsed corpus. A value of this type is always fully built; there is no
/// half-constructed state to query against, so readers need no
/// synchronization.
pub struct CorpusIndex {
    title: FieldIndex,
    plot: FieldIndex,
    doc_type: FieldIndex,
    year: FieldIndex,
    episode_title: FieldIndex,
    docs: Vec<Document>,
}

impl CorpusIndex {
    /// Build all field indices. The five builds are independent (each reads
    /// only its own field) and run as parallel tasks; within one field the
    /// documents are swept in parallel into a sharded map whose per-key
    /// locking deduplicates ids, then frozen into a plain `HashMap`.
    pub fn build(docs: Vec<Document>) -> CorpusIndex {
        let mut built: HashMap<Field, FieldIndex> = Field::ALL
            .par_iter()
            .map(|&field| (field, build_field(&docs, field)))
            .collect();

        let index = CorpusIndex {
            title: built.remove(&Field::Title).unwrap_or_default(),
            plot: built.remove(&Field::Plot).unwrap_or_default(),
            doc_type: built.remove(&Field::Type).unwrap_or_default(),
            year: built.remove(&Field::Year).unwrap_or_default(),
            episode_title: built.remove(&Field::EpisodeTitle).unwrap_or_default(),
            docs,
        };
        info!(
            num_docs = index.docs.len(),
            title_terms = index.title.len(),
            plot_terms = index.plot.len(),
            "built field indices"
        );
        index
    }

    pub fn postings(&self, field: Field) -> &FieldIndex {
        match field {
            Field::Title => &self.title,
            Field::Plot => &self.plot,
            Field::Type => &self.doc_type,
            Field::Year => &self.year,
            Field::EpisodeTitle => &self.episode_title,
        }
    }

    pub fn document(&self, id: DocId) -> &Document {
        &self.docs[id as usize]
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }
}

fn build_field(docs: &[Document], field: Field) -> FieldIndex {
    let map: DashMap<String, HashSet<DocId>> = DashMap::new();
    docs.par_iter().enumerate().for_each(|(id, doc)| {
        if field == Field::Year && doc.year_unknown() {
            return;
        }
        for token in doc.field_tokens(field) {
            map.entry(token.to_string())
                .or_default()
                .insert(id as DocId);
        }
    });
    map.into_iter().collect()
}
