//! In-memory boolean search over the IMDb `plot.list` corpus format.
//!
//! The pipeline is strictly one-way: a corpus file is parsed into
//! [`Document`]s, the documents are frozen into a [`CorpusIndex`], and
//! queries are evaluated read-only against the built index.

pub mod corpus;
pub mod document;
pub mod expand;
pub mod index;
pub mod query;
pub mod stopwords;
pub mod tokenizer;

pub use corpus::{parse_corpus, read_latin1_lines, CorpusParser};
pub use document::{DocId, DocType, Document, Field};
pub use expand::{expand_query, load_synonyms, SynonymMap};
pub use index::{CorpusIndex, FieldIndex};
pub use query::{parse_query, Clause, QueryAtom, QueryValue};
pub use stopwords::{any_stop_word, is_stop_word};
