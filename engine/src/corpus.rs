use crate::document::{DocType, Document};
use crate::tokenizer::tokenize;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Marker kept in the verbatim header line but stripped before parsing.
const SUSPENDED: &str = "{{suspended}}";

/// Decode one ISO-8859-1 line. Latin-1 maps byte-for-byte onto the first 256
/// Unicode scalars, so no table is needed.
fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Line state machine over the corpus grammar: an entry starts at an
/// `MV: ` header, accumulates `PL:` plot lines, and is closed by a
/// `------` separator. Everything else is ignored.
pub struct CorpusParser {
    docs: Vec<Document>,
    current: Option<Document>,
    plot_buf: String,
}

impl Default for CorpusParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusParser {
    pub fn new() -> Self {
        CorpusParser {
            docs: Vec::new(),
            current: None,
            plot_buf: String::new(),
        }
    }

    pub fn push_line(&mut self, line: &str) {
        if line.starts_with("MV: ") {
            self.current = Some(parse_header(line));
            self.plot_buf.clear();
        } else if line.starts_with("------") {
            // Separator closes the open document; with none open it is a no-op.
            if let Some(mut doc) = self.current.take() {
                doc.plot = tokenize(&self.plot_buf);
                self.plot_buf.clear();
                self.docs.push(doc);
            }
        } else if let Some(rest) = line.strip_prefix("PL:") {
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            self.plot_buf.push(' ');
            self.plot_buf.push_str(rest);
        }
    }

    /// Consume the parser. A document still open at end of input never saw
    /// its closing separator and is dropped, matching the corpus convention
    /// of a trailing rule.
    pub fn finish(self) -> Vec<Document> {
        if self.current.is_some() {
            debug!("input ended without trailing separator; dropping partial document");
        }
        self.docs
    }
}

/// Parse the whole corpus file (Latin-1 encoded) into documents.
pub fn parse_corpus(path: &Path) -> Result<Vec<Document>> {
    let file = File::open(path)
        .with_context(|| format!("cannot open corpus file {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut parser = CorpusParser::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("read failed on {}", path.display()))?;
        if n == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        parser.push_line(&latin1_to_string(&buf));
    }
    let docs = parser.finish();
    info!(num_docs = docs.len(), "parsed corpus");
    Ok(docs)
}

/// Read a Latin-1 text file into lines; used for query and result files
/// that share the corpus encoding.
pub fn read_latin1_lines(path: &Path) -> Result<Vec<String>> {
    let file =
        File::open(path).with_context(|| format!("cannot open file {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("read failed on {}", path.display()))?;
        if n == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        lines.push(latin1_to_string(&buf));
    }
    Ok(lines)
}

/// Parse one `MV: ` header line into a document with an empty plot.
///
/// Quoted titles are series, episodes when a `{...}` part follows; unquoted
/// titles are movies unless a `(TV)`, `(V)` or `(VG)` marker says otherwise.
/// The year is the last parenthesized group once markers and the episode
/// part are out of the way.
fn parse_header(line: &str) -> Document {
    let title_id = line.to_string();
    let stripped = line.replace(SUSPENDED, "");
    let rest = stripped.strip_prefix("MV: ").unwrap_or(&stripped);

    let (doc_type, year, title, episode_title) = if rest.starts_with('"') {
        parse_quoted_header(rest)
    } else {
        parse_unquoted_header(rest)
    };

    if year.is_none() {
        warn!(header = %title_id, "header has no parenthesized year group");
    }

    Document {
        title_id,
        doc_type,
        title: tokenize(&title),
        year,
        episode_title,
        plot: Vec::new(),
    }
}

fn parse_quoted_header(rest: &str) -> (DocType, Option<String>, String, Option<Vec<String>>) {
    let mut rest = rest.to_string();
    let mut doc_type = DocType::Series;
    let mut episode_title = None;

    if let (Some(open), Some(close)) = (rest.rfind('{'), rest.rfind('}')) {
        if open < close {
            doc_type = DocType::Episode;
            episode_title = Some(tokenize(&rest[open + 1..close]));
            rest.replace_range(open..=close, "");
        }
    }

    let year = extract_year(&rest);
    if let Some(y) = &year {
        rest = rest.replace(&format!("({y})"), "");
    }

    let title = match (rest.find('"'), rest.rfind('"')) {
        (Some(a), Some(b)) if a < b => rest[a + 1..b].to_string(),
        _ => rest.trim_matches('"').trim().to_string(),
    };

    (doc_type, year, title, episode_title)
}

fn parse_unquoted_header(rest: &str) -> (DocType, Option<String>, String, Option<Vec<String>>) {
    let mut rest = rest.to_string();
    let mut doc_type = DocType::Movie;

    // The marker must go before the year is taken, or "(TV)" would be
    // mistaken for the year group.
    if rest.contains("(TV)") {
        rest = rest.replace("(TV)", "");
        doc_type = DocType::Television;
    } else if rest.contains("(V)") {
        rest = rest.replace("(V)", "");
        doc_type = DocType::Video;
    } else if rest.contains("(VG)") {
        rest = rest.replace("(VG)", "");
        doc_type = DocType::VideoGame;
    }

    let year = extract_year(&rest);
    if let Some(y) = &year {
        rest = rest.replace(&format!("({y})"), "");
    }

    (doc_type, year, rest.trim().to_string(), None)
}

/// The substring between the last `(` and the last `)`, or `None` when the
/// line has no well-formed group. Malformed headers must not abort the load.
fn extract_year(line: &str) -> Option<String> {
    let open = line.rfind('(')?;
    let close = line.rfind(')')?;
    if open >= close {
        return None;
    }
    Some(line[open + 1..close].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(lines: &[&str]) -> Vec<Document> {
        let mut parser = CorpusParser::new();
        for line in lines {
            parser.push_line(line);
        }
        parser.finish()
    }

    #[test]
    fn movie_header() {
        let doc = parse_header("MV: Die Hard (1988)");
        assert_eq!(doc.title_id, "MV: Die Hard (1988)");
        assert_eq!(doc.doc_type, DocType::Movie);
        assert_eq!(doc.title, vec!["die", "hard"]);
        assert_eq!(doc.year.as_deref(), Some("1988"));
        assert!(doc.episode_title.is_none());
    }

    #[test]
    fn television_video_and_videogame_markers() {
        let tv = parse_header("MV: Duel (1971) (TV)");
        assert_eq!(tv.doc_type, DocType::Television);
        assert_eq!(tv.year.as_deref(), Some("1971"));
        assert_eq!(tv.title, vec!["duel"]);

        let v = parse_header("MV: The Animatrix (2003) (V)");
        assert_eq!(v.doc_type, DocType::Video);
        assert_eq!(v.year.as_deref(), Some("2003"));

        let vg = parse_header("MV: Grand Theft Auto (1997) (VG)");
        assert_eq!(vg.doc_type, DocType::VideoGame);
        assert_eq!(vg.year.as_deref(), Some("1997"));
        assert_eq!(vg.title, vec!["grand", "theft", "auto"]);
    }

    #[test]
    fn quoted_header_is_series() {
        let doc = parse_header("MV: \"The Wire\" (2002)");
        assert_eq!(doc.doc_type, DocType::Series);
        assert_eq!(doc.title, vec!["the", "wire"]);
        assert_eq!(doc.year.as_deref(), Some("2002"));
    }

    #[test]
    fn braced_part_makes_an_episode() {
        let doc = parse_header("MV: \"The Wire\" (2002) {All Due Respect (#3.2)}");
        assert_eq!(doc.doc_type, DocType::Episode);
        assert_eq!(doc.title, vec!["the", "wire"]);
        assert_eq!(doc.year.as_deref(), Some("2002"));
        assert_eq!(
            doc.episode_title.unwrap(),
            vec!["all", "due", "respect", "(#3", "2)"]
        );
    }

    #[test]
    fn suspended_marker_stays_in_id_only() {
        let doc = parse_header("MV: \"Some Show\" (1999) {{suspended}}");
        assert_eq!(doc.title_id, "MV: \"Some Show\" (1999) {{suspended}}");
        assert_eq!(doc.doc_type, DocType::Series);
        assert_eq!(doc.title, vec!["some", "show"]);
        assert_eq!(doc.year.as_deref(), Some("1999"));
        assert!(doc.episode_title.is_none());
    }

    #[test]
    fn header_without_year_group_does_not_crash() {
        let doc = parse_header("MV: Broken Header");
        assert!(doc.year.is_none());
        assert!(doc.year_unknown());
        assert_eq!(doc.title, vec!["broken", "header"]);
    }

    #[test]
    fn unknown_year_is_kept_raw() {
        let doc = parse_header("MV: Lost Film (????)");
        assert_eq!(doc.year.as_deref(), Some("????"));
        assert!(doc.year_unknown());
    }

    #[test]
    fn plot_lines_concatenate_in_order() {
        let docs = parse_one(&[
            "MV: Die Hard (1988)",
            "PL: John McClane fights",
            "PL: terrorists at Nakatomi Plaza.",
            "-------------------------------------------------------------------------------",
        ]);
        assert_eq!(docs.len(), 1);
        assert_eq!(
            docs[0].plot,
            vec![
                "john",
                "mcclane",
                "fights",
                "terrorists",
                "at",
                "nakatomi",
                "plaza"
            ]
        );
    }

    #[test]
    fn missing_trailing_separator_drops_partial_document() {
        let docs = parse_one(&[
            "MV: Die Hard (1988)",
            "PL: Yippee ki yay.",
            "-------------------------------------------------------------------------------",
            "MV: Unfinished (1999)",
            "PL: never closed",
        ]);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title_id, "MV: Die Hard (1988)");
    }

    #[test]
    fn separator_without_open_document_is_noop() {
        let docs = parse_one(&[
            "-------------------------------------------------------------------------------",
            "-------------------------------------------------------------------------------",
        ]);
        assert!(docs.is_empty());
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        let docs = parse_one(&[
            "PLOT SUMMARIES LIST",
            "===================",
            "MV: Die Hard (1988)",
            "BY: Anonymous",
            "PL: A cop in a tower.",
            "-------------------------------------------------------------------------------",
        ]);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].plot, vec!["a", "cop", "in", "a", "tower"]);
    }
}
