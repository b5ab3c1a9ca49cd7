use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Blanks, dots, commas, colons, exclamation and question marks split;
    // every other character (digits, apostrophes, hyphens, braces) is part
    // of the token.
    static ref DELIMITERS: Regex = Regex::new(r"[., ?:!]").expect("valid regex");
}

/// Tokenize text into lowercase terms on the fixed delimiter set, dropping
/// empty tokens. The same function is used for indexing and for the terms of
/// a phrase query, so a quoted phrase always splits the way the corpus did.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    DELIMITERS
        .split(&lowered)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
