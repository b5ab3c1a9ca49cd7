pub type DocId = u32;

/// Record kind, derived from the header line markers. Absent marker means a
/// plain movie; quoted titles are series (episodes when a `{...}` part is
/// present); `(TV)`, `(V)` and `(VG)` mark the remaining kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocType {
    Movie,
    Series,
    Episode,
    Television,
    Video,
    VideoGame,
}

impl DocType {
    /// The token this kind contributes to the type index.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Movie => "movie",
            DocType::Series => "series",
            DocType::Episode => "episode",
            DocType::Television => "television",
            DocType::Video => "video",
            DocType::VideoGame => "videogame",
        }
    }
}

/// The five searchable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Plot,
    Type,
    Year,
    EpisodeTitle,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Plot,
        Field::Type,
        Field::Year,
        Field::EpisodeTitle,
    ];

    /// Parse a field keyword. The caller lowercases the clause first, so
    /// matching here is on the lowercase spelling only.
    pub fn parse(keyword: &str) -> Option<Field> {
        match keyword {
            "title" => Some(Field::Title),
            "plot" => Some(Field::Plot),
            "type" => Some(Field::Type),
            "year" => Some(Field::Year),
            "episodetitle" => Some(Field::EpisodeTitle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Plot => "plot",
            Field::Type => "type",
            Field::Year => "year",
            Field::EpisodeTitle => "episodetitle",
        }
    }
}

/// One record parsed from the corpus. `title_id` is the verbatim header line
/// and stays the externally visible identity; everything else is the
/// tokenized field content. Built once by the parser, never mutated.
#[derive(Debug, Clone)]
pub struct Document {
    pub title_id: String,
    pub doc_type: DocType,
    pub title: Vec<String>,
    /// Raw year string from the last parenthesized group (`????` kept
    /// as-is); `None` when the header carried no such group.
    pub year: Option<String>,
    pub episode_title: Option<Vec<String>>,
    pub plot: Vec<String>,
}

impl Document {
    /// The token sequence of one field, used for indexing and for the
    /// contiguous-subsequence check of phrase queries. Type and year are
    /// single-token sequences.
    pub fn field_tokens(&self, field: Field) -> Vec<&str> {
        match field {
            Field::Title => self.title.iter().map(String::as_str).collect(),
            Field::Plot => self.plot.iter().map(String::as_str).collect(),
            Field::Type => vec![self.doc_type.as_str()],
            Field::Year => self.year.as_deref().map(|y| vec![y]).unwrap_or_default(),
            Field::EpisodeTitle => self
                .episode_title
                .as_ref()
                .map(|t| t.iter().map(String::as_str).collect())
                .unwrap_or_default(),
        }
    }

    /// True when the year is missing or the corpus `????` placeholder; such
    /// documents are kept out of the year index.
    pub fn year_unknown(&self) -> bool {
        match &self.year {
            Some(y) => y.contains("????"),
            None => true,
        }
    }
}
