pub use bytesize;

use bytesize::ByteSize;
use std::str::FromStr;
use url::ParseError;

/// Value used for counts the site does not give us.
pub const UNKNOWN: i64 = -1;
/// Value used for sizes the site does not give us.
pub const UNKNOWN_SIZE: &str = "-1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    All,
    Movies,
    Tv,
    Music,
    Games,
    Anime,
    Software,
    Books,
    Adult,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::All,
        Self::Movies,
        Self::Tv,
        Self::Music,
        Self::Games,
        Self::Anime,
        Self::Software,
        Self::Books,
        Self::Adult,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Movies => "movies",
            Self::Tv => "tv",
            Self::Music => "music",
            Self::Games => "games",
            Self::Anime => "anime",
            Self::Software => "software",
            Self::Books => "books",
            Self::Adult => "adult",
        }
    }

    /// Name the site uses in category search paths, `None` for the generic search.
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Movies => Some("Movies"),
            Self::Tv => Some("TV"),
            Self::Music => Some("Music"),
            Self::Games => Some("Games"),
            Self::Anime => Some("Anime"),
            Self::Software => Some("Apps"),
            Self::Books => Some("Books"),
            Self::Adult => Some("XXX"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|item| item.key() == s)
            .ok_or_else(|| format!("invalid category {s:?}"))
    }
}

/// Page fetch primitive.
///
/// Implementations never fail loudly: network, status and decode errors all
/// come back as `None`, as does an empty body.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Option<String>;
}

/// Receives finished records, one at a time, in the order they are found.
pub trait Sink {
    fn emit(&mut self, record: ListingRecord);
}

impl Sink for Vec<ListingRecord> {
    fn emit(&mut self, record: ListingRecord) {
        self.push(record);
    }
}

pub trait IndexerBuilder: std::fmt::Debug {
    fn build(self, name: String) -> Result<Box<dyn Indexer + 'static>, IndexerError>;
}

/// Entry points exposed to the host application.
pub trait Indexer: std::fmt::Debug {
    /// Runs the whole fetch, parse and paginate cycle, emitting every complete
    /// record into `sink`. Recoverable failures only shrink the output.
    fn search(&self, query: &str, category: &str, sink: &mut dyn Sink);
    /// Magnet results need no separate download step.
    fn download(&self, record: &ListingRecord);
}

#[derive(Clone, Debug)]
pub struct IndexerError {
    pub origin: &'static str,
    pub reason: IndexerErrorReason,
}

#[derive(Clone, Debug)]
pub enum IndexerErrorReason {
    UnableToBuildClient { cause: String },
    UnableToBuildUrl { cause: ParseError },
    UnableToQuery { url: String, cause: String },
    UnableToRead { url: String, cause: String },
    EmptyContent { url: String },
}

impl IndexerError {
    pub fn new(origin: &'static str, reason: IndexerErrorReason) -> Self {
        Self { origin, reason }
    }
}

impl std::fmt::Display for IndexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IndexerError {{ origin={:?}, reason={:?} }}",
            self.origin, self.reason
        )
    }
}

impl std::error::Error for IndexerError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingRecord {
    pub name: String,
    /// Magnet URI, always starting with `magnet:?`.
    pub link: String,
    pub size: String,
    pub seeds: i64,
    pub leech: i64,
    pub engine_url: String,
    pub detail_link: Option<String>,
    pub pub_date: i64,
}

impl ListingRecord {
    /// Size in bytes when the size text reads like "1.2 GB".
    pub fn size_bytes(&self) -> Option<u64> {
        if self.size == UNKNOWN_SIZE {
            return None;
        }
        self.size.parse::<ByteSize>().ok().map(|size| size.as_u64())
    }
}
