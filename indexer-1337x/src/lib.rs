use leetscrape_indexer_prelude::{
    Category, Fetch, Indexer, IndexerBuilder, IndexerError, IndexerErrorReason, ListingRecord,
    Sink,
};
use std::time::Duration;
use url::Url;

mod fallback;
mod fetch;
mod mapper;
mod row;
mod search;
mod torrent;

pub use fetch::HttpFetcher;
pub use mapper::ColumnLayout;

const BASE_URL: &str = "https://1337x.to";
const DETAIL_PATH: &str = "/torrent/";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0";
pub const NAME: &str = "1337x";

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Indexer1337xConfig {
    #[serde(default = "Indexer1337xConfig::default_base_url")]
    pub base_url: String,
    /// Path prefix of the listing detail pages.
    #[serde(default = "Indexer1337xConfig::default_detail_path")]
    pub detail_path: String,
    #[serde(default = "Indexer1337xConfig::default_user_agent")]
    pub user_agent: String,
    /// Request timeout, in seconds.
    #[serde(default = "Indexer1337xConfig::default_timeout")]
    pub timeout: u64,
    /// Listings on a full results page, fewer means it was the last one.
    #[serde(default = "Indexer1337xConfig::default_page_size")]
    pub page_size: usize,
    #[serde(default = "Indexer1337xConfig::default_max_pages")]
    pub max_pages: u32,
    #[serde(default)]
    pub columns: ColumnLayout,
}

impl Default for Indexer1337xConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            detail_path: Self::default_detail_path(),
            user_agent: Self::default_user_agent(),
            timeout: Self::default_timeout(),
            page_size: Self::default_page_size(),
            max_pages: Self::default_max_pages(),
            columns: ColumnLayout::default(),
        }
    }
}

impl Indexer1337xConfig {
    fn default_base_url() -> String {
        BASE_URL.into()
    }

    fn default_detail_path() -> String {
        DETAIL_PATH.into()
    }

    fn default_user_agent() -> String {
        USER_AGENT.into()
    }

    fn default_timeout() -> u64 {
        30
    }

    fn default_page_size() -> usize {
        20
    }

    fn default_max_pages() -> u32 {
        10
    }

    pub fn build_with<F: Fetch>(
        self,
        name: String,
        fetcher: F,
    ) -> Result<Indexer1337x<F>, IndexerError> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&format!("{base_url}/")).map_err(|cause| {
            IndexerError::new(NAME, IndexerErrorReason::UnableToBuildUrl { cause })
        })?;
        Ok(Indexer1337x {
            name,
            base_url,
            base,
            detail_path: self.detail_path,
            columns: self.columns,
            page_size: self.page_size,
            max_pages: self.max_pages,
            fetcher,
        })
    }

    pub fn into_indexer(self, name: String) -> Result<Indexer1337x, IndexerError> {
        let fetcher = HttpFetcher::new(&self.user_agent, Duration::from_secs(self.timeout))?;
        self.build_with(name, fetcher)
    }
}

impl IndexerBuilder for Indexer1337xConfig {
    fn build(self, name: String) -> Result<Box<dyn Indexer + 'static>, IndexerError> {
        tracing::info!("building 1337x indexer named {name:?} for {}", self.base_url);
        Ok(Box::new(self.into_indexer(name)?))
    }
}

#[derive(Debug)]
pub struct Indexer1337x<F = HttpFetcher> {
    name: String,
    base_url: String,
    base: Url,
    detail_path: String,
    columns: ColumnLayout,
    page_size: usize,
    max_pages: u32,
    fetcher: F,
}

impl Indexer1337x {
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self, IndexerError> {
        Indexer1337xConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
        .into_indexer(NAME.into())
    }
}

impl<F: Fetch> Indexer1337x<F> {
    pub fn search_url(&self, query: &str, category: Category, page: u32) -> String {
        let query = urlencoding::encode(query);
        match category.display_name() {
            Some(name) => format!("{}/category-search/{query}/{name}/{page}/", self.base_url),
            None => format!("{}/search/{query}/{page}/", self.base_url),
        }
    }

    fn mapper(&self) -> mapper::FieldMapper<'_> {
        mapper::FieldMapper {
            base_url: &self.base,
            detail_path: self.detail_path.as_str(),
            columns: &self.columns,
        }
    }

    fn complete(&self, mut draft: mapper::ListingDraft) -> Option<ListingRecord> {
        if draft.link.is_none() {
            if let Some(detail_link) = draft.detail_link.as_deref() {
                draft.link = torrent::resolve_magnet(&self.fetcher, detail_link);
            }
        }
        let name = draft.name.clone();
        let found = draft.into_record(self.base_url.as_str());
        if found.is_none() {
            tracing::debug!("dropping {name:?}, no magnet link");
        }
        found
    }

    /// Walks the result pages of `query` and emits each complete listing.
    pub fn search_category(&self, query: &str, category: Category, sink: &mut dyn Sink) {
        tracing::debug!("{} searching {query:?} in {category:?}", self.name);
        let mapper = self.mapper();

        for page in 1..=self.max_pages {
            let url = self.search_url(query, category, page);
            let Some(html) = self.fetcher.fetch(&url) else {
                tracing::debug!("{} stopping at page {page}, nothing fetched", self.name);
                break;
            };

            let drafts = search::parse(&mapper, html.as_str());
            let count = drafts.len();
            tracing::debug!("{} page {page} has {count} listings", self.name);

            for draft in drafts {
                if let Some(record) = self.complete(draft) {
                    sink.emit(record);
                }
            }

            if count < self.page_size {
                break;
            }
        }
    }
}

impl<F: Fetch + std::fmt::Debug> Indexer for Indexer1337x<F> {
    fn search(&self, query: &str, category: &str, sink: &mut dyn Sink) {
        let category = category.parse::<Category>().unwrap_or_else(|err| {
            tracing::debug!("{err}, using the generic search");
            Category::All
        });
        self.search_category(query, category, sink)
    }

    fn download(&self, record: &ListingRecord) {
        tracing::debug!("{} nothing to download for {}", self.name, record.link);
    }
}
