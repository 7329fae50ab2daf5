use crate::row::{Anchor, RawCell, RawRow};
use leetscrape_indexer_helper::{magnet::is_magnet, numeric::parse_count};
use leetscrape_indexer_prelude::{ListingRecord, UNKNOWN, UNKNOWN_SIZE};
use url::Url;

/// Which cell, counted from 1, holds which field.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct ColumnLayout {
    #[serde(default = "ColumnLayout::default_name")]
    pub name: usize,
    #[serde(default = "ColumnLayout::default_seeds")]
    pub seeds: usize,
    #[serde(default = "ColumnLayout::default_leech")]
    pub leech: usize,
    #[serde(default = "ColumnLayout::default_size")]
    pub size: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            seeds: Self::default_seeds(),
            leech: Self::default_leech(),
            size: Self::default_size(),
        }
    }
}

impl ColumnLayout {
    fn default_name() -> usize {
        1
    }

    fn default_seeds() -> usize {
        2
    }

    fn default_leech() -> usize {
        3
    }

    fn default_size() -> usize {
        5
    }
}

/// A listing as read from one results row, before its magnet is settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListingDraft {
    pub name: String,
    pub detail_link: Option<String>,
    pub link: Option<String>,
    pub seeds: i64,
    pub leech: i64,
    pub size: String,
}

impl ListingDraft {
    /// `None` while the draft has no magnet link.
    pub fn into_record(self, engine_url: &str) -> Option<ListingRecord> {
        let link = self.link?;
        Some(ListingRecord {
            name: self.name,
            link,
            size: self.size,
            seeds: self.seeds,
            leech: self.leech,
            engine_url: engine_url.to_string(),
            detail_link: self.detail_link,
            pub_date: UNKNOWN,
        })
    }
}

pub(crate) struct FieldMapper<'a> {
    /// Site root, its path ending with `/`.
    pub base_url: &'a Url,
    pub detail_path: &'a str,
    pub columns: &'a ColumnLayout,
}

impl<'a> FieldMapper<'a> {
    /// Resolves `href` against the site and keeps it only when it points to
    /// one of its detail pages.
    pub fn detail_link(&self, href: &str) -> Option<Url> {
        // root-relative links stay under the site path, as for a mirror at /1337x/
        let href = match href.strip_prefix('/') {
            Some(rest) if !rest.starts_with('/') => rest,
            _ => href,
        };
        let url = self.base_url.join(href).ok()?;
        if url.host() != self.base_url.host() {
            return None;
        }
        let detail_path = self.detail_path.trim_start_matches('/');
        url.path()
            .strip_prefix(self.base_url.path())
            .filter(|rest| rest.starts_with(detail_path))?;
        Some(url)
    }

    fn name_anchor<'r>(&self, row: &'r RawRow) -> Option<(&'r Anchor, Url)> {
        row.cell(self.columns.name)?
            .anchors
            .iter()
            .find_map(|anchor| {
                anchor
                    .href()
                    .and_then(|href| self.detail_link(href))
                    .map(|url| (anchor, url))
            })
    }

    fn count(&self, row: &RawRow, position: usize, field: &str) -> i64 {
        let Some(text) = row.cell(position).and_then(RawCell::first_text) else {
            return UNKNOWN;
        };
        match parse_count(text) {
            Ok(value) => i64::from(value),
            Err(err) => {
                tracing::debug!("invalid {field} value {text:?}: {err:?}");
                UNKNOWN
            }
        }
    }

    pub fn map(&self, row: &RawRow) -> Option<ListingDraft> {
        let (anchor, detail_link) = self.name_anchor(row)?;
        let name = anchor.title().unwrap_or_else(|| anchor.text());
        if name.is_empty() {
            tracing::debug!("skipping row with empty name for {detail_link}");
            return None;
        }

        let size = row
            .cell(self.columns.size)
            .and_then(RawCell::first_text)
            .unwrap_or(UNKNOWN_SIZE);
        let link = row
            .anchors()
            .filter_map(Anchor::href)
            .find(|href| is_magnet(href));

        Some(ListingDraft {
            name: name.to_string(),
            detail_link: Some(detail_link.to_string()),
            link: link.map(String::from),
            seeds: self.count(row, self.columns.seeds, "seeds"),
            leech: self.count(row, self.columns.leech, "leech"),
            size: size.to_string(),
        })
    }
}
