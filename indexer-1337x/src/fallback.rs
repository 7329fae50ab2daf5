//! Regex scan over the raw markup, used only when the structural pass finds
//! no table row at all (rows outside of any table, heavily broken pages).

use crate::mapper::{FieldMapper, ListingDraft};
use leetscrape_indexer_helper::{magnet::is_magnet, numeric::parse_count};
use leetscrape_indexer_prelude::{UNKNOWN, UNKNOWN_SIZE};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

fn build(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .unwrap()
}

static ROW: Lazy<Regex> = Lazy::new(|| build(r"<tr[^>]*>.*?</tr>"));
static ANCHOR: Lazy<Regex> = Lazy::new(|| build(r"<a\s([^>]*)>(.*?)</a>"));
// one group per quoting style so the other quote can appear in the value
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    build(r#"(?:^|\s)([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
});
static TAG: Lazy<Regex> = Lazy::new(|| build(r"<[^>]*>"));
static NUMBER: Lazy<Regex> = Lazy::new(|| build(r">\s*(\d+)\s*<"));
static SIZE: Lazy<Regex> = Lazy::new(|| build(r">\s*([0-9.]+\s*[KMGT]?i?B)\s*<"));

fn is_header(row: &str) -> bool {
    let row = row.to_ascii_lowercase();
    row.contains("<th") || row.contains(r#"class="header""#)
}

fn decode(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

struct LooseAnchor {
    href: Option<String>,
    title: Option<String>,
    text: String,
}

impl LooseAnchor {
    fn parse(attributes: &str, content: &str) -> Self {
        let mut href = None;
        let mut title = None;
        for cap in ATTRIBUTE.captures_iter(attributes) {
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map(|found| decode(found.as_str().trim()));
            let slot = match cap[1].to_ascii_lowercase().as_str() {
                "href" => &mut href,
                "title" => &mut title,
                _ => continue,
            };
            if slot.is_none() {
                *slot = value;
            }
        }
        let text = decode(TAG.replace_all(content, "").trim());
        Self { href, title, text }
    }

    fn name(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .or(Some(self.text.as_str()))
            .filter(|name| !name.is_empty())
    }
}

fn anchors(row: &str) -> impl Iterator<Item = LooseAnchor> + '_ {
    ANCHOR
        .captures_iter(row)
        .map(|cap| LooseAnchor::parse(&cap[1], &cap[2]))
}

fn find_name(mapper: &FieldMapper, row: &str) -> Option<(String, String)> {
    anchors(row).find_map(|anchor| {
        let url = mapper.detail_link(anchor.href.as_deref()?)?;
        let name = anchor.name()?;
        Some((url.to_string(), name.to_string()))
    })
}

fn nth_count(row: &str, index: usize) -> i64 {
    NUMBER
        .captures_iter(row)
        .nth(index)
        .and_then(|cap| parse_count(&cap[1]).ok())
        .map_or(UNKNOWN, i64::from)
}

fn parse_row(mapper: &FieldMapper, row: &str) -> Option<ListingDraft> {
    if is_header(row) {
        return None;
    }
    let (detail_link, name) = find_name(mapper, row)?;
    let size = SIZE
        .captures(row)
        .map(|cap| cap[1].to_string())
        .unwrap_or_else(|| UNKNOWN_SIZE.to_string());
    let link = anchors(row)
        .filter_map(|anchor| anchor.href)
        .find(|href| is_magnet(href));

    Some(ListingDraft {
        name,
        detail_link: Some(detail_link),
        link,
        seeds: nth_count(row, 0),
        leech: nth_count(row, 1),
        size,
    })
}

pub(crate) fn parse(mapper: &FieldMapper, html: &str) -> Vec<ListingDraft> {
    ROW.find_iter(html)
        .filter_map(|row| parse_row(mapper, row.as_str()))
        .collect()
}
