use leetscrape_indexer_helper::magnet::find_magnet;
use leetscrape_indexer_prelude::Fetch;

/// Fetches a detail page and looks for its magnet link. A failed fetch, an
/// empty page or a page without magnet all give `None`.
pub(crate) fn resolve_magnet<F: Fetch + ?Sized>(fetcher: &F, detail_url: &str) -> Option<String> {
    let html = fetcher.fetch(detail_url)?;
    let found = find_magnet(html.as_str());
    if found.is_none() {
        tracing::debug!("no magnet found in {detail_url}");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnePage(Option<String>);

    impl Fetch for OnePage {
        fn fetch(&self, _url: &str) -> Option<String> {
            self.0.clone()
        }
    }

    #[test]
    fn should_resolve_from_detail_page() {
        let page = include_str!("./torrent.html").replace(
            "%MAGNET%",
            "magnet:?xt=urn:btih:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA&dn=x",
        );
        assert_eq!(
            resolve_magnet(&OnePage(Some(page)), "https://1337x.to/torrent/1/x/").unwrap(),
            "magnet:?xt=urn:btih:AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA&dn=x"
        );
    }

    #[test]
    fn should_give_up_without_content() {
        assert_eq!(resolve_magnet(&OnePage(None), "https://1337x.to/torrent/1/x/"), None);
        let page = OnePage(Some("<html><body>gone</body></html>".into()));
        assert_eq!(resolve_magnet(&page, "https://1337x.to/torrent/1/x/"), None);
    }
}
