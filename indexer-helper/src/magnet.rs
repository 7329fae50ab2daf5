use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

pub const MAGNET_PREFIX: &str = "magnet:?";

fn build(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

// evaluated in order, the first pattern with a match wins
static PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        build(r#"href="(magnet:\?[^"]+)""#),
        build(r"href='(magnet:\?[^']+)'"),
        build(r#"(magnet:\?xt=urn:btih:[a-f0-9]{40}[^\s<>"']*)"#),
    ]
});

pub fn is_magnet(link: &str) -> bool {
    link.starts_with(MAGNET_PREFIX)
}

/// Longest capture of `pattern` in `content`, the earliest one on ties.
fn longest_match<'a>(pattern: &Regex, content: &'a str) -> Option<&'a str> {
    pattern
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|found| found.as_str())
        .fold(None, |best, current| match best {
            Some(best) if best.len() >= current.len() => Some(best),
            _ => Some(current),
        })
}

/// Looks for a magnet URI anywhere in a page's raw markup.
///
/// Escaped ampersands are restored, so the link reads the same as one taken
/// from a parsed attribute.
pub fn find_magnet(content: &str) -> Option<String> {
    PATTERNS
        .iter()
        .find_map(|pattern| longest_match(pattern, content))
        .map(|found| found.replace("&amp;", "&"))
}
