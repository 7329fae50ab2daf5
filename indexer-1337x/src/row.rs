//! Row extraction over a parsed results page.
//!
//! The document is walked as a stream of open/close edges and a small state
//! machine (outside a row, in a row, in a cell) collects the cells of every
//! table row. Everything accumulated for a row lives in the machine and is
//! dropped or handed out when the row closes, so nothing leaks into the next
//! row.

use ego_tree::iter::{Edge, Traverse};
use ego_tree::{NodeId, NodeRef};
use scraper::node::Element;
use scraper::{Html, Node};

/// The attributes we read from the tags we care about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagAttributes {
    pub href: Option<String>,
    pub title: Option<String>,
    pub class: Option<String>,
}

impl TagAttributes {
    fn from_element(elt: &Element) -> Self {
        Self {
            href: elt.attr("href").map(String::from),
            title: elt.attr("title").map(String::from),
            class: elt.attr("class").map(String::from),
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class.as_deref().map_or(false, |value| {
            value
                .split_whitespace()
                .any(|item| item.eq_ignore_ascii_case(name))
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Anchor {
    pub attributes: TagAttributes,
    text: String,
}

impl Anchor {
    pub fn href(&self) -> Option<&str> {
        self.attributes.href.as_deref().map(str::trim)
    }

    pub fn title(&self) -> Option<&str> {
        self.attributes
            .title
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn text(&self) -> &str {
        self.text.trim()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawCell {
    /// Counted from 1, in document order.
    pub position: usize,
    /// Non-empty, trimmed text chunks.
    pub texts: Vec<String>,
    pub anchors: Vec<Anchor>,
}

impl RawCell {
    pub fn first_text(&self) -> Option<&str> {
        self.texts.first().map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn cell(&self, position: usize) -> Option<&RawCell> {
        self.cells.iter().find(|cell| cell.position == position)
    }

    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> {
        self.cells.iter().flat_map(|cell| cell.anchors.iter())
    }
}

pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(input: &str) -> Self {
        Self {
            html: Html::parse_document(input),
        }
    }

    /// Data rows of every table in the page, header rows excluded.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            edges: self.html.tree.root().traverse(),
            state: State::OutsideRow,
        }
    }
}

struct RowScope {
    node: NodeId,
    header: bool,
    cells: Vec<RawCell>,
}

impl RowScope {
    fn open(node: NodeId, elt: &Element) -> Self {
        Self {
            node,
            header: TagAttributes::from_element(elt).has_class("header"),
            cells: Vec::new(),
        }
    }

    fn close(self) -> Option<RawRow> {
        if self.header {
            tracing::trace!("skipping header row");
            None
        } else if self.cells.is_empty() {
            None
        } else {
            Some(RawRow { cells: self.cells })
        }
    }
}

struct CellScope {
    node: NodeId,
    cell: RawCell,
    anchor: Option<(NodeId, Anchor)>,
}

impl CellScope {
    fn open(node: NodeId, position: usize) -> Self {
        Self {
            node,
            cell: RawCell {
                position,
                texts: Vec::new(),
                anchors: Vec::new(),
            },
            anchor: None,
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, anchor)) = self.anchor.as_mut() {
            anchor.text.push_str(text);
        }
        let text = text.trim();
        if !text.is_empty() {
            self.cell.texts.push(text.to_string());
        }
    }

    fn open_anchor(&mut self, node: NodeId, elt: &Element) {
        if self.anchor.is_none() {
            self.anchor = Some((
                node,
                Anchor {
                    attributes: TagAttributes::from_element(elt),
                    text: String::new(),
                },
            ));
        }
    }

    fn close_anchor(&mut self, node: NodeId) {
        if matches!(self.anchor, Some((id, _)) if id == node) {
            if let Some((_, anchor)) = self.anchor.take() {
                self.cell.anchors.push(anchor);
            }
        }
    }

    fn close(mut self) -> RawCell {
        if let Some((_, anchor)) = self.anchor.take() {
            self.cell.anchors.push(anchor);
        }
        self.cell
    }
}

enum State {
    OutsideRow,
    InRow(RowScope),
    InCell(RowScope, CellScope),
}

fn element<'a>(node: &NodeRef<'a, Node>) -> Option<&'a Element> {
    node.value().as_element()
}

fn is_cell(elt: &Element) -> bool {
    matches!(elt.name(), "td" | "th")
}

/// Lazy sequence of rows, consumed as the document is walked.
pub struct Rows<'a> {
    edges: Traverse<'a, Node>,
    state: State,
}

impl<'a> Rows<'a> {
    fn step(&mut self, edge: Edge<'a, Node>) -> Option<RawRow> {
        let current = std::mem::replace(&mut self.state, State::OutsideRow);
        let (next, found) = match (current, edge) {
            (State::OutsideRow, Edge::Open(node)) => match element(&node) {
                Some(elt) if elt.name() == "tr" => {
                    (State::InRow(RowScope::open(node.id(), elt)), None)
                }
                _ => (State::OutsideRow, None),
            },
            (State::OutsideRow, Edge::Close(_)) => (State::OutsideRow, None),
            (State::InRow(mut row), Edge::Open(node)) => match element(&node) {
                Some(elt) if is_cell(elt) => {
                    if elt.name() == "th" {
                        row.header = true;
                    }
                    let cell = CellScope::open(node.id(), row.cells.len() + 1);
                    (State::InCell(row, cell), None)
                }
                _ => (State::InRow(row), None),
            },
            (State::InRow(row), Edge::Close(node)) if node.id() == row.node => {
                (State::OutsideRow, row.close())
            }
            (State::InRow(row), Edge::Close(_)) => (State::InRow(row), None),
            (State::InCell(mut row, mut cell), Edge::Open(node)) => {
                match node.value() {
                    Node::Text(text) => cell.push_text(text),
                    Node::Element(elt) if elt.name() == "th" => row.header = true,
                    Node::Element(elt) if elt.name() == "a" => cell.open_anchor(node.id(), elt),
                    _ => {}
                }
                (State::InCell(row, cell), None)
            }
            (State::InCell(mut row, cell), Edge::Close(node)) if node.id() == cell.node => {
                row.cells.push(cell.close());
                (State::InRow(row), None)
            }
            (State::InCell(row, mut cell), Edge::Close(node)) => {
                cell.close_anchor(node.id());
                (State::InCell(row, cell), None)
            }
        };
        self.state = next;
        found
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = RawRow;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(edge) = self.edges.next() {
            if let Some(row) = self.step(edge) {
                return Some(row);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(html: &str) -> Vec<RawRow> {
        Page::parse(html).rows().collect()
    }

    #[test]
    fn should_skip_header_rows() {
        let found = rows(
            r#"<table>
            <thead><tr><th>name</th><th>se</th></tr></thead>
            <tbody>
                <tr class="header"><td>name</td><td>se</td></tr>
                <tr><td>first</td><td>12</td></tr>
            </tbody>
            </table>"#,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cells.len(), 2);
        assert_eq!(found[0].cell(1).unwrap().first_text(), Some("first"));
        assert_eq!(found[0].cell(2).unwrap().first_text(), Some("12"));
    }

    #[test]
    fn should_tolerate_case_and_quoting() {
        let found = rows(
            r#"<TABLE><TR><TD><A HREF=/torrent/1/a/ TITLE='Some Name'>Some</A></TD>
            <Td><a href='magnet:?xt=urn:btih:1'>m</a></tD></TR></TABLE>"#,
        );
        assert_eq!(found.len(), 1);
        let name = &found[0].cell(1).unwrap().anchors[0];
        assert_eq!(name.href(), Some("/torrent/1/a/"));
        assert_eq!(name.title(), Some("Some Name"));
        assert_eq!(name.text(), "Some");
        assert_eq!(
            found[0].cell(2).unwrap().anchors[0].href(),
            Some("magnet:?xt=urn:btih:1")
        );
    }

    #[test]
    fn should_keep_nested_content_in_outer_cell() {
        let found = rows(
            r#"<table><tr>
                <td><span><b>outer</b></span><table><tr><td>inner</td></tr></table></td>
                <td>2</td>
            </tr></table>"#,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cells.len(), 2);
        assert_eq!(found[0].cell(1).unwrap().texts, vec!["outer", "inner"]);
        assert_eq!(found[0].cell(2).unwrap().first_text(), Some("2"));
    }

    #[test]
    fn should_recover_from_unterminated_rows() {
        let found = rows("<table><tr><td>a<td>1<tr><td>b<td>2</table><p>trailing");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].cell(1).unwrap().first_text(), Some("a"));
        assert_eq!(found[0].cell(2).unwrap().first_text(), Some("1"));
        assert_eq!(found[1].cell(1).unwrap().first_text(), Some("b"));
    }

    #[test]
    fn should_ignore_empty_rows_and_text_outside_cells() {
        let found = rows("<table><tr></tr><tr><td>x</td></tr></table>");
        assert_eq!(found.len(), 1);
        assert!(rows("<p>no table here</p>").is_empty());
    }

    #[test]
    fn should_collect_anchor_text_across_tags() {
        let found = rows(
            r#"<table><tr><td><a href="/torrent/9/x/">  Ubuntu <b>24.04</b> </a></td></tr></table>"#,
        );
        let anchor = &found[0].cell(1).unwrap().anchors[0];
        assert_eq!(anchor.text(), "Ubuntu 24.04");
        assert_eq!(anchor.title(), None);
    }
}
