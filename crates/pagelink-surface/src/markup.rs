#![forbid(unsafe_code)]

//! Lenient markup fragments.
//!
//! Parses a small, forgiving subset of HTML into [`Document`] nodes: elements
//! with quoted, unquoted or bare attributes, void and self-closing elements,
//! text with character references. Comments and declarations are skipped.
//! Malformed input never fails; unmatched close tags are ignored and
//! unclosed elements are closed at the end of input.

use crate::document::{Document, NodeId, is_void_element};

/// Parse `input` and return its first top-level element.
///
/// Falls back to the first top-level text node when the fragment contains
/// no element, and to `None` when it contains neither. The returned node is
/// detached; the rest of the fragment is discarded.
pub fn parse_fragment(doc: &mut Document, input: &str) -> Option<NodeId> {
    let root = doc.create_element("div");
    Parser::new(doc, root, input).run();

    let children = doc.children(root).to_vec();
    let picked = children
        .iter()
        .copied()
        .find(|&c| doc.is_element(c))
        .or_else(|| children.first().copied());

    if let Some(node) = picked {
        doc.detach(node);
    }
    doc.discard(root);
    picked
}

struct Parser<'d, 'i> {
    doc: &'d mut Document,
    input: &'i str,
    pos: usize,
    open: Vec<NodeId>,
}

impl<'d, 'i> Parser<'d, 'i> {
    fn new(doc: &'d mut Document, root: NodeId, input: &'i str) -> Self {
        Self {
            doc,
            input,
            pos: 0,
            open: vec![root],
        }
    }

    fn rest(&self) -> &'i str {
        &self.input[self.pos..]
    }

    fn current(&self) -> NodeId {
        // The root is never popped.
        self.open[self.open.len() - 1]
    }

    fn run(&mut self) {
        while self.pos < self.input.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.skip_past(4, "-->");
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past(2, ">");
            } else if rest.starts_with("</") && starts_with_name(&rest[2..]) {
                self.close_tag();
            } else if rest.starts_with('<') && starts_with_name(&rest[1..]) {
                self.open_tag();
            } else {
                self.text();
            }
        }
    }

    fn skip_past(&mut self, skip: usize, terminator: &str) {
        let from = self.pos + skip;
        self.pos = self.input[from..]
            .find(terminator)
            .map_or(self.input.len(), |i| from + i + terminator.len());
    }

    fn text(&mut self) {
        // A stray '<' that does not start a tag is literal text.
        let start = self.pos;
        let search_from = start + self.rest().chars().next().map_or(1, char::len_utf8);
        let end = self.input[search_from..]
            .find('<')
            .map_or(self.input.len(), |i| search_from + i);
        self.pos = end;
        let decoded = decode_entities(&self.input[start..end]);

        let parent = self.current();
        if let Some(&last) = self.doc.children(parent).last()
            && let Some(existing) = self.doc.text(last)
        {
            let merged = format!("{existing}{decoded}");
            self.doc.set_text(last, merged);
            return;
        }
        let node = self.doc.create_text(decoded);
        self.doc.append_child(parent, node);
    }

    fn read_name(&mut self) -> &'i str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '/' | '>' | '='))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn open_tag(&mut self) {
        self.pos += 1;
        let tag = self.read_name().to_ascii_lowercase();
        let element = self.doc.create_element(&tag);
        let parent = self.current();
        self.doc.append_child(parent, element);

        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') || rest.starts_with('=') {
                self.pos += 1;
                continue;
            }
            let name = self.read_name().to_ascii_lowercase();
            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.read_attr_value()
            } else {
                String::new()
            };
            if self.doc.attr(element, &name).is_none() {
                self.doc.set_attr(element, &name, value);
            }
        }

        if !self_closing && !is_void_element(&tag) {
            self.open.push(element);
        }
    }

    fn read_attr_value(&mut self) -> String {
        let rest = self.rest();
        let raw = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                let len = body.find(quote).unwrap_or(body.len());
                // Opening quote, body, closing quote (if present).
                self.pos += 1 + len + usize::from(len < body.len());
                &body[..len]
            }
            _ => {
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += len;
                &rest[..len]
            }
        };
        decode_entities(raw)
    }

    fn close_tag(&mut self) {
        self.pos += 2;
        let tag = self.read_name().to_ascii_lowercase();
        self.skip_past(0, ">");

        // Pop to the nearest matching open element; ignore unmatched closers.
        let root = self.open[0];
        let matches = |&n: &NodeId| n != root && self.doc.tag(n) == Some(tag.as_str());
        if let Some(depth) = self.open.iter().rposition(matches) {
            self.open.truncate(depth);
        }
    }
}

fn starts_with_name(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Named references understood by [`decode_entities`].
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{a0}"),
    ("hellip", "\u{2026}"),
    ("mldr", "\u{2026}"),
    ("ndash", "\u{2013}"),
    ("mdash", "\u{2014}"),
    ("middot", "\u{b7}"),
    ("bull", "\u{2022}"),
    ("laquo", "\u{ab}"),
    ("raquo", "\u{bb}"),
    ("lsaquo", "\u{2039}"),
    ("rsaquo", "\u{203a}"),
    ("larr", "\u{2190}"),
    ("rarr", "\u{2192}"),
];

/// Replace character references (`&hellip;`, `&#8230;`, `&#x2026;`).
///
/// Unknown or malformed references are kept verbatim.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one(rest) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode a reference at the start of `s` (which begins with `&`).
fn decode_one(s: &str) -> Option<(String, usize)> {
    let semi = s.find(';')?;
    let body = &s[1..semi];
    if body.is_empty() || body.len() > 32 {
        return None;
    }
    let decoded = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        char::from_u32(code)?.to_string()
    } else {
        NAMED_ENTITIES
            .iter()
            .find(|(name, _)| *name == body)
            .map(|(_, value)| (*value).to_owned())?
    };
    Some((decoded, semi + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> (Document, Option<NodeId>) {
        let mut doc = Document::new();
        let node = parse_fragment(&mut doc, input);
        (doc, node)
    }

    #[test]
    fn first_element_wins() {
        let (doc, node) = parse("  lead <li><a href=\"#\"></a></li><li>other</li>");
        let node = node.unwrap();
        assert_eq!(doc.outer_html(node), r##"<li><a href="#"></a></li>"##);
        assert_eq!(doc.parent(node), None);
        // Only the picked subtree survives.
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn text_only_fragment_returns_text() {
        let (doc, node) = parse("&hellip;");
        assert_eq!(doc.text(node.unwrap()), Some("\u{2026}"));
    }

    #[test]
    fn empty_fragment_is_none() {
        let (doc, node) = parse("");
        assert!(node.is_none());
        assert!(doc.is_empty());
        let (_, node) = parse("<!-- nothing -->");
        assert!(node.is_none());
    }

    #[test]
    fn attributes_quoted_unquoted_and_bare() {
        let (doc, node) = parse(r#"<a href='#top' data-x=5 hidden class="page link">x</a>"#);
        let a = node.unwrap();
        assert_eq!(doc.attr(a, "href"), Some("#top"));
        assert_eq!(doc.attr(a, "data-x"), Some("5"));
        assert_eq!(doc.attr(a, "hidden"), Some(""));
        assert!(doc.has_class(a, "link"));
    }

    #[test]
    fn nested_and_void_elements() {
        let (doc, node) = parse("<span><img src=a.png><b>1</b><br/></span>");
        let span = node.unwrap();
        assert_eq!(
            doc.outer_html(span),
            r#"<span><img src="a.png"><b>1</b><br></span>"#
        );
    }

    #[test]
    fn unclosed_and_unmatched_tags_are_tolerated() {
        let (doc, node) = parse("<ul><li>a</em></ul>");
        assert_eq!(doc.outer_html(node.unwrap()), "<ul><li>a</li></ul>");
        let (doc, node) = parse("<p>open");
        assert_eq!(doc.outer_html(node.unwrap()), "<p>open</p>");
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let (doc, node) = parse("1 < 2");
        assert_eq!(doc.text(node.unwrap()), Some("1 < 2"));
    }

    #[test]
    fn uppercase_tags_are_lowercased() {
        let (doc, node) = parse("<A HREF=\"#\">1</A>");
        let a = node.unwrap();
        assert_eq!(doc.tag(a), Some("a"));
        assert_eq!(doc.attr(a, "href"), Some("#"));
        assert_eq!(doc.text_content(a), "1");
    }

    #[test]
    fn entity_decoding() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#8230;&#x2026;"), "\u{2026}\u{2026}");
        assert_eq!(decode_entities("&bogus; & &;"), "&bogus; & &;");
        assert_eq!(decode_entities("&laquo; prev"), "\u{ab} prev");
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_input_never_panics(input in ".{0,64}") {
            let mut doc = Document::new();
            if let Some(node) = parse_fragment(&mut doc, &input) {
                proptest::prop_assert_eq!(doc.parent(node), None);
                proptest::prop_assert!(doc.contains(node));
            } else {
                proptest::prop_assert!(doc.is_empty());
            }
        }

        #[test]
        fn tag_soup_never_panics(input in "[<>/a-c =\"'&;#x0-9!-]{0,48}") {
            let mut doc = Document::new();
            let _ = parse_fragment(&mut doc, &input);
        }
    }
}
