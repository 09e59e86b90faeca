// src/core/dom.rs
// Lenient HTML fragment parser. Builds an owned arena tree per call; no
// shared parser state. Tolerates unclosed tags, stray close tags, comments
// and doctypes the way a forgiving parser does, instead of failing.
//
// Text nodes keep the raw source text (entity escapes intact) so that
// serialization round-trips `&nbsp;` and friends; `text_content()` decodes
// entities for visible-text checks.

use super::text::decode_entities;

pub type NodeId = usize;

#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Tag is stored lowercase; attribute names lowercase, values decoded.
    Element { tag: String, attrs: Vec<(String, String)> },
    /// Raw source text, entities preserved.
    Text(String),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A parsed fragment rooted at an implicit container (node 0). The container
/// is not part of the content; checks and transforms see its children.
#[derive(Clone, Debug)]
pub struct Fragment {
    nodes: Vec<Node>,
}

pub const ROOT: NodeId = 0;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "param", "source", "track", "wbr",
];

pub fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

impl Fragment {
    pub fn parse(markup: &str) -> Fragment {
        let mut frag = Fragment {
            nodes: vec![Node {
                kind: NodeKind::Element { tag: s!(), attrs: Vec::new() },
                parent: None,
                children: Vec::new(),
            }],
        };

        let b = markup.as_bytes();
        let n = b.len();
        let mut stack: Vec<NodeId> = vec![ROOT];
        let mut i = 0usize;
        let mut text_start = 0usize;

        while i < n {
            if b[i] != b'<' {
                i += 1;
                continue;
            }
            let rest = &markup[i..];

            if rest.starts_with("<!--") {
                frag.flush_text(&markup[text_start..i], &stack);
                i = match markup[i + 4..].find("-->") {
                    Some(p) => i + 4 + p + 3,
                    None => n,
                };
                text_start = i;
            } else if rest.len() >= 2 && (b[i + 1] == b'!' || b[i + 1] == b'?') {
                // doctype / processing instruction: skip to '>'
                frag.flush_text(&markup[text_start..i], &stack);
                i = match markup[i..].find('>') {
                    Some(p) => i + p + 1,
                    None => n,
                };
                text_start = i;
            } else if rest.starts_with("</") {
                frag.flush_text(&markup[text_start..i], &stack);
                let (name, end) = parse_close_tag(markup, i);
                // Pop to the nearest matching open element; no match = ignore.
                if let Some(pos) = stack.iter().rposition(|&id| frag.tag(id) == Some(name.as_str())) {
                    if pos > 0 {
                        stack.truncate(pos);
                    }
                }
                i = end;
                text_start = i;
            } else if rest.len() >= 2 && b[i + 1].is_ascii_alphabetic() {
                frag.flush_text(&markup[text_start..i], &stack);
                let (tag, attrs, self_closing, end) = parse_open_tag(markup, i);
                let parent = *stack.last().unwrap_or(&ROOT);
                let id = frag.push_node(
                    NodeKind::Element { tag: tag.clone(), attrs },
                    parent,
                );
                if !self_closing && !is_void(&tag) {
                    stack.push(id);
                }
                i = end;
                text_start = i;
            } else {
                // stray '<': plain text
                i += 1;
            }
        }
        frag.flush_text(&markup[text_start..], &stack);
        frag
    }

    fn push_node(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { kind, parent: Some(parent), children: Vec::new() });
        self.nodes[parent].children.push(id);
        id
    }

    fn flush_text(&mut self, raw: &str, stack: &[NodeId]) {
        if raw.is_empty() {
            return;
        }
        let parent = *stack.last().unwrap_or(&ROOT);
        self.push_node(NodeKind::Text(s!(raw)), parent);
    }

    /* ---------------- Reading ---------------- */

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Lowercase tag of an element node; None for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Every element in document order, excluding the container.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements(ROOT, &mut out);
        out
    }

    fn collect_elements(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[id].children {
            if matches!(self.nodes[child].kind, NodeKind::Element { .. }) {
                out.push(child);
            }
            self.collect_elements(child, out);
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id].kind {
            NodeKind::Element { attrs, .. } => attrs,
            NodeKind::Text(_) => &[],
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of every text node, entities decoded.
    pub fn text_content(&self) -> String {
        let mut out = s!();
        self.collect_text(ROOT, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in &self.nodes[id].children {
            if let NodeKind::Text(raw) = &self.nodes[child].kind {
                out.push_str(&decode_entities(raw));
            }
            self.collect_text(child, out);
        }
    }

    /* ---------------- Mutating (sanitizer hooks) ---------------- */

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id].kind {
            for (k, v) in attrs.iter_mut() {
                if k.eq_ignore_ascii_case(name) {
                    *v = s!(value);
                    return;
                }
            }
            attrs.push((s!(name), s!(value)));
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id].kind {
            attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        }
    }

    /* ---------------- Serializing ---------------- */

    /// Markup of a node's children (the "innerHTML" of `id`).
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = s!();
        for &child in &self.nodes[id].children {
            self.serialize_node(child, &mut out);
        }
        out
    }

    /// Markup of the whole fragment.
    pub fn serialize(&self) -> String {
        self.inner_html(ROOT)
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Text(raw) => out.push_str(raw),
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(v));
                    out.push('"');
                }
                out.push('>');
                if !is_void(tag) {
                    for &child in &self.nodes[id].children {
                        self.serialize_node(child, out);
                    }
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }
}

/// Escape an attribute value for double-quoted serialization. Literal
/// non-breaking spaces are left alone; only the entity escape form of
/// whitespace is ever policed, so the serializer must not reintroduce it.
fn escape_attr(v: &str) -> String {
    v.replace('&', "&amp;").replace('"', "&quot;")
}

/// `</name ...>` starting at `start`. Returns (lowercase name, end index).
fn parse_close_tag(s: &str, start: usize) -> (String, usize) {
    let b = s.as_bytes();
    let n = b.len();
    let mut j = start + 2;
    let mut name = s!();
    while j < n && (b[j].is_ascii_alphanumeric() || b[j] == b'-') {
        name.push(b[j].to_ascii_lowercase() as char);
        j += 1;
    }
    while j < n && b[j] != b'>' {
        j += 1;
    }
    if j < n {
        j += 1;
    }
    (name, j)
}

/// `<name attr=... >` starting at `start`.
/// Returns (lowercase tag, attrs, self_closing, end index).
fn parse_open_tag(s: &str, start: usize) -> (String, Vec<(String, String)>, bool, usize) {
    let b = s.as_bytes();
    let n = b.len();
    let mut j = start + 1;

    let mut tag = s!();
    while j < n && (b[j].is_ascii_alphanumeric() || b[j] == b'-') {
        tag.push(b[j].to_ascii_lowercase() as char);
        j += 1;
    }

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        while j < n && b[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= n {
            break; // unterminated open tag: auto-close at end of input
        }
        match b[j] {
            b'>' => {
                j += 1;
                break;
            }
            b'/' => {
                if j + 1 < n && b[j + 1] == b'>' {
                    self_closing = true;
                    j += 2;
                    break;
                }
                j += 1;
            }
            _ => {
                let (name, value, next) = parse_attr(s, j);
                if !name.is_empty() && !attrs.iter().any(|(k, _)| *k == name) {
                    attrs.push((name, value));
                }
                j = next;
            }
        }
    }

    (tag, attrs, self_closing, j)
}

/// One attribute at `start`: `name`, `name=bare`, `name="v"` or `name='v'`.
fn parse_attr(s: &str, start: usize) -> (String, String, usize) {
    let b = s.as_bytes();
    let n = b.len();
    let mut j = start;

    let mut name = s!();
    while j < n && !b[j].is_ascii_whitespace() && !matches!(b[j], b'=' | b'/' | b'>') {
        name.push(b[j].to_ascii_lowercase() as char);
        j += 1;
    }

    while j < n && b[j].is_ascii_whitespace() {
        j += 1;
    }
    if j >= n || b[j] != b'=' {
        return (name, s!(), j);
    }
    j += 1;
    while j < n && b[j].is_ascii_whitespace() {
        j += 1;
    }
    if j >= n {
        return (name, s!(), j);
    }

    let raw = match b[j] {
        quote @ (b'"' | b'\'') => {
            j += 1;
            let val_start = j;
            while j < n && b[j] != quote {
                j += 1;
            }
            let raw = &s[val_start..j];
            if j < n {
                j += 1; // closing quote
            }
            raw
        }
        _ => {
            let val_start = j;
            while j < n && !b[j].is_ascii_whitespace() && b[j] != b'>' {
                j += 1;
            }
            &s[val_start..j]
        }
    };

    (name, decode_entities(raw), j)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_text() {
        let frag = Fragment::parse("just text");
        assert_eq!(frag.elements().len(), 0);
        assert_eq!(frag.text_content(), "just text");
        assert_eq!(frag.serialize(), "just text");
    }

    #[test]
    fn parses_nested_elements() {
        let frag = Fragment::parse("<strong><code>color</code></strong> rest");
        let tags: Vec<_> = frag.elements().iter().filter_map(|&id| frag.tag(id).map(String::from)).collect();
        assert_eq!(tags, vec!["strong", "code"]);
        assert_eq!(frag.text_content(), "color rest");
    }

    #[test]
    fn attribute_quoting_variants() {
        let frag = Fragment::parse(r#"<a href="/x" rel='next' data-k=v>t</a>"#);
        let a = frag.elements()[0];
        assert_eq!(frag.attr(a, "href"), Some("/x"));
        assert_eq!(frag.attr(a, "rel"), Some("next"));
        assert_eq!(frag.attr(a, "data-k"), Some("v"));
    }

    #[test]
    fn unclosed_tag_auto_closes() {
        let frag = Fragment::parse("<em>text");
        assert_eq!(frag.serialize(), "<em>text</em>");
    }

    #[test]
    fn stray_close_tag_is_ignored() {
        let frag = Fragment::parse("a</div>b");
        assert_eq!(frag.text_content(), "ab");
        assert_eq!(frag.elements().len(), 0);
    }

    #[test]
    fn comments_are_dropped() {
        let frag = Fragment::parse("a<!-- hidden -->b");
        assert_eq!(frag.serialize(), "ab");
    }

    #[test]
    fn void_elements_take_no_children() {
        let frag = Fragment::parse("one<br>two");
        assert_eq!(frag.text_content(), "onetwo");
        assert_eq!(frag.serialize(), "one<br>two");
    }

    #[test]
    fn text_content_decodes_entities_serialize_keeps_them() {
        let frag = Fragment::parse("a&nbsp;b &amp; c");
        assert_eq!(frag.text_content(), "a\u{a0}b & c");
        assert_eq!(frag.serialize(), "a&nbsp;b &amp; c");
    }

    #[test]
    fn inner_html_of_parent() {
        let frag = Fragment::parse("<div>I am a poet<br> and didn't even know it.</div>");
        let ids = frag.elements();
        let br = ids.iter().copied().find(|&id| frag.tag(id) == Some("br")).unwrap();
        let parent = frag.parent(br).unwrap();
        assert_eq!(frag.tag(parent), Some("div"));
        assert_eq!(frag.inner_html(parent), "I am a poet<br> and didn't even know it.");
    }

    #[test]
    fn stray_lt_is_text() {
        let frag = Fragment::parse("a < b");
        assert_eq!(frag.text_content(), "a < b");
    }

    #[test]
    fn set_and_remove_attr() {
        let mut frag = Fragment::parse(r#"<a href="/x" data-foo="y">t</a>"#);
        let a = frag.elements()[0];
        frag.set_attr(a, "href", "https://example.com/x");
        frag.remove_attr(a, "data-foo");
        assert_eq!(frag.serialize(), r#"<a href="https://example.com/x">t</a>"#);
    }
}
