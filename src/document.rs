//! # Document Tree
//!
//! HTML is parsed with html5ever into an `RcDom` and converted once into an
//! owned arena. Every node gets a stable `NodeId` at conversion time; later
//! stages address nodes by that id instead of re-discovering them.
//!
//! ## Key Invariants
//!
//! 1. **Stable Ids**: ids are assigned in document pre-order and never reused.
//! 2. **Detach, Don't Drop**: removed nodes stay in the arena with no parent,
//!    so ids held by earlier stages remain valid.
//! 3. **No Comments**: comments, doctypes and processing instructions never
//!    enter the arena.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use indexmap::IndexMap;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

pub type NodeId = usize;

/// Ordered attribute map. Insertion order is output order.
pub type Attrs = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Element { tag: String, attrs: Attrs },
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSING
// ═══════════════════════════════════════════════════════════════════════════════

impl Document {
    /// Parse an HTML document. Never fails: html5ever recovers from malformed
    /// markup the way browsers do.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut doc = Document {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        };

        for child in dom.document.children.borrow().iter() {
            doc.convert(child, 0);
        }

        doc
    }

    fn convert(&mut self, handle: &Handle, parent: NodeId) {
        match &handle.data {
            NodeData::Element { name, attrs, .. } => {
                let mut converted = Attrs::new();
                for attr in attrs.borrow().iter() {
                    let key = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    converted.insert(key, attr.value.to_string());
                }

                let id = self.push(
                    NodeKind::Element {
                        tag: name.local.to_string(),
                        attrs: converted,
                    },
                    parent,
                );
                for child in handle.children.borrow().iter() {
                    self.convert(child, id);
                }
            }
            NodeData::Text { contents } => {
                self.push(NodeKind::Text(contents.borrow().to_string()), parent);
            }
            // Comments are stripped before any further processing
            NodeData::Comment { .. }
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. }
            | NodeData::Document => {}
        }
    }

    fn push(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACCESSORS
// ═══════════════════════════════════════════════════════════════════════════════

impl Document {
    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> Option<&Attrs> {
        match &self.nodes[id].kind {
            NodeKind::Element { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId, name: &str) -> bool {
        self.tag(id) == Some(name)
    }

    /// True if the node is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Attached elements below `id`, depth-first in document order.
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            if self.tag(current).is_some() {
                out.push(current);
            }
            stack.extend(self.nodes[current].children.iter().rev().copied());
        }

        out
    }

    /// Every attached element in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendant_elements(self.root())
    }

    pub fn find_first(&self, tag: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|&id| self.is_element(id, tag))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in &self.nodes[id].children {
            match &self.nodes[child].kind {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element { .. } => self.collect_text(child, out),
                NodeKind::Document => {}
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MUTATION
// ═══════════════════════════════════════════════════════════════════════════════

impl Document {
    pub fn set_attrs(&mut self, id: NodeId, new_attrs: Attrs) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id].kind {
            *attrs = new_attrs;
        }
    }

    pub fn rename(&mut self, id: NodeId, new_tag: &str) {
        if let NodeKind::Element { tag, .. } = &mut self.nodes[id].kind {
            *tag = new_tag.to_string();
        }
    }

    /// Unlink a node (and its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&child| child != id);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind: NodeKind::Element {
                tag: tag.to_string(),
                attrs: Attrs::new(),
            },
            parent: None,
            children: Vec::new(),
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(doc: &Document) -> Vec<String> {
        doc.elements()
            .into_iter()
            .filter_map(|id| doc.tag(id).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_implied_structure() {
        let doc = Document::parse("<h1>Hi</h1>");
        assert_eq!(tags(&doc), vec!["html", "head", "body", "h1"]);
    }

    #[test]
    fn test_comments_are_dropped() {
        let doc = Document::parse("<body><!-- note --><p>a</p></body>");
        let body = doc.find_first("body").unwrap();
        assert_eq!(doc.children(body).len(), 1);
        assert_eq!(doc.text_content(body), "a");
    }

    #[test]
    fn test_attribute_order_preserved() {
        let doc = Document::parse(r#"<img src="a.png" alt="x" class="c">"#);
        let img = doc.find_first("img").unwrap();
        let keys: Vec<&String> = doc.attrs(img).unwrap().keys().collect();
        assert_eq!(keys, vec!["src", "alt", "class"]);
    }

    #[test]
    fn test_namespaced_attribute_keys() {
        let doc = Document::parse(
            r##"<svg><use xlink:href="#icon"></use></svg>"##,
        );
        let use_el = doc.find_first("use").unwrap();
        assert_eq!(
            doc.attrs(use_el).unwrap().get("xlink:href"),
            Some(&"#icon".to_string())
        );
    }

    #[test]
    fn test_detach_keeps_ids_valid() {
        let mut doc = Document::parse("<p>one</p><p>two</p>");
        let first = doc.find_first("p").unwrap();
        doc.detach(first);
        assert!(!doc.is_attached(first));
        assert_eq!(doc.tag(first), Some("p"));
        assert_eq!(doc.elements().iter().filter(|&&id| doc.is_element(id, "p")).count(), 1);
    }

    #[test]
    fn test_append_moves_node() {
        let mut doc = Document::parse("<div><span>x</span></div>");
        let span = doc.find_first("span").unwrap();
        let wrapper = doc.create_element("section");
        doc.append_child(wrapper, span);
        assert!(!doc.is_attached(span));
        assert_eq!(doc.node(span).parent, Some(wrapper));
        let div = doc.find_first("div").unwrap();
        assert!(doc.children(div).is_empty());
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        let doc = Document::parse("<div><p>unclosed <b>bold</div></i><img src=");
        assert!(doc.find_first("div").is_some());
        assert!(doc.find_first("b").is_some());
    }
}
