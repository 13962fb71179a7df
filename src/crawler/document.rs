//! Owned document tree
//!
//! `scraper::Html` is not `Send`, so a parsed page is copied into this plain
//! tree right after parsing and the parser's tree is dropped. Workers can then
//! hold a `Document` across await points. All traversals use an explicit
//! stack.

use scraper::{Html, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocNode {
    pub kind: NodeKind,
    /// Indices into [`Document::nodes`], in document order
    pub children: Vec<usize>,
}

impl DocNode {
    /// Tag name if this is an element
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Value of the first attribute named `name`
    pub fn attr(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

/// A parsed page; node 0 is the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub nodes: Vec<DocNode>,
}

impl Document {
    /// Parses an HTML document
    ///
    /// Parsing never fails; malformed markup is repaired by the HTML5 parser.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut nodes: Vec<DocNode> = Vec::new();
        let mut stack = vec![(parsed.tree.root(), None::<usize>)];

        while let Some((node, parent)) = stack.pop() {
            let kind = match node.value() {
                Node::Document | Node::Fragment => NodeKind::Document,
                Node::Element(element) => NodeKind::Element {
                    tag: element.name().to_string(),
                    attrs: element
                        .attrs()
                        .map(|(key, value)| (key.to_string(), value.to_string()))
                        .collect(),
                },
                Node::Text(text) => NodeKind::Text(String::from(&**text)),
                Node::Comment(comment) => NodeKind::Comment(String::from(&**comment)),
                Node::Doctype(_) | Node::ProcessingInstruction(_) => continue,
            };

            let index = nodes.len();
            nodes.push(DocNode {
                kind,
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                nodes[parent].children.push(index);
            }

            // Reversed so the first child is popped first
            let children: Vec<_> = node.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(index)));
            }
        }

        Self { nodes }
    }

    /// Parses raw response bytes, replacing invalid UTF-8
    pub fn parse_bytes(raw: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(raw))
    }

    /// Depth-first, pre-order walk starting at the root
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            document: self,
            stack: if self.nodes.is_empty() { Vec::new() } else { vec![0] },
        }
    }

    /// Concatenated text of every text node below `node`
    pub fn text_of(&self, node: &DocNode) -> String {
        let mut text = String::new();
        let mut stack: Vec<usize> = node.children.iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            let Some(current) = self.nodes.get(index) else {
                continue;
            };
            if let NodeKind::Text(t) = &current.kind {
                text.push_str(t);
            }
            stack.extend(current.children.iter().rev());
        }

        text
    }
}

/// Iterator returned by [`Document::walk`]
pub struct Walk<'a> {
    document: &'a Document,
    stack: Vec<usize>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a DocNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.stack.pop() {
            if let Some(node) = self.document.nodes.get(index) {
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}
