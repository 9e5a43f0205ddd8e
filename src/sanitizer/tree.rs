// src/sanitizer/tree.rs

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, QualName, local_name, namespace_url, ns, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Index of a node inside a [`Fragment`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic container holding the top-level nodes of the fragment.
    Root,
    Element {
        /// Lowercase local name.
        name: String,
        /// False for SVG/MathML content.
        html: bool,
        /// Attributes in source order.
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// An HTML fragment stored as an arena with index-based links.
///
/// Comments, doctypes and processing instructions are dropped while
/// building the arena. Detached nodes stay in the arena but are no longer
/// reachable from the root.
#[derive(Debug, Clone)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    /// Parses `html` as the content of a `<body>` element, with scripting
    /// disabled so `<noscript>` holds markup rather than raw text.
    ///
    /// The HTML5 tree builder recovers from any malformed input, so this
    /// never fails.
    pub fn parse(html: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let dom = parse_fragment(
            RcDom::default(),
            opts,
            QualName::new(None, ns!(html), local_name!("body")),
            Vec::new(),
        )
        .one(html);

        let mut fragment = Fragment {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        };

        // The fragment parser wraps everything in a synthetic <html> element.
        let context = dom.document.children.borrow().first().cloned();
        if let Some(context) = context {
            let mut pending: Vec<(Handle, NodeId)> = context
                .children
                .borrow()
                .iter()
                .rev()
                .map(|child| (child.clone(), fragment.root()))
                .collect();

            while let Some((handle, parent)) = pending.pop() {
                let kind = match &handle.data {
                    NodeData::Text { contents } => NodeKind::Text(String::from(&**contents.borrow())),
                    NodeData::Element { name, attrs, .. } => NodeKind::Element {
                        name: name.local.to_string(),
                        html: name.ns == ns!(html),
                        attrs: attrs
                            .borrow()
                            .iter()
                            .map(|attr| (attr.name.local.to_string(), String::from(&*attr.value)))
                            .collect(),
                    },
                    _ => continue,
                };

                let id = fragment.push(kind, parent);
                for child in handle.children.borrow().iter().rev() {
                    pending.push((child.clone(), id));
                }
            }
        }

        fragment
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Returns the element name, or `None` for text and the root.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current);
            if let NodeKind::Text(content) = &node.kind {
                text.push_str(content);
            }
            stack.extend(node.children.iter().rev());
        }
        text
    }

    /// Turns `id` into a text node in place, dropping its subtree.
    pub fn replace_with_text(&mut self, id: NodeId, text: String) {
        let node = self.node_mut(id);
        node.kind = NodeKind::Text(text);
        node.children.clear();
    }

    /// Closest ancestor element named `name`, starting from the parent.
    pub fn ancestor_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let mut current = self.node(id).parent;
        while let Some(ancestor) = current {
            if self.element_name(ancestor) == Some(name) {
                return Some(ancestor);
            }
            current = self.node(ancestor).parent;
        }
        None
    }

    /// Detaches `id` and re-inserts it as the previous sibling of `reference`.
    pub fn move_before(&mut self, id: NodeId, reference: NodeId) {
        if let Some(old_parent) = self.node(id).parent {
            self.node_mut(old_parent).children.retain(|&child| child != id);
        }

        let Some(new_parent) = self.node(reference).parent else {
            return;
        };
        let siblings = &mut self.node_mut(new_parent).children;
        let position = siblings
            .iter()
            .position(|&child| child == reference)
            .unwrap_or(siblings.len());
        siblings.insert(position, id);
        self.node_mut(id).parent = Some(new_parent);
    }

    fn push(&mut self, kind: NodeKind, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.node_mut(parent).children.push(id);
        id
    }
}
