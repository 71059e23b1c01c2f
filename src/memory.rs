//! An in-memory document tree, standing in for the browser DOM in tests and the preview.

use crate::markup::Element;
use crate::surface::{Mounted, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    style: Option<String>,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn from_element(el: &Element, parent: Option<NodeId>) -> Self {
        Self {
            tag: el.tag.clone(),
            id: el.id.clone(),
            classes: el.classes.clone(),
            style: el.style.clone(),
            attrs: el.attrs.clone(),
            text: el.text.clone(),
            parent,
            children: Vec::new(),
        }
    }
}

/// Arena-backed document. Nodes are never freed, detached subtrees just lose their parent link.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    body: Option<NodeId>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut doc = Self::without_body();
        doc.body = Some(doc.insert(&Element::new("body"), None));
        doc
    }

    /// A document that has not parsed its `<body>` yet.
    pub fn without_body() -> Self {
        Self {
            nodes: Vec::new(),
            body: None,
        }
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn style(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].style.as_deref()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    /// First attached node carrying `id`, in document order.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        let body = self.body?;
        self.descendants(body)
            .into_iter()
            .find(|n| self.nodes[n.0].id.as_deref() == Some(id))
    }

    /// Number of attached nodes carrying `id`.
    pub fn count_by_id(&self, id: &str) -> usize {
        let Some(body) = self.body else {
            return 0;
        };
        self.descendants(body)
            .into_iter()
            .filter(|n| self.nodes[n.0].id.as_deref() == Some(id))
            .count()
    }

    /// Prepends `el` to the body, like a page script injecting its own content.
    pub fn prepend_to_body(&mut self, el: &Element) -> Option<NodeId> {
        let body = self.body?;
        let node = self.insert(el, Some(body));
        self.nodes[body.0].children.insert(0, node);
        Some(node)
    }

    /// Detaches `node`, whatever holds it.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0].children.retain(|c| *c != node);
        true
    }

    pub fn to_html(&self) -> String {
        match self.body {
            Some(body) => self.to_element(body).to_html(),
            None => String::new(),
        }
    }

    fn to_element(&self, node: NodeId) -> Element {
        let n = &self.nodes[node.0];
        Element {
            tag: n.tag.clone(),
            id: n.id.clone(),
            classes: n.classes.clone(),
            style: n.style.clone(),
            attrs: n.attrs.clone(),
            text: n.text.clone(),
            children: n.children.iter().map(|c| self.to_element(*c)).collect(),
        }
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        out
    }

    // Inserts the whole subtree, leaving the link from `parent` to the caller
    fn insert(&mut self, el: &Element, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::from_element(el, parent));
        for child in &el.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }
}

impl Surface for MemoryDocument {
    type Handle = NodeId;

    fn mount(&mut self, root: &Element, particles_id: &str) -> Option<Mounted<NodeId>> {
        let root = self.prepend_to_body(root)?;
        // Scoped to the freshly inserted subtree, not the whole document
        let particles = std::iter::once(root)
            .chain(self.descendants(root))
            .find(|n| self.nodes[n.0].id.as_deref() == Some(particles_id));
        Some(Mounted { root, particles })
    }

    fn append(&mut self, parent: &NodeId, child: &Element) {
        let node = self.insert(child, Some(*parent));
        self.nodes[parent.0].children.push(node);
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        let classes = &mut self.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn detach(&mut self, node: &NodeId) -> bool {
        self.remove(*node)
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        let Some(body) = self.body else {
            return false;
        };
        let mut current = *node;
        loop {
            if current == body {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}
