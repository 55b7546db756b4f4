//! Element tree for the Wren style engine.
//!
//! An arena of [`Node`]s addressed by [`NodeId`], following the node
//! concepts of the [DOM Living Standard](https://dom.spec.whatwg.org/). It is
//! the reference document model that selectors are matched against; any other
//! tree can be styled by implementing the selector model trait of `wren-css`
//! for it.
//!
//! Nodes are only ever appended, never moved or removed, so a node's position
//! among its parent's children is fixed once it is attached. Sibling queries
//! use that position instead of separate sibling links.

use std::collections::{BTreeMap, HashSet};
use std::iter;

/// Attribute names mapped to values, ordered by name.
///
/// Namespaced attributes are stored under `prefix:name`.
pub type AttributesMap = BTreeMap<String, String>;

/// Index of a node in its [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The Document node every tree starts with.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its payload.
    pub node_type: NodeType,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    // position in `parent.children`; meaningless while detached
    index: usize,
}

impl Node {
    const fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            index: 0,
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
///
/// An element's namespace prefix, local name and attributes, plus the
/// dynamic states (`hover`, `focus`, `checked`, ...) that the host toggles
/// and state pseudo-classes test.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Namespace prefix (e.g. `svg`), or `None` outside any namespace.
    pub namespace: Option<String>,
    /// Local name, as written.
    pub tag_name: String,
    /// Attributes by name.
    pub attrs: AttributesMap,
    /// Dynamic states reported as pseudo-classes.
    pub states: HashSet<String>,
}

impl ElementData {
    /// An element with the given local name and nothing else.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Put the element in a namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attrs.insert(name.into(), value.into());
        self
    }

    /// Add a dynamic state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        let _ = self.states.insert(state.into());
        self
    }

    /// The `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// [§ 2.3.7 Space-separated tokens](https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#space-separated-tokens)
    ///
    /// The words of the `class` attribute.
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attrs
            .get("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether the element is in `state`.
    #[must_use]
    pub fn has_state(&self, state: &str) -> bool {
        self.states.contains(state)
    }
}

/// [§ 4.2 Node tree](https://dom.spec.whatwg.org/#node-trees)
///
/// Every node lives in one vector; the Document is always [`NodeId::ROOT`].
/// Queries about ids the tree never handed out answer `None` or empty.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// A tree holding only the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
        }
    }

    /// The Document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, attached or not, including the Document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the Document is never removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a detached node.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        self.nodes.push(Node::detached(node_type));
        NodeId(self.nodes.len() - 1)
    }

    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Attach a detached `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either id was not allocated by this tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.nodes[parent.0].children.len();
        self.nodes[parent.0].children.push(child);

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.index = index;
    }

    /// Append a new element to `parent`.
    pub fn append_element(&mut self, parent: NodeId, element: ElementData) -> NodeId {
        self.append(parent, NodeType::Element(element))
    }

    /// Append a new text node to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.append(parent, NodeType::Text(text.into()))
    }

    /// Append a new comment node to `parent`.
    pub fn append_comment(&mut self, parent: NodeId, data: impl Into<String>) -> NodeId {
        self.append(parent, NodeType::Comment(data.into()))
    }

    fn append(&mut self, parent: NodeId, node_type: NodeType) -> NodeId {
        let id = self.alloc(node_type);
        self.append_child(parent, id);
        id
    }

    /// The node's parent, which for a top-level element is the Document.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// All children in document order, text and comments included.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// The node just before or just after `id` under the same parent.
    fn sibling(&self, id: NodeId, before: bool) -> Option<NodeId> {
        let node = self.get(id)?;
        let siblings = self.children(node.parent?);
        let index = if before {
            node.index.checked_sub(1)?
        } else {
            node.index + 1
        };
        siblings.get(index).copied()
    }

    /// The node right after `id` under the same parent.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(id, false)
    }

    /// The node right before `id` under the same parent.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(id, true)
    }

    /// Parent, grandparent, ... up to and including the Document.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.parent(id), |&node| self.parent(node))
    }

    /// Earlier siblings, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.prev_sibling(id), |&node| self.prev_sibling(node))
    }

    /// Children that are elements.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.as_element(child).is_some())
    }

    /// The node's element data, if it is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.get(id)?.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// The node's text, if it is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.node_type {
            NodeType::Text(text) => Some(text),
            _ => None,
        }
    }

    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#document-element)
    ///
    /// "The document element of a document is the element whose parent is
    /// that document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(NodeId::ROOT).next()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
