use derive_more::{Display, IsVariant};

/// Names which variant a node holds. Used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    #[display("section")]
    Section,
    #[display("item")]
    Item,
}

/// The second level of the tree: section metadata plus an ordered list of items.
///
/// A section has no identity of its own; it is addressed by its position among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Section<S, I> {
    pub metadata: S,
    pub items: Vec<I>,
}

impl<S, I> Section<S, I> {
    pub fn new(metadata: S) -> Self {
        Self {
            metadata,
            items: Vec::new(),
        }
    }

    pub fn with_items(metadata: S, items: Vec<I>) -> Self {
        Self { metadata, items }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// A single addressable unit of the tree, owning either a whole section or one item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, IsVariant)]
pub enum Node<S, I> {
    Section(Section<S, I>),
    Item(I),
}

impl<S, I> Node<S, I> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Section(_) => NodeKind::Section,
            Node::Item(_) => NodeKind::Item,
        }
    }

    pub fn as_node_ref(&self) -> NodeRef<'_, S, I> {
        match self {
            Node::Section(section) => NodeRef::Section(section),
            Node::Item(item) => NodeRef::Item(item),
        }
    }

    pub fn into_section(self) -> Option<Section<S, I>> {
        match self {
            Node::Section(section) => Some(section),
            Node::Item(_) => None,
        }
    }

    pub fn into_item(self) -> Option<I> {
        match self {
            Node::Section(_) => None,
            Node::Item(item) => Some(item),
        }
    }
}

impl<S, I> From<Section<S, I>> for Node<S, I> {
    fn from(section: Section<S, I>) -> Self {
        Node::Section(section)
    }
}

/// Borrowed view of a node stored in a tree.
#[derive(Debug, PartialEq, Eq, IsVariant)]
pub enum NodeRef<'a, S, I> {
    Section(&'a Section<S, I>),
    Item(&'a I),
}

impl<S, I> Clone for NodeRef<'_, S, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, I> Copy for NodeRef<'_, S, I> {}

impl<'a, S, I> NodeRef<'a, S, I> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Section(_) => NodeKind::Section,
            NodeRef::Item(_) => NodeKind::Item,
        }
    }

    pub fn section(self) -> Option<&'a Section<S, I>> {
        match self {
            NodeRef::Section(section) => Some(section),
            NodeRef::Item(_) => None,
        }
    }

    pub fn item(self) -> Option<&'a I> {
        match self {
            NodeRef::Section(_) => None,
            NodeRef::Item(item) => Some(item),
        }
    }
}

impl<S: Clone, I: Clone> NodeRef<'_, S, I> {
    pub fn to_node(self) -> Node<S, I> {
        match self {
            NodeRef::Section(section) => Node::Section(section.clone()),
            NodeRef::Item(item) => Node::Item(item.clone()),
        }
    }
}
