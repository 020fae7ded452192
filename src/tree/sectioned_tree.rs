use std::iter;
use std::sync::Arc;

use super::errors::{IndexOutOfRangeSnafu, TreeError, TypeMismatchSnafu, UnsupportedMoveSnafu};
use super::node::{Node, NodeKind, NodeRef, Section};
use super::path::{IndexPath, ItemPath};

/// Ordered list of sections, each holding an ordered list of items.
///
/// Every node is addressed by an [`IndexPath`]. Top-level nodes are always sections and
/// second-level nodes are always items; the storage types make any other shape unrepresentable.
///
/// Sections are shared between clones of a tree. Mutating a clone copies only the section that
/// changes, so keeping an old tree around costs one pointer per untouched section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionedTree<S, I> {
    sections: Vec<Arc<Section<S, I>>>,
}

impl<S, I> Default for SectionedTree<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I> SectionedTree<S, I> {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    pub fn from_sections(sections: Vec<Section<S, I>>) -> Self {
        Self {
            sections: sections.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn sections(&self) -> impl ExactSizeIterator<Item = &Section<S, I>> + '_ {
        self.sections.iter().map(Arc::as_ref)
    }

    pub fn section(&self, index: usize) -> Option<&Section<S, I>> {
        self.sections.get(index).map(Arc::as_ref)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of items in a section, or `None` if the section does not exist.
    pub fn item_count(&self, section: usize) -> Option<usize> {
        self.section(section).map(Section::item_count)
    }

    /// Number of sections plus the number of items in all of them.
    pub fn total_node_count(&self) -> usize {
        self.sections.len() + self.sections().map(Section::item_count).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    pub fn get(&self, path: IndexPath) -> Result<NodeRef<'_, S, I>, TreeError> {
        match path {
            IndexPath::Section(index) => self
                .section(index)
                .map(NodeRef::Section)
                .ok_or_else(|| IndexOutOfRangeSnafu { path }.build()),
            IndexPath::Item(item_path) => self.item(item_path).map(NodeRef::Item),
        }
    }

    /// Like [`SectionedTree::get`], for paths given as raw index lists.
    pub fn get_raw(&self, components: &[usize]) -> Result<NodeRef<'_, S, I>, TreeError> {
        self.get(IndexPath::try_from(components)?)
    }

    pub fn item(&self, path: ItemPath) -> Result<&I, TreeError> {
        self.section(path.section)
            .and_then(|section| section.items.get(path.item))
            .ok_or_else(|| IndexOutOfRangeSnafu { path }.build())
    }

    /// Appends a section and returns its index.
    pub fn push_section(&mut self, section: Section<S, I>) -> usize {
        self.sections.push(Arc::new(section));
        self.sections.len() - 1
    }

    pub fn insert_section(&mut self, section: Section<S, I>, index: usize) -> Result<(), TreeError> {
        if index > self.sections.len() {
            return IndexOutOfRangeSnafu {
                path: IndexPath::Section(index),
            }
            .fail();
        }
        self.sections.insert(index, Arc::new(section));
        Ok(())
    }

    pub fn move_section(&mut self, from: usize, to: usize) -> Result<(), TreeError> {
        let count = self.sections.len();
        for index in [from, to] {
            if index >= count {
                return IndexOutOfRangeSnafu {
                    path: IndexPath::Section(index),
                }
                .fail();
            }
        }
        let section = self.sections.remove(from);
        self.sections.insert(to, section);
        Ok(())
    }

    /// Every path in the tree in pre-order: each section, then its items, then the next section.
    ///
    /// The iterator is lazy and each call starts a fresh traversal.
    pub fn depth_first_indices(&self) -> impl Iterator<Item = IndexPath> + '_ {
        self.sections()
            .enumerate()
            .flat_map(|(section_index, section)| {
                iter::once(IndexPath::Section(section_index)).chain(
                    (0..section.items.len()).map(move |item| IndexPath::item(section_index, item)),
                )
            })
    }
}

impl<S: Clone, I: Clone> SectionedTree<S, I> {
    pub fn into_sections(self) -> Vec<Section<S, I>> {
        self.sections.into_iter().map(Arc::unwrap_or_clone).collect()
    }

    /// Mutable access to one section. Copies the section first if another tree still shares it.
    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section<S, I>> {
        self.sections.get_mut(index).map(Arc::make_mut)
    }

    /// Replaces the node at `path`, returning the node previously stored there.
    pub fn set(&mut self, path: IndexPath, node: Node<S, I>) -> Result<Node<S, I>, TreeError> {
        match (path, node) {
            (IndexPath::Section(index), Node::Section(section)) => {
                self.set_section(index, section).map(Node::Section)
            }
            (IndexPath::Item(item_path), Node::Item(item)) => {
                self.set_item(item_path, item).map(Node::Item)
            }
            (path, node) => type_mismatch(path, &node),
        }
    }

    pub fn set_section(
        &mut self,
        index: usize,
        section: Section<S, I>,
    ) -> Result<Section<S, I>, TreeError> {
        let slot = self.sections.get_mut(index).ok_or_else(|| {
            IndexOutOfRangeSnafu {
                path: IndexPath::Section(index),
            }
            .build()
        })?;
        let previous = std::mem::replace(slot, Arc::new(section));
        Ok(Arc::unwrap_or_clone(previous))
    }

    pub fn set_item(&mut self, path: ItemPath, item: I) -> Result<I, TreeError> {
        if path.item >= self.item_count(path.section).unwrap_or(0) {
            return IndexOutOfRangeSnafu { path }.fail();
        }
        let items = self.items_mut(path)?;
        Ok(std::mem::replace(&mut items[path.item], item))
    }

    /// Inserts `node` at `path`, shifting later siblings one slot to the right.
    ///
    /// The last path component may equal the current sibling count, which appends.
    pub fn insert(&mut self, node: Node<S, I>, path: IndexPath) -> Result<(), TreeError> {
        match (path, node) {
            (IndexPath::Section(index), Node::Section(section)) => {
                self.insert_section(section, index)
            }
            (IndexPath::Item(item_path), Node::Item(item)) => self.insert_item(item, item_path),
            (path, node) => type_mismatch(path, &node),
        }
    }

    pub fn insert_item(&mut self, item: I, path: ItemPath) -> Result<(), TreeError> {
        if path.item > self.item_count(path.section).unwrap_or(0) {
            return IndexOutOfRangeSnafu { path }.fail();
        }
        self.items_mut(path)?.insert(path.item, item);
        Ok(())
    }

    pub fn remove(&mut self, path: IndexPath) -> Result<Node<S, I>, TreeError> {
        match path {
            IndexPath::Section(index) => self.remove_section(index).map(Node::Section),
            IndexPath::Item(item_path) => self.remove_item(item_path).map(Node::Item),
        }
    }

    pub fn remove_section(&mut self, index: usize) -> Result<Section<S, I>, TreeError> {
        if index >= self.sections.len() {
            return IndexOutOfRangeSnafu {
                path: IndexPath::Section(index),
            }
            .fail();
        }
        Ok(Arc::unwrap_or_clone(self.sections.remove(index)))
    }

    pub fn remove_item(&mut self, path: ItemPath) -> Result<I, TreeError> {
        if path.item >= self.item_count(path.section).unwrap_or(0) {
            return IndexOutOfRangeSnafu { path }.fail();
        }
        Ok(self.items_mut(path)?.remove(path.item))
    }

    /// Removes the node at `from` and re-inserts it at `to` under the same parent.
    ///
    /// `to` is resolved after the removal, so valid targets range over the existing siblings.
    /// Moving a node onto its own slot leaves the tree unchanged. Moves between different
    /// parents or depths are rejected.
    pub fn move_node(&mut self, from: IndexPath, to: IndexPath) -> Result<(), TreeError> {
        match (from, to) {
            (IndexPath::Section(from), IndexPath::Section(to)) => self.move_section(from, to),
            (IndexPath::Item(from), IndexPath::Item(to)) => self.move_item(from, to),
            (from, to) => UnsupportedMoveSnafu { from, to }.fail(),
        }
    }

    pub fn move_item(&mut self, from: ItemPath, to: ItemPath) -> Result<(), TreeError> {
        if from.section != to.section {
            return UnsupportedMoveSnafu {
                from: IndexPath::Item(from),
                to: IndexPath::Item(to),
            }
            .fail();
        }
        let count = self.item_count(from.section).unwrap_or(0);
        for path in [from, to] {
            if path.item >= count {
                return IndexOutOfRangeSnafu { path }.fail();
            }
        }
        let items = self.items_mut(from)?;
        let item = items.remove(from.item);
        items.insert(to.item, item);
        Ok(())
    }

    /// Swaps in a new item list for a section, returning the old one.
    ///
    /// Returns `None` and leaves the tree untouched if the section does not exist.
    pub fn replace_items(&mut self, section: usize, items: Vec<I>) -> Option<Vec<I>> {
        let slot = self.sections.get_mut(section)?;
        if let Some(section) = Arc::get_mut(slot) {
            return Some(std::mem::replace(&mut section.items, items));
        }
        let previous = slot.items.clone();
        *slot = Arc::new(Section::with_items(slot.metadata.clone(), items));
        Some(previous)
    }

    /// Empties every section and returns the number of removed items.
    ///
    /// Sections that hold no items are left shared.
    pub fn clear_items(&mut self) -> usize {
        let mut removed = 0;
        for slot in &mut self.sections {
            if slot.items.is_empty() {
                continue;
            }
            removed += slot.items.len();
            match Arc::get_mut(slot) {
                Some(section) => section.items.clear(),
                None => *slot = Arc::new(Section::new(slot.metadata.clone())),
            }
        }
        removed
    }

    /// Item list of the section `path` points into, copied out of shared storage if needed.
    fn items_mut(&mut self, path: ItemPath) -> Result<&mut Vec<I>, TreeError> {
        self.section_mut(path.section)
            .map(|section| &mut section.items)
            .ok_or_else(|| IndexOutOfRangeSnafu { path }.build())
    }
}

impl<S, I> From<Vec<Section<S, I>>> for SectionedTree<S, I> {
    fn from(sections: Vec<Section<S, I>>) -> Self {
        Self::from_sections(sections)
    }
}

fn expected_kind(path: IndexPath) -> NodeKind {
    match path {
        IndexPath::Section(_) => NodeKind::Section,
        IndexPath::Item(_) => NodeKind::Item,
    }
}

fn type_mismatch<S, I, T>(path: IndexPath, node: &Node<S, I>) -> Result<T, TreeError> {
    TypeMismatchSnafu {
        path,
        expected: expected_kind(path),
        found: node.kind(),
    }
    .fail()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    type Tree = SectionedTree<&'static str, i32>;

    #[fixture]
    fn tree() -> Tree {
        SectionedTree::from_sections(vec![
            Section::with_items("A", vec![1, 2, 3]),
            Section::with_items("B", vec![]),
            Section::with_items("C", vec![4]),
        ])
    }

    #[rstest]
    #[case(IndexPath::Section(0), Node::Section(Section::new("X")))]
    #[case(IndexPath::Section(3), Node::Section(Section::with_items("X", vec![9])))]
    #[case(IndexPath::item(0, 0), Node::Item(7))]
    #[case(IndexPath::item(0, 3), Node::Item(7))]
    #[case(IndexPath::item(1, 0), Node::Item(7))]
    fn insert_then_get_returns_inserted_node(
        mut tree: Tree,
        #[case] path: IndexPath,
        #[case] node: Node<&'static str, i32>,
    ) {
        tree.insert(node.clone(), path).expect("Failed to insert node");

        let stored = tree.get(path).expect("Failed to read inserted node");
        assert_eq!(stored.to_node(), node);
    }

    #[rstest]
    #[case(IndexPath::Section(0))]
    #[case(IndexPath::Section(2))]
    #[case(IndexPath::item(0, 1))]
    #[case(IndexPath::item(2, 0))]
    fn remove_then_insert_restores_tree(mut tree: Tree, #[case] path: IndexPath) {
        let original = tree.clone();

        let removed = tree.remove(path).expect("Failed to remove node");
        assert_ne!(tree, original);
        tree.insert(removed, path).expect("Failed to re-insert node");

        assert_eq!(tree, original);
    }

    #[rstest]
    #[case(IndexPath::Section(0), IndexPath::Section(2))]
    #[case(IndexPath::Section(2), IndexPath::Section(0))]
    #[case(IndexPath::Section(1), IndexPath::Section(1))]
    #[case(IndexPath::item(0, 0), IndexPath::item(0, 2))]
    #[case(IndexPath::item(0, 2), IndexPath::item(0, 0))]
    #[case(IndexPath::item(2, 0), IndexPath::item(2, 0))]
    fn move_matches_manual_remove_and_insert(
        mut tree: Tree,
        #[case] from: IndexPath,
        #[case] to: IndexPath,
    ) {
        let mut manual = tree.clone();
        let node = manual.remove(from).expect("Failed to remove node");
        manual.insert(node, to).expect("Failed to insert node");

        tree.move_node(from, to).expect("Failed to move node");

        assert_eq!(tree, manual);
    }

    #[rstest]
    fn move_section_to_end_rotates_order(mut tree: Tree) {
        tree.move_section(0, 2).expect("Failed to move section");

        let order: Vec<_> = tree.sections().map(|s| s.metadata).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
    }

    #[rstest]
    fn move_between_sections_is_rejected(mut tree: Tree) {
        let original = tree.clone();

        let result = tree.move_node(IndexPath::item(0, 0), IndexPath::item(2, 0));

        assert!(matches!(result, Err(TreeError::UnsupportedMove { .. })));
        assert_eq!(tree, original);
    }

    #[rstest]
    fn move_between_depths_is_rejected(mut tree: Tree) {
        let result = tree.move_node(IndexPath::Section(0), IndexPath::item(0, 0));
        assert!(matches!(result, Err(TreeError::UnsupportedMove { .. })));
    }

    #[rstest]
    #[case(IndexPath::Section(3))]
    #[case(IndexPath::item(0, 3))]
    #[case(IndexPath::item(1, 0))]
    #[case(IndexPath::item(5, 0))]
    fn get_out_of_range_fails(tree: Tree, #[case] path: IndexPath) {
        assert!(matches!(
            tree.get(path),
            Err(TreeError::IndexOutOfRange { path: reported }) if reported == path
        ));
    }

    #[rstest]
    fn get_raw_rejects_deep_paths(tree: Tree) {
        assert!(matches!(
            tree.get_raw(&[0, 0, 0]),
            Err(TreeError::InvalidPathLength { length: 3 })
        ));
        assert_eq!(tree.get_raw(&[0, 1]).expect("Failed to read item"), NodeRef::Item(&2));
    }

    #[rstest]
    fn insert_past_end_fails(mut tree: Tree) {
        let result = tree.insert(Node::Item(9), IndexPath::item(0, 4));
        assert!(matches!(result, Err(TreeError::IndexOutOfRange { .. })));

        let result = tree.insert(Node::Section(Section::new("Z")), IndexPath::Section(4));
        assert!(matches!(result, Err(TreeError::IndexOutOfRange { .. })));
    }

    #[rstest]
    fn set_with_wrong_variant_is_a_type_mismatch(mut tree: Tree) {
        let original = tree.clone();

        let result = tree.set(IndexPath::Section(0), Node::Item(5));
        assert_eq!(
            result,
            Err(TreeError::TypeMismatch {
                path: IndexPath::Section(0),
                expected: NodeKind::Section,
                found: NodeKind::Item,
            })
        );

        let result = tree.insert(Node::Section(Section::new("Z")), IndexPath::item(0, 0));
        assert!(matches!(result, Err(TreeError::TypeMismatch { .. })));
        assert_eq!(tree, original);
    }

    #[rstest]
    fn set_returns_previous_node(mut tree: Tree) {
        let previous = tree
            .set(IndexPath::item(0, 1), Node::Item(20))
            .expect("Failed to set item");

        assert_eq!(previous, Node::Item(2));
        assert_eq!(tree.item(ItemPath::new(0, 1)), Ok(&20));
    }

    #[rstest]
    fn depth_first_indices_visit_every_node_in_pre_order(tree: Tree) {
        let paths: Vec<_> = tree.depth_first_indices().collect();

        assert_eq!(
            paths,
            vec![
                IndexPath::Section(0),
                IndexPath::item(0, 0),
                IndexPath::item(0, 1),
                IndexPath::item(0, 2),
                IndexPath::Section(1),
                IndexPath::Section(2),
                IndexPath::item(2, 0),
            ]
        );
        assert_eq!(paths.len(), tree.total_node_count());
        assert!(paths.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[rstest]
    fn depth_first_indices_restart_on_each_call(tree: Tree) {
        let first: Vec<_> = tree.depth_first_indices().collect();
        let second: Vec<_> = tree.depth_first_indices().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_tree_has_no_indices() {
        let tree: Tree = SectionedTree::new();
        assert_eq!(tree.depth_first_indices().count(), 0);
        assert!(tree.is_empty());
    }

    #[rstest]
    fn replace_items_on_missing_section_is_a_no_op(mut tree: Tree) {
        let original = tree.clone();
        assert_eq!(tree.replace_items(7, vec![1]), None);
        assert_eq!(tree, original);
    }

    #[rstest]
    fn clear_items_keeps_sections_and_counts_removed(mut tree: Tree) {
        assert_eq!(tree.clear_items(), 4);

        assert_eq!(tree.section_count(), 3);
        assert_eq!(tree.total_node_count(), 3);
    }

    #[rstest]
    fn edits_do_not_leak_into_clones(mut tree: Tree) {
        let shared = tree.clone();

        tree.set_item(ItemPath::new(0, 0), 10).expect("Failed to set item");
        tree.replace_items(2, vec![8, 9]);
        tree.clear_items();

        assert_eq!(
            shared.sections().map(|s| s.items.clone()).collect::<Vec<_>>(),
            vec![vec![1, 2, 3], vec![], vec![4]]
        );
        assert_eq!(tree.item_count(2), Some(0));
    }
}

