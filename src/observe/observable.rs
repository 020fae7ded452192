use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::changeset::{Changeset, Operation};
use crate::diff::diff_section_items;
use crate::observe::{ChangesetSink, ListenerId, Listeners};
use crate::tree::{
    IndexOutOfRangeSnafu, IndexPath, ItemPath, Node, Section, SectionedTree, TreeError,
};

/// A [`SectionedTree`] that reports every mutation as a [`Changeset`].
///
/// Each mutating call validates its arguments, updates the tree, and then hands exactly one
/// changeset to every subscribed sink before returning. A call that fails leaves the tree as it
/// was and emits nothing. Calls that target a missing section where that is allowed
/// (`replace_items*`, `sort_items*`) are silent no-ops.
///
/// The tree is kept behind an [`Arc`] and updated copy-on-write, so the snapshot inside a
/// changeset stays valid for as long as a sink holds on to it.
pub struct ObservableSections<S, I> {
    tree: Arc<SectionedTree<S, I>>,
    listeners: Listeners<S, I>,
}

impl<S, I> Default for ObservableSections<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I> ObservableSections<S, I> {
    pub fn new() -> Self {
        Self::with_tree(SectionedTree::new())
    }

    pub fn with_tree(tree: SectionedTree<S, I>) -> Self {
        Self {
            tree: Arc::new(tree),
            listeners: Listeners::new(),
        }
    }

    pub fn from_sections(sections: Vec<Section<S, I>>) -> Self {
        Self::with_tree(SectionedTree::from_sections(sections))
    }

    pub fn subscribe(&mut self, sink: impl ChangesetSink<S, I> + 'static) -> ListenerId {
        self.listeners.subscribe(sink)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn tree(&self) -> &SectionedTree<S, I> {
        &self.tree
    }

    /// Shared handle to the current state. Later mutations do not affect it.
    pub fn snapshot(&self) -> Arc<SectionedTree<S, I>> {
        Arc::clone(&self.tree)
    }

    pub fn section_count(&self) -> usize {
        self.tree.section_count()
    }

    pub fn item_count(&self, section: usize) -> Option<usize> {
        self.tree.item_count(section)
    }

    /// The section at `index`, or `None` past the end.
    pub fn section(&self, index: usize) -> Option<&Section<S, I>> {
        self.tree.section(index)
    }

    pub fn item(&self, path: ItemPath) -> Result<&I, TreeError> {
        self.tree.item(path)
    }

    pub fn depth_first_indices(&self) -> impl Iterator<Item = IndexPath> + '_ {
        self.tree.depth_first_indices()
    }
}

impl<S: Clone, I: Clone> ObservableSections<S, I> {
    /// Appends a section and returns its index.
    pub fn append_section(&mut self, section: Section<S, I>) -> usize {
        let node = Node::Section(section.clone());
        let index = self.tree_mut().push_section(section);
        self.commit(vec![Operation::Insert {
            path: IndexPath::Section(index),
            node,
        }]);
        index
    }

    /// Appends an empty section carrying `metadata`.
    pub fn append_section_metadata(&mut self, metadata: S) -> usize {
        self.append_section(Section::new(metadata))
    }

    pub fn append_item(&mut self, item: I, section: usize) -> Result<ItemPath, TreeError> {
        let count = self.tree.item_count(section).ok_or_else(|| {
            IndexOutOfRangeSnafu {
                path: IndexPath::Section(section),
            }
            .build()
        })?;
        let path = ItemPath::new(section, count);
        self.insert_item(item, path)?;
        Ok(path)
    }

    pub fn insert_section(&mut self, section: Section<S, I>, index: usize) -> Result<(), TreeError> {
        let node = Node::Section(section.clone());
        self.tree_mut().insert_section(section, index)?;
        self.commit(vec![Operation::Insert {
            path: IndexPath::Section(index),
            node,
        }]);
        Ok(())
    }

    pub fn insert_section_metadata(&mut self, metadata: S, index: usize) -> Result<(), TreeError> {
        self.insert_section(Section::new(metadata), index)
    }

    pub fn insert_item(&mut self, item: I, path: ItemPath) -> Result<(), TreeError> {
        self.tree_mut().insert_item(item.clone(), path)?;
        self.commit(vec![Operation::Insert {
            path: path.into(),
            node: Node::Item(item),
        }]);
        Ok(())
    }

    /// Inserts `items` one after another starting at `path`.
    ///
    /// Emits one insert per item at `path`, `path + 1`, and so on, in that order. The target is
    /// validated up front, so either every item is inserted or none is.
    pub fn insert_items(
        &mut self,
        items: impl IntoIterator<Item = I>,
        path: ItemPath,
    ) -> Result<(), TreeError> {
        match self.tree.item_count(path.section) {
            Some(count) if path.item <= count => {}
            _ => return IndexOutOfRangeSnafu { path }.fail(),
        }

        let tree = self.tree_mut();
        let mut operations = Vec::new();
        for (offset, item) in items.into_iter().enumerate() {
            let target = path.offset(offset);
            tree.insert_item(item.clone(), target)?;
            operations.push(Operation::Insert {
                path: target.into(),
                node: Node::Item(item),
            });
        }
        self.commit(operations);
        Ok(())
    }

    pub fn move_section(&mut self, from: usize, to: usize) -> Result<(), TreeError> {
        self.tree_mut().move_section(from, to)?;
        self.commit(vec![Operation::Move {
            from: IndexPath::Section(from),
            to: IndexPath::Section(to),
        }]);
        Ok(())
    }

    /// Moves an item within its section. Moves across sections are rejected.
    pub fn move_item(&mut self, from: ItemPath, to: ItemPath) -> Result<(), TreeError> {
        self.tree_mut().move_item(from, to)?;
        self.commit(vec![Operation::Move {
            from: from.into(),
            to: to.into(),
        }]);
        Ok(())
    }

    pub fn remove_section(&mut self, index: usize) -> Result<Section<S, I>, TreeError> {
        let section = self.tree_mut().remove_section(index)?;
        self.commit(vec![Operation::Delete {
            path: IndexPath::Section(index),
        }]);
        Ok(section)
    }

    pub fn remove_item(&mut self, path: ItemPath) -> Result<I, TreeError> {
        let item = self.tree_mut().remove_item(path)?;
        self.commit(vec![Operation::Delete { path: path.into() }]);
        Ok(item)
    }

    /// Empties every section while keeping the sections themselves.
    ///
    /// Deletes are reported in descending path order, so replaying them one by one never shifts
    /// an index that a later one still refers to. Returns the number of removed items.
    pub fn remove_all_items(&mut self) -> usize {
        let operations: Vec<Operation<S, I>> = self
            .tree
            .depth_first_indices()
            .filter(IndexPath::is_item)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|path| Operation::Delete { path })
            .collect();

        let removed = self.tree_mut().clear_items();
        debug!("Removed {} items from all sections", removed);
        self.commit(operations);
        removed
    }

    /// Drops every section and item, emitting a single reload.
    pub fn remove_all_items_and_sections(&mut self) {
        self.tree_mut().clear();
        self.commit(vec![Operation::Reload]);
    }

    /// Replaces the item at `path` and returns the previous one.
    pub fn set_item(&mut self, path: ItemPath, item: I) -> Result<I, TreeError> {
        let previous = self.tree_mut().set_item(path, item.clone())?;
        self.commit(vec![Operation::Update {
            path: path.into(),
            node: Node::Item(item),
        }]);
        Ok(previous)
    }

    /// Replaces the section at `index` and returns the previous one.
    ///
    /// Only existing sections can be replaced; use [`ObservableSections::remove_section`] to
    /// drop one.
    pub fn set_section(
        &mut self,
        index: usize,
        section: Section<S, I>,
    ) -> Result<Section<S, I>, TreeError> {
        let node = Node::Section(section.clone());
        let previous = self.tree_mut().set_section(index, section)?;
        self.commit(vec![Operation::Update {
            path: IndexPath::Section(index),
            node,
        }]);
        Ok(previous)
    }

    /// Overwrites the items of a section without computing a diff.
    ///
    /// Emits one update of the whole section. Returns the old items, or `None` without emitting
    /// anything if the section does not exist.
    pub fn replace_items(&mut self, section: usize, items: Vec<I>) -> Option<Vec<I>> {
        if self.tree.section(section).is_none() {
            debug!("Section {} does not exist, skipping item replacement", section);
            return None;
        }

        let previous = self.tree_mut().replace_items(section, items)?;
        let node = Node::Section(self.tree.section(section)?.clone());
        self.commit(vec![Operation::Update {
            path: IndexPath::Section(section),
            node,
        }]);
        Some(previous)
    }

    /// Overwrites the items of a section and emits item-level deletes and inserts computed
    /// with `equal`.
    ///
    /// The diff is only a description: the new list is assigned to the section directly, and
    /// observers receive the operations once the section already holds `items`.
    pub fn replace_items_by<F>(&mut self, section: usize, items: Vec<I>, equal: F) -> Option<Vec<I>>
    where
        F: FnMut(&I, &I) -> bool,
    {
        let Some(current) = self.tree.section(section) else {
            debug!("Section {} does not exist, skipping diffed replacement", section);
            return None;
        };

        let operations = diff_section_items(section, &current.items, &items, equal);
        debug!(
            "Diff of section {} produced {} operations",
            section,
            operations.len()
        );
        let previous = self.tree_mut().replace_items(section, items)?;
        self.commit(operations);
        Some(previous)
    }

    /// Sorts the items of a section and emits a single section update.
    ///
    /// Returns `false` without emitting anything if the section does not exist.
    pub fn sort_items_by<F>(&mut self, section: usize, compare: F) -> bool
    where
        F: FnMut(&I, &I) -> Ordering,
    {
        match self.sorted_items(section, compare) {
            Some(items) => self.replace_items(section, items).is_some(),
            None => false,
        }
    }

    pub fn sort_items_by_key<K, F>(&mut self, section: usize, mut key: F) -> bool
    where
        K: Ord,
        F: FnMut(&I) -> K,
    {
        self.sort_items_by(section, |a, b| key(a).cmp(&key(b)))
    }

    fn sorted_items<F>(&self, section: usize, compare: F) -> Option<Vec<I>>
    where
        F: FnMut(&I, &I) -> Ordering,
    {
        let Some(section_ref) = self.tree.section(section) else {
            debug!("Section {} does not exist, skipping sort", section);
            return None;
        };
        let mut items = section_ref.items.clone();
        items.sort_by(compare);
        debug!("Sorted {} items of section {}", items.len(), section);
        Some(items)
    }

    fn tree_mut(&mut self) -> &mut SectionedTree<S, I> {
        Arc::make_mut(&mut self.tree)
    }

    fn commit(&mut self, operations: Vec<Operation<S, I>>) {
        let changeset = Changeset::new(operations, Arc::clone(&self.tree));
        debug!(
            "Emitting changeset with {} operations to {} listeners",
            changeset.len(),
            self.listeners.len()
        );
        self.listeners.notify(&changeset);
    }
}

impl<S: Clone, I: Clone + PartialEq> ObservableSections<S, I> {
    /// [`ObservableSections::replace_items_by`] using `==` to match items.
    pub fn replace_items_with_diff(&mut self, section: usize, items: Vec<I>) -> Option<Vec<I>> {
        self.replace_items_by(section, items, |a, b| a == b)
    }

    /// Sorts the items of a section and emits the item moves as deletes and inserts.
    pub fn sort_items_by_with_diff<F>(&mut self, section: usize, compare: F) -> bool
    where
        F: FnMut(&I, &I) -> Ordering,
    {
        match self.sorted_items(section, compare) {
            Some(items) => self.replace_items_with_diff(section, items).is_some(),
            None => false,
        }
    }

    pub fn sort_items_by_key_with_diff<K, F>(&mut self, section: usize, mut key: F) -> bool
    where
        K: Ord,
        F: FnMut(&I) -> K,
    {
        self.sort_items_by_with_diff(section, |a, b| key(a).cmp(&key(b)))
    }
}

impl<S, I> From<SectionedTree<S, I>> for ObservableSections<S, I> {
    fn from(tree: SectionedTree<S, I>) -> Self {
        Self::with_tree(tree)
    }
}

impl<S: fmt::Debug, I: fmt::Debug> fmt::Debug for ObservableSections<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableSections")
            .field("tree", &self.tree)
            .field("listeners", &self.listeners)
            .finish()
    }
}
