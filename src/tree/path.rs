use std::cmp::Ordering;

use derive_more::{Display, From, IsVariant};

use super::errors::{InvalidPathLengthSnafu, TreeError};

/// Address of an item: its section index and its index inside that section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("[{section}, {item}]")]
pub struct ItemPath {
    pub section: usize,
    pub item: usize,
}

impl ItemPath {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// The path of the same section, `offset` items further down.
    pub fn offset(&self, offset: usize) -> Self {
        Self {
            section: self.section,
            item: self.item + offset,
        }
    }
}

/// Path into a two-level tree.
///
/// A path of length one addresses a section, a path of length two addresses an item inside a
/// section. Deeper paths cannot be represented. Paths order the way a depth-first pre-order walk
/// visits them: `[0] < [0, 0] < [0, 1] < [1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, IsVariant)]
pub enum IndexPath {
    #[display("[{_0}]")]
    Section(usize),
    #[display("{_0}")]
    Item(ItemPath),
}

impl IndexPath {
    pub fn item(section: usize, item: usize) -> Self {
        IndexPath::Item(ItemPath::new(section, item))
    }

    /// Index of the section this path lies in.
    pub fn section_index(&self) -> usize {
        match self {
            IndexPath::Section(section) => *section,
            IndexPath::Item(path) => path.section,
        }
    }

    /// Number of components, either 1 or 2.
    pub fn depth(&self) -> usize {
        match self {
            IndexPath::Section(_) => 1,
            IndexPath::Item(_) => 2,
        }
    }

    pub fn to_vec(&self) -> Vec<usize> {
        match self {
            IndexPath::Section(section) => vec![*section],
            IndexPath::Item(path) => vec![path.section, path.item],
        }
    }

    fn sort_key(&self) -> (usize, Option<usize>) {
        match self {
            IndexPath::Section(section) => (*section, None),
            IndexPath::Item(path) => (path.section, Some(path.item)),
        }
    }
}

impl PartialOrd for IndexPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl TryFrom<&[usize]> for IndexPath {
    type Error = TreeError;

    fn try_from(components: &[usize]) -> Result<Self, Self::Error> {
        match *components {
            [section] => Ok(IndexPath::Section(section)),
            [section, item] => Ok(IndexPath::item(section, item)),
            _ => InvalidPathLengthSnafu {
                length: components.len(),
            }
            .fail(),
        }
    }
}
