use saphyr::Yaml;
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::observe::ObservableSections;
use crate::script::replay_script::{
    InvalidFieldSnafu, MalformedStepSnafu, ScriptError, UnknownStepSnafu,
};
use crate::script::yaml::{YamlMap, field, index, index_list, text, text_list};
use crate::tree::{IndexPath, ItemPath, Section, TreeError};

/// One mutation of a replay script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    AppendSection {
        title: String,
        items: Vec<String>,
    },
    InsertSection {
        at: usize,
        title: String,
        items: Vec<String>,
    },
    AppendItem {
        section: usize,
        item: String,
    },
    InsertItem {
        path: ItemPath,
        item: String,
    },
    InsertItems {
        path: ItemPath,
        items: Vec<String>,
    },
    MoveSection {
        from: usize,
        to: usize,
    },
    MoveItem {
        from: ItemPath,
        to: ItemPath,
    },
    RemoveSection {
        at: usize,
    },
    RemoveItem {
        path: ItemPath,
    },
    RemoveAllItems,
    RemoveAllItemsAndSections,
    SetItem {
        path: ItemPath,
        item: String,
    },
    SetSection {
        at: usize,
        title: String,
        items: Vec<String>,
    },
    ReplaceItems {
        section: usize,
        items: Vec<String>,
        diff: bool,
    },
    SortItems {
        section: usize,
        diff: bool,
        descending: bool,
    },
}

/// Field accessors for the arguments of one step, reporting failures against that step.
struct StepArgs<'a, 'y> {
    index: usize,
    name: &'a str,
    map: Option<&'a YamlMap<'y>>,
}

impl<'a, 'y> StepArgs<'a, 'y> {
    fn get(&self, key: &'static str) -> Option<&'a Yaml<'y>> {
        self.map.and_then(|map| field(map, key))
    }

    fn invalid(&self, key: &'static str) -> ScriptError {
        InvalidFieldSnafu {
            index: self.index,
            step: self.name,
            field: key,
        }
        .build()
    }

    fn index(&self, key: &'static str) -> Result<usize, ScriptError> {
        self.get(key).and_then(index).ok_or_else(|| self.invalid(key))
    }

    fn text(&self, key: &'static str) -> Result<String, ScriptError> {
        self.get(key).and_then(text).ok_or_else(|| self.invalid(key))
    }

    fn texts(&self, key: &'static str) -> Result<Vec<String>, ScriptError> {
        self.get(key).and_then(text_list).ok_or_else(|| self.invalid(key))
    }

    fn optional_texts(&self, key: &'static str) -> Result<Vec<String>, ScriptError> {
        match self.get(key) {
            Some(_) => self.texts(key),
            None => Ok(Vec::new()),
        }
    }

    fn flag(&self, key: &'static str) -> Result<bool, ScriptError> {
        match self.get(key) {
            Some(value) => value.as_bool().ok_or_else(|| self.invalid(key)),
            None => Ok(false),
        }
    }

    fn item_path(&self, key: &'static str) -> Result<ItemPath, ScriptError> {
        let components = self
            .get(key)
            .and_then(index_list)
            .ok_or_else(|| self.invalid(key))?;
        match IndexPath::try_from(components.as_slice()) {
            Ok(IndexPath::Item(path)) => Ok(path),
            _ => Err(self.invalid(key)),
        }
    }
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::AppendSection { .. } => "append_section",
            Step::InsertSection { .. } => "insert_section",
            Step::AppendItem { .. } => "append_item",
            Step::InsertItem { .. } => "insert_item",
            Step::InsertItems { .. } => "insert_items",
            Step::MoveSection { .. } => "move_section",
            Step::MoveItem { .. } => "move_item",
            Step::RemoveSection { .. } => "remove_section",
            Step::RemoveItem { .. } => "remove_item",
            Step::RemoveAllItems => "remove_all_items",
            Step::RemoveAllItemsAndSections => "remove_all_items_and_sections",
            Step::SetItem { .. } => "set_item",
            Step::SetSection { .. } => "set_section",
            Step::ReplaceItems { .. } => "replace_items",
            Step::SortItems { .. } => "sort_items",
        }
    }

    /// Parses a single-entry map such as `{ append_item: { section: 0, item: plum } }`.
    pub fn from_yaml(index: usize, yaml: &Yaml) -> Result<Self, ScriptError> {
        let mapping = yaml.as_mapping().context(MalformedStepSnafu { index })?;
        ensure!(mapping.len() == 1, MalformedStepSnafu { index });
        let (key, value) = mapping.iter().next().context(MalformedStepSnafu { index })?;
        let name = key.as_str().context(MalformedStepSnafu { index })?;

        let map = match value.as_mapping() {
            Some(map) => Some(map),
            None if value.is_null() => None,
            None => return MalformedStepSnafu { index }.fail(),
        };
        let args = StepArgs { index, name, map };
        debug!("Parsing step {} of type '{}'", index, name);

        let step = match name {
            "append_section" => Step::AppendSection {
                title: args.text("title")?,
                items: args.optional_texts("items")?,
            },
            "insert_section" => Step::InsertSection {
                at: args.index("at")?,
                title: args.text("title")?,
                items: args.optional_texts("items")?,
            },
            "append_item" => Step::AppendItem {
                section: args.index("section")?,
                item: args.text("item")?,
            },
            "insert_item" => Step::InsertItem {
                path: args.item_path("path")?,
                item: args.text("item")?,
            },
            "insert_items" => Step::InsertItems {
                path: args.item_path("path")?,
                items: args.texts("items")?,
            },
            "move_section" => Step::MoveSection {
                from: args.index("from")?,
                to: args.index("to")?,
            },
            "move_item" => Step::MoveItem {
                from: args.item_path("from")?,
                to: args.item_path("to")?,
            },
            "remove_section" => Step::RemoveSection {
                at: args.index("at")?,
            },
            "remove_item" => Step::RemoveItem {
                path: args.item_path("path")?,
            },
            "remove_all_items" => Step::RemoveAllItems,
            "remove_all_items_and_sections" => Step::RemoveAllItemsAndSections,
            "set_item" => Step::SetItem {
                path: args.item_path("path")?,
                item: args.text("item")?,
            },
            "set_section" => Step::SetSection {
                at: args.index("at")?,
                title: args.text("title")?,
                items: args.optional_texts("items")?,
            },
            "replace_items" => Step::ReplaceItems {
                section: args.index("section")?,
                items: args.texts("items")?,
                diff: args.flag("diff")?,
            },
            "sort_items" => Step::SortItems {
                section: args.index("section")?,
                diff: args.flag("diff")?,
                descending: args.flag("descending")?,
            },
            _ => return UnknownStepSnafu { index, name }.fail(),
        };

        Ok(step)
    }

    /// Runs the step against `sections`, which emits the resulting changeset.
    pub fn apply(&self, sections: &mut ObservableSections<String, String>) -> Result<(), TreeError> {
        match self {
            Step::AppendSection { title, items } => {
                sections.append_section(Section::with_items(title.clone(), items.clone()));
            }
            Step::InsertSection { at, title, items } => {
                sections.insert_section(Section::with_items(title.clone(), items.clone()), *at)?
            }
            Step::AppendItem { section, item } => {
                sections.append_item(item.clone(), *section)?;
            }
            Step::InsertItem { path, item } => sections.insert_item(item.clone(), *path)?,
            Step::InsertItems { path, items } => {
                sections.insert_items(items.iter().cloned(), *path)?
            }
            Step::MoveSection { from, to } => sections.move_section(*from, *to)?,
            Step::MoveItem { from, to } => sections.move_item(*from, *to)?,
            Step::RemoveSection { at } => {
                let removed = sections.remove_section(*at)?;
                debug!("Removed section '{}'", removed.metadata);
            }
            Step::RemoveItem { path } => {
                let removed = sections.remove_item(*path)?;
                debug!("Removed item '{}'", removed);
            }
            Step::RemoveAllItems => {
                sections.remove_all_items();
            }
            Step::RemoveAllItemsAndSections => sections.remove_all_items_and_sections(),
            Step::SetItem { path, item } => {
                sections.set_item(*path, item.clone())?;
            }
            Step::SetSection { at, title, items } => {
                sections.set_section(*at, Section::with_items(title.clone(), items.clone()))?;
            }
            Step::ReplaceItems {
                section,
                items,
                diff,
            } => {
                let replaced = if *diff {
                    sections.replace_items_with_diff(*section, items.clone())
                } else {
                    sections.replace_items(*section, items.clone())
                };
                if replaced.is_none() {
                    warn!("Section {} does not exist, skipping replace_items", section);
                }
            }
            Step::SortItems {
                section,
                diff,
                descending,
            } => {
                let order = |a: &String, b: &String| {
                    if *descending { b.cmp(a) } else { a.cmp(b) }
                };
                let sorted = if *diff {
                    sections.sort_items_by_with_diff(*section, order)
                } else {
                    sections.sort_items_by(*section, order)
                };
                if !sorted {
                    warn!("Section {} does not exist, skipping sort_items", section);
                }
            }
        }
        Ok(())
    }
}
