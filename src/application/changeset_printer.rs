use colored::Colorize;

use crate::changeset::{Changeset, Operation};
use crate::observe::ChangesetSink;
use crate::tree::{Node, Section, SectionedTree};

/// Prints every changeset it receives to stdout, one operation per line.
#[derive(Debug)]
pub struct ChangesetPrinter {
    color: bool,
    received: usize,
}

impl ChangesetPrinter {
    pub fn new(color: bool) -> Self {
        Self { color, received: 0 }
    }
}

impl ChangesetSink<String, String> for ChangesetPrinter {
    fn receive(&mut self, changeset: &Changeset<String, String>) {
        self.received += 1;
        let header = format!(
            "changeset #{} ({} operations)",
            self.received,
            changeset.len()
        );
        if self.color {
            println!("{}", header.bold());
        } else {
            println!("{}", header);
        }
        for operation in changeset {
            println!("  {}", format_operation(operation, self.color));
        }
    }
}

fn describe_section(section: &Section<String, String>) -> String {
    format!("{} [{}]", section.metadata, section.items.join(", "))
}

fn describe_node(node: &Node<String, String>) -> String {
    match node {
        Node::Section(section) => describe_section(section),
        Node::Item(item) => item.clone(),
    }
}

pub fn format_operation(operation: &Operation<String, String>, color: bool) -> String {
    let (marker, line) = match operation {
        Operation::Insert { node, .. } | Operation::Update { node, .. } => {
            let marker = if operation.is_insert() { "+" } else { "~" };
            (marker, format!("{}: {}", operation, describe_node(node)))
        }
        Operation::Delete { .. } => ("-", operation.to_string()),
        Operation::Move { .. } => (">", operation.to_string()),
        Operation::Reload => ("*", operation.to_string()),
    };
    if !color {
        return format!("{} {}", marker, line);
    }

    let marker = match operation {
        Operation::Insert { .. } => marker.green(),
        Operation::Delete { .. } => marker.red(),
        Operation::Update { .. } => marker.yellow(),
        Operation::Move { .. } => marker.cyan(),
        Operation::Reload => marker.bold(),
    };
    format!("{} {}", marker, line)
}

/// Renders the final state of a tree, one section per line.
pub fn format_tree(tree: &SectionedTree<String, String>) -> Vec<String> {
    tree.sections()
        .enumerate()
        .map(|(index, section)| format!("[{}] {}", index, describe_section(section)))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;
    use crate::tree::IndexPath;

    #[rstest]
    #[case(
        Operation::Insert { path: IndexPath::item(1, 0), node: Node::Item("plum".to_string()) },
        "+ insert item at [1, 0]: plum"
    )]
    #[case(
        Operation::Update {
            path: IndexPath::Section(0),
            node: Node::Section(Section::with_items("Fruit".to_string(), vec!["fig".to_string()])),
        },
        "~ update section at [0]: Fruit [fig]"
    )]
    #[case(Operation::Delete { path: IndexPath::item(0, 2) }, "- delete [0, 2]")]
    #[case(
        Operation::Move { from: IndexPath::Section(0), to: IndexPath::Section(2) },
        "> move [0] -> [2]"
    )]
    #[case(Operation::Reload, "* reload")]
    fn operations_are_formatted_without_color(
        #[case] operation: Operation<String, String>,
        #[case] expected: &str,
    ) {
        assert_eq!(format_operation(&operation, false), expected);
    }

    #[test]
    fn tree_is_formatted_one_section_per_line() {
        let tree = SectionedTree::from_sections(vec![
            Section::with_items("Fruit".to_string(), vec!["apple".to_string(), "pear".to_string()]),
            Section::new("Veg".to_string()),
        ]);

        assert_eq!(format_tree(&tree), vec!["[0] Fruit [apple, pear]", "[1] Veg []"]);
    }
}
