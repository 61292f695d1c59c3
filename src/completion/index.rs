//! Completion index
//!
//! Flattens a registry tree into the four lookup tables the path completer
//! walks: cells, blocks per cell, targets per block and actions per target.

use std::collections::HashMap;

use crate::registry::Root;

/// A name with the description shown next to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub description: String,
}

impl Entry {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Lookup tables derived from a [`Root`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionIndex {
    cells: Vec<Entry>,
    blocks: HashMap<String, Vec<Entry>>,
    targets: HashMap<(String, String), Vec<Entry>>,
    actions: HashMap<(String, String, String), Vec<Entry>>,
}

impl CompletionIndex {
    /// Build the index in a single pass over the tree.
    ///
    /// Sibling order is preserved in every table.
    pub fn build(root: &Root) -> Self {
        let mut index = Self::default();

        for cell in &root.cells {
            index.cells.push(Entry::new(&cell.name, "cell"));
            let blocks = index.blocks.entry(cell.name.clone()).or_default();

            for block in &cell.blocks {
                blocks.push(Entry::new(&block.name, "block"));
                let targets = index
                    .targets
                    .entry((cell.name.clone(), block.name.clone()))
                    .or_default();

                for target in &block.targets {
                    targets.push(Entry::new(&target.name, target.description()));
                    let actions = index
                        .actions
                        .entry((cell.name.clone(), block.name.clone(), target.name.clone()))
                        .or_default();

                    actions.extend(
                        target
                            .actions
                            .iter()
                            .map(|a| Entry::new(&a.name, a.description())),
                    );
                }
            }
        }

        index
    }

    pub fn cells(&self) -> &[Entry] {
        &self.cells
    }

    pub fn blocks(&self, cell: &str) -> &[Entry] {
        self.blocks.get(cell).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn targets(&self, cell: &str, block: &str) -> &[Entry] {
        self.targets
            .get(&(cell.to_string(), block.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn actions(&self, cell: &str, block: &str, target: &str) -> &[Entry] {
        self.actions
            .get(&(cell.to_string(), block.to_string(), target.to_string()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::fixtures::sample_root;

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_build_preserves_order() {
        let index = CompletionIndex::build(&sample_root());

        assert_eq!(names(index.cells()), vec!["devops", "automation"]);
        assert_eq!(index.cells()[0].description, "cell");
        assert_eq!(names(index.blocks("devops")), vec!["containers"]);
        assert_eq!(
            names(index.targets("devops", "containers")),
            vec!["service-foo", "service-bar"]
        );
        assert_eq!(
            names(index.actions("devops", "containers", "service-foo")),
            vec!["deploy", "build"]
        );
        assert_eq!(
            index.actions("devops", "containers", "service-foo")[0].description,
            "push to the cluster"
        );
    }

    #[test]
    fn test_unknown_keys_are_empty() {
        let index = CompletionIndex::build(&sample_root());

        assert!(index.blocks("nope").is_empty());
        assert!(index.blocks("automation").is_empty());
        assert!(index.targets("devops", "nope").is_empty());
        assert!(index.actions("devops", "containers", "nope").is_empty());
        assert!(index.actions("devops", "containers", "service-bar").is_empty());
    }

    #[test]
    fn test_build_is_idempotent() {
        let root = sample_root();
        assert_eq!(CompletionIndex::build(&root), CompletionIndex::build(&root));
    }
}
