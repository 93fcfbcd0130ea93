use serde::{Deserialize, Serialize};

use super::item::{iter_tree, Dependency, Holiday, ItemId, ItemTree, ScheduledItem};

/// Read-only snapshot of a project's items, dependencies and holidays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub items: Vec<ScheduledItem>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Every item including nested children, parents first.
    pub fn iter_items(&self) -> ItemTree<'_> {
        iter_tree(&self.items)
    }

    /// Look up an item anywhere in the tree.
    pub fn find_item(&self, id: ItemId) -> Option<&ScheduledItem> {
        self.iter_items().find(|item| item.id == id)
    }

    /// Row index of an item in the flattened, parents-first listing.
    pub fn row_of(&self, id: ItemId) -> Option<usize> {
        self.iter_items().position(|item| item.id == id)
    }
}
