use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ItemId = Uuid;

/// Represents the type of dependency between two items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    #[default]
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

/// A dependency link between two items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub from_item: ItemId,
    pub to_item: ItemId,
    #[serde(default)]
    pub kind: DependencyKind,
}

/// A non-working day shaded on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    #[serde(default)]
    pub name: String,
    /// Recurring holidays fall on the same month and day every year.
    #[serde(default)]
    pub recurring: bool,
}

impl Holiday {
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        if self.recurring {
            self.date.month() == date.month() && self.date.day() == date.day()
        } else {
            self.date == date
        }
    }
}

/// A task, subtask or milestone as handed over by the task store.
///
/// The engine reads items and only ever proposes changes to the
/// `(start, end)` pair through events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledItem {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Completion percentage, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub parent_id: Option<ItemId>,
    #[serde(default)]
    pub phase_id: Option<ItemId>,
    #[serde(default)]
    pub children: Vec<ScheduledItem>,
    #[serde(default)]
    pub is_milestone: bool,
}

impl ScheduledItem {
    /// Create a scheduled item with sensible defaults.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::unscheduled(name)
        }
    }

    /// Create an item without dates; it has no geometry until scheduled.
    pub fn unscheduled(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start: None,
            end: None,
            progress: 0,
            parent_id: None,
            phase_id: None,
            children: Vec::new(),
            is_milestone: false,
        }
    }

    /// Create a new milestone.
    pub fn new_milestone(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            is_milestone: true,
            ..Self::new(name, date, date)
        }
    }

    /// Attach `child` below this item, linking its parent id.
    pub fn with_child(mut self, mut child: ScheduledItem) -> Self {
        child.parent_id = Some(self.id);
        self.children.push(child);
        self
    }

    /// `(start, end)` when both dates are present and ordered.
    ///
    /// Items missing a date or carrying `start > end` are unscheduled.
    pub fn schedule(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule().is_some()
    }

    /// Pre-order walk over this item and all of its descendants.
    pub fn iter_tree(&self) -> ItemTree<'_> {
        ItemTree { stack: vec![self] }
    }
}

/// Pre-order walk over a forest of items, see [`iter_tree`].
pub struct ItemTree<'a> {
    stack: Vec<&'a ScheduledItem>,
}

impl<'a> Iterator for ItemTree<'a> {
    type Item = &'a ScheduledItem;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.stack.pop()?;
        self.stack.extend(item.children.iter().rev());
        Some(item)
    }
}

/// Visit every item of `items` and their nested children, parents first.
pub fn iter_tree(items: &[ScheduledItem]) -> ItemTree<'_> {
    ItemTree {
        stack: items.iter().rev().collect(),
    }
}
