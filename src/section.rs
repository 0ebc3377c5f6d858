//! Task sections and the whole-collection snapshot the cache hands out

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ids::{SectionId, TaskId};
use crate::task::Task;

/// A named, ordered bucket of tasks (e.g. "Today", "Backlog", or an archive bucket)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskSection {
    id: SectionId,
    name: String,
    /// Marks a terminal/archive section. These reject incoming drops.
    is_done: bool,
    tasks: Vec<Task>,
}

impl TaskSection {
    pub fn new(id: SectionId, name: String, is_done: bool) -> Self {
        Self { id, name, is_done, tasks: Vec::new() }
    }

    pub fn id(&self) -> &SectionId { &self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn is_done(&self) -> bool { self.is_done }
    pub fn tasks(&self) -> &[Task] { &self.tasks }

    pub fn set_name(&mut self, new_name: String) {
        self.name = new_name;
    }

    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    /// Position of a task within this section, or None if it is not here
    pub fn position_of(&self, task_id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id() == task_id)
    }
}

/// The full ordered list of sections, as one immutable snapshot.
///
/// This is the unit of optimistic mutation: every change produces a whole new
/// collection and the old `Arc` is discarded, so a reader racing a writer always
/// sees either the old or the new complete collection, never a half-mutated one.
/// Two snapshots can be compared for identity with [`SectionCollection::same_snapshot_as`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionCollection {
    sections: Arc<Vec<TaskSection>>,
}

impl SectionCollection {
    pub fn new(sections: Vec<TaskSection>) -> Self {
        Self { sections: Arc::new(sections) }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Whether `other` is literally the same snapshot (not merely an equal one).
    /// No-op operations return their input snapshot untouched, which this detects.
    pub fn same_snapshot_as(&self, other: &SectionCollection) -> bool {
        Arc::ptr_eq(&self.sections, &other.sections)
    }

    /// Index of the section carrying the given id
    pub fn position_of_section(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == id)
    }

    /// Locate a task anywhere in the collection, returning `(section index, task index)`.
    ///
    /// Positions must be resolved through this immediately before computing a move,
    /// never captured at drag start: an async refetch can invalidate stale indices.
    pub fn locate_task(&self, id: &TaskId) -> Option<(usize, usize)> {
        for (section_index, section) in self.sections.iter().enumerate() {
            if let Some(task_index) = section.position_of(id) {
                return Some((section_index, task_index));
            }
        }
        None
    }

    pub fn section(&self, index: usize) -> Option<&TaskSection> {
        self.sections.get(index)
    }

    /// Clone the inner sections for a copy-on-write mutation
    pub(crate) fn to_mutable(&self) -> Vec<TaskSection> {
        (*self.sections).clone()
    }
}

impl Deref for SectionCollection {
    type Target = [TaskSection];
    fn deref(&self) -> &[TaskSection] {
        &self.sections
    }
}

impl PartialEq for SectionCollection {
    fn eq(&self, other: &Self) -> bool {
        *self.sections == *other.sections
    }
}
