//! Reorder policy: how a drop mutates the section collection
//!
//! Drop targets are resolved to stable ids by the coordinator; this module re-resolves
//! them to positions against the current snapshot at the moment of mutation. Ids that no
//! longer resolve (the task or section vanished under a concurrent refetch) make the
//! whole operation a silent no-op.

use crate::ids::{SectionId, TaskId};
use crate::ordering::{compute_insertion_index, move_within_sequence, renumber_ordering_ids};
use crate::section::SectionCollection;

/// A fixed navigation slot of the surrounding app. These look like drop targets to the
/// pointer machinery but are not data sections; dropping a task on them does nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavSlot {
    Messages,
    Settings,
    Logout,
}

/// Where a dragged task was released
#[derive(Clone, Debug, PartialEq)]
pub enum DropDestination {
    /// On a specific task row. `lower_half` is true when the pointer was below the
    /// row's vertical midpoint (insert after it, else before it).
    Task { task: TaskId, lower_half: bool },
    /// On a section container as a whole: insert at the front
    Section(SectionId),
    /// On a fixed navigation slot: always rejected
    NavSlot(NavSlot),
}

/// The settled position of a task after a successful drop, as the server numbers it
#[derive(Clone, Debug, PartialEq)]
pub struct TaskPlacement {
    pub section: SectionId,
    /// 1-based position within the destination section
    pub ordering_id: u32,
}

/// Result of applying a drop: the new snapshot, and the dragged task's new placement.
/// `placement` is None when the drop was a no-op; the snapshot is then the input itself.
#[derive(Clone, Debug)]
pub struct ReorderOutcome {
    pub collection: SectionCollection,
    pub placement: Option<TaskPlacement>,
}

impl ReorderOutcome {
    fn noop(collection: &SectionCollection) -> Self {
        Self { collection: collection.clone(), placement: None }
    }
}

/// Apply a drop of `dragged` onto `destination`.
///
/// Intra-section moves renumber only the affected section. Cross-section moves renumber
/// both sections, since ordering ids are scoped per section and the migrating task needs
/// a fresh one in its new home. Terminal (`is_done`) sections and navigation slots
/// reject the drop: the input snapshot is returned untouched.
pub fn apply_drop(
    collection: &SectionCollection,
    dragged: &TaskId,
    destination: &DropDestination,
) -> ReorderOutcome {
    let (source_section, source_task) = match collection.locate_task(dragged) {
        Some(position) => position,
        None => {
            log::debug!("Dragged task {} is gone from the collection, ignoring the drop", dragged);
            return ReorderOutcome::noop(collection);
        }
    };

    let (dest_section, insert_index) = match destination {
        DropDestination::NavSlot(slot) => {
            log::debug!("Drop on navigation slot {:?} rejected", slot);
            return ReorderOutcome::noop(collection);
        }
        DropDestination::Section(section_id) => {
            let dest_section = match collection.position_of_section(section_id) {
                Some(index) => index,
                None => {
                    log::debug!("Drop section {} is gone, ignoring the drop", section_id);
                    return ReorderOutcome::noop(collection);
                }
            };
            // Dropping on a section as a whole inserts at the front, which also
            // covers dropping into an empty section
            (dest_section, 0)
        }
        DropDestination::Task { task: target, lower_half } => {
            if target == dragged {
                return ReorderOutcome::noop(collection);
            }
            let (dest_section, target_index) = match collection.locate_task(target) {
                Some(position) => position,
                None => {
                    log::debug!("Drop target task {} is gone, ignoring the drop", target);
                    return ReorderOutcome::noop(collection);
                }
            };
            let same_section = dest_section == source_section;
            let slot = compute_insertion_index(source_task, target_index, *lower_half, same_section);
            (dest_section, slot)
        }
    };

    if let Some(section) = collection.section(dest_section) {
        if section.is_done() {
            log::debug!("Drop on terminal section {} rejected", section.id());
            return ReorderOutcome::noop(collection);
        }
    }

    if dest_section == source_section && insert_index == source_task {
        // The task would land exactly where it already is
        return ReorderOutcome::noop(collection);
    }

    let mut sections = collection.to_mutable();

    let insert_index = if dest_section == source_section {
        let section = &mut sections[source_section];
        let moved = move_within_sequence(section.tasks(), source_task, insert_index);
        *section.tasks_mut() = renumber_ordering_ids(&moved);
        insert_index
    } else {
        let task = sections[source_section].tasks_mut().remove(source_task);
        let renumbered_source = renumber_ordering_ids(sections[source_section].tasks());
        *sections[source_section].tasks_mut() = renumbered_source;

        let dest_tasks = sections[dest_section].tasks_mut();
        let insert_index = insert_index.min(dest_tasks.len());
        dest_tasks.insert(insert_index, task);
        let renumbered_dest = renumber_ordering_ids(sections[dest_section].tasks());
        *sections[dest_section].tasks_mut() = renumbered_dest;
        insert_index
    };

    let placement = TaskPlacement {
        section: sections[dest_section].id().clone(),
        ordering_id: insert_index as u32 + 1,
    };

    ReorderOutcome {
        collection: SectionCollection::new(sections),
        placement: Some(placement),
    }
}
