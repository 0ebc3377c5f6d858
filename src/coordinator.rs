//! Glue between pointer/drag events and the reorder machinery
//!
//! The coordinator tracks the active drag gesture, resolves what was under the pointer
//! into a [`DropDestination`], and hands the drop to the [`Provider`]. While a gesture
//! is active, the periodic background refetch is suppressed: reordering against a
//! snapshot that is about to be replaced would race the poller, so the two are made
//! mutually exclusive. Polling resumes as soon as the gesture ends, drop or cancel.

use std::error::Error;
use std::sync::Mutex;

use crate::ids::{SectionId, TaskId};
use crate::reorder::{DropDestination, NavSlot, TaskPlacement};
use crate::provider::Provider;
use crate::traits::TaskApi;

/// Transient coordinates captured at drag start.
///
/// Purely informational (e.g. for drag feedback): an async refetch can invalidate them
/// mid-gesture, so the drop path re-resolves everything from stable ids instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DragIndices {
    pub section: usize,
    pub task: usize,
}

/// Something the pointer is over at release time, in paint order
#[derive(Clone, Debug, PartialEq)]
pub enum DropHit {
    TaskRow { task: TaskId, lower_half: bool },
    SectionContainer(SectionId),
    NavSlot(NavSlot),
}

#[derive(Clone, Debug)]
struct DragGesture {
    task: TaskId,
    #[allow(dead_code)]
    source: DragIndices,
}

/// Routes drag & drop gestures into optimistic reorders
pub struct DragDropCoordinator<A: TaskApi> {
    provider: Provider<A>,
    active_gesture: Mutex<Option<DragGesture>>,
}

impl<A: TaskApi> DragDropCoordinator<A> {
    pub fn new(provider: Provider<A>) -> Self {
        Self {
            provider,
            active_gesture: Mutex::new(None),
        }
    }

    pub fn provider(&self) -> &Provider<A> {
        &self.provider
    }

    /// A drag gesture started on the given task. Suppresses background refetch until
    /// the gesture ends.
    pub fn drag_started(&self, task: TaskId, source: DragIndices) {
        log::debug!("Drag started on task {}", task);
        *self.active_gesture.lock().unwrap() = Some(DragGesture { task, source });
    }

    /// The gesture ended without a drop
    pub fn drag_cancelled(&self) {
        log::debug!("Drag cancelled");
        *self.active_gesture.lock().unwrap() = None;
    }

    /// Whether the periodic poller must hold off. True exactly while a gesture is active.
    pub fn refetch_suppressed(&self) -> bool {
        self.active_gesture.lock().unwrap().is_some()
    }

    /// The active gesture released over `hits`.
    ///
    /// Ends the gesture (resuming background refetch), re-resolves positions from the
    /// current snapshot, applies the optimistic reorder and fires the outbound request.
    /// Returns the settled placement, or None when nothing had to move.
    pub async fn drop_released(&self, hits: &[DropHit]) -> Result<Option<TaskPlacement>, Box<dyn Error>> {
        let gesture = match self.active_gesture.lock().unwrap().take() {
            None => {
                log::debug!("Drop received without an active gesture, ignoring it");
                return Ok(None);
            }
            Some(gesture) => gesture,
        };

        let destination = match resolve_destination(hits) {
            None => {
                log::debug!("No valid drop target under the pointer");
                return Ok(None);
            }
            Some(destination) => destination,
        };

        self.provider.reorder_task(&gesture.task, &destination).await
    }

    /// Fire one tick of the periodic refetch, unless a drag gesture suppresses it.
    /// Returns whether a refetch actually ran and its snapshot was accepted.
    pub async fn poll_tasks(&self) -> Result<bool, Box<dyn Error>> {
        if self.refetch_suppressed() {
            log::trace!("Skipping the scheduled refetch: a drag gesture is active");
            return Ok(false);
        }
        self.provider.refresh_tasks().await
    }
}

/// Resolve what is under the pointer into a drop destination.
///
/// Precedence: a specific task row beats its section container, which beats a fixed
/// navigation slot. Navigation slots still resolve (rather than fall through to
/// None) so the policy can reject them explicitly; with no valid target at all, the
/// drop is simply not acted upon.
pub fn resolve_destination(hits: &[DropHit]) -> Option<DropDestination> {
    for hit in hits {
        if let DropHit::TaskRow { task, lower_half } = hit {
            return Some(DropDestination::Task { task: task.clone(), lower_half: *lower_half });
        }
    }
    for hit in hits {
        if let DropHit::SectionContainer(section) = hit {
            return Some(DropDestination::Section(section.clone()));
        }
    }
    for hit in hits {
        if let DropHit::NavSlot(slot) = hit {
            return Some(DropDestination::NavSlot(*slot));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_precedence() {
        let row = DropHit::TaskRow { task: TaskId::from("t1"), lower_half: true };
        let container = DropHit::SectionContainer(SectionId::from("s1"));
        let nav = DropHit::NavSlot(NavSlot::Messages);

        // paint order puts the most specific hit last; precedence still picks the row
        let hits = vec![nav.clone(), container.clone(), row.clone()];
        assert_eq!(
            resolve_destination(&hits),
            Some(DropDestination::Task { task: TaskId::from("t1"), lower_half: true }),
        );

        let hits = vec![nav.clone(), container.clone()];
        assert_eq!(
            resolve_destination(&hits),
            Some(DropDestination::Section(SectionId::from("s1"))),
        );

        let hits = vec![nav];
        assert_eq!(
            resolve_destination(&hits),
            Some(DropDestination::NavSlot(NavSlot::Messages)),
        );

        assert_eq!(resolve_destination(&[]), None);
    }
}
