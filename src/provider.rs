//! This module ties a backend source and the local cache together
//!
//! Every mutating operation follows the same optimistic contract:
//! 1. cancel in-flight reads for the affected resource,
//! 2. read the currently cached value (no cached value: no local preview),
//! 3. apply the pure transformation and write the new snapshot back synchronously,
//! 4. fire the network request describing the same logical change,
//! 5. on settle, invalidate the resource so the next poll refetches authoritative state.
//!
//! Steps 1-3 run atomically inside [`Cache::apply_sections`]; there is no suspension
//! point between them, which is what keeps two concurrent mutations of the same
//! resource from silently losing one of the two writes.

use std::error::Error;
use std::sync::Arc;

use crate::cache::{Cache, OptimisticWrite, ResourceKind};
use crate::ids::{SectionId, TaskId};
use crate::reorder::{apply_drop, DropDestination, TaskPlacement};
use crate::section::{SectionCollection, TaskSection};
use crate::traits::{EventWindow, TaskApi, TaskModifyRequest};

/// What to do with the optimistic local state when the network request fails.
///
/// The historical behaviour is `Keep`: the optimistic state stays visible until the
/// next periodic refetch silently corrects it. `Revert` restores the pre-mutation
/// snapshot as soon as the failure is known.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RollbackPolicy {
    Keep,
    Revert,
}

impl Default for RollbackPolicy {
    fn default() -> Self {
        RollbackPolicy::Keep
    }
}

/// Combines a [`TaskApi`] backend with a local [`Cache`], and exposes the optimistic
/// mutations the UI needs
pub struct Provider<A: TaskApi> {
    api: A,
    cache: Arc<Cache>,
    rollback_policy: RollbackPolicy,
}

impl<A: TaskApi> Provider<A> {
    /// Create a provider. `api` is usually a [`Client`](crate::client::Client);
    /// tests use a mocked backend instead.
    pub fn new(api: A, cache: Arc<Cache>) -> Self {
        Self {
            api,
            cache,
            rollback_policy: RollbackPolicy::default(),
        }
    }

    pub fn with_rollback_policy(mut self, policy: RollbackPolicy) -> Self {
        self.rollback_policy = policy;
        self
    }

    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Refetch the authoritative section collection, unless a newer local mutation
    /// cancelled this read while it was in flight.
    /// Returns whether the fetched snapshot was accepted into the cache.
    pub async fn refresh_tasks(&self) -> Result<bool, Box<dyn Error>> {
        let token = self.cache.begin_read(ResourceKind::Tasks);
        let sections = self.api.get_tasks().await?;
        Ok(self.cache.complete_read_sections(&token, sections))
    }

    /// Refetch the calendar events for a window
    pub async fn refresh_events(&self, window: &EventWindow) -> Result<bool, Box<dyn Error>> {
        let token = self.cache.begin_read(ResourceKind::Events);
        let events = self.api.get_events(window).await?;
        Ok(self.cache.complete_read_events(&token, events))
    }

    /// Refetch the user settings
    pub async fn refresh_settings(&self) -> Result<bool, Box<dyn Error>> {
        let token = self.cache.begin_read(ResourceKind::Settings);
        let settings = self.api.get_settings().await?;
        Ok(self.cache.complete_read_settings(&token, settings))
    }

    /// Apply a drop of `dragged` onto `destination`: optimistic local preview first,
    /// then the `PATCH /tasks/modify/` request describing the same change.
    ///
    /// Returns the task's settled placement, or None when the drop resolved to a no-op
    /// (invalid target, stale ids, or nothing cached to preview against); no request is
    /// fired in that case since there is no change to describe.
    pub async fn reorder_task(
        &self,
        dragged: &TaskId,
        destination: &DropDestination,
    ) -> Result<Option<TaskPlacement>, Box<dyn Error>> {
        let mut placement = None;
        let write = self.cache.apply_sections(|collection| {
            let outcome = apply_drop(collection, dragged, destination);
            placement = outcome.placement;
            outcome.collection
        });

        let placement = match placement {
            None => return Ok(None),
            Some(placement) => placement,
        };

        let change = TaskModifyRequest::reorder(placement.section.clone(), placement.ordering_id);
        self.settle(write, self.api.modify_task(dragged, change).await)?;
        Ok(Some(placement))
    }

    /// Mark a task as done or not done
    pub async fn set_task_completed(&self, id: &TaskId, done: bool) -> Result<(), Box<dyn Error>> {
        let write = self.cache.apply_sections(|collection| {
            let mut sections = collection.to_mutable();
            match mutate_task(&mut sections, id, |task| task.set_done(done)) {
                true => SectionCollection::new(sections),
                false => collection.clone(),
            }
        });

        // Even with nothing cached to preview against, the request still fires
        self.settle(write, self.api.modify_task(id, TaskModifyRequest::completion(done)).await)
    }

    /// Rename a task
    pub async fn rename_task(&self, id: &TaskId, new_title: &str) -> Result<(), Box<dyn Error>> {
        let write = self.cache.apply_sections(|collection| {
            let mut sections = collection.to_mutable();
            match mutate_task(&mut sections, id, |task| task.set_title(new_title.to_string())) {
                true => SectionCollection::new(sections),
                false => collection.clone(),
            }
        });

        let change = TaskModifyRequest { title: Some(new_title.to_string()), ..TaskModifyRequest::default() };
        self.settle(write, self.api.modify_task(id, change).await)
    }

    /// Add a section. The optimistic preview uses a random local id; the server-assigned
    /// id arrives with the next refetch.
    pub async fn create_section(&self, name: &str) -> Result<(), Box<dyn Error>> {
        let write = self.cache.apply_sections(|collection| {
            let mut sections = collection.to_mutable();
            sections.push(TaskSection::new(SectionId::random(), name.to_string(), false));
            SectionCollection::new(sections)
        });

        self.settle(write, self.api.create_section(name).await)
    }

    /// Delete a section and every task it owns
    pub async fn delete_section(&self, id: &SectionId) -> Result<(), Box<dyn Error>> {
        let write = self.cache.apply_sections(|collection| {
            match collection.position_of_section(id) {
                None => collection.clone(),
                Some(index) => {
                    let mut sections = collection.to_mutable();
                    sections.remove(index);
                    SectionCollection::new(sections)
                }
            }
        });

        self.settle(write, self.api.delete_section(id).await)
    }

    /// Rename a section
    pub async fn rename_section(&self, id: &SectionId, new_name: &str) -> Result<(), Box<dyn Error>> {
        let write = self.cache.apply_sections(|collection| {
            match collection.position_of_section(id) {
                None => collection.clone(),
                Some(index) => {
                    let mut sections = collection.to_mutable();
                    sections[index].set_name(new_name.to_string());
                    SectionCollection::new(sections)
                }
            }
        });

        self.settle(write, self.api.rename_section(id, new_name).await)
    }

    /// Step 5 of the optimistic contract: once the request has settled, invalidate the
    /// resource so the next poll refetches authoritative state. On failure, the
    /// [`RollbackPolicy`] decides whether the optimistic preview stays visible.
    fn settle(
        &self,
        write: Option<OptimisticWrite>,
        request_result: Result<(), Box<dyn Error>>,
    ) -> Result<(), Box<dyn Error>> {
        match request_result {
            Ok(()) => {
                self.cache.invalidate(ResourceKind::Tasks);
                Ok(())
            }
            Err(err) => {
                log::warn!("Task mutation was not persisted by the server: {}", err);
                match (self.rollback_policy, write) {
                    (RollbackPolicy::Revert, Some(write)) => {
                        self.cache.restore_sections(write.previous);
                    }
                    _ => {
                        // Keep: the optimistic state stays until the next refetch corrects it
                        self.cache.invalidate(ResourceKind::Tasks);
                    }
                }
                Err(err)
            }
        }
    }
}

/// Apply `mutate` to the task carrying `id`, wherever it lives.
/// Returns false when the id resolves nowhere (deleted meanwhile): callers then no-op.
fn mutate_task<F>(sections: &mut [TaskSection], id: &TaskId, mutate: F) -> bool
where
    F: FnOnce(&mut crate::task::Task),
{
    for section in sections.iter_mut() {
        if let Some(index) = section.position_of(id) {
            mutate(&mut section.tasks_mut()[index]);
            return true;
        }
    }
    log::debug!("Task {} is gone from the collection, skipping the local preview", id);
    false
}
