//! To-do tasks, as owned by exactly one section at a time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::TaskId;

/// Where a task originally came from.
///
/// Tasks created through the app are `User` tasks; the backend can also materialize
/// tasks out of synced calendar invites or flagged e-mails.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSource {
    User,
    Calendar,
    Email,
}

impl Default for TaskSource {
    fn default() -> Self {
        TaskSource::User
    }
}

/// A to-do task
///
/// `ordering_id` is the 1-based display position within the owning section. It is unique
/// within that section and must stay contiguous (`1..=N`) once a reorder settles; the
/// renumbering in [`crate::ordering`] maintains this.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable server-assigned id
    id: TaskId,
    /// 1-based position within the owning section
    ordering_id: u32,
    title: String,
    #[serde(default)]
    body: String,
    due_date: Option<DateTime<Utc>>,
    /// Time allocated to this task, in minutes
    time_allocated: Option<u32>,
    is_done: bool,
    #[serde(default)]
    source: TaskSource,
}

impl Task {
    /// Create a brand new Task that is not on the server yet.
    /// This picks a new (random) task id.
    pub fn new(title: String, ordering_id: u32) -> Self {
        Self::new_with_parameters(
            TaskId::random(),
            ordering_id,
            title,
            String::new(),
            None,
            None,
            false,
            TaskSource::User,
        )
    }

    /// Create a Task instance that may already exist on the server
    pub fn new_with_parameters(
        id: TaskId,
        ordering_id: u32,
        title: String,
        body: String,
        due_date: Option<DateTime<Utc>>,
        time_allocated: Option<u32>,
        is_done: bool,
        source: TaskSource,
    ) -> Self {
        Self {
            id,
            ordering_id,
            title,
            body,
            due_date,
            time_allocated,
            is_done,
            source,
        }
    }

    pub fn id(&self) -> &TaskId { &self.id }
    pub fn ordering_id(&self) -> u32 { self.ordering_id }
    pub fn title(&self) -> &str { &self.title }
    pub fn body(&self) -> &str { &self.body }
    pub fn due_date(&self) -> Option<&DateTime<Utc>> { self.due_date.as_ref() }
    pub fn time_allocated(&self) -> Option<u32> { self.time_allocated }
    pub fn is_done(&self) -> bool { self.is_done }
    pub fn source(&self) -> TaskSource { self.source }

    pub fn set_ordering_id(&mut self, ordering_id: u32) {
        self.ordering_id = ordering_id;
    }

    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    pub fn set_body(&mut self, new_body: String) {
        self.body = new_body;
    }

    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.due_date = due_date;
    }

    pub fn set_time_allocated(&mut self, minutes: Option<u32>) {
        self.time_allocated = minutes;
    }

    pub fn set_done(&mut self, done: bool) {
        self.is_done = done;
    }
}
