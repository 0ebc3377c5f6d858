//! The backend contract, as a trait seam
//!
//! [`crate::client::Client`] implements this over HTTP. Tests implement it with an
//! in-memory mock, so the engine can be exercised without a running server.

use std::error::Error;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::event::CalendarEvent;
use crate::ids::{SectionId, TaskId};
use crate::section::SectionCollection;
use crate::settings::UserSettings;

/// Body of `PATCH /tasks/modify/{taskId}/`. Only the fields that are `Some` are sent;
/// the server applies them and answers with a status only, no echoed resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskModifyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_task_section: Option<SectionId>,
    /// 1-based position in the destination section
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_ordering: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Allocated time in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_duration: Option<u32>,
}

impl TaskModifyRequest {
    /// The request describing a settled reorder: destination section and 1-based position
    pub fn reorder(section: SectionId, ordering_id: u32) -> Self {
        Self {
            id_task_section: Some(section),
            id_ordering: Some(ordering_id),
            ..Self::default()
        }
    }

    pub fn completion(is_completed: bool) -> Self {
        Self { is_completed: Some(is_completed), ..Self::default() }
    }
}

/// The window of calendar events to fetch, with the client timezone the server needs
/// to resolve day boundaries
#[derive(Clone, Debug, PartialEq)]
pub struct EventWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Minutes east of UTC
    pub timezone_offset_minutes: i32,
}

/// A source of authoritative task data (usually, the backend server)
#[async_trait]
pub trait TaskApi {
    /// Fetch the full authoritative snapshot of every section
    async fn get_tasks(&self) -> Result<SectionCollection, Box<dyn Error>>;

    /// Apply a partial modification to one task
    async fn modify_task(&self, id: &TaskId, change: TaskModifyRequest) -> Result<(), Box<dyn Error>>;

    async fn create_section(&self, name: &str) -> Result<(), Box<dyn Error>>;
    async fn delete_section(&self, id: &SectionId) -> Result<(), Box<dyn Error>>;
    async fn rename_section(&self, id: &SectionId, new_name: &str) -> Result<(), Box<dyn Error>>;

    /// Fetch the calendar events within a window
    async fn get_events(&self, window: &EventWindow) -> Result<Vec<CalendarEvent>, Box<dyn Error>>;

    /// Fetch the user settings
    async fn get_settings(&self) -> Result<UserSettings, Box<dyn Error>>;
}
