//! An in-memory server, for tests that need a backend without the network
#![cfg(feature = "mock_server")]

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::event::CalendarEvent;
use crate::ids::{SectionId, TaskId};
use crate::mock_behaviour::MockBehaviour;
use crate::ordering::renumber_ordering_ids;
use crate::section::{SectionCollection, TaskSection};
use crate::settings::UserSettings;
use crate::traits::{EventWindow, TaskApi, TaskModifyRequest};

/// Holds reads back while closed, so a test can interleave a mutation with an
/// in-flight refetch deterministically
#[derive(Clone, Debug, Default)]
pub struct Gate {
    closed: Arc<AtomicBool>,
}

impl Gate {
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
    pub fn open(&self) {
        self.closed.store(false, Ordering::SeqCst);
    }

    async fn wait(&self) {
        while self.closed.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    sections: Mutex<Vec<TaskSection>>,
    events: Mutex<Vec<CalendarEvent>>,
    settings: Mutex<UserSettings>,
    behaviour: Mutex<MockBehaviour>,
    read_gate: Gate,
    modify_log: Mutex<Vec<(TaskId, TaskModifyRequest)>>,
}

/// A [`TaskApi`] whose authoritative state lives in memory.
///
/// Cloning yields another handle onto the same state, so a test can keep driving the
/// server after moving a handle into a `Provider`.
#[derive(Clone, Debug, Default)]
pub struct MockServer {
    inner: Arc<Inner>,
}

impl MockServer {
    pub fn new(sections: Vec<TaskSection>) -> Self {
        let server = Self::default();
        *server.inner.sections.lock().unwrap() = sections;
        server
    }

    pub fn set_events(&self, events: Vec<CalendarEvent>) {
        *self.inner.events.lock().unwrap() = events;
    }

    pub fn set_settings(&self, settings: UserSettings) {
        *self.inner.settings.lock().unwrap() = settings;
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *self.inner.behaviour.lock().unwrap() = behaviour;
    }

    /// The gate every read waits on. Close it to keep refetches in flight.
    pub fn read_gate(&self) -> Gate {
        self.inner.read_gate.clone()
    }

    /// The authoritative state, as the next `get_tasks` would return it
    pub fn current_sections(&self) -> SectionCollection {
        SectionCollection::new(self.inner.sections.lock().unwrap().clone())
    }

    /// Every `modify_task` request received so far
    pub fn modify_requests(&self) -> Vec<(TaskId, TaskModifyRequest)> {
        self.inner.modify_log.lock().unwrap().clone()
    }

    fn apply_modification(
        sections: &mut Vec<TaskSection>,
        id: &TaskId,
        change: &TaskModifyRequest,
    ) -> Result<(), Box<dyn Error>> {
        let source_section = sections
            .iter()
            .position(|s| s.position_of(id).is_some())
            .ok_or_else(|| format!("No task {} on the server", id))?;
        let source_task = sections[source_section].position_of(id).unwrap();

        if let Some(dest_id) = &change.id_task_section {
            let dest_section = sections
                .iter()
                .position(|s| s.id() == dest_id)
                .ok_or_else(|| format!("No section {} on the server", dest_id))?;

            let task = sections[source_section].tasks_mut().remove(source_task);
            let renumbered = renumber_ordering_ids(sections[source_section].tasks());
            *sections[source_section].tasks_mut() = renumbered;

            let dest_tasks = sections[dest_section].tasks_mut();
            let index = change
                .id_ordering
                .map(|ordering| (ordering as usize).saturating_sub(1))
                .unwrap_or(dest_tasks.len())
                .min(dest_tasks.len());
            dest_tasks.insert(index, task);
            let renumbered = renumber_ordering_ids(sections[dest_section].tasks());
            *sections[dest_section].tasks_mut() = renumbered;
        }

        // Re-resolve: the move above may have shifted the task
        let section = sections
            .iter_mut()
            .find(|s| s.position_of(id).is_some())
            .ok_or_else(|| format!("No task {} on the server", id))?;
        let index = section.position_of(id).unwrap();
        let task = &mut section.tasks_mut()[index];

        if let Some(done) = change.is_completed {
            task.set_done(done);
        }
        if let Some(title) = &change.title {
            task.set_title(title.clone());
        }
        if let Some(body) = &change.body {
            task.set_body(body.clone());
        }
        if let Some(due_date) = &change.due_date {
            let parsed = DateTime::parse_from_rfc3339(due_date)?.with_timezone(&Utc);
            task.set_due_date(Some(parsed));
        }
        if let Some(minutes) = change.time_duration {
            task.set_time_allocated(Some(minutes));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskApi for MockServer {
    async fn get_tasks(&self) -> Result<SectionCollection, Box<dyn Error>> {
        self.inner.behaviour.lock().unwrap().can_get_tasks()?;
        self.inner.read_gate.wait().await;
        Ok(self.current_sections())
    }

    async fn modify_task(&self, id: &TaskId, change: TaskModifyRequest) -> Result<(), Box<dyn Error>> {
        self.inner.behaviour.lock().unwrap().can_modify_task()?;
        self.inner.modify_log.lock().unwrap().push((id.clone(), change.clone()));
        let mut sections = self.inner.sections.lock().unwrap();
        Self::apply_modification(&mut sections, id, &change)
    }

    async fn create_section(&self, name: &str) -> Result<(), Box<dyn Error>> {
        self.inner.behaviour.lock().unwrap().can_create_section()?;
        let mut sections = self.inner.sections.lock().unwrap();
        sections.push(TaskSection::new(SectionId::random(), name.to_string(), false));
        Ok(())
    }

    async fn delete_section(&self, id: &SectionId) -> Result<(), Box<dyn Error>> {
        self.inner.behaviour.lock().unwrap().can_delete_section()?;
        let mut sections = self.inner.sections.lock().unwrap();
        match sections.iter().position(|s| s.id() == id) {
            None => Err(format!("No section {} on the server", id).into()),
            Some(index) => {
                sections.remove(index);
                Ok(())
            }
        }
    }

    async fn rename_section(&self, id: &SectionId, new_name: &str) -> Result<(), Box<dyn Error>> {
        self.inner.behaviour.lock().unwrap().can_rename_section()?;
        let mut sections = self.inner.sections.lock().unwrap();
        match sections.iter_mut().find(|s| s.id() == id) {
            None => Err(format!("No section {} on the server", id).into()),
            Some(section) => {
                section.set_name(new_name.to_string());
                Ok(())
            }
        }
    }

    async fn get_events(&self, window: &EventWindow) -> Result<Vec<CalendarEvent>, Box<dyn Error>> {
        self.inner.behaviour.lock().unwrap().can_get_events()?;
        self.inner.read_gate.wait().await;
        let events = self.inner.events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|e| *e.datetime_start() < window.end && *e.datetime_end() > window.start)
            .cloned()
            .collect())
    }

    async fn get_settings(&self) -> Result<UserSettings, Box<dyn Error>> {
        self.inner.behaviour.lock().unwrap().can_get_settings()?;
        self.inner.read_gate.wait().await;
        Ok(self.inner.settings.lock().unwrap().clone())
    }
}
