//! Shared scenario helpers for the integration tests: a populated mock server and a
//! provider wired to a fresh cache.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use taskboard::cache::Cache;
use taskboard::ids::{SectionId, TaskId};
use taskboard::mock_server::MockServer;
use taskboard::{CalendarEvent, Provider, SectionCollection, Task, TaskSection};

pub fn section(id: &str, name: &str, is_done: bool, titles: &[&str]) -> TaskSection {
    let mut section = TaskSection::new(SectionId::from(id), name.to_string(), is_done);
    for (i, title) in titles.iter().enumerate() {
        section.push_task(Task::new(title.to_string(), i as u32 + 1));
    }
    section
}

/// Three sections: "Today" [A, B, C], "Backlog" [X, Y], and a terminal "Done" [Z]
pub fn sample_sections() -> Vec<TaskSection> {
    vec![
        section("today", "Today", false, &["A", "B", "C"]),
        section("backlog", "Backlog", false, &["X", "Y"]),
        section("archive", "Done", true, &["Z"]),
    ]
}

pub fn populated_server() -> MockServer {
    MockServer::new(sample_sections())
}

pub fn provider_for(server: &MockServer) -> Provider<MockServer> {
    Provider::new(server.clone(), Arc::new(Cache::new()))
}

/// Id of the task currently at `(section, task)` in the snapshot
pub fn task_id_at(collection: &SectionCollection, section: usize, task: usize) -> TaskId {
    collection.section(section).unwrap().tasks()[task].id().clone()
}

pub fn titles_in(collection: &SectionCollection, section: usize) -> Vec<String> {
    collection
        .section(section)
        .unwrap()
        .tasks()
        .iter()
        .map(|t| t.title().to_string())
        .collect()
}

/// Every section must carry contiguous 1-based ordering ids once a reorder settles
pub fn assert_contiguous(collection: &SectionCollection) {
    for section in collection.iter() {
        let ids: Vec<u32> = section.tasks().iter().map(|t| t.ordering_id()).collect();
        let expected: Vec<u32> = (1..=section.tasks().len() as u32).collect();
        assert_eq!(ids, expected, "section {} has non-contiguous ordering ids", section.id());
    }
}

pub fn event(id: &str, start: (u32, u32), end: (u32, u32)) -> CalendarEvent {
    CalendarEvent::new(
        id.to_string(),
        Utc.ymd(2021, 3, 1).and_hms(start.0, start.1, 0),
        Utc.ymd(2021, 3, 1).and_hms(end.0, end.1, 0),
        format!("event {}", id),
        None,
    )
}
