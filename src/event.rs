//! Calendar events, read-only input to the collision layout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A calendar event for a single day's agenda.
///
/// Events are immutable for the duration of a layout run; the layout in
/// [`crate::layout`] only reads their start/end instants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    id: String,
    datetime_start: DateTime<Utc>,
    datetime_end: DateTime<Utc>,
    title: String,
    /// Link to join, for events that carry a conference call
    conference_call: Option<Url>,
}

impl CalendarEvent {
    pub fn new(
        id: String,
        datetime_start: DateTime<Utc>,
        datetime_end: DateTime<Utc>,
        title: String,
        conference_call: Option<Url>,
    ) -> Self {
        Self { id, datetime_start, datetime_end, title, conference_call }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn datetime_start(&self) -> &DateTime<Utc> { &self.datetime_start }
    pub fn datetime_end(&self) -> &DateTime<Utc> { &self.datetime_end }
    pub fn title(&self) -> &str { &self.title }
    pub fn conference_call(&self) -> Option<&Url> { self.conference_call.as_ref() }
}
