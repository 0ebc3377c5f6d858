//! Identifiers for tasks and sections
//!
//! The server hands out opaque string ids. Wrapping them in newtypes keeps
//! task ids and section ids from being swapped at call sites.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Persistent, unique identifier of a [`Task`](crate::Task)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId, for tasks created locally before the server has named them
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Persistent, unique identifier of a [`TaskSection`](crate::TaskSection)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId {
    content: String,
}

impl SectionId {
    /// Generate a random SectionId
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for SectionId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for SectionId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}
