//! This module provides a client to connect to the task backend
//!
//! It implements [`TaskApi`] over the backend's JSON endpoints. The client never caches
//! anything itself; pair it with a [`Cache`](crate::cache::Cache) through a
//! [`Provider`](crate::provider::Provider) to get optimistic local state.

use std::error::Error;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Serialize;

use crate::event::CalendarEvent;
use crate::ids::{SectionId, TaskId};
use crate::resource::Resource;
use crate::section::{SectionCollection, TaskSection};
use crate::settings::UserSettings;
use crate::traits::{EventWindow, TaskApi, TaskModifyRequest};

/// Header carrying the client timezone offset (minutes east of UTC) on event requests
static TIMEZONE_OFFSET_HEADER: &str = "X-Timezone-Offset";

#[derive(Serialize)]
struct SectionNameBody<'a> {
    name: &'a str,
}

/// A [`TaskApi`] implementation that fetches its data from the backend over HTTP
pub struct Client {
    resource: Resource,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>, T: ToString>(base_url: S, token: T) -> Result<Self, Box<dyn Error>> {
        let base_url = url::Url::parse(base_url.as_ref())?;
        Ok(Self {
            resource: Resource::new(base_url, token.to_string()),
        })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new()
            .request(method, self.resource.endpoint(path))
            .bearer_auth(self.resource.token())
            .header(USER_AGENT, crate::config::user_agent())
    }

    async fn expect_success(
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, Box<dyn Error>> {
        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?} for {}", response.status(), what).into());
        }
        Ok(response)
    }
}

#[async_trait]
impl TaskApi for Client {
    async fn get_tasks(&self) -> Result<SectionCollection, Box<dyn Error>> {
        let response = self.request(reqwest::Method::GET, "/tasks/").send().await?;
        let response = Self::expect_success(response, "GET /tasks/").await?;
        let sections: Vec<TaskSection> = response.json().await?;
        log::debug!("Fetched {} sections from the server", sections.len());
        Ok(SectionCollection::new(sections))
    }

    async fn modify_task(&self, id: &TaskId, change: TaskModifyRequest) -> Result<(), Box<dyn Error>> {
        let path = format!("/tasks/modify/{}/", id);
        let response = self
            .request(reqwest::Method::PATCH, &path)
            .json(&change)
            .send()
            .await?;
        // Status only: the authoritative post-mutation state comes from the next refetch
        Self::expect_success(response, "PATCH /tasks/modify/").await?;
        Ok(())
    }

    async fn create_section(&self, name: &str) -> Result<(), Box<dyn Error>> {
        let response = self
            .request(reqwest::Method::POST, "/sections/create/")
            .json(&SectionNameBody { name })
            .send()
            .await?;
        Self::expect_success(response, "POST /sections/create/").await?;
        Ok(())
    }

    async fn delete_section(&self, id: &SectionId) -> Result<(), Box<dyn Error>> {
        let path = format!("/sections/delete/{}/", id);
        let response = self.request(reqwest::Method::DELETE, &path).send().await?;
        Self::expect_success(response, "DELETE /sections/delete/").await?;
        Ok(())
    }

    async fn rename_section(&self, id: &SectionId, new_name: &str) -> Result<(), Box<dyn Error>> {
        let path = format!("/sections/modify/{}/", id);
        let response = self
            .request(reqwest::Method::PATCH, &path)
            .json(&SectionNameBody { name: new_name })
            .send()
            .await?;
        Self::expect_success(response, "PATCH /sections/modify/").await?;
        Ok(())
    }

    async fn get_events(&self, window: &EventWindow) -> Result<Vec<CalendarEvent>, Box<dyn Error>> {
        let response = self
            .request(reqwest::Method::GET, "/events/")
            .query(&[
                ("start", window.start.to_rfc3339()),
                ("end", window.end.to_rfc3339()),
            ])
            .header(TIMEZONE_OFFSET_HEADER, window.timezone_offset_minutes)
            .send()
            .await?;
        let response = Self::expect_success(response, "GET /events/").await?;
        let events: Vec<CalendarEvent> = response.json().await?;
        log::debug!("Fetched {} events from the server", events.len());
        Ok(events)
    }

    async fn get_settings(&self) -> Result<UserSettings, Box<dyn Error>> {
        let response = self.request(reqwest::Method::GET, "/settings/").send().await?;
        let response = Self::expect_success(response, "GET /settings/").await?;
        Ok(response.json().await?)
    }
}
