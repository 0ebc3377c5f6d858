//! This crate provides the ordering, drag & drop, and optimistic-synchronisation core
//! of a sectioned task-management client.
//!
//! It provides an HTTP client for the task backend in the [`client`] module, that can be
//! used as a stand-alone module.
//!
//! Because the connection to the server may be slow, and a user-friendly app wants every
//! reorder reflected instantly, this crate also provides a local, optimistically-mutated
//! cache in the [`cache`] module.
//!
//! These two are combined by a [`Provider`](provider::Provider): each mutation is
//! previewed synchronously in the cache, sent to the server, and reconciled once the
//! next refetch returns the authoritative state. A
//! [`DragDropCoordinator`](coordinator::DragDropCoordinator) turns drag gestures into
//! such mutations. The [`layout`] module carries the independent collision layout used
//! for calendar-event placement.

pub mod traits;

pub mod ids;
mod task;
pub use task::{Task, TaskSource};
mod section;
pub use section::{SectionCollection, TaskSection};
mod event;
pub use event::CalendarEvent;
pub mod settings;

pub mod ordering;
pub mod reorder;
pub mod layout;

pub mod cache;
pub use cache::Cache;
pub mod client;
pub use client::Client;
pub mod provider;
pub use provider::Provider;
pub mod coordinator;
pub use coordinator::DragDropCoordinator;

mod resource;
pub use resource::Resource;

pub mod config;

pub mod mock_behaviour;
pub mod mock_server;
