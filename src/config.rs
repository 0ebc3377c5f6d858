//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The User-Agent header sent with every request.
/// Feel free to override it when initing this library.
pub static USER_AGENT: Lazy<Arc<Mutex<String>>> =
    Lazy::new(|| Arc::new(Mutex::new("taskboard".to_string())));

/// Default period of the background refetch, in seconds.
/// Feel free to override it when initing this library.
pub static POLL_INTERVAL_SECS: Lazy<Arc<Mutex<u64>>> = Lazy::new(|| Arc::new(Mutex::new(30)));

pub(crate) fn user_agent() -> String {
    USER_AGENT.lock().unwrap().clone()
}

pub(crate) fn default_poll_interval_secs() -> u64 {
    *POLL_INTERVAL_SECS.lock().unwrap()
}
