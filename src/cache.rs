//! Key-addressed local cache with optimistic, cancel-safe writes
//!
//! The cache holds one slot per logical resource (tasks, events, settings). Every slot
//! carries a generation counter used as a cancellation token for in-flight reads: a
//! refetch records the generation when it starts, and its result is only written back
//! if the generation has not moved meanwhile. Optimistic writes bump the generation
//! first, so a stale response that resolves afterwards can never clobber them. The
//! token check happens here, at the write site, not where the read was issued.
//!
//! The whole cache can be persisted to a JSON backing file so an embedding app can
//! display cached sections at startup, before its first fetch.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;
use crate::section::SectionCollection;
use crate::settings::UserSettings;

/// The logical resources the cache is addressed by
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Tasks,
    Events,
    Settings,
}

/// Cancellation token for one in-flight read.
/// Obtained from [`Cache::begin_read`], checked by the `complete_read_*` functions.
#[derive(Clone, Debug)]
pub struct ReadToken {
    kind: ResourceKind,
    generation: u64,
}

impl ReadToken {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

/// The two snapshots around one optimistic write, so a caller can restore
/// `previous` if it decides to roll the write back
#[derive(Clone, Debug)]
pub struct OptimisticWrite {
    pub previous: SectionCollection,
    pub current: SectionCollection,
}

#[derive(Debug, Serialize, Deserialize)]
struct Slot<T> {
    value: Option<T>,
    /// An invalidated or optimistically-written value is stale: it keeps being
    /// displayed, but the next poll must refetch the authoritative state
    #[serde(skip)]
    stale: bool,
    #[serde(skip)]
    generation: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self { value: None, stale: false, generation: 0 }
    }
}

impl<T> Slot<T> {
    fn cancel_reads(&mut self) {
        self.generation += 1;
    }

    fn needs_refetch(&self) -> bool {
        self.stale || self.value.is_none()
    }

    /// Write the result of a read, unless the read has been cancelled meanwhile
    fn complete_read(&mut self, token_generation: u64, value: T) -> bool {
        if token_generation != self.generation {
            return false;
        }
        self.value = Some(value);
        self.stale = false;
        true
    }
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct CachedData {
    sections: Slot<SectionCollection>,
    events: Slot<Vec<CalendarEvent>>,
    settings: Slot<UserSettings>,
}

impl CachedData {
    fn slot_generation(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Tasks => self.sections.generation,
            ResourceKind::Events => self.events.generation,
            ResourceKind::Settings => self.settings.generation,
        }
    }

    fn cancel_reads(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::Tasks => self.sections.cancel_reads(),
            ResourceKind::Events => self.events.cancel_reads(),
            ResourceKind::Settings => self.settings.cancel_reads(),
        }
    }

    fn invalidate(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::Tasks => {
                self.sections.cancel_reads();
                self.sections.stale = true;
            }
            ResourceKind::Events => {
                self.events.cancel_reads();
                self.events.stale = true;
            }
            ResourceKind::Settings => {
                self.settings.cancel_reads();
                self.settings.stale = true;
            }
        }
    }

    fn needs_refetch(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Tasks => self.sections.needs_refetch(),
            ResourceKind::Events => self.events.needs_refetch(),
            ResourceKind::Settings => self.settings.needs_refetch(),
        }
    }
}

/// The local cache, injected explicitly wherever it is needed
///
/// All mutation goes through a single internal lock, and no lock-holding path ever
/// suspends. In particular [`Cache::apply_sections`] runs its whole
/// cancel-then-read-then-write sequence under one lock acquisition, so two optimistic
/// writes to the same resource cannot interleave and silently lose one of them.
#[derive(Debug)]
pub struct Cache {
    backing_file: Option<PathBuf>,
    data: Mutex<CachedData>,
}

impl Cache {
    /// An empty, memory-only cache
    pub fn new() -> Self {
        Self {
            backing_file: None,
            data: Mutex::new(CachedData::default()),
        }
    }

    /// An empty cache that [`Cache::save_to_file`] will persist to `path`
    pub fn new_with_backing_file(path: &Path) -> Self {
        Self {
            backing_file: Some(PathBuf::from(path)),
            data: Mutex::new(CachedData::default()),
        }
    }

    /// Initialize a cache from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            }
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self {
            backing_file: Some(PathBuf::from(path)),
            data: Mutex::new(data),
        })
    }

    /// Store the current cache contents to the backing file, if one was configured
    pub fn save_to_file(&self) {
        let path = match &self.backing_file {
            None => return,
            Some(path) => path,
        };
        let file = match std::fs::File::create(path) {
            Err(err) => {
                log::warn!("Unable to save file {:?}: {}", path, err);
                return;
            }
            Ok(f) => f,
        };

        let data = self.data.lock().unwrap();
        if let Err(err) = serde_json::to_writer(file, &*data) {
            log::warn!("Unable to serialize: {}", err);
        }
    }

    /// Start a read for the given resource. The returned token must be handed back to
    /// the matching `complete_read_*` function along with the fetched value.
    pub fn begin_read(&self, kind: ResourceKind) -> ReadToken {
        let data = self.data.lock().unwrap();
        ReadToken { kind, generation: data.slot_generation(kind) }
    }

    /// Cancel every in-flight read for the given resource.
    /// Their tokens become stale; their results will be dropped at the write site.
    pub fn cancel_reads(&self, kind: ResourceKind) {
        self.data.lock().unwrap().cancel_reads(kind);
    }

    /// Mark the cached value for a resource as stale, so the next poll refetches it.
    /// The stale value keeps being served meanwhile (an optimistic preview must not
    /// vanish before the authoritative state arrives). Also cancels in-flight reads.
    pub fn invalidate(&self, kind: ResourceKind) {
        self.data.lock().unwrap().invalidate(kind);
    }

    /// Whether a resource has no usable value, or a stale one that a poller should refresh
    pub fn needs_refetch(&self, kind: ResourceKind) -> bool {
        self.data.lock().unwrap().needs_refetch(kind)
    }

    pub fn sections(&self) -> Option<SectionCollection> {
        self.data.lock().unwrap().sections.value.clone()
    }

    pub fn events(&self) -> Option<Vec<CalendarEvent>> {
        self.data.lock().unwrap().events.value.clone()
    }

    pub fn settings(&self) -> Option<UserSettings> {
        self.data.lock().unwrap().settings.value.clone()
    }

    /// Write back a fetched section collection, unless the read was cancelled.
    /// Returns whether the value was accepted.
    pub fn complete_read_sections(&self, token: &ReadToken, value: SectionCollection) -> bool {
        debug_assert_eq!(token.kind, ResourceKind::Tasks);
        let accepted = self.data.lock().unwrap().sections.complete_read(token.generation, value);
        if !accepted {
            log::debug!("Dropping the result of a cancelled sections read");
        }
        accepted
    }

    /// Write back fetched events, unless the read was cancelled
    pub fn complete_read_events(&self, token: &ReadToken, value: Vec<CalendarEvent>) -> bool {
        debug_assert_eq!(token.kind, ResourceKind::Events);
        let accepted = self.data.lock().unwrap().events.complete_read(token.generation, value);
        if !accepted {
            log::debug!("Dropping the result of a cancelled events read");
        }
        accepted
    }

    /// Write back fetched settings, unless the read was cancelled
    pub fn complete_read_settings(&self, token: &ReadToken, value: UserSettings) -> bool {
        debug_assert_eq!(token.kind, ResourceKind::Settings);
        let accepted = self.data.lock().unwrap().settings.complete_read(token.generation, value);
        if !accepted {
            log::debug!("Dropping the result of a cancelled settings read");
        }
        accepted
    }

    /// The optimistic write path for the section collection:
    /// cancel in-flight reads, read the current value, apply `mutate`, write back.
    ///
    /// The whole sequence runs under one lock acquisition, so no concurrent mutation of
    /// the same resource can interleave. Returns None when nothing is cached yet (there
    /// is then nothing to preview locally), or when `mutate` returns the input snapshot
    /// unchanged (a no-op drop; the cache is left untouched, reads stay cancelled).
    pub fn apply_sections<F>(&self, mutate: F) -> Option<OptimisticWrite>
    where
        F: FnOnce(&SectionCollection) -> SectionCollection,
    {
        let mut data = self.data.lock().unwrap();
        data.sections.cancel_reads();
        let previous = match &data.sections.value {
            None => return None,
            Some(current) => current.clone(),
        };
        let current = mutate(&previous);
        if current.same_snapshot_as(&previous) {
            return None;
        }
        data.sections.value = Some(current.clone());
        data.sections.stale = true;
        Some(OptimisticWrite { previous, current })
    }

    /// Restore a previous snapshot, for rollback-on-failure policies
    pub fn restore_sections(&self, snapshot: SectionCollection) {
        let mut data = self.data.lock().unwrap();
        data.sections.cancel_reads();
        data.sections.value = Some(snapshot);
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SectionId;
    use crate::section::TaskSection;
    use crate::task::Task;

    fn collection(titles: &[&str]) -> SectionCollection {
        let mut section = TaskSection::new(SectionId::from("s1"), "Today".to_string(), false);
        for (i, title) in titles.iter().enumerate() {
            section.push_task(Task::new(title.to_string(), i as u32 + 1));
        }
        SectionCollection::new(vec![section])
    }

    #[test]
    fn completed_read_populates_the_slot() {
        let cache = Cache::new();
        let token = cache.begin_read(ResourceKind::Tasks);
        assert!(cache.complete_read_sections(&token, collection(&["A"])));
        assert_eq!(cache.sections().unwrap().section(0).unwrap().tasks().len(), 1);
    }

    #[test]
    fn cancelled_read_is_dropped_at_the_write_site() {
        let cache = Cache::new();
        let token = cache.begin_read(ResourceKind::Tasks);
        cache.cancel_reads(ResourceKind::Tasks);

        assert!(!cache.complete_read_sections(&token, collection(&["stale"])));
        assert!(cache.sections().is_none());
    }

    #[test]
    fn optimistic_write_cancels_in_flight_reads() {
        let cache = Cache::new();
        let initial = cache.begin_read(ResourceKind::Tasks);
        assert!(cache.complete_read_sections(&initial, collection(&["A", "B"])));

        // a refetch starts, then the user mutates before it resolves
        let in_flight = cache.begin_read(ResourceKind::Tasks);
        let write = cache
            .apply_sections(|col| {
                let mut sections = col.to_mutable();
                sections[0].tasks_mut().remove(0);
                SectionCollection::new(sections)
            })
            .unwrap();

        // the stale response must not clobber the optimistic write
        assert!(!cache.complete_read_sections(&in_flight, collection(&["A", "B"])));
        assert!(cache.sections().unwrap().same_snapshot_as(&write.current));
    }

    #[test]
    fn apply_on_an_empty_cache_aborts_the_optimistic_path() {
        let cache = Cache::new();
        assert!(cache.apply_sections(|col| col.clone()).is_none());
    }

    #[test]
    fn noop_mutation_leaves_the_cache_untouched() {
        let cache = Cache::new();
        let token = cache.begin_read(ResourceKind::Tasks);
        cache.complete_read_sections(&token, collection(&["A"]));
        let before = cache.sections().unwrap();

        assert!(cache.apply_sections(|col| col.clone()).is_none());
        assert!(cache.sections().unwrap().same_snapshot_as(&before));
    }

    #[test]
    fn invalidate_marks_stale_but_keeps_serving_the_value() {
        let cache = Cache::new();
        let token = cache.begin_read(ResourceKind::Tasks);
        cache.complete_read_sections(&token, collection(&["A"]));
        assert!(!cache.needs_refetch(ResourceKind::Tasks));

        let in_flight = cache.begin_read(ResourceKind::Tasks);
        cache.invalidate(ResourceKind::Tasks);
        // the stale value is still displayed until a refetch replaces it
        assert!(cache.sections().is_some());
        assert!(cache.needs_refetch(ResourceKind::Tasks));
        // but the pre-invalidation read was cancelled
        assert!(!cache.complete_read_sections(&in_flight, collection(&["stale"])));

        // a fresh read clears the staleness
        let token = cache.begin_read(ResourceKind::Tasks);
        assert!(cache.complete_read_sections(&token, collection(&["B"])));
        assert!(!cache.needs_refetch(ResourceKind::Tasks));
    }

    #[test]
    fn serde_cache() {
        let dir = std::env::temp_dir().join("taskboard-cache-test");
        std::fs::create_dir_all(&dir).unwrap();
        let cache_path = dir.join("cache.json");

        let cache = Cache::new_with_backing_file(&cache_path);
        let token = cache.begin_read(ResourceKind::Tasks);
        cache.complete_read_sections(&token, collection(&["write report", "buy milk"]));
        cache.save_to_file();

        let retrieved = Cache::from_file(&cache_path).unwrap();
        assert_eq!(retrieved.sections().unwrap(), cache.sections().unwrap());
    }
}
