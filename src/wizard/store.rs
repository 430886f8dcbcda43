//! Draft persistence
//!
//! A [`DraftSlot`] is a raw named slot holding one JSON string. The
//! [`DraftStore`] adapter encodes and decodes the draft against the
//! catalogue and never fails: unreadable slots load as an empty draft and
//! failed writes are logged and dropped. [`DraftSync`] coalesces the writes
//! triggered by typing.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
#[cfg(test)]
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::draft::Draft;
use crate::catalogue::Catalogue;
use crate::storage;

/// Name of the persisted slot
pub const DRAFT_SLOT_NAME: &str = "hotel-membership-form";

/// Writes wait at most this many debounce intervals during continuous edits
const MAX_WAIT_INTERVALS: u32 = 4;

/// Raw storage for the serialized draft
pub trait DraftSlot: Send {
    fn read(&self) -> io::Result<Option<String>>;
    fn write(&mut self, contents: &str) -> io::Result<()>;
    fn remove(&mut self) -> io::Result<()>;
}

/// Slot backed by `<dir>/hotel-membership-form.json`
pub struct FileDraftSlot {
    path: PathBuf,
}

impl FileDraftSlot {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{DRAFT_SLOT_NAME}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftSlot for FileDraftSlot {
    fn read(&self) -> io::Result<Option<String>> {
        storage::read_optional(&self.path)
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        storage::write_atomic(&self.path, contents)
    }

    fn remove(&mut self) -> io::Result<()> {
        storage::remove_if_exists(&self.path)
    }
}

/// In-memory slot. Clones share the same contents, so a test can keep one
/// handle for inspection.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Arc<Mutex<Option<String>>>,
}

#[cfg(test)]
impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(contents.to_string()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    fn poisoned() -> io::Error {
        io::Error::other("memory slot lock poisoned")
    }
}

#[cfg(test)]
impl DraftSlot for MemorySlot {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.contents.lock().map_err(|_| Self::poisoned())?.clone())
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        *self.contents.lock().map_err(|_| Self::poisoned())? = Some(contents.to_string());
        Ok(())
    }

    fn remove(&mut self) -> io::Result<()> {
        *self.contents.lock().map_err(|_| Self::poisoned())? = None;
        Ok(())
    }
}

/// Load/save/clear contract over a slot
pub struct DraftStore {
    slot: Box<dyn DraftSlot>,
    catalogue: Arc<Catalogue>,
}

impl DraftStore {
    pub fn new(slot: Box<dyn DraftSlot>, catalogue: Arc<Catalogue>) -> Self {
        Self { slot, catalogue }
    }

    /// The persisted draft, or an empty one when nothing usable is stored
    pub fn load(&self) -> Draft {
        let contents = match self.slot.read() {
            Ok(Some(contents)) => contents,
            Ok(None) => return Draft::new(),
            Err(e) => {
                warn!(error = %e, "draft slot unreadable, starting fresh");
                return Draft::new();
            }
        };
        match serde_json::from_str::<serde_json::Value>(&contents) {
            Ok(json) => {
                let draft = Draft::from_json(&json, &self.catalogue);
                debug!(fields = draft.len(), "draft restored");
                draft
            }
            Err(e) => {
                warn!(error = %e, "draft slot corrupt, starting fresh");
                Draft::new()
            }
        }
    }

    /// Best-effort overwrite of the slot
    pub fn save(&mut self, draft: &Draft) {
        let encoded = encode(draft);
        if let Err(e) = self.slot.write(&encoded) {
            warn!(error = %e, "failed to save draft");
        } else {
            debug!(fields = draft.len(), "draft saved");
        }
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.slot.remove() {
            warn!(error = %e, "failed to clear draft");
        } else {
            debug!("draft cleared");
        }
    }
}

/// Serialized form written to the slot
pub fn encode(draft: &Draft) -> String {
    draft.to_json().to_string()
}

/// Coalesces draft writes. An edit marks the draft dirty; [`DraftSync::tick`]
/// writes once edits have paused for the debounce interval, or once the
/// draft has been dirty for [`MAX_WAIT_INTERVALS`] intervals. Each write
/// serializes the draft as it is at that moment, so the last edit wins.
pub struct DraftSync {
    store: DraftStore,
    debounce: Duration,
    first_pending: Option<Instant>,
    last_edit: Option<Instant>,
}

impl DraftSync {
    pub fn new(store: DraftStore, debounce: Duration) -> Self {
        Self {
            store,
            debounce,
            first_pending: None,
            last_edit: None,
        }
    }

    pub fn load(&self) -> Draft {
        self.store.load()
    }

    pub fn is_pending(&self) -> bool {
        self.last_edit.is_some()
    }

    /// Record an edit made at `now`
    pub fn mark_dirty(&mut self, now: Instant) {
        self.first_pending.get_or_insert(now);
        self.last_edit = Some(now);
    }

    /// Write if the pending edit is due. Returns whether a write happened.
    pub fn tick(&mut self, now: Instant, draft: &Draft) -> bool {
        let (Some(first), Some(last)) = (self.first_pending, self.last_edit) else {
            return false;
        };
        let quiet = now.saturating_duration_since(last) >= self.debounce;
        let overdue = now.saturating_duration_since(first) >= self.debounce * MAX_WAIT_INTERVALS;
        if quiet || overdue {
            self.write(draft);
            true
        } else {
            false
        }
    }

    /// Write now if anything is pending
    pub fn flush(&mut self, draft: &Draft) {
        if self.is_pending() {
            self.write(draft);
        }
    }

    /// Drop pending writes and empty the slot
    pub fn clear(&mut self) {
        self.first_pending = None;
        self.last_edit = None;
        self.store.clear();
    }

    fn write(&mut self, draft: &Draft) {
        self.first_pending = None;
        self.last_edit = None;
        self.store.save(draft);
    }
}
