//! Service directory cache and snapshot broadcast.
//!
//! The single authoritative in-memory map of unlocked services. Every
//! mutation emits the complete resulting map to subscribers, never a
//! delta, because the backend itself only returns full snapshots.
//!
//! The broadcast has no replay: a subscriber attaching after an
//! emission does not see the prior value. Components that need the
//! latest state at attach time call [`ServiceDirectory::snapshot`]
//! instead of relying on the stream.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::models::{Service, ServiceEdit, ServiceMap};

const CHANNEL_CAPACITY: usize = 32;

/// One emission on the directory channel.
#[derive(Debug, Clone)]
pub enum DirectoryUpdate {
    /// The complete map after a successful mutation.
    Snapshot(ServiceMap),
    /// A flow's adapter call failed. Terminal for this channel
    /// instance; the sender is replaced before any further operation.
    Failed(String),
}

/// The service directory cache. Cheap to clone; all clones share the
/// same map and channel.
#[derive(Clone)]
pub struct ServiceDirectory {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    services: ServiceMap,
    sender: broadcast::Sender<DirectoryUpdate>,
}

impl ServiceDirectory {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                services: HashMap::new(),
                sender,
            })),
        }
    }

    /// The current full map.
    pub fn snapshot(&self) -> ServiceMap {
        self.inner.lock().unwrap().services.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.lock().unwrap().services.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Service> {
        self.inner.lock().unwrap().services.get(id).cloned()
    }

    /// Subscribe to future emissions. No replay of past snapshots.
    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryUpdate> {
        self.inner.lock().unwrap().sender.subscribe()
    }

    /// Replace the whole map with a backend-returned snapshot and
    /// broadcast it.
    pub fn replace_all(&self, services: ServiceMap) {
        let mut inner = self.inner.lock().unwrap();
        inner.services = services;
        let snapshot = inner.services.clone();
        let _ = inner.sender.send(DirectoryUpdate::Snapshot(snapshot));
    }

    /// Remove one entry locally (optimistic delete) and broadcast the
    /// resulting map.
    pub fn remove_entry(&self, id: &str) -> Option<Service> {
        let mut inner = self.inner.lock().unwrap();
        let removed = inner.services.remove(id);
        if removed.is_some() {
            let snapshot = inner.services.clone();
            let _ = inner.sender.send(DirectoryUpdate::Snapshot(snapshot));
        }
        removed
    }

    /// Patch one entry's display fields in place and broadcast the
    /// resulting map. No-op when the id is unknown.
    pub fn patch_display(&self, id: &str, edit: &ServiceEdit) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(service) = inner.services.get_mut(id) else {
            return false;
        };
        service.apply_edit(edit);
        let snapshot = inner.services.clone();
        let _ = inner.sender.send(DirectoryUpdate::Snapshot(snapshot));
        true
    }

    /// Set one entry's icon (cache-local edit) and broadcast.
    pub fn set_icon(&self, id: &str, icon: &str) -> bool {
        self.edit_icon(id, Some(icon))
    }

    /// Clear one entry's icon, e.g. after it failed to render. Purely
    /// local; no backend call.
    pub fn clear_icon(&self, id: &str) -> bool {
        self.edit_icon(id, None)
    }

    fn edit_icon(&self, id: &str, icon: Option<&str>) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(service) = inner.services.get_mut(id) else {
            return false;
        };
        service.icon = icon.map(str::to_string);
        let snapshot = inner.services.clone();
        let _ = inner.sender.send(DirectoryUpdate::Snapshot(snapshot));
        true
    }

    /// Report an adapter failure on the channel and replace it with a
    /// fresh instance, so one failure cannot poison later
    /// subscriptions. The cached map is left untouched.
    pub fn fail(&self, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::warn!(detail = %detail, "directory channel terminated by adapter failure");
        let mut inner = self.inner.lock().unwrap();
        let _ = inner.sender.send(DirectoryUpdate::Failed(detail));
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        inner.sender = sender;
    }
}

impl Default for ServiceDirectory {
    fn default() -> Self {
        Self::new()
    }
}
