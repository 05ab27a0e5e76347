use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Serialize, Serializer};
use tokio::sync::watch;

use crate::config::RegistryConfig;
use crate::errors::RegistryError;
use crate::ids::{IdSource, RandomIds};
use crate::models::{FileHandle, UploadId, UploadRecord};

/// immutable view of every queued upload at one point in time.
///
/// each publication allocates a new map, so two snapshots are
/// the same state exactly when [`Snapshot::same_as`] says so.
pub struct Snapshot<H: ?Sized>(Arc<HashMap<UploadId, UploadRecord<H>>>);

impl<H: ?Sized> Snapshot<H> {
    fn new(entries: HashMap<UploadId, UploadRecord<H>>) -> Self {
        Self(Arc::new(entries))
    }

    /// pointer identity, for shallow change detection
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<H: ?Sized> Clone for Snapshot<H> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<H: ?Sized> Deref for Snapshot<H> {
    type Target = HashMap<UploadId, UploadRecord<H>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<H: ?Sized> fmt::Debug for Snapshot<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot").field("len", &self.0.len()).finish()
    }
}

impl<H: ?Sized> Serialize for Snapshot<H> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&*self.0, serializer)
    }
}

type Listener<H> = Arc<dyn Fn(&Snapshot<H>) + Send + Sync>;

struct ListenerTable<H: ?Sized> {
    listeners: DashMap<u64, Listener<H>>,
    next_key: AtomicU64,
}

trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, key: u64);
}

impl<H: FileHandle + ?Sized> Unsubscribe for ListenerTable<H> {
    fn unsubscribe(&self, key: u64) {
        if self.listeners.remove(&key).is_some() {
            tracing::trace!("Listener {} unsubscribed", key);
        }
    }
}

/// keeps a listener registered; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    key: u64,
    table: Weak<dyn Unsubscribe>,
}

impl Subscription {
    /// explicit form of dropping the guard
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // the registry may already be gone
        if let Some(table) = self.table.upgrade() {
            table.unsubscribe(self.key);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("key", &self.key).finish()
    }
}

/// keyed collection of files the user has queued for upload.
///
/// mutated only through [`UploadRegistry::add_uploads`], which is purely
/// additive. every successful call publishes exactly one new [`Snapshot`]
/// to callback listeners and watch receivers.
pub struct UploadRegistry<H: FileHandle + ?Sized> {
    state: watch::Sender<Snapshot<H>>,
    listeners: Arc<ListenerTable<H>>,
    // held across swap + callbacks so listeners see batches in publish order
    publish: Mutex<()>,
    ids: Box<dyn IdSource>,
    config: RegistryConfig,
}

impl<H: FileHandle + ?Sized> Default for UploadRegistry<H> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<H: FileHandle + ?Sized> UploadRegistry<H> {
    /// create an empty registry minting random v4 uuids
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_id_source(config, RandomIds)
    }

    pub fn with_id_source(config: RegistryConfig, ids: impl IdSource + 'static) -> Self {
        // send_modify keeps working with no receivers, so the initial one can go
        let (state, _) = watch::channel(Snapshot::new(HashMap::new()));
        Self {
            state,
            listeners: Arc::new(ListenerTable {
                listeners: DashMap::new(),
                next_key: AtomicU64::new(0),
            }),
            publish: Mutex::new(()),
            ids: Box::new(ids),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// queue a batch of files, one new entry per handle.
    ///
    /// ids and records are staged before anything becomes visible, so an
    /// error leaves the registry exactly as it was and notifies nobody.
    /// an empty batch publishes nothing unless
    /// [`RegistryConfig::notify_on_empty_batch`] is set.
    ///
    /// batches publish one at a time and listeners run before the next one
    /// starts, so a listener must not call `add_uploads` itself.
    pub fn add_uploads<I>(&self, files: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = Arc<H>>,
    {
        let staged = match self.stage(files, Utc::now()) {
            Ok(staged) => staged,
            Err(e) => {
                tracing::warn!("Rejected upload batch: {}", e);
                return Err(e);
            }
        };

        if staged.is_empty() && !self.config.notify_on_empty_batch {
            tracing::debug!("Empty upload batch, nothing to publish");
            return Ok(());
        }

        let added = staged.len();
        // a panicking listener poisons the lock, but there is no data behind it
        let _publishing = self
            .publish
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut published = None;
        self.state.send_modify(|current| {
            // copy-on-write: earlier snapshots stay untouched
            let mut entries = (**current).clone();
            entries.reserve(added);
            entries.extend(staged);
            *current = Snapshot::new(entries);
            published = Some(current.clone());
        });

        if let Some(snapshot) = published {
            tracing::info!("Queued {} upload(s), {} total", added, snapshot.len());
            self.notify(&snapshot);
        }
        Ok(())
    }

    fn stage<I>(
        &self,
        files: I,
        queued_at: DateTime<Utc>,
    ) -> Result<Vec<(UploadId, UploadRecord<H>)>, RegistryError>
    where
        I: IntoIterator<Item = Arc<H>>,
    {
        files
            .into_iter()
            .enumerate()
            .map(|(position, handle)| -> Result<_, RegistryError> {
                let id = UploadId::from_uuid(self.ids.next_uuid()?);
                let name = handle
                    .file_name()
                    .ok_or(RegistryError::InvalidHandle { position })?;
                tracing::trace!("Staged {} as {}", name, id);
                Ok((id, UploadRecord { name, handle, queued_at }))
            })
            .collect()
    }

    fn notify(&self, snapshot: &Snapshot<H>) {
        // collected first so a listener can drop its own subscription
        let listeners: Vec<Listener<H>> = self
            .listeners
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        tracing::debug!("Notifying {} listener(s)", listeners.len());
        for listener in listeners {
            listener(snapshot);
        }
    }

    /// call `listener` with every snapshot published from now on
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Snapshot<H>) + Send + Sync + 'static,
    {
        let key = self.listeners.next_key.fetch_add(1, Ordering::Relaxed);
        self.listeners.listeners.insert(key, Arc::new(listener));
        tracing::trace!("Listener {} subscribed", key);

        let table: Arc<dyn Unsubscribe> = self.listeners.clone();
        Subscription {
            key,
            table: Arc::downgrade(&table),
        }
    }

    /// receiver for async consumers; the current snapshot counts as already seen
    pub fn watch(&self) -> watch::Receiver<Snapshot<H>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<H> {
        self.state.borrow().clone()
    }

    pub fn get(&self, id: &UploadId) -> Option<UploadRecord<H>> {
        self.state.borrow().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.listeners.len()
    }
}
