//! Per-list snapshot caching for shelving.
//!
//! Provides transport-agnostic diffing and batch-update delivery. The core
//! abstraction is `SnapshotFeed`, which caches the last snapshot per list,
//! diffs on change, and produces `FeedEvent` messages that can be serialized
//! and sent to whatever renders the list.
//!
//! Rejected snapshots never leave the consumer stale: they turn into a full
//! `Reload`, unlike [`shelving::diff`] which reports them as "no change".

use std::collections::HashMap;

use facet::Facet;
use shelving::{BatchStep, DiffConfig, Key, Outcome, Snapshot};

#[cfg(feature = "tracing")]
use tracing::debug;

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($tt:tt)*) => {};
}

/// Events produced by the feed.
///
/// These are serialized with postcard; the consumer decodes them and drives
/// its batch-update API.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
#[repr(u8)]
pub enum FeedEvent {
    /// Full reload needed.
    Reload { list: String },
    /// Batch update for a list (postcard-serialized `Vec<BatchStep>`).
    Batch { list: String, steps_blob: Vec<u8> },
}

impl FeedEvent {
    /// The list this event is about.
    pub fn list(&self) -> &str {
        match self {
            FeedEvent::Reload { list } | FeedEvent::Batch { list, .. } => list,
        }
    }

    /// Serialize this event to postcard bytes.
    pub fn to_postcard(&self) -> Vec<u8> {
        facet_postcard::to_vec(self).expect("FeedEvent serialization should not fail")
    }

    /// Deserialize a `FeedEvent` from postcard bytes.
    pub fn from_postcard(
        bytes: &[u8],
    ) -> Result<Self, facet_postcard::DeserializeError<facet_postcard::PostcardError>> {
        facet_postcard::from_slice(bytes)
    }
}

/// Decode the steps carried by [`FeedEvent::Batch`].
pub fn decode_steps(
    steps_blob: &[u8],
) -> Result<Vec<BatchStep>, facet_postcard::DeserializeError<facet_postcard::PostcardError>> {
    facet_postcard::from_slice(steps_blob)
}

/// Per-list diffing state.
///
/// Caches the last snapshot per list, diffs new snapshots against the cache,
/// and produces `FeedEvent` messages.
///
/// Transport-agnostic: callers are responsible for delivering events.
pub struct SnapshotFeed<K, P> {
    /// Last snapshot seen per list.
    snapshots: HashMap<String, Snapshot<K, P>>,
    config: DiffConfig<P>,
}

impl<K: Key, P> SnapshotFeed<K, P> {
    /// A feed using the default (key-only) comparison.
    pub fn new() -> Self {
        Self::with_config(DiffConfig::default())
    }

    /// A feed using `config` for every diff.
    pub fn with_config(config: DiffConfig<P>) -> Self {
        Self {
            snapshots: HashMap::new(),
            config,
        }
    }

    /// Cache a snapshot for a list (call when first rendering). Returns the
    /// previous snapshot if any.
    pub fn cache_snapshot(&mut self, list: &str, snapshot: Snapshot<K, P>) -> Option<Snapshot<K, P>> {
        self.snapshots.insert(list.to_owned(), snapshot)
    }

    /// The cached snapshot for a list.
    pub fn cached(&self, list: &str) -> Option<&Snapshot<K, P>> {
        self.snapshots.get(list)
    }

    /// Diff a new snapshot against the cache. Returns the event to send, or
    /// `None` if the list is unchanged. The cache always ends up holding `snapshot`.
    pub fn diff_list(&mut self, list: &str, snapshot: Snapshot<K, P>) -> Option<FeedEvent> {
        let Some(old) = self.snapshots.get(list) else {
            debug!(list, "no cached snapshot for list, caching and returning Reload");
            self.snapshots.insert(list.to_owned(), snapshot);
            return Some(FeedEvent::Reload {
                list: list.to_owned(),
            });
        };

        let event = match shelving::diff_outcome_with_config(old, &snapshot, &self.config) {
            Outcome::Unchanged => None,
            Outcome::Edits(script) => {
                let steps = script.batch_steps();
                let steps_blob =
                    facet_postcard::to_vec(&steps).expect("batch serialization should not fail");

                debug!(
                    list,
                    %script,
                    num_steps = steps.len(),
                    blob_size = steps_blob.len(),
                    "diff produced batch"
                );

                Some(FeedEvent::Batch {
                    list: list.to_owned(),
                    steps_blob,
                })
            }
            Outcome::Invalid(_e) => {
                debug!(list, error = %_e, "snapshot rejected, sending Reload");
                Some(FeedEvent::Reload {
                    list: list.to_owned(),
                })
            }
        };

        self.snapshots.insert(list.to_owned(), snapshot);
        event
    }

    /// All cached list ids.
    pub fn cached_lists(&self) -> Vec<String> {
        self.snapshots.keys().cloned().collect()
    }

    /// Remove a list from the cache.
    pub fn remove_list(&mut self, list: &str) -> bool {
        self.snapshots.remove(list).is_some()
    }

    /// Clear all caches.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl<K: Key, P> Default for SnapshotFeed<K, P> {
    fn default() -> Self {
        Self::new()
    }
}
