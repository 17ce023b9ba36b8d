//! Expiry-ordered min-heap of cached NF profiles.
//!
//! Entries live in a slot arena and are addressed by [`EntryId`]. The heap
//! itself is an array of `(expires_at, id)` nodes, and every entry records its
//! current heap position so that removal and re-prioritisation of an arbitrary
//! entry are O(log n) rather than a linear scan. Every swap rewrites the
//! position of both entries it moves.

use std::time::Duration;
use tokio::time::Instant;

use crate::domain::models::NfProfile;
use crate::services::match_filters::SupiRanges;

/// Upper bound used when `now + ttl` does not fit in an `Instant`.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Stable handle to an entry held by an [`ExpiryQueue`].
///
/// A handle is valid until its entry is popped or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

/// One cached profile with its time-to-live.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    profile: NfProfile,
    supi_ranges: SupiRanges,
    ttl: Duration,
    expires_at: Instant,
    index: usize,
}

impl CacheEntry {
    /// Create an entry expiring `ttl` from now.
    pub fn new(profile: NfProfile, ttl: Duration) -> Self {
        Self {
            supi_ranges: SupiRanges::compile(profile.supi_ranges()),
            profile,
            ttl,
            expires_at: expiry_from_now(ttl),
            index: 0,
        }
    }

    /// The stored profile.
    pub fn profile(&self) -> &NfProfile {
        &self.profile
    }

    /// SUPI ranges of the stored profile, compiled when it was stored.
    pub fn supi_ranges(&self) -> &SupiRanges {
        &self.supi_ranges
    }

    /// Consume the entry, keeping its profile.
    pub fn into_profile(self) -> NfProfile {
        self.profile
    }

    /// Time-to-live the entry was last stored with.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Absolute expiry instant.
    pub const fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Current position in the owning queue's heap array.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Whether the entry has expired as of now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// An entry is expired once `now` reaches its expiry, never before.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

fn expiry_from_now(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl)
        .or_else(|| now.checked_add(MAX_TTL))
        .unwrap_or(now)
}

#[derive(Debug, Clone, Copy)]
struct HeapNode {
    expires_at: Instant,
    id: EntryId,
}

/// Binary min-heap keyed by absolute expiry time.
///
/// Equal expiry times are ordered arbitrarily.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use nrf_cache::services::{CacheEntry, ExpiryQueue};
/// use nrf_cache::{NfProfile, NfType};
///
/// let mut queue = ExpiryQueue::new();
/// let smf = NfProfile::new("smf-1", NfType::Smf);
/// let ausf = NfProfile::new("ausf-1", NfType::Ausf);
/// queue.push(CacheEntry::new(smf, Duration::from_secs(180)));
/// queue.push(CacheEntry::new(ausf, Duration::from_secs(60)));
///
/// let first = queue.pop_min().unwrap();
/// assert_eq!(first.profile().nf_instance_id, "ausf-1");
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ExpiryQueue {
    slots: Vec<Option<CacheEntry>>,
    free: Vec<usize>,
    heap: Vec<HeapNode>,
}

impl ExpiryQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Entry behind `id`, if it is still queued.
    pub fn get(&self, id: EntryId) -> Option<&CacheEntry> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Entry with the earliest expiry.
    pub fn peek(&self) -> Option<&CacheEntry> {
        self.heap.first().and_then(|node| self.get(node.id))
    }

    /// Iterate over all entries in heap order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry> {
        self.heap.iter().filter_map(|node| self.get(node.id))
    }

    /// Insert an entry and return its handle.
    pub fn push(&mut self, mut entry: CacheEntry) -> EntryId {
        let position = self.heap.len();
        entry.index = position;
        let expires_at = entry.expires_at;

        let id = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                EntryId(slot)
            }
            None => {
                self.slots.push(Some(entry));
                EntryId(self.slots.len() - 1)
            }
        };

        self.heap.push(HeapNode { expires_at, id });
        self.sift_up(position);
        id
    }

    /// Remove and return the entry with the earliest expiry.
    ///
    /// Returns `None` on an empty queue.
    pub fn pop_min(&mut self) -> Option<CacheEntry> {
        if self.heap.is_empty() {
            return None;
        }
        self.remove_at(0)
    }

    /// Replace an entry's profile and ttl, recompute its expiry from now and
    /// restore heap order from its current position.
    ///
    /// Returns `false` if the handle is stale.
    pub fn update(&mut self, id: EntryId, profile: NfProfile, ttl: Duration) -> bool {
        let Some(entry) = self.slots.get_mut(id.0).and_then(Option::as_mut) else {
            return false;
        };

        entry.supi_ranges = SupiRanges::compile(profile.supi_ranges());
        entry.profile = profile;
        entry.ttl = ttl;
        entry.expires_at = expiry_from_now(ttl);

        let position = entry.index;
        self.heap[position].expires_at = entry.expires_at;
        self.fix(position);
        true
    }

    /// Remove an arbitrary entry by handle.
    pub fn remove(&mut self, id: EntryId) -> Option<CacheEntry> {
        let position = self.get(id)?.index;
        self.remove_at(position)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.heap.clear();
    }

    fn remove_at(&mut self, position: usize) -> Option<CacheEntry> {
        let last = self.heap.len().checked_sub(1)?;
        if position != last {
            self.swap(position, last);
        }

        let node = self.heap.pop()?;
        let mut entry = self.slots.get_mut(node.id.0)?.take()?;
        self.free.push(node.id.0);
        entry.index = usize::MAX;

        if position < self.heap.len() {
            self.fix(position);
        }
        Some(entry)
    }

    /// Re-establish heap order for the node at `position`, moving it either
    /// way.
    fn fix(&mut self, position: usize) {
        if !self.sift_down(position) {
            self.sift_up(position);
        }
    }

    fn less(&self, i: usize, j: usize) -> bool {
        self.heap[i].expires_at < self.heap[j].expires_at
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        for position in [i, j] {
            let id = self.heap[position].id;
            if let Some(entry) = self.slots[id.0].as_mut() {
                entry.index = position;
            }
        }
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.less(position, parent) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
    }

    /// Returns whether the node moved.
    fn sift_down(&mut self, start: usize) -> bool {
        let len = self.heap.len();
        let mut position = start;
        loop {
            let left = 2 * position + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, position) {
                break;
            }
            self.swap(position, child);
            position = child;
        }
        position > start
    }

    /// Panics if any heap or index invariant is broken.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for (position, node) in self.heap.iter().enumerate() {
            let entry = self.get(node.id).expect("heap node points at empty slot");
            assert_eq!(entry.index, position, "stale index for {}", entry.profile.nf_instance_id);
            assert_eq!(entry.expires_at, node.expires_at);
            if position > 0 {
                assert!(self.heap[(position - 1) / 2].expires_at <= node.expires_at);
            }
        }
        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.heap.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::NfType;

    fn entry(id: &str, nf_type: NfType, ttl_secs: u64) -> CacheEntry {
        CacheEntry::new(NfProfile::new(id, nf_type), Duration::from_secs(ttl_secs))
    }

    #[tokio::test(start_paused = true)]
    async fn test_pop_min_follows_expiry_order() {
        let mut queue = ExpiryQueue::new();
        queue.push(entry("smf-1", NfType::Smf, 180));
        queue.push(entry("ausf-1", NfType::Ausf, 60));
        queue.push(entry("amf-1", NfType::Amf, 120));
        queue.assert_consistent();

        assert_eq!(queue.pop_min().unwrap().profile().nf_instance_id, "ausf-1");
        assert_eq!(queue.pop_min().unwrap().profile().nf_instance_id, "amf-1");
        assert_eq!(queue.pop_min().unwrap().profile().nf_instance_id, "smf-1");
        assert!(queue.pop_min().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_moves_entry_both_directions() {
        let mut queue = ExpiryQueue::new();
        let a = queue.push(entry("a", NfType::Smf, 10));
        let b = queue.push(entry("b", NfType::Smf, 20));
        let c = queue.push(entry("c", NfType::Smf, 30));

        // Push the root to the back.
        assert!(queue.update(a, NfProfile::new("a", NfType::Smf), Duration::from_secs(40)));
        queue.assert_consistent();
        assert_eq!(queue.peek().unwrap().profile().nf_instance_id, "b");

        // Pull the last one to the front.
        assert!(queue.update(c, NfProfile::new("c", NfType::Smf), Duration::from_secs(5)));
        queue.assert_consistent();
        assert_eq!(queue.peek().unwrap().profile().nf_instance_id, "c");
        assert_eq!(queue.get(c).unwrap().ttl(), Duration::from_secs(5));
        assert_eq!(queue.get(b).unwrap().ttl(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_replaces_profile_and_recomputes_expiry() {
        let mut queue = ExpiryQueue::new();
        let id = queue.push(entry("smf-1", NfType::Smf, 10));
        let first_expiry = queue.get(id).unwrap().expires_at();

        tokio::time::advance(Duration::from_secs(3)).await;
        let mut refreshed = NfProfile::new("smf-1", NfType::Smf);
        refreshed.fqdn = Some("smf.example".to_string());
        queue.update(id, refreshed, Duration::from_secs(10));

        let stored = queue.get(id).unwrap();
        assert_eq!(stored.expires_at(), first_expiry + Duration::from_secs(3));
        assert_eq!(stored.profile().fqdn.as_deref(), Some("smf.example"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_recompiles_supi_ranges() {
        use crate::domain::models::{SupiRange, SupiRangeInfo};

        let udm = |range: SupiRange| {
            let mut profile = NfProfile::new("udm-1", NfType::Udm);
            profile.udm_info = Some(SupiRangeInfo {
                group_id: None,
                supi_ranges: vec![range],
            });
            profile
        };

        let mut queue = ExpiryQueue::new();
        let id = queue.push(CacheEntry::new(
            udm(SupiRange::bounded("imsi-1", "imsi-2")),
            Duration::from_secs(60),
        ));
        assert!(!queue.get(id).unwrap().supi_ranges().admits("imsi-9"));

        queue.update(id, udm(SupiRange::pattern("imsi-9.*")), Duration::from_secs(60));
        assert!(queue.get(id).unwrap().supi_ranges().admits("imsi-9"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_arbitrary_entry() {
        let mut queue = ExpiryQueue::new();
        let ids: Vec<_> = (0..8u64)
            .map(|i| queue.push(entry(&format!("nf-{i}"), NfType::Udm, 100 - i * 10)))
            .collect();

        let removed = queue.remove(ids[3]).unwrap();
        assert_eq!(removed.profile().nf_instance_id, "nf-3");
        queue.assert_consistent();
        assert_eq!(queue.len(), 7);
        assert!(queue.get(ids[3]).is_none());
        assert!(queue.remove(ids[3]).is_none());

        let order: Vec<_> = std::iter::from_fn(|| queue.pop_min())
            .map(|e| e.into_profile().nf_instance_id)
            .collect();
        assert_eq!(order, vec!["nf-7", "nf-6", "nf-5", "nf-4", "nf-2", "nf-1", "nf-0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_are_reused_after_removal() {
        let mut queue = ExpiryQueue::new();
        let first = queue.push(entry("a", NfType::Nrf, 10));
        queue.pop_min();
        let second = queue.push(entry("b", NfType::Nrf, 10));

        assert_eq!(first, second);
        assert_eq!(queue.get(second).unwrap().profile().nf_instance_id, "b");
        queue.assert_consistent();
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_is_inclusive_of_deadline() {
        let item = entry("smf-1", NfType::Smf, 60);
        let deadline = item.expires_at();

        assert!(!item.is_expired_at(deadline - Duration::from_millis(1)));
        assert!(item.is_expired_at(deadline));

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(item.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_ttl_does_not_overflow() {
        let item = entry("nrf-1", NfType::Nrf, u64::MAX);
        assert!(!item.is_expired());
    }
}
