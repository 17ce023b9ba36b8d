use nrf_cache::services::{CacheEntry, EntryId, ExpiryQueue};
use nrf_cache::{NfProfile, NfType};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Op {
    Push(u64),
    Update(usize, u64),
    Remove(usize),
    Pop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1u64..10_000).prop_map(Op::Push),
        2 => (any::<usize>(), 1u64..10_000).prop_map(|(i, ttl)| Op::Update(i, ttl)),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => Just(Op::Pop),
    ]
}

fn profile(n: usize) -> NfProfile {
    NfProfile::new(format!("nf-{n}"), NfType::Smf)
}

proptest! {
    /// Property: distinct ttls pop out in strictly increasing order
    #[test]
    fn prop_pop_min_strictly_increasing(
        ttls in proptest::collection::hash_set(1u64..1_000_000, 1..64)
    ) {
        let mut queue = ExpiryQueue::new();
        for (n, ttl) in ttls.iter().enumerate() {
            queue.push(CacheEntry::new(profile(n), Duration::from_secs(*ttl)));
        }

        let mut popped = Vec::new();
        while let Some(entry) = queue.pop_min() {
            popped.push(entry.ttl().as_secs());
        }

        let mut expected: Vec<u64> = ttls.into_iter().collect();
        expected.sort_unstable();
        prop_assert_eq!(popped, expected);
        prop_assert!(queue.pop_min().is_none());
    }

    /// Property: after any mix of push, update, remove and pop the queue
    /// holds exactly the live entries, with their latest ttl, in expiry order
    #[test]
    fn prop_mixed_operations_keep_heap_order(
        ops in proptest::collection::vec(op_strategy(), 1..200)
    ) {
        let mut queue = ExpiryQueue::new();
        let mut live: Vec<(EntryId, String)> = Vec::new();
        let mut ttls: HashMap<String, u64> = HashMap::new();
        let mut next = 0usize;

        for op in ops {
            match op {
                Op::Push(ttl) => {
                    let p = profile(next);
                    next += 1;
                    ttls.insert(p.nf_instance_id.clone(), ttl);
                    let name = p.nf_instance_id.clone();
                    let id = queue.push(CacheEntry::new(p, Duration::from_secs(ttl)));
                    live.push((id, name));
                }
                Op::Update(i, ttl) if !live.is_empty() => {
                    let (id, name) = live[i % live.len()].clone();
                    prop_assert!(queue.update(id, NfProfile::new(name.clone(), NfType::Smf), Duration::from_secs(ttl)));
                    ttls.insert(name, ttl);
                }
                Op::Remove(i) if !live.is_empty() => {
                    let (id, name) = live.remove(i % live.len());
                    let removed = queue.remove(id);
                    prop_assert_eq!(removed.map(|e| e.into_profile().nf_instance_id), Some(name.clone()));
                    ttls.remove(&name);
                }
                Op::Pop => {
                    let min_before = queue.iter().map(CacheEntry::expires_at).min();
                    match queue.pop_min() {
                        Some(entry) => {
                            prop_assert_eq!(Some(entry.expires_at()), min_before);
                            let name = entry.into_profile().nf_instance_id;
                            live.retain(|(_, n)| *n != name);
                            ttls.remove(&name);
                        }
                        None => prop_assert!(live.is_empty()),
                    }
                }
                _ => {}
            }

            prop_assert_eq!(queue.len(), live.len());
            for (position, entry) in queue.iter().enumerate() {
                prop_assert_eq!(entry.index(), position);
            }
        }

        let mut last = None;
        let mut seen = HashSet::new();
        while let Some(entry) = queue.pop_min() {
            if let Some(prev) = last {
                prop_assert!(prev <= entry.expires_at());
            }
            last = Some(entry.expires_at());
            prop_assert_eq!(entry.ttl().as_secs(), ttls[&entry.profile().nf_instance_id]);
            seen.insert(entry.into_profile().nf_instance_id);
        }
        let expected: HashSet<String> = live.into_iter().map(|(_, n)| n).collect();
        prop_assert_eq!(seen, expected);
    }
}
