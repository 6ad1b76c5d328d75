//! Concurrent access to a shared store from many threads.

use std::sync::Arc;
use std::thread;

use wr_core::{ErrorKind, FixedClock, parse_instant};
use wr_store::RewardStore;

const THREADS: usize = 16;

fn store_at(now: &str) -> RewardStore {
    RewardStore::with_clock(Arc::new(FixedClock::new(parse_instant(now).unwrap())))
}

#[test]
fn concurrent_generation_builds_one_bucket() {
    let store = store_at("2021-11-30T12:00:00Z");

    let weeks: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let store = &store;
                // Different anchors, same week.
                let anchor = format!("2021-12-0{}T0{}:00:00Z", 1 + i % 4, i % 10);
                s.spawn(move || store.generate_week("alice", &anchor).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(store.len(), 1);
    assert!(weeks.iter().all(|w| Arc::ptr_eq(w, &weeks[0])));
}

#[test]
fn concurrent_redeem_has_exactly_one_winner() {
    let store = store_at("2021-11-30T12:00:00Z");
    store.generate_week("alice", "2021-11-30T10:10:10Z").unwrap();

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = &store;
                s.spawn(move || store.redeem("alice", "2021-11-30T09:00:00Z"))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }
}

#[test]
fn users_redeem_independently() {
    let store = store_at("2021-11-30T12:00:00Z");

    thread::scope(|s| {
        for user in ["alice", "bob", "carol"] {
            let store = &store;
            s.spawn(move || {
                store.generate_week(user, "2021-11-30T10:10:10Z").unwrap();
                store.redeem(user, "2021-11-30T10:00:00Z").unwrap();
            });
        }
    });

    assert_eq!(store.len(), 3);
}
