use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use pretty_assertions::assert_eq;
use rbmap::{Builder, Error, NaturalOrder, OrderedMap, RBTreeMap, ReverseOrder};
use rstest::rstest;

const THREADS: u32 = 4;
const PER_THREAD: u32 = 500;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ─── Builder ─────────────────────────────────────────────────────────────────

#[test]
fn build_without_comparator_fails() {
    let result = Builder::<NaturalOrder>::new().build::<u32, u32>();
    assert_eq!(result.err(), Some(Error::MissingComparator));
    assert_eq!(Error::MissingComparator.to_string(), "an ordered map cannot be built without a comparator");
}

#[test]
fn build_with_comparator() {
    init_tracing();
    let map = Builder::new().comparator(ReverseOrder(NaturalOrder)).capacity(32).build::<u32, &str>().unwrap();
    map.put(1, "one");
    map.put(3, "three");
    map.put(2, "two");
    assert_eq!(map.key_set(), [3, 2, 1]);
    assert!(map.capacity() >= 32);
    map.verify().unwrap();
}

// ─── Single-threaded behavior ────────────────────────────────────────────────

#[test]
fn put_get_remove() {
    let map: OrderedMap<u32, String> = OrderedMap::default();
    assert_eq!(map.put(1, "a".into()), None);
    assert_eq!(map.put(1, "b".into()), Some("a".into()));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&1), Some("b".into()));
    assert_eq!(map.remove(&2), None);
    assert_eq!(map.remove(&1), Some("b".into()));
    assert!(map.is_empty());
}

#[test]
fn conditional_operations() {
    let map: OrderedMap<u32, u32> = (0..5).map(|k| (k, k * 2)).collect();

    assert_eq!(map.put_if_absent(1, 99), Some(2));
    assert_eq!(map.put_if_absent(10, 20), None);
    assert_eq!(map.get(&10), Some(20));

    assert_eq!(map.replace(&11, 0), None);
    assert!(!map.contains_key(&11));
    assert_eq!(map.replace(&10, 21), Some(20));

    assert!(!map.replace_if_value_matches(&2, &5, 6));
    assert!(map.replace_if_value_matches(&2, &4, 6));
    assert!(!map.remove_if_value_matches(&2, &4));
    assert!(map.remove_if_value_matches(&2, &6));
    assert!(!map.contains_key(&2));

    assert!(map.contains_value(&21));
    assert!(!map.contains_value(&4));
    map.verify().unwrap();
}

#[rstest]
#[case::lower(5, OrderedMap::lower_key, Some(3))]
#[case::higher(5, OrderedMap::higher_key, Some(7))]
#[case::lower_of_first(1, OrderedMap::lower_key, None)]
#[case::higher_of_last(9, OrderedMap::higher_key, None)]
#[case::floor_between(6, OrderedMap::floor_key, Some(5))]
#[case::ceiling_between(6, OrderedMap::ceiling_key, Some(7))]
#[case::floor_exact(7, OrderedMap::floor_key, Some(7))]
fn navigation(#[case] probe: u32, #[case] query: fn(&OrderedMap<u32, ()>, &u32) -> Option<u32>, #[case] expected: Option<u32>) {
    let map: OrderedMap<u32, ()> = [1, 3, 5, 7, 9].into_iter().map(|k| (k, ())).collect();
    assert_eq!(map.first_key(), Some(1));
    assert_eq!(map.last_key(), Some(9));
    assert_eq!(query(&map, &probe), expected);
}

#[test]
fn snapshots_are_detached() {
    let map: OrderedMap<u32, u32> = (0..4).map(|k| (k, k + 100)).collect();
    let entries = map.entry_set();
    let keys = map.key_set();
    let values = map.values();
    map.clear();
    map.clear();

    assert!(map.is_empty());
    assert_eq!(entries, [(0, 100), (1, 101), (2, 102), (3, 103)]);
    assert_eq!(keys, [0, 1, 2, 3]);
    assert_eq!(values, [100, 101, 102, 103]);
}

#[test]
fn pop_first_and_last() {
    let map: OrderedMap<u32, u32> = (1..=3).map(|k| (k, k)).collect();
    assert_eq!(map.pop_first(), Some((1, 1)));
    assert_eq!(map.pop_last(), Some((3, 3)));
    assert_eq!(map.pop_last(), Some((2, 2)));
    assert_eq!(map.pop_first(), None);
}

#[test]
fn equality() {
    let a: OrderedMap<u32, u32> = (0..10).map(|k| (k, k)).collect();
    let b: OrderedMap<u32, u32> = (0..10).rev().map(|k| (k, k)).collect();
    assert!(PartialEq::eq(&a, &a));
    assert!(a == b);

    b.put(3, 4);
    assert!(a != b);
    b.put(3, 3);
    b.remove(&9);
    assert!(a != b);

    let reversed: OrderedMap<u32, u32, _> = OrderedMap::new(ReverseOrder(NaturalOrder));
    for k in 0..10 {
        reversed.put(k, k);
    }
    assert!(a == reversed);
}

#[test]
fn self_equality_compares_values() {
    let map: OrderedMap<u32, f64> = [(1, 1.0), (2, f64::NAN)].into_iter().collect();
    assert!(!PartialEq::eq(&map, &map));
    assert!(PartialEq::ne(&map, &map));

    // Agrees with the unsynchronized map.
    let inner = map.into_inner();
    assert!(!PartialEq::eq(&inner, &inner));

    let plain: OrderedMap<u32, f64> = [(1, 1.0), (2, 2.0)].into_iter().collect();
    assert!(PartialEq::eq(&plain, &plain));
}

#[test]
fn round_trips_through_rb_tree_map() {
    let mut inner = RBTreeMap::new(NaturalOrder);
    inner.insert("b", 2);
    inner.insert("a", 1);
    let map = OrderedMap::from(inner);
    map.put("c", 3);
    let inner = map.into_inner();
    assert_eq!(inner.keys().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
}

#[test]
fn debug_shows_entries() {
    let map: OrderedMap<u32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

/// Writers own disjoint key ranges but never put keys ending in 9, nor
/// anything at or above `THREADS * PER_THREAD`. Readers must never see one of
/// those, nor an even key of a writer that has finished removing them.
#[test]
fn concurrent_writers_and_readers() {
    init_tracing();
    let limit = THREADS * PER_THREAD;
    let never_put = |k: u32| k >= limit || k % 10 == 9;

    let map: OrderedMap<u32, u32> = OrderedMap::with_capacity(NaturalOrder, limit as usize);
    let start = Barrier::new((THREADS * 2) as usize);
    let finished: Vec<AtomicBool> = (0..THREADS).map(|_| AtomicBool::new(false)).collect();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let writers: Vec<_> = (0..THREADS)
            .map(|t| {
                let (map, start, finished) = (&map, &start, &finished);
                s.spawn(move || {
                    start.wait();
                    let base = t * PER_THREAD;
                    for k in (base..base + PER_THREAD).filter(|&k| !never_put(k)) {
                        assert_eq!(map.put(k, t), None);
                    }
                    // Every even key goes away again.
                    for k in (base..base + PER_THREAD).step_by(2).filter(|&k| !never_put(k)) {
                        assert_eq!(map.remove(&k), Some(t));
                    }
                    finished[t as usize].store(true, Ordering::Release);
                })
            })
            .collect();

        for r in 0..THREADS {
            let (map, start, finished, done) = (&map, &start, &finished, &done);
            s.spawn(move || {
                start.wait();
                let mut round = 0u32;
                while !done.load(Ordering::Acquire) {
                    round = round.wrapping_add(1);
                    let absent = [limit + round % 64, (r * PER_THREAD + round % PER_THREAD) / 10 * 10 + 9];
                    for k in absent {
                        assert_eq!(map.get(&k), None, "key {k} was never put");
                        assert!(!map.contains_key(&k), "key {k} was never put");
                    }

                    for k in map.first_key().into_iter().chain(map.last_key()) {
                        assert!(!never_put(k), "key {k} was never put");
                    }
                    for k in map.key_set() {
                        assert!(!never_put(k), "key {k} was never put");
                        if let Some(v) = map.get(&k) {
                            assert_eq!(v, k / PER_THREAD);
                        }
                    }

                    for (t, flag) in finished.iter().enumerate() {
                        if flag.load(Ordering::Acquire) {
                            let removed = t as u32 * PER_THREAD + (round % (PER_THREAD / 2)) * 2;
                            assert_eq!(map.get(&removed), None, "removed key {removed} came back");
                        }
                    }
                    map.verify().unwrap();
                }
            });
        }

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
    });

    let live = (0..limit).filter(|&k| !never_put(k) && k % 2 == 1).count();
    assert_eq!(map.len(), live);
    assert!(map.key_set().iter().all(|&k| k % 2 == 1 && !never_put(k)));
    map.verify().unwrap();
}

#[test]
fn concurrent_puts_on_shared_keys() {
    let map: OrderedMap<u32, u32> = OrderedMap::default();

    thread::scope(|s| {
        for t in 0..THREADS {
            let map = &map;
            s.spawn(move || {
                for k in 0..PER_THREAD {
                    map.put(k, t);
                    map.put_if_absent(k + PER_THREAD, t);
                }
            });
        }
    });

    assert_eq!(map.len(), (PER_THREAD * 2) as usize);
    assert!(map.values().iter().all(|&v| v < THREADS));
    map.verify().unwrap();
}
