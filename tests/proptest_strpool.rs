//! Property-based tests for the string pool.
//!
//! Exercises interning idempotence, exact byte round-trips, handle
//! invalidation, case folding, growth and defragmentation against a simple
//! `HashMap` model.

use std::collections::HashMap;

use cutekit::{Handle, PoolConfig, StringPool};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary bytes, including NULs and non-UTF-8 sequences.
fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

/// Short ASCII words, so that duplicates and case variants are common.
fn word_strategy() -> impl Strategy<Value = String> {
    "[a-dA-D]{0,4}"
}

/// Small pools that grow and spill into extra blocks quickly.
fn small_config() -> PoolConfig {
    PoolConfig::default()
        .with_entry_capacity(2)
        .with_block_size(256)
        .with_min_length(0)
}

#[derive(Clone, Debug)]
enum Op {
    Inject(String),
    Discard(usize),
    Incref(usize),
    Decref(usize),
    Defrag,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => word_strategy().prop_map(Op::Inject),
        2 => any::<usize>().prop_map(Op::Discard),
        1 => any::<usize>().prop_map(Op::Incref),
        1 => any::<usize>().prop_map(Op::Decref),
        1 => Just(Op::Defrag),
    ]
}

// ============================================================================
// Interning
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Injecting the same bytes twice yields the same handle.
    #[test]
    fn inject_is_idempotent(bytes in bytes_strategy()) {
        let mut pool = StringPool::new(small_config()).unwrap();
        let a = pool.inject(&bytes);
        let b = pool.inject(&bytes);
        prop_assert_eq!(a, b);
        prop_assert_eq!(pool.len(), 1);
    }

    /// Stored bytes come back exactly, embedded NULs included.
    #[test]
    fn bytes_round_trip(strings in prop::collection::vec(bytes_strategy(), 1..40)) {
        let mut pool = StringPool::new(small_config()).unwrap();
        let handles: Vec<Handle> = strings.iter().map(|s| pool.inject(s)).collect();
        for (s, h) in strings.iter().zip(&handles) {
            prop_assert_eq!(pool.bytes(*h), Some(s.as_slice()));
            prop_assert_eq!(pool.length(*h), Some(s.len()));
        }
    }

    /// Case-insensitive pools merge case variants; sensitive pools do not.
    #[test]
    fn case_modes(word in "[a-zA-Z]{1,12}") {
        let upper = word.to_ascii_uppercase();
        let lower = word.to_ascii_lowercase();

        let mut folded = StringPool::new(small_config().with_ignore_case(true)).unwrap();
        prop_assert_eq!(folded.inject(&upper), folded.inject(&lower));

        let mut exact = StringPool::new(small_config()).unwrap();
        let a = exact.inject(&upper);
        let b = exact.inject(&lower);
        prop_assert_eq!(a == b, upper == lower);
    }

    /// Growing well past the initial capacity keeps every earlier handle.
    #[test]
    fn growth_preserves_handles(count in 1usize..300) {
        let mut pool = StringPool::new(small_config()).unwrap();
        let handles: Vec<Handle> = (0..count).map(|i| pool.inject(format!("entry-{i}"))).collect();
        prop_assert_eq!(pool.len(), count);
        for (i, h) in handles.iter().enumerate() {
            let expected = format!("entry-{i}");
            prop_assert_eq!(pool.get(*h), Some(expected.as_str()));
        }
    }

    /// A discarded handle never becomes valid again, even when its slot is reused.
    #[test]
    fn discarded_handles_stay_dead(words in prop::collection::vec(word_strategy(), 1..60)) {
        let mut pool = StringPool::new(small_config()).unwrap();
        let mut dead = Vec::new();
        for word in &words {
            let h = pool.inject(word);
            if pool.discard(h) {
                dead.push(h);
            }
            pool.inject(format!("{word}!"));
            for d in &dead {
                prop_assert!(!pool.is_valid(*d));
                prop_assert_eq!(pool.bytes(*d), None);
            }
        }
    }
}

// ============================================================================
// Model-based operation sequences
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn matches_model(ops in prop::collection::vec(op_strategy(), 1..120)) {
        let mut pool = StringPool::new(small_config()).unwrap();
        // Live handle -> (contents, refcount).
        let mut model: HashMap<Handle, (String, u32)> = HashMap::new();
        let mut dead: Vec<Handle> = Vec::new();

        for op in ops {
            let mut live: Vec<Handle> = model.keys().copied().collect();
            live.sort_by_key(|h| h.raw());
            match op {
                Op::Inject(word) => {
                    let h = pool.inject(&word);
                    if let Some((existing, _)) = model.get(&h) {
                        prop_assert_eq!(existing, &word);
                    } else {
                        prop_assert!(!model.values().any(|(s, _)| *s == word));
                        model.insert(h, (word, 0));
                    }
                }
                Op::Discard(i) if !live.is_empty() => {
                    let h = live[i % live.len()];
                    let removed = pool.discard(h);
                    prop_assert_eq!(removed, model[&h].1 == 0);
                    if removed {
                        model.remove(&h);
                        dead.push(h);
                    }
                }
                Op::Incref(i) if !live.is_empty() => {
                    let h = live[i % live.len()];
                    let entry = model.get_mut(&h).unwrap();
                    entry.1 += 1;
                    prop_assert_eq!(pool.incref(h), entry.1);
                }
                Op::Decref(i) if !live.is_empty() => {
                    let h = live[i % live.len()];
                    let entry = model.get_mut(&h).unwrap();
                    entry.1 = entry.1.saturating_sub(1);
                    prop_assert_eq!(pool.decref(h), entry.1);
                }
                Op::Defrag => {
                    pool.defrag();
                    model.retain(|h, (_, rc)| {
                        if *rc == 0 {
                            dead.push(*h);
                            false
                        } else {
                            true
                        }
                    });
                }
                _ => {}
            }

            prop_assert_eq!(pool.len(), model.len());
            for (h, (s, rc)) in &model {
                prop_assert_eq!(pool.get(*h), Some(s.as_str()));
                prop_assert_eq!(pool.refcount(*h), *rc);
            }
            for d in &dead {
                prop_assert!(!pool.is_valid(*d));
            }
        }
    }
}

// ============================================================================
// Defragmentation
// ============================================================================

#[test]
fn defrag_keeps_referenced_and_drops_the_rest() {
    let mut pool = StringPool::new(small_config()).unwrap();
    let keep: Vec<Handle> = (0..50).map(|i| pool.inject(format!("keep-{i}"))).collect();
    let dropped: Vec<Handle> = (0..50).map(|i| pool.inject(format!("drop-{i}"))).collect();
    for h in &keep {
        pool.incref(*h);
    }

    pool.defrag();

    assert_eq!(pool.len(), keep.len());
    assert_eq!(pool.stats().blocks, 1);
    for (i, h) in keep.iter().enumerate() {
        assert_eq!(pool.get(*h), Some(format!("keep-{i}").as_str()));
        assert_eq!(pool.refcount(*h), 1);
    }
    for h in &dropped {
        assert!(!pool.is_valid(*h));
    }

    // Dropped content can be interned again under a fresh handle.
    let again = pool.inject("drop-0");
    assert_ne!(again, dropped[0]);
    assert_eq!(pool.get(again), Some("drop-0"));
}

#[test]
fn fragmentation_triggers_defrag_hint() {
    let mut pool = StringPool::new(small_config()).unwrap();
    let handles: Vec<Handle> = (0..200)
        .map(|i| pool.inject(format!("fragment-{i:04}")))
        .collect();
    assert!(pool.stats().blocks > 1);
    assert!(!pool.should_defrag());

    for h in handles.iter().skip(1) {
        assert!(pool.discard(*h));
    }
    assert!(pool.should_defrag());

    pool.incref(handles[0]);
    pool.defrag();
    assert!(!pool.should_defrag());
    assert_eq!(pool.get(handles[0]), Some("fragment-0000"));
}
