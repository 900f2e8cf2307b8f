//! Fuzz target for string pool operations.
//!
//! Replays arbitrary operation sequences against a small pool and checks that
//! every handle the pool still reports as valid returns the bytes it was
//! created with.

#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use cutekit::{Handle, PoolConfig, StringPool};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Inject(Vec<u8>),
    Discard(u8),
    Incref(u8),
    Decref(u8),
    Defrag,
    Clear,
}

#[derive(Arbitrary, Debug)]
struct Input {
    ignore_case: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let config = PoolConfig::default()
        .with_ignore_case(input.ignore_case)
        .with_entry_capacity(2)
        .with_block_size(256)
        .with_min_length(0);
    let Ok(mut pool) = StringPool::new(config) else {
        return;
    };
    let mut issued: Vec<(Handle, Vec<u8>)> = Vec::new();

    for op in input.ops.into_iter().take(512) {
        match op {
            Op::Inject(bytes) => {
                let bytes: Vec<u8> = bytes.into_iter().take(300).collect();
                let h = pool.inject(&bytes);
                issued.push((h, bytes));
            }
            Op::Discard(i) if !issued.is_empty() => {
                pool.discard(issued[i as usize % issued.len()].0);
            }
            Op::Incref(i) if !issued.is_empty() => {
                pool.incref(issued[i as usize % issued.len()].0);
            }
            Op::Decref(i) if !issued.is_empty() => {
                pool.decref(issued[i as usize % issued.len()].0);
            }
            Op::Defrag => pool.defrag(),
            Op::Clear => pool.clear(),
            _ => {}
        }
    }

    let live: HashMap<Handle, usize> = pool.iter().map(|(h, b)| (h, b.len())).collect();
    assert_eq!(live.len(), pool.len());
    for (h, bytes) in &issued {
        if let Some(stored) = pool.bytes(*h) {
            if input.ignore_case {
                assert!(stored.eq_ignore_ascii_case(bytes));
            } else {
                assert_eq!(stored, bytes.as_slice());
            }
            assert_eq!(live.get(h), Some(&stored.len()));
        }
    }
});
