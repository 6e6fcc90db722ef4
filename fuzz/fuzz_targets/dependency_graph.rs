#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_inject::{Constructor, ContextConfig, DiError, Key, Resolver, TypeDescriptor};

const NODES: usize = 6;

struct Node<const N: usize>;

macro_rules! dispatch {
    ($index:expr, $n:ident => $body:expr) => {
        match $index {
            0 => { const $n: usize = 0; $body }
            1 => { const $n: usize = 1; $body }
            2 => { const $n: usize = 2; $body }
            3 => { const $n: usize = 3; $body }
            4 => { const $n: usize = 4; $body }
            5 => { const $n: usize = 5; $body }
            _ => { const $n: usize = 6; $body }
        }
    };
}

fn key(index: usize) -> Key {
    dispatch!(index, N => Key::of::<Node<N>>())
}

fuzz_target!(|data: &[u8]| {
    // Each byte binds one node: low bits pick the node, high bits its dependencies
    let mut config = ContextConfig::new();
    for &byte in data.iter().take(16) {
        let index = (byte as usize) % NODES;
        let deps: Vec<Key> = (0..=NODES)
            .filter(|d| (byte >> 1) as usize & (1 << d) != 0)
            .map(key)
            .collect();
        let result = dispatch!(index, N => config
            .bind_descriptor::<Node<N>, Node<N>>(TypeDescriptor::new().constructor(
                Constructor::with_params(deps, |_| Ok(Node::<N>)).inject(),
            ))
            .map(|_| ()));
        assert!(result.is_ok());
    }

    match config.get_context() {
        Ok(context) => {
            for index in 0..NODES {
                let found = dispatch!(index, N => context.get::<Node<N>>().map(|v| v.is_some()));
                assert_eq!(found.ok(), Some(config.contains_key(&key(index))));
            }
        }
        Err(DiError::CyclicDependency(cycle)) => assert!(!cycle.is_empty()),
        Err(DiError::DependencyNotFound { dependency, .. }) => {
            assert!(!config.contains_key(&dependency))
        }
        Err(other) => panic!("unexpected validation error: {}", other),
    }
});
