// Integration tests for the seed → pool → stream pipeline
// Tests cover: reference scenarios, determinism, seed sensitivity, chaining

use sha256rng::{seed_pool, ByteLimit, Emitter, HashAlgorithm, Pool, PoolConfig, DIGEST_LEN};

fn sha(data: &[u8]) -> [u8; DIGEST_LEN] {
    HashAlgorithm::Sha256.digest(data)
}

fn stream(seeds: &[&str], limit: u64) -> Vec<u8> {
    let mut pool = Pool::default();
    seed_pool(&mut pool, seeds).unwrap();

    let mut out = Vec::new();
    let emitted = Emitter::new()
        .run(&mut pool, ByteLimit::Bytes(limit), &mut out)
        .unwrap();
    assert_eq!(emitted, limit, "short stream");
    out
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_unseeded_first_digest() {
    assert_eq!(stream(&[], 32), sha(b""));
}

#[test]
fn test_unseeded_chains_into_second_digest() {
    let out = stream(&[], 33);
    let first = sha(b"");

    assert_eq!(out[..32], first);
    assert_eq!(out[32], sha(&first)[0]);
}

#[test]
fn test_single_seed_is_its_digest() {
    assert_eq!(stream(&["abc"], 32), sha(b"abc"));
}

#[test]
fn test_two_seeds_append_independently() {
    let out = stream(&["a", "b"], 64);

    assert_eq!(out[..32], sha(b"a"));
    assert_eq!(out[32..], sha(b"b"));
}

#[test]
fn test_long_stream_is_deterministic() {
    let first = stream(&["x"], 10_000);
    let second = stream(&["x"], 10_000);

    assert_eq!(first.len(), 10_000);
    assert_eq!(first, second);
}

// ============================================================================
// Stream Properties
// ============================================================================

#[test]
fn test_prefix_is_stable_across_limits() {
    let short = stream(&["prefix"], 100);
    let long = stream(&["prefix"], 5000);
    assert_eq!(short[..], long[..100]);
}

#[test]
fn test_different_seeds_differ_early() {
    let seeds = ["", "a", "b", "ab", "ba", "seed", "Seed", "seed "];
    let streams: Vec<Vec<u8>> = seeds.iter().map(|s| stream(&[*s], DIGEST_LEN as u64)).collect();

    for i in 0..streams.len() {
        for j in (i + 1)..streams.len() {
            assert_ne!(streams[i], streams[j], "seeds {:?} and {:?}", seeds[i], seeds[j]);
        }
    }
}

#[test]
fn test_seed_order_matters() {
    assert_ne!(stream(&["a", "b"], 64), stream(&["b", "a"], 64));
}

#[test]
fn test_empty_seed_matches_unseeded() {
    // Pooling "" and repooling an empty pool append the same digest, and
    // from then on both histories are identical.
    let unseeded = stream(&[], 200);
    let empty_seed = stream(&[""], 200);
    assert_eq!(unseeded, empty_seed);
}

#[test]
fn test_extension_depends_on_history() {
    // After the seed digest is spent, a seeded pool must not replay what a
    // fresh unseeded pool produces.
    let seeded = stream(&["x"], 96);
    let unseeded = stream(&[], 96);

    assert_ne!(seeded[32..64], unseeded[..32]);
    assert_ne!(seeded[32..], unseeded[32..]);
    assert_eq!(seeded[32..64], sha(&sha(b"x")));
}

#[test]
fn test_blake3_stream_is_deterministic() {
    let run = || {
        let mut pool = Pool::new(PoolConfig::with_algorithm(HashAlgorithm::Blake3));
        seed_pool(&mut pool, ["x"]).unwrap();
        let mut out = Vec::new();
        Emitter::new()
            .run(&mut pool, ByteLimit::Bytes(4096), &mut out)
            .unwrap();
        out
    };

    let first = run();
    assert_eq!(first, run());
    assert_eq!(first[..32], HashAlgorithm::Blake3.digest(b"x"));
    assert_ne!(first, stream(&["x"], 4096));
}
