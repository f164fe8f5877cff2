// Stable, process-local string hashing for the consistent-hash ring.
//
// Stability across nodes within a single run is required; stability
// across runs is not. std::hash::Hash's DefaultHasher is explicitly
// *not* guaranteed stable even within one build, so rapidhash is used
// instead.

/// Ring size. Kept a power of two.
pub const RING_SIZE: usize = 1 << 10;

fn hash_bytes(bytes: &[u8]) -> usize {
    (rapidhash::rapidhash(bytes) % RING_SIZE as u64) as usize
}

/// Position on the ring of an arbitrary string key.
pub fn hash_key(key: &str) -> usize {
    hash_bytes(key.as_bytes())
}

/// Position on the ring of an endpoint, hashed via its `"id.port"` string
/// form (not its 6-byte binary form — the two hash inputs are deliberately
/// different textual encodings).
pub fn hash_endpoint_string(id_dot_port: &str) -> usize {
    hash_bytes(id_dot_port.as_bytes())
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn stable_within_process() {
        let a = hash_key("foo");
        let b = hash_key("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn in_range() {
        for k in ["a", "b", "c", "some longer key entirely"] {
            assert!(hash_key(k) < RING_SIZE);
        }
    }

    #[test]
    fn endpoint_and_key_hash_differently_in_general() {
        // Not an invariant, just a sanity check that we aren't hashing
        // everything to the same bucket.
        let h1 = hash_endpoint_string("1.0");
        let h2 = hash_endpoint_string("2.0");
        assert_ne!(h1, h2);
    }
}
