use crate::Endpoint;
use ringkeep_base::RING_SIZE;

/// Run-wide parameters threaded through every node. Plain data: no
/// CLI-parsing crate is warranted for a handful of fields — a `Config`
/// is just constructed by the simulation driver or by a test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Gossip group size parameter. Drives the suspicion window
    /// (`2*en_gpsz`) and the eviction window (`2*en_gpsz + 10`).
    pub en_gpsz: i64,
    pub ring_size: usize,
    pub introducer: Endpoint,
}

impl Config {
    pub fn new(en_gpsz: i64) -> Self {
        Config {
            en_gpsz,
            ring_size: RING_SIZE,
            introducer: Endpoint::new(1, 0),
        }
    }

    /// A peer is *suspected* once `now - local_timestamp` exceeds this.
    pub fn suspicion_window(&self) -> i64 {
        2 * self.en_gpsz
    }

    /// A peer is *evicted* once `now - local_timestamp` exceeds this.
    pub fn eviction_window(&self) -> i64 {
        2 * self.en_gpsz + 10
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(10)
    }
}
