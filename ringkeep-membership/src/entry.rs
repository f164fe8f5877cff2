use ringkeep_net::Endpoint;
use serde::{Deserialize, Serialize};

/// One row of a membership table. `heartbeat` is monotone per originator;
/// `local_timestamp` is the *receiver's* view of when this row was last
/// refreshed, and is what eviction/suspicion windows are measured
/// against.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MemberEntry {
    pub id: u32,
    pub port: u16,
    pub heartbeat: i64,
    pub local_timestamp: i64,
}

impl MemberEntry {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.id, self.port)
    }
}
