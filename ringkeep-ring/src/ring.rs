use crate::node::RingNode;
use ringkeep_net::Endpoint;

/// Sorted projection of the live membership set by hash position,
/// rebuilt fresh every KV tick from the membership-layer snapshot.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Ring(Vec<RingNode>);

/// The two ordered lists capturing replication responsibility: the two
/// successors that hold this node's primaries as secondary/tertiary, and
/// the two predecessors whose primaries this node holds as
/// secondary/tertiary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Neighborhood {
    pub has_my_replicas: [RingNode; 2],
    pub have_replicas_of: [RingNode; 2],
}

impl Ring {
    pub fn build(members: impl IntoIterator<Item = Endpoint>) -> Ring {
        let mut v: Vec<RingNode> = members.into_iter().map(RingNode::new).collect();
        v.sort();
        Ring(v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn nodes(&self) -> &[RingNode] {
        &self.0
    }

    pub fn position_of(&self, endpoint: Endpoint) -> Option<usize> {
        self.0.iter().position(|n| n.endpoint == endpoint)
    }

    /// The primary/secondary/tertiary replicas of `key`, in that order.
    /// Empty if the ring has fewer than 3 members — the caller then treats
    /// this tick as a no-op: no quorum is possible.
    pub fn find_replicas(&self, key: &str) -> Vec<RingNode> {
        let n = self.0.len();
        if n < 3 {
            return Vec::new();
        }
        let pos = ringkeep_base::hash_key(key);
        let first = self.0[0].hash_code;
        let last = self.0[n - 1].hash_code;
        let idx = if pos <= first || pos > last {
            0
        } else {
            let mut found = 0;
            for i in 1..n {
                if pos <= self.0[i].hash_code {
                    found = i;
                    break;
                }
            }
            found
        };
        vec![self.0[idx], self.0[(idx + 1) % n], self.0[(idx + 2) % n]]
    }

    /// Recompute `me`'s neighborhood within this ring. `None` if `me` is
    /// not (yet) a member of this ring, or the ring is empty.
    pub fn neighborhood(&self, me: Endpoint) -> Option<Neighborhood> {
        let n = self.0.len();
        if n == 0 {
            return None;
        }
        let i = self.position_of(me)?;
        let succ = |k: usize| self.0[(i + k) % n];
        let pred = |k: usize| self.0[(i + n - k) % n];
        Some(Neighborhood {
            has_my_replicas: [succ(1), succ(2)],
            have_replicas_of: [pred(2), pred(1)],
        })
    }
}
