use ringkeep_net::Endpoint;

/// One element of the consistent-hash ring: an endpoint plus its position.
/// Ordered by `hash_code` first, then by the endpoint's byte form so that
/// two endpoints which happen to collide still sort deterministically.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RingNode {
    pub endpoint: Endpoint,
    pub hash_code: usize,
}

impl RingNode {
    pub fn new(endpoint: Endpoint) -> Self {
        let hash_code = ringkeep_base::hash_endpoint_string(&endpoint.to_hash_string());
        RingNode { endpoint, hash_code }
    }
}

impl Ord for RingNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.hash_code
            .cmp(&other.hash_code)
            .then_with(|| self.endpoint.to_bytes().cmp(&other.endpoint.to_bytes()))
    }
}

impl PartialOrd for RingNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
