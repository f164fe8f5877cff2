use crate::Endpoint;
use std::collections::{HashMap, VecDeque};

/// Hook for tests that want to inject loss or duplication without modeling
/// a full network stack. The default `Reliable` policy never drops or
/// duplicates; most scenarios instead model node failure as simply no
/// longer ticking a node, rather than as message loss.
pub trait FaultPolicy {
    /// Called once per `send`. Returning `true` drops the message.
    fn should_drop(&mut self, from: Endpoint, to: Endpoint) -> bool {
        let _ = (from, to);
        false
    }

    /// Called once per `send`. Returning `true` delivers the message
    /// twice.
    fn should_duplicate(&mut self, from: Endpoint, to: Endpoint) -> bool {
        let _ = (from, to);
        false
    }
}

#[derive(Default)]
pub struct Reliable;
impl FaultPolicy for Reliable {}

/// The emulated network: `send` is best-effort fire-and-forget, and
/// `recv`/`drain` is pull-based — the core hands a queue, the emulator
/// appends to it. One `VecDeque` per destination preserves push order for
/// that destination only; the core must not assume any ordering across
/// distinct senders.
pub struct EmulatedNetwork<F: FaultPolicy = Reliable> {
    inboxes: HashMap<Endpoint, VecDeque<(Endpoint, Vec<u8>)>>,
    faults: F,
}

impl EmulatedNetwork<Reliable> {
    pub fn new() -> Self {
        EmulatedNetwork {
            inboxes: HashMap::new(),
            faults: Reliable,
        }
    }
}

impl Default for EmulatedNetwork<Reliable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FaultPolicy> EmulatedNetwork<F> {
    pub fn with_faults(faults: F) -> Self {
        EmulatedNetwork {
            inboxes: HashMap::new(),
            faults,
        }
    }

    /// Best-effort send: the emulator may drop or duplicate per its fault
    /// policy, but never blocks and never errors — there is no delivery
    /// receipt in this contract.
    pub fn send(&mut self, from: Endpoint, to: Endpoint, bytes: Vec<u8>) {
        if self.faults.should_drop(from, to) {
            return;
        }
        let dup = self.faults.should_duplicate(from, to);
        let inbox = self.inboxes.entry(to).or_default();
        inbox.push_back((from, bytes.clone()));
        if dup {
            inbox.push_back((from, bytes));
        }
    }

    /// Pull-based receive: drains and returns everything queued for `who`
    /// since the last drain. Called once per tick per node per layer by
    /// the simulation driver.
    pub fn drain(&mut self, who: Endpoint) -> Vec<(Endpoint, Vec<u8>)> {
        match self.inboxes.get_mut(&who) {
            Some(q) => q.drain(..).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn drain_returns_push_order_per_destination() {
        let mut net = EmulatedNetwork::new();
        let a = Endpoint::new(1, 0);
        let b = Endpoint::new(2, 0);
        net.send(a, b, vec![1]);
        net.send(a, b, vec![2]);
        let got = net.drain(b);
        assert_eq!(got, vec![(a, vec![1]), (a, vec![2])]);
        assert!(net.drain(b).is_empty());
    }

    struct DropAll;
    impl FaultPolicy for DropAll {
        fn should_drop(&mut self, _from: Endpoint, _to: Endpoint) -> bool {
            true
        }
    }

    #[test]
    fn fault_policy_can_drop() {
        let mut net = EmulatedNetwork::with_faults(DropAll);
        let a = Endpoint::new(1, 0);
        let b = Endpoint::new(2, 0);
        net.send(a, b, vec![1]);
        assert!(net.drain(b).is_empty());
    }
}
