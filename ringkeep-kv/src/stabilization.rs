use crate::wire::KvMessage;
use ringkeep_log::Logger;
use ringkeep_net::{EmulatedNetwork, Endpoint};
use ringkeep_ring::RingNode;
use ringkeep_store::{InMemoryStore, KvStore, ReplicaRole, StoredEntry};

/// Repairs replica placement after a ring change. All stabilization
/// messages carry `trx_id = 0`; the coordinator ignores replies to them
/// since they never appear in its outstanding-transaction table.
#[allow(clippy::too_many_arguments)]
pub fn stabilize(
    self_endpoint: Endpoint,
    store: &mut InMemoryStore,
    net: &mut EmulatedNetwork,
    now: i64,
    logger: &mut dyn Logger,
    old_pre: [RingNode; 2],
    old_post: [RingNode; 2],
    new_pre: [RingNode; 2],
    new_post: [RingNode; 2],
) {
    let [old_pre1, old_pre2] = old_pre;
    let [old_post1, old_post2] = old_post;
    let [pre1, pre2] = new_pre;
    let [post1, post2] = new_post;

    predecessor_repair(self_endpoint, store, net, now, logger, old_pre1, old_pre2, pre1, pre2);
    successor_repair(self_endpoint, &*store, net, old_post1, old_post2, post1, post2);
}

fn send_create(net: &mut EmulatedNetwork, self_endpoint: Endpoint, to: Endpoint, key: &str, value: &str, role: ReplicaRole) {
    let msg = KvMessage::Create { trx_id: 0, from: self_endpoint, key: key.to_string(), value: value.to_string(), role };
    net.send(self_endpoint, to, msg.encode());
}

fn send_update(net: &mut EmulatedNetwork, self_endpoint: Endpoint, to: Endpoint, key: &str, value: &str, role: ReplicaRole) {
    let msg = KvMessage::Update { trx_id: 0, from: self_endpoint, key: key.to_string(), value: value.to_string(), role };
    net.send(self_endpoint, to, msg.encode());
}

/// Promotes one locally held entry to `Primary` in the store before it is
/// re-replicated, logging the update the same way a client-issued UPDATE
/// would. The key is already present (it was just read out of the store
/// by role), so this only fails if it was concurrently removed.
fn promote_to_primary(
    self_endpoint: Endpoint,
    store: &mut InMemoryStore,
    logger: &mut dyn Logger,
    now: i64,
    key: &str,
    value: &str,
) {
    let ok = store.update(key, StoredEntry::new(value.to_string(), now, ReplicaRole::Primary));
    if ok {
        logger.log_update_success(self_endpoint, false, 0, key, value);
    } else {
        logger.log_update_fail(self_endpoint, false, 0, key, value);
    }
}

/// The local node may now own keys it previously held only as secondary or
/// tertiary, if one or both predecessors changed.
#[allow(clippy::too_many_arguments)]
fn predecessor_repair(
    self_endpoint: Endpoint,
    store: &mut InMemoryStore,
    net: &mut EmulatedNetwork,
    now: i64,
    logger: &mut dyn Logger,
    old_pre1: RingNode,
    old_pre2: RingNode,
    pre1: RingNode,
    pre2: RingNode,
) {
    if pre2.endpoint == old_pre1.endpoint && pre2.endpoint != old_pre2.endpoint {
        // Exactly old_pre2 failed: every locally held Secondary is now our
        // Primary; promote it locally, then re-replicate it to the
        // (unchanged) pre1 and the new pre2.
        for (key, entry) in store.entries_with_role(ReplicaRole::Secondary) {
            promote_to_primary(self_endpoint, store, logger, now, &key, &entry.value);
            send_update(net, self_endpoint, pre1.endpoint, &key, &entry.value, ReplicaRole::Secondary);
            send_create(net, self_endpoint, pre2.endpoint, &key, &entry.value, ReplicaRole::Tertiary);
        }
    } else if pre1.endpoint != old_pre1.endpoint && pre2.endpoint != old_pre2.endpoint {
        // Both predecessors changed: every Secondary and Tertiary we hold
        // becomes our Primary and must be promoted locally, then pushed
        // out fresh.
        for (key, entry) in store.entries_with_role(ReplicaRole::Secondary) {
            promote_to_primary(self_endpoint, store, logger, now, &key, &entry.value);
            send_update(net, self_endpoint, pre1.endpoint, &key, &entry.value, ReplicaRole::Secondary);
            send_create(net, self_endpoint, pre2.endpoint, &key, &entry.value, ReplicaRole::Tertiary);
        }
        for (key, entry) in store.entries_with_role(ReplicaRole::Tertiary) {
            promote_to_primary(self_endpoint, store, logger, now, &key, &entry.value);
            send_create(net, self_endpoint, pre1.endpoint, &key, &entry.value, ReplicaRole::Secondary);
            send_create(net, self_endpoint, pre2.endpoint, &key, &entry.value, ReplicaRole::Tertiary);
        }
    } else if pre1.endpoint != old_pre1.endpoint && pre2.endpoint == old_pre2.endpoint {
        // Single-predecessor-failure at the far slot: old_pre1 is gone and
        // pre2 is unchanged. Repaired symmetrically to the single-far-
        // neighbor successor case so replica counts are restored here too.
        for (key, entry) in store.entries_with_role(ReplicaRole::Tertiary) {
            promote_to_primary(self_endpoint, store, logger, now, &key, &entry.value);
            send_update(net, self_endpoint, pre1.endpoint, &key, &entry.value, ReplicaRole::Secondary);
            send_create(net, self_endpoint, pre2.endpoint, &key, &entry.value, ReplicaRole::Tertiary);
        }
    }
}

/// Local primaries must be re-propagated to whichever successors changed.
fn successor_repair(
    self_endpoint: Endpoint,
    store: &InMemoryStore,
    net: &mut EmulatedNetwork,
    old_post1: RingNode,
    old_post2: RingNode,
    post1: RingNode,
    post2: RingNode,
) {
    let primaries = store.entries_with_role(ReplicaRole::Primary);

    if post2.endpoint != old_post2.endpoint && post1.endpoint == old_post1.endpoint {
        for (key, entry) in &primaries {
            send_create(net, self_endpoint, post2.endpoint, key, &entry.value, ReplicaRole::Tertiary);
        }
    } else if post1.endpoint != old_post1.endpoint && post1.endpoint == old_post2.endpoint {
        for (key, entry) in &primaries {
            send_update(net, self_endpoint, post1.endpoint, key, &entry.value, ReplicaRole::Secondary);
            send_create(net, self_endpoint, post2.endpoint, key, &entry.value, ReplicaRole::Tertiary);
        }
    } else if post1.endpoint != old_post1.endpoint && post2.endpoint != old_post2.endpoint {
        for (key, entry) in &primaries {
            send_create(net, self_endpoint, post1.endpoint, key, &entry.value, ReplicaRole::Secondary);
            send_create(net, self_endpoint, post2.endpoint, key, &entry.value, ReplicaRole::Tertiary);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ringkeep_log::InMemoryLogger;
    use ringkeep_store::StoredEntry;
    use test_log::test;

    fn node(id: u32) -> RingNode {
        RingNode::new(Endpoint::new(id, 0))
    }

    fn self_ep() -> Endpoint {
        Endpoint::new(100, 0)
    }

    fn decode_all(net: &mut EmulatedNetwork, to: Endpoint) -> Vec<KvMessage> {
        net.drain(to).into_iter().map(|(_, bytes)| KvMessage::decode(&bytes).unwrap()).collect()
    }

    #[test]
    fn predecessor_single_failure_promotes_secondary_to_primary() {
        let mut store = InMemoryStore::new();
        store.create("k", StoredEntry::new("v", 0, ReplicaRole::Secondary));
        let mut net = EmulatedNetwork::new();
        let mut logger = InMemoryLogger::new();

        let old_pre1 = node(1);
        let old_pre2 = node(2);
        let new_pre1 = node(1);
        let new_pre2 = node(3);

        predecessor_repair(self_ep(), &mut store, &mut net, 5, &mut logger, old_pre1, old_pre2, new_pre1, new_pre2);

        assert_eq!(store.read("k").unwrap().role, ReplicaRole::Primary);
        assert_eq!(
            logger.count(ringkeep_log::Op::Update, ringkeep_log::Outcome::Success, false),
            1
        );

        let to_pre1 = decode_all(&mut net, new_pre1.endpoint);
        assert_eq!(to_pre1, vec![KvMessage::Update { trx_id: 0, from: self_ep(), key: "k".into(), value: "v".into(), role: ReplicaRole::Secondary }]);

        let to_pre2 = decode_all(&mut net, new_pre2.endpoint);
        assert_eq!(to_pre2, vec![KvMessage::Create { trx_id: 0, from: self_ep(), key: "k".into(), value: "v".into(), role: ReplicaRole::Tertiary }]);
    }

    #[test]
    fn predecessor_near_failure_is_repaired_symmetrically() {
        let mut store = InMemoryStore::new();
        store.create("k", StoredEntry::new("v", 0, ReplicaRole::Tertiary));
        let mut net = EmulatedNetwork::new();
        let mut logger = InMemoryLogger::new();

        let old_pre1 = node(1);
        let old_pre2 = node(2);
        let new_pre1 = node(3);
        let new_pre2 = node(2);

        predecessor_repair(self_ep(), &mut store, &mut net, 5, &mut logger, old_pre1, old_pre2, new_pre1, new_pre2);

        assert_eq!(store.read("k").unwrap().role, ReplicaRole::Primary);
        assert!(!decode_all(&mut net, new_pre1.endpoint).is_empty());
        assert!(!decode_all(&mut net, new_pre2.endpoint).is_empty());
    }

    #[test]
    fn successor_tertiary_only_change_sends_single_create() {
        let mut store = InMemoryStore::new();
        store.create("k", StoredEntry::new("v", 0, ReplicaRole::Primary));
        let mut net = EmulatedNetwork::new();

        let old_post1 = node(1);
        let old_post2 = node(2);
        let new_post1 = node(1);
        let new_post2 = node(3);

        successor_repair(self_ep(), &store, &mut net, old_post1, old_post2, new_post1, new_post2);

        assert!(decode_all(&mut net, new_post1.endpoint).is_empty());
        assert_eq!(
            decode_all(&mut net, new_post2.endpoint),
            vec![KvMessage::Create { trx_id: 0, from: self_ep(), key: "k".into(), value: "v".into(), role: ReplicaRole::Tertiary }]
        );
    }

    #[test]
    fn successor_both_changed_sends_create_to_both() {
        let mut store = InMemoryStore::new();
        store.create("k", StoredEntry::new("v", 0, ReplicaRole::Primary));
        let mut net = EmulatedNetwork::new();

        let old_post1 = node(1);
        let old_post2 = node(2);
        let new_post1 = node(3);
        let new_post2 = node(4);

        successor_repair(self_ep(), &store, &mut net, old_post1, old_post2, new_post1, new_post2);

        assert_eq!(
            decode_all(&mut net, new_post1.endpoint),
            vec![KvMessage::Create { trx_id: 0, from: self_ep(), key: "k".into(), value: "v".into(), role: ReplicaRole::Secondary }]
        );
        assert_eq!(
            decode_all(&mut net, new_post2.endpoint),
            vec![KvMessage::Create { trx_id: 0, from: self_ep(), key: "k".into(), value: "v".into(), role: ReplicaRole::Tertiary }]
        );
    }
}
