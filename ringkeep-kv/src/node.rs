use crate::coordinator::KvCoordinator;
use crate::server;
use crate::stabilization::stabilize;
use crate::wire::KvMessage;
use ringkeep_log::Logger;
use ringkeep_net::{EmulatedNetwork, Endpoint};
use ringkeep_ring::{Neighborhood, Ring};
use ringkeep_store::InMemoryStore;

/// One node's KV-layer state: its view of the ring, its local store, and
/// its coordinator bookkeeping, combined into the per-node object the
/// simulation driver ticks.
pub struct KvNode {
    self_endpoint: Endpoint,
    ring: Ring,
    neighborhood: Option<Neighborhood>,
    store: InMemoryStore,
    coordinator: KvCoordinator,
}

impl KvNode {
    pub fn new(self_endpoint: Endpoint) -> Self {
        KvNode {
            self_endpoint,
            ring: Ring::default(),
            neighborhood: None,
            store: InMemoryStore::new(),
            coordinator: KvCoordinator::new(self_endpoint),
        }
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    /// Rebuild the ring from the current membership snapshot; if the ring
    /// actually changed and the local store is non-empty, repair replica
    /// placement via stabilization before the new neighborhood takes
    /// effect for subsequent client calls.
    pub fn update_ring(
        &mut self,
        members: impl IntoIterator<Item = Endpoint>,
        net: &mut EmulatedNetwork,
        now: i64,
        logger: &mut dyn Logger,
    ) {
        let old_ring = self.ring.clone();
        let old_neighborhood = self.neighborhood;

        let new_ring = Ring::build(members);
        let new_neighborhood = new_ring.neighborhood(self.self_endpoint);

        let ring_changed = new_ring != old_ring;
        if ring_changed && !self.store.is_empty() {
            if let (Some(old_nb), Some(new_nb)) = (old_neighborhood, new_neighborhood) {
                stabilize(
                    self.self_endpoint,
                    &mut self.store,
                    net,
                    now,
                    logger,
                    old_nb.have_replicas_of,
                    old_nb.has_my_replicas,
                    new_nb.have_replicas_of,
                    new_nb.has_my_replicas,
                );
            }
        }

        self.ring = new_ring;
        self.neighborhood = new_neighborhood;
    }

    pub fn client_create(&mut self, net: &mut EmulatedNetwork, now: i64, key: &str, value: &str) -> Option<i64> {
        self.coordinator.client_create(&self.ring, net, now, key, value)
    }

    pub fn client_read(&mut self, net: &mut EmulatedNetwork, now: i64, key: &str) -> Option<i64> {
        self.coordinator.client_read(&self.ring, net, now, key)
    }

    pub fn client_update(&mut self, net: &mut EmulatedNetwork, now: i64, key: &str, value: &str) -> Option<i64> {
        self.coordinator.client_update(&self.ring, net, now, key, value)
    }

    pub fn client_delete(&mut self, net: &mut EmulatedNetwork, now: i64, key: &str) -> Option<i64> {
        self.coordinator.client_delete(&self.ring, net, now, key)
    }

    /// Drains this node's KV inbox and dispatches each message to either
    /// the coordinator (replies) or the server (requests).
    pub fn handle_inbox(&mut self, net: &mut EmulatedNetwork, logger: &mut dyn Logger, now: i64) -> ringkeep_base::Result<()> {
        for (_from, bytes) in net.drain(self.self_endpoint) {
            let msg = KvMessage::decode(&bytes)?;
            match &msg {
                KvMessage::Reply { .. } | KvMessage::ReadReply { .. } => {
                    self.coordinator.handle_reply(&msg, logger);
                }
                _ => {
                    let sender = msg.from();
                    if let Some(reply) = server::handle_request(self.self_endpoint, &mut self.store, &msg, now, logger) {
                        net.send(self.self_endpoint, sender, reply.encode());
                    }
                }
            }
        }
        Ok(())
    }

    /// Expire coordinator transactions past their deadline.
    pub fn expire_timeouts(&mut self, now: i64, logger: &mut dyn Logger) {
        self.coordinator.expire_timeouts(now, logger);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ringkeep_log::InMemoryLogger;
    use test_log::test;

    fn endpoints(n: u32) -> Vec<Endpoint> {
        (0..n).map(|i| Endpoint::new(i + 1, 0)).collect()
    }

    #[test]
    fn quorum_create_on_healthy_ring_succeeds() {
        let mut net = EmulatedNetwork::new();
        let mut logger = InMemoryLogger::new();
        let members = endpoints(5);
        let mut nodes: Vec<KvNode> = members.iter().map(|e| KvNode::new(*e)).collect();
        for node in &mut nodes {
            node.update_ring(members.clone(), &mut net, 0, &mut logger);
        }

        nodes[0].client_create(&mut net, 0, "x", "1");

        // Every node may have received a request in this tick; dispatch
        // server-side handling, then deliver the resulting replies back
        // to the coordinator.
        for node in &mut nodes {
            node.handle_inbox(&mut net, &mut logger, 1).unwrap();
        }
        nodes[0].handle_inbox(&mut net, &mut logger, 1).unwrap();

        assert_eq!(logger.count(ringkeep_log::Op::Create, ringkeep_log::Outcome::Success, true), 1);
    }
}
