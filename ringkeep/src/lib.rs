//! Ties one membership-layer instance and one KV-layer instance together
//! behind the shared per-tick control flow.

use ringkeep_base::Result;
use ringkeep_kv::KvNode;
use ringkeep_log::Logger;
use ringkeep_membership::MlNode;
use ringkeep_net::{Config, EmulatedNetwork, Endpoint};

pub use ringkeep_net::Config as NodeConfig;

/// One simulated peer: its membership view drives its KV ring.
pub struct Node {
    pub endpoint: Endpoint,
    ml: MlNode,
    kv: KvNode,
}

impl Node {
    pub fn new(endpoint: Endpoint, config: Config) -> Self {
        Node {
            endpoint,
            ml: MlNode::new(endpoint, config),
            kv: KvNode::new(endpoint),
        }
    }

    pub fn ml(&self) -> &MlNode {
        &self.ml
    }

    pub fn kv(&self) -> &KvNode {
        &self.kv
    }

    /// Send the bootstrap message (introducer marks itself in-group;
    /// anyone else sends `JOINREQ`). Run once before the first tick.
    pub fn bootstrap(&mut self, ml_net: &mut EmulatedNetwork, logger: &mut dyn Logger) -> Result<()> {
        self.ml.bootstrap(ml_net, logger)
    }

    /// Per-tick, per-node control flow:
    /// (a) drain ML inbox, (b) ML per-tick ops, (c) rebuild the KV ring
    /// (running stabilization if it changed), (d) drain KV inbox,
    /// (e) expire timed-out coordinator transactions.
    ///
    /// `ml_net` and `kv_net` are the node's two separate per-layer queues
    /// (spec.md §2): the membership layer's binary wire and the KV layer's
    /// ASCII wire are never delivered through the same inbox, so draining
    /// one never risks decoding a message meant for the other layer.
    pub fn tick(&mut self, ml_net: &mut EmulatedNetwork, kv_net: &mut EmulatedNetwork, logger: &mut dyn Logger, now: i64) -> Result<()> {
        self.ml.handle_inbox(ml_net, logger, now)?;
        self.ml.tick_ops(ml_net, logger, now)?;
        self.kv.update_ring(self.ml.live_endpoints(), kv_net, now, logger);
        self.kv.handle_inbox(kv_net, logger, now)?;
        self.kv.expire_timeouts(now, logger);
        Ok(())
    }

    pub fn client_create(&mut self, kv_net: &mut EmulatedNetwork, now: i64, key: &str, value: &str) -> Option<i64> {
        self.kv.client_create(kv_net, now, key, value)
    }

    pub fn client_read(&mut self, kv_net: &mut EmulatedNetwork, now: i64, key: &str) -> Option<i64> {
        self.kv.client_read(kv_net, now, key)
    }

    pub fn client_update(&mut self, kv_net: &mut EmulatedNetwork, now: i64, key: &str, value: &str) -> Option<i64> {
        self.kv.client_update(kv_net, now, key, value)
    }

    pub fn client_delete(&mut self, kv_net: &mut EmulatedNetwork, now: i64, key: &str) -> Option<i64> {
        self.kv.client_delete(kv_net, now, key)
    }

    /// Clears membership state and marks the node out of the group.
    /// Models a clean departure; a silently failed node is instead simply
    /// never ticked again.
    pub fn shut_down(&mut self) {
        self.ml.shut_down();
    }
}
