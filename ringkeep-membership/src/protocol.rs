use crate::entry::MemberEntry;
use crate::table::{GossipEffect, MembershipTable};
use crate::wire::MlMessage;
use rand::Rng;
use ringkeep_base::Result;
use ringkeep_log::Logger;
use ringkeep_net::{Config, EmulatedNetwork, Endpoint};

/// One node's membership-layer state: its table, whether it has completed
/// bootstrap, and its own advertised heartbeat.
#[derive(Clone, Debug)]
pub struct MlNode {
    pub self_endpoint: Endpoint,
    config: Config,
    table: MembershipTable,
    in_group: bool,
    heartbeat: i64,
}

impl MlNode {
    pub fn new(self_endpoint: Endpoint, config: Config) -> Self {
        MlNode {
            self_endpoint,
            config,
            table: MembershipTable::new(),
            in_group: false,
            heartbeat: 0,
        }
    }

    pub fn in_group(&self) -> bool {
        self.in_group
    }

    pub fn table(&self) -> &MembershipTable {
        &self.table
    }

    pub fn live_endpoints(&self) -> impl Iterator<Item = Endpoint> + '_ {
        self.table.endpoints()
    }

    /// Bootstrapping: the introducer marks itself in-group and logs its
    /// own addition; any other node sends a `JoinReq` and waits.
    pub fn bootstrap(&mut self, net: &mut EmulatedNetwork, logger: &mut dyn Logger) -> Result<()> {
        if self.self_endpoint == self.config.introducer {
            self.in_group = true;
            logger.log_node_add(self.self_endpoint, self.self_endpoint);
        } else {
            let msg = MlMessage::JoinReq {
                sender: self.self_endpoint,
                heartbeat: self.heartbeat,
            };
            net.send(self.self_endpoint, self.config.introducer, msg.encode()?);
        }
        Ok(())
    }

    /// Drain and handle every ML message queued for this node this tick.
    pub fn handle_inbox(&mut self, net: &mut EmulatedNetwork, logger: &mut dyn Logger, now: i64) -> Result<()> {
        for (_from, bytes) in net.drain(self.self_endpoint) {
            let msg = MlMessage::decode(&bytes)?;
            self.handle_message(msg, net, logger, now)?;
        }
        Ok(())
    }

    fn handle_message(
        &mut self,
        msg: MlMessage,
        net: &mut EmulatedNetwork,
        logger: &mut dyn Logger,
        now: i64,
    ) -> Result<()> {
        match msg {
            MlMessage::JoinReq { sender, heartbeat } => {
                let reply = MlMessage::JoinRep {
                    sender: self.self_endpoint,
                    table: self.table.entries().to_vec(),
                };
                net.send(self.self_endpoint, sender, reply.encode()?);

                let inserted = self.table.insert_or_refresh(MemberEntry {
                    id: sender.id,
                    port: sender.port,
                    heartbeat,
                    local_timestamp: now,
                });
                if inserted {
                    logger.log_node_add(self.self_endpoint, sender);
                }
            }
            MlMessage::JoinRep { table, .. } => {
                self.table.replace_all(table);
                self.in_group = true;
                for e in self.table.entries().to_vec() {
                    logger.log_node_add(self.self_endpoint, e.endpoint());
                }
            }
            MlMessage::Gossip { table, .. } => {
                for incoming in table {
                    let effect = self.table.apply_gossip_entry(
                        incoming,
                        now,
                        self.self_endpoint.id,
                        self.config.suspicion_window(),
                    );
                    if effect == GossipEffect::Inserted {
                        logger.log_node_add(self.self_endpoint, incoming.endpoint());
                    }
                }
            }
        }
        Ok(())
    }

    /// Per-tick operations: evict timed-out peers (logging removal), bump
    /// this node's own heartbeat and re-advertise it, then gossip the
    /// full table to one random peer.
    pub fn tick_ops(&mut self, net: &mut EmulatedNetwork, logger: &mut dyn Logger, now: i64) -> Result<()> {
        if !self.in_group {
            return Ok(());
        }

        self.heartbeat += 1;
        let evicted = self.table.tick_refresh(
            self.self_endpoint.id,
            self.self_endpoint.port,
            now,
            self.config.eviction_window(),
            self.heartbeat,
        );
        for e in evicted {
            logger.log_node_remove(self.self_endpoint, e.endpoint());
        }

        self.gossip_to_random_peer(net)?;
        Ok(())
    }

    fn gossip_to_random_peer(&mut self, net: &mut EmulatedNetwork) -> Result<()> {
        // Only peers, never ourselves: tick_refresh always re-inserts our
        // own row, so exclude it explicitly rather than relying on it
        // being absent.
        let peers: Vec<Endpoint> = self
            .table
            .entries()
            .iter()
            .filter(|e| e.id != self.self_endpoint.id)
            .map(|e| e.endpoint())
            .collect();
        if peers.is_empty() {
            return Ok(());
        }
        let target = peers[rand::thread_rng().gen_range(0..peers.len())];
        let msg = MlMessage::Gossip {
            sender: self.self_endpoint,
            table: self.table.entries().to_vec(),
        };
        net.send(self.self_endpoint, target, msg.encode()?);
        Ok(())
    }

    /// Clear the table, mark not-in-group, and release local state.
    /// Models a clean departure, distinct from silent failure (which a
    /// test simply stops ticking instead).
    pub fn shut_down(&mut self) {
        self.table = MembershipTable::new();
        self.in_group = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ringkeep_log::InMemoryLogger;
    use test_log::test;

    fn config() -> Config {
        Config::new(10)
    }

    #[test]
    fn solo_introducer_logs_itself_and_has_only_itself() {
        let mut net = EmulatedNetwork::new();
        let mut logger = InMemoryLogger::new();
        let introducer = config().introducer;
        let mut node = MlNode::new(introducer, config());
        node.bootstrap(&mut net, &mut logger).unwrap();
        node.tick_ops(&mut net, &mut logger, 1).unwrap();

        assert!(node.in_group());
        assert_eq!(node.table().len(), 1);
        assert!(logger.node_adds().any(|(o, a)| o == introducer && a == introducer));
    }

    #[test]
    fn join_of_one_peer_converges_within_two_ticks() {
        let mut net = EmulatedNetwork::new();
        let mut logger = InMemoryLogger::new();
        let cfg = config();
        let a = cfg.introducer;
        let b = Endpoint::new(2, 0);

        let mut node_a = MlNode::new(a, cfg);
        let mut node_b = MlNode::new(b, cfg);

        node_a.bootstrap(&mut net, &mut logger).unwrap();
        node_b.bootstrap(&mut net, &mut logger).unwrap();

        // Tick 1: A processes the JOINREQ and replies; B is still waiting.
        node_a.handle_inbox(&mut net, &mut logger, 1).unwrap();
        node_a.tick_ops(&mut net, &mut logger, 1).unwrap();
        node_b.handle_inbox(&mut net, &mut logger, 1).unwrap();

        // Tick 2: B processes the JOINREP.
        node_b.handle_inbox(&mut net, &mut logger, 2).unwrap();

        assert!(node_b.in_group());
        assert_eq!(node_b.table().len(), 2);
        assert!(node_a.table().len() >= 1);
    }

    #[test]
    fn self_is_never_evicted_across_many_ticks() {
        let mut net = EmulatedNetwork::new();
        let mut logger = InMemoryLogger::new();
        let cfg = config();
        let mut node = MlNode::new(cfg.introducer, cfg);
        node.bootstrap(&mut net, &mut logger).unwrap();
        for t in 1..1000 {
            node.tick_ops(&mut net, &mut logger, t).unwrap();
        }
        assert!(!logger
            .node_removes()
            .any(|(_, removed)| removed == cfg.introducer));
        assert!(node.table().find_by_id(cfg.introducer.id).is_some());
    }

    #[test]
    fn heartbeat_is_monotone_non_decreasing() {
        let mut net = EmulatedNetwork::new();
        let mut logger = InMemoryLogger::new();
        let cfg = config();
        let mut node = MlNode::new(cfg.introducer, cfg);
        node.bootstrap(&mut net, &mut logger).unwrap();
        let mut last = -1;
        for t in 1..20 {
            node.tick_ops(&mut net, &mut logger, t).unwrap();
            let hb = node.table().find_by_id(cfg.introducer.id).unwrap().heartbeat;
            assert!(hb >= last);
            last = hb;
        }
    }

    #[test]
    fn shut_down_clears_state() {
        let mut net = EmulatedNetwork::new();
        let mut logger = InMemoryLogger::new();
        let cfg = config();
        let mut node = MlNode::new(cfg.introducer, cfg);
        node.bootstrap(&mut net, &mut logger).unwrap();
        node.tick_ops(&mut net, &mut logger, 1).unwrap();
        assert!(!node.table().is_empty());
        node.shut_down();
        assert!(node.table().is_empty());
        assert!(!node.in_group());
    }
}
