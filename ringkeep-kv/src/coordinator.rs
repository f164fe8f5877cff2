use crate::transaction::{KvOpKind, ReplyRecord, Transaction};
use crate::wire::KvMessage;
use ringkeep_log::Logger;
use ringkeep_net::{EmulatedNetwork, Endpoint};
use ringkeep_ring::Ring;
use ringkeep_store::ReplicaRole;
use std::collections::BTreeMap;

const TRANSACTION_TIMEOUT: i64 = 10;

/// Client-side bookkeeping for CREATE/READ/UPDATE/DELETE calls issued at
/// this node: one `Transaction` table keyed by transaction id, replacing
/// the three parallel maps a naive port of this protocol would carry.
#[derive(Debug)]
pub struct KvCoordinator {
    self_endpoint: Endpoint,
    next_trx_id: i64,
    outstanding: BTreeMap<i64, Transaction>,
}

impl KvCoordinator {
    pub fn new(self_endpoint: Endpoint) -> Self {
        KvCoordinator {
            self_endpoint,
            next_trx_id: 1,
            outstanding: BTreeMap::new(),
        }
    }

    fn self_endpoint(&self) -> Endpoint {
        self.self_endpoint
    }

    fn next_trx(&mut self) -> i64 {
        let id = self.next_trx_id;
        self.next_trx_id += 1;
        id
    }

    /// Emits the three replica messages for a call, or does nothing if the
    /// ring is too small for a quorum ("no ring yet").
    fn issue(
        &mut self,
        ring: &Ring,
        net: &mut EmulatedNetwork,
        now: i64,
        op: KvOpKind,
        key: &str,
        value: Option<String>,
    ) -> Option<i64> {
        let replicas = ring.find_replicas(key);
        if replicas.len() < 3 {
            return None;
        }
        let trx_id = self.next_trx();
        let from = self.self_endpoint();

        let roles = [ReplicaRole::Primary, ReplicaRole::Secondary, ReplicaRole::Tertiary];
        for (node, role) in replicas.iter().zip(roles) {
            let msg = match op {
                KvOpKind::Create => KvMessage::Create {
                    trx_id,
                    from,
                    key: key.to_string(),
                    value: value.clone().unwrap_or_default(),
                    role,
                },
                KvOpKind::Update => KvMessage::Update {
                    trx_id,
                    from,
                    key: key.to_string(),
                    value: value.clone().unwrap_or_default(),
                    role,
                },
                KvOpKind::Read => KvMessage::Read { trx_id, from, key: key.to_string() },
                KvOpKind::Delete => KvMessage::Delete { trx_id, from, key: key.to_string() },
            };
            net.send(from, node.endpoint, msg.encode());
        }

        self.outstanding.insert(trx_id, Transaction::new(trx_id, op, key, value, now));
        Some(trx_id)
    }

    pub fn client_create(&mut self, ring: &Ring, net: &mut EmulatedNetwork, now: i64, key: &str, value: &str) -> Option<i64> {
        self.issue(ring, net, now, KvOpKind::Create, key, Some(value.to_string()))
    }

    pub fn client_read(&mut self, ring: &Ring, net: &mut EmulatedNetwork, now: i64, key: &str) -> Option<i64> {
        self.issue(ring, net, now, KvOpKind::Read, key, None)
    }

    pub fn client_update(&mut self, ring: &Ring, net: &mut EmulatedNetwork, now: i64, key: &str, value: &str) -> Option<i64> {
        self.issue(ring, net, now, KvOpKind::Update, key, Some(value.to_string()))
    }

    pub fn client_delete(&mut self, ring: &Ring, net: &mut EmulatedNetwork, now: i64, key: &str) -> Option<i64> {
        self.issue(ring, net, now, KvOpKind::Delete, key, None)
    }

    /// Handles one reply addressed to the coordinator. Stabilization
    /// messages always carry `trx_id == 0` and are silently ignored here,
    /// since they never appear in `outstanding`.
    pub fn handle_reply(&mut self, msg: &KvMessage, logger: &mut dyn Logger) {
        let trx_id = msg.trx_id();
        let record = match msg {
            KvMessage::Reply { success, .. } => ReplyRecord::Success(*success),
            KvMessage::ReadReply { value, .. } => ReplyRecord::Value(value.clone()),
            _ => return,
        };

        let Some(txn) = self.outstanding.get_mut(&trx_id) else {
            return;
        };
        txn.replies.push(record);

        if txn.has_quorum_replies() {
            let txn = self.outstanding.remove(&trx_id).expect("just looked up");
            self.log_outcome(&txn, logger);
        }
    }

    fn log_outcome(&self, txn: &Transaction, logger: &mut dyn Logger) {
        let addr = self.self_endpoint();
        match txn.op {
            KvOpKind::Read => {
                let value = txn.last_read_value().unwrap_or_default();
                logger.log_read_success(addr, true, txn.trx_id, &txn.key, value);
            }
            KvOpKind::Create | KvOpKind::Update | KvOpKind::Delete => {
                let ok = txn.success_count() >= 2;
                let value = txn.value.clone().unwrap_or_default();
                match (txn.op, ok) {
                    (KvOpKind::Create, true) => logger.log_create_success(addr, true, txn.trx_id, &txn.key, &value),
                    (KvOpKind::Create, false) => logger.log_create_fail(addr, true, txn.trx_id, &txn.key, &value),
                    (KvOpKind::Update, true) => logger.log_update_success(addr, true, txn.trx_id, &txn.key, &value),
                    (KvOpKind::Update, false) => logger.log_update_fail(addr, true, txn.trx_id, &txn.key, &value),
                    (KvOpKind::Delete, true) => logger.log_delete_success(addr, true, txn.trx_id, &txn.key),
                    (KvOpKind::Delete, false) => logger.log_delete_fail(addr, true, txn.trx_id, &txn.key),
                    (KvOpKind::Read, _) => unreachable!("handled above"),
                }
            }
        }
    }

    /// Per-tick timeout sweep: any transaction older than
    /// `TRANSACTION_TIMEOUT` ticks is logged as a failure and closed.
    pub fn expire_timeouts(&mut self, now: i64, logger: &mut dyn Logger) {
        let addr = self.self_endpoint();
        let expired: Vec<i64> = self
            .outstanding
            .iter()
            .filter(|(_, t)| now - t.issued_at > TRANSACTION_TIMEOUT)
            .map(|(id, _)| *id)
            .collect();

        for trx_id in expired {
            let txn = self.outstanding.remove(&trx_id).expect("just looked up");
            let value = txn.value.clone().unwrap_or_default();
            match txn.op {
                KvOpKind::Create => logger.log_create_fail(addr, true, trx_id, &txn.key, &value),
                KvOpKind::Update => logger.log_update_fail(addr, true, trx_id, &txn.key, &value),
                KvOpKind::Delete => logger.log_delete_fail(addr, true, trx_id, &txn.key),
                KvOpKind::Read => logger.log_read_fail(addr, true, trx_id, &txn.key),
            }
        }
    }

    pub fn outstanding_count(&self) -> usize {
        self.outstanding.len()
    }
}
