use crate::wire::KvMessage;
use ringkeep_log::Logger;
use ringkeep_net::Endpoint;
use ringkeep_store::{InMemoryStore, KvStore, StoredEntry};

/// Replica-side request handling: create, update, read and delete against
/// the local store. Server-side logs always carry `is_coordinator=false`.
pub fn handle_request(
    self_endpoint: Endpoint,
    store: &mut InMemoryStore,
    msg: &KvMessage,
    now: i64,
    logger: &mut dyn Logger,
) -> Option<KvMessage> {
    match msg {
        KvMessage::Create { trx_id, from: _, key, value, role } => {
            let ok = store.create(key, StoredEntry::new(value.clone(), now, *role));
            if ok {
                logger.log_create_success(self_endpoint, false, *trx_id, key, value);
            } else {
                logger.log_create_fail(self_endpoint, false, *trx_id, key, value);
            }
            Some(KvMessage::Reply { trx_id: *trx_id, from: self_endpoint, success: ok })
        }
        KvMessage::Update { trx_id, from: _, key, value, role } => {
            let ok = store.update(key, StoredEntry::new(value.clone(), now, *role));
            if ok {
                logger.log_update_success(self_endpoint, false, *trx_id, key, value);
            } else {
                logger.log_update_fail(self_endpoint, false, *trx_id, key, value);
            }
            Some(KvMessage::Reply { trx_id: *trx_id, from: self_endpoint, success: ok })
        }
        KvMessage::Read { trx_id, from: _, key } => {
            let value = store.read(key).map(|e| e.value.clone());
            match &value {
                Some(v) if !v.is_empty() => logger.log_read_success(self_endpoint, false, *trx_id, key, v),
                _ => logger.log_read_fail(self_endpoint, false, *trx_id, key),
            }
            Some(KvMessage::ReadReply { trx_id: *trx_id, from: self_endpoint, value })
        }
        KvMessage::Delete { trx_id, from: _, key } => {
            let ok = store.delete(key);
            if ok {
                logger.log_delete_success(self_endpoint, false, *trx_id, key);
            } else {
                logger.log_delete_fail(self_endpoint, false, *trx_id, key);
            }
            Some(KvMessage::Reply { trx_id: *trx_id, from: self_endpoint, success: ok })
        }
        KvMessage::Reply { .. } | KvMessage::ReadReply { .. } => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ringkeep_log::{InMemoryLogger, Op, Outcome};
    use ringkeep_store::ReplicaRole;
    use test_log::test;

    fn ep(id: u32) -> Endpoint {
        Endpoint::new(id, 0)
    }

    #[test]
    fn create_then_duplicate_create_fails() {
        let mut store = InMemoryStore::new();
        let mut logger = InMemoryLogger::new();
        let self_ep = ep(1);
        let msg = KvMessage::Create { trx_id: 1, from: ep(2), key: "k".into(), value: "v".into(), role: ReplicaRole::Primary };
        let reply = handle_request(self_ep, &mut store, &msg, 0, &mut logger).unwrap();
        assert_eq!(reply, KvMessage::Reply { trx_id: 1, from: self_ep, success: true });

        let reply2 = handle_request(self_ep, &mut store, &msg, 1, &mut logger).unwrap();
        assert_eq!(reply2, KvMessage::Reply { trx_id: 1, from: self_ep, success: false });
        assert_eq!(logger.count(Op::Create, Outcome::Success, false), 1);
        assert_eq!(logger.count(Op::Create, Outcome::Fail, false), 1);
    }

    #[test]
    fn update_requires_existing_key() {
        let mut store = InMemoryStore::new();
        let mut logger = InMemoryLogger::new();
        let self_ep = ep(1);
        let msg = KvMessage::Update { trx_id: 1, from: ep(2), key: "k".into(), value: "v".into(), role: ReplicaRole::Primary };
        let reply = handle_request(self_ep, &mut store, &msg, 0, &mut logger).unwrap();
        assert_eq!(reply, KvMessage::Reply { trx_id: 1, from: self_ep, success: false });
    }

    #[test]
    fn read_missing_key_reports_empty_value_and_fails() {
        let mut store = InMemoryStore::new();
        let mut logger = InMemoryLogger::new();
        let self_ep = ep(1);
        let msg = KvMessage::Read { trx_id: 1, from: ep(2), key: "k".into() };
        let reply = handle_request(self_ep, &mut store, &msg, 0, &mut logger).unwrap();
        assert_eq!(reply, KvMessage::ReadReply { trx_id: 1, from: self_ep, value: None });
        assert_eq!(logger.count(Op::Read, Outcome::Fail, false), 1);
    }

    #[test]
    fn read_present_key_succeeds() {
        let mut store = InMemoryStore::new();
        let mut logger = InMemoryLogger::new();
        let self_ep = ep(1);
        store.create("k", StoredEntry::new("v", 0, ReplicaRole::Primary));
        let msg = KvMessage::Read { trx_id: 1, from: ep(2), key: "k".into() };
        let reply = handle_request(self_ep, &mut store, &msg, 0, &mut logger).unwrap();
        assert_eq!(reply, KvMessage::ReadReply { trx_id: 1, from: self_ep, value: Some("v".into()) });
        assert_eq!(logger.count(Op::Read, Outcome::Success, false), 1);
    }

    #[test]
    fn delete_reports_presence() {
        let mut store = InMemoryStore::new();
        let mut logger = InMemoryLogger::new();
        let self_ep = ep(1);
        let msg = KvMessage::Delete { trx_id: 1, from: ep(2), key: "k".into() };
        let reply = handle_request(self_ep, &mut store, &msg, 0, &mut logger).unwrap();
        assert_eq!(reply, KvMessage::Reply { trx_id: 1, from: self_ep, success: false });
    }
}
