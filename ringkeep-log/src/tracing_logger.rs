use crate::Logger;
use ringkeep_net::Endpoint;
use tracing::{info, warn};

/// Production-style sink: forwards every call into `tracing`, the way the
/// rest of this workspace's ambient diagnostics work. Node add/remove and
/// op successes are `info!`; op failures are `warn!`.
#[derive(Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log_node_add(&mut self, observer: Endpoint, added: Endpoint) {
        info!(target: "ringkeep::membership", %observer, %added, "node added");
    }

    fn log_node_remove(&mut self, observer: Endpoint, removed: Endpoint) {
        info!(target: "ringkeep::membership", %observer, %removed, "node removed");
    }

    fn log_create_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        info!(target: "ringkeep::kv", %addr, is_coordinator, trx, key, value, "create success");
    }

    fn log_create_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        warn!(target: "ringkeep::kv", %addr, is_coordinator, trx, key, value, "create fail");
    }

    fn log_read_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        info!(target: "ringkeep::kv", %addr, is_coordinator, trx, key, value, "read success");
    }

    fn log_read_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str) {
        warn!(target: "ringkeep::kv", %addr, is_coordinator, trx, key, "read fail");
    }

    fn log_update_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        info!(target: "ringkeep::kv", %addr, is_coordinator, trx, key, value, "update success");
    }

    fn log_update_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        warn!(target: "ringkeep::kv", %addr, is_coordinator, trx, key, value, "update fail");
    }

    fn log_delete_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str) {
        info!(target: "ringkeep::kv", %addr, is_coordinator, trx, key, "delete success");
    }

    fn log_delete_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str) {
        warn!(target: "ringkeep::kv", %addr, is_coordinator, trx, key, "delete fail");
    }

    fn log(&mut self, addr: Endpoint, message: &str) {
        info!(target: "ringkeep", %addr, message);
    }
}
