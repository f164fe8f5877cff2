use ringkeep_net::Endpoint;

/// The logging interface the core calls into but never implements itself.
/// The membership layer calls `log_node_add` / `log_node_remove`; the KV
/// layer calls the eight `log_{op}_{outcome}` methods plus freeform `log`.
pub trait Logger {
    fn log_node_add(&mut self, observer: Endpoint, added: Endpoint);
    fn log_node_remove(&mut self, observer: Endpoint, removed: Endpoint);

    fn log_create_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str);
    fn log_create_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str);

    fn log_read_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str);
    fn log_read_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str);

    fn log_update_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str);
    fn log_update_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str);

    fn log_delete_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str);
    fn log_delete_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str);

    fn log(&mut self, addr: Endpoint, message: &str);
}
