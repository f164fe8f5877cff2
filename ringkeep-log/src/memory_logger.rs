use crate::event::{LogEvent, Op, Outcome};
use crate::Logger;
use ringkeep_net::Endpoint;

/// A test-harness sink: every call is appended to a `Vec<LogEvent>` rather
/// than forwarded anywhere, with query helpers over it for assertions.
#[derive(Default)]
pub struct InMemoryLogger {
    events: Vec<LogEvent>,
}

impl InMemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn node_adds(&self) -> impl Iterator<Item = (Endpoint, Endpoint)> + '_ {
        self.events.iter().filter_map(|e| match e {
            LogEvent::NodeAdd { observer, added } => Some((*observer, *added)),
            _ => None,
        })
    }

    pub fn node_removes(&self) -> impl Iterator<Item = (Endpoint, Endpoint)> + '_ {
        self.events.iter().filter_map(|e| match e {
            LogEvent::NodeRemove { observer, removed } => Some((*observer, *removed)),
            _ => None,
        })
    }

    pub fn has_node_remove(&self, observer: Endpoint, removed: Endpoint) -> bool {
        self.node_removes().any(|(o, r)| o == observer && r == removed)
    }

    pub fn op_results(&self) -> impl Iterator<Item = (Endpoint, bool, i64, Op, Outcome, &str, Option<&str>)> + '_ {
        self.events.iter().filter_map(|e| match e {
            LogEvent::OpResult {
                addr,
                is_coordinator,
                trx,
                op,
                outcome,
                key,
                value,
            } => Some((
                *addr,
                *is_coordinator,
                *trx,
                *op,
                *outcome,
                key.as_str(),
                value.as_deref(),
            )),
            _ => None,
        })
    }

    pub fn count(&self, op: Op, outcome: Outcome, is_coordinator: bool) -> usize {
        self.op_results()
            .filter(|(_, ic, _, o, out, _, _)| *ic == is_coordinator && *o == op && *out == outcome)
            .count()
    }

    fn push_op(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, op: Op, outcome: Outcome, key: &str, value: Option<&str>) {
        self.events.push(LogEvent::OpResult {
            addr,
            is_coordinator,
            trx,
            op,
            outcome,
            key: key.to_string(),
            value: value.map(|v| v.to_string()),
        });
    }
}

impl Logger for InMemoryLogger {
    fn log_node_add(&mut self, observer: Endpoint, added: Endpoint) {
        self.events.push(LogEvent::NodeAdd { observer, added });
    }

    fn log_node_remove(&mut self, observer: Endpoint, removed: Endpoint) {
        self.events.push(LogEvent::NodeRemove { observer, removed });
    }

    fn log_create_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        self.push_op(addr, is_coordinator, trx, Op::Create, Outcome::Success, key, Some(value));
    }

    fn log_create_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        self.push_op(addr, is_coordinator, trx, Op::Create, Outcome::Fail, key, Some(value));
    }

    fn log_read_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        self.push_op(addr, is_coordinator, trx, Op::Read, Outcome::Success, key, Some(value));
    }

    fn log_read_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str) {
        self.push_op(addr, is_coordinator, trx, Op::Read, Outcome::Fail, key, None);
    }

    fn log_update_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        self.push_op(addr, is_coordinator, trx, Op::Update, Outcome::Success, key, Some(value));
    }

    fn log_update_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str, value: &str) {
        self.push_op(addr, is_coordinator, trx, Op::Update, Outcome::Fail, key, Some(value));
    }

    fn log_delete_success(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str) {
        self.push_op(addr, is_coordinator, trx, Op::Delete, Outcome::Success, key, None);
    }

    fn log_delete_fail(&mut self, addr: Endpoint, is_coordinator: bool, trx: i64, key: &str) {
        self.push_op(addr, is_coordinator, trx, Op::Delete, Outcome::Fail, key, None);
    }

    fn log(&mut self, addr: Endpoint, message: &str) {
        self.events.push(LogEvent::Freeform {
            addr,
            message: message.to_string(),
        });
    }
}
