use ringkeep_net::Endpoint;

/// One recorded call into the logging interface, consumed by
/// `InMemoryLogger` so tests can scrape it the way an external test
/// harness would.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LogEvent {
    NodeAdd {
        observer: Endpoint,
        added: Endpoint,
    },
    NodeRemove {
        observer: Endpoint,
        removed: Endpoint,
    },
    OpResult {
        addr: Endpoint,
        is_coordinator: bool,
        trx: i64,
        op: Op,
        outcome: Outcome,
        key: String,
        value: Option<String>,
    },
    Freeform {
        addr: Endpoint,
        message: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Success,
    Fail,
}
