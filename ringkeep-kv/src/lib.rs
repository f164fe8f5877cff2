mod coordinator;
mod node;
mod server;
mod stabilization;
mod transaction;
mod wire;

pub use coordinator::KvCoordinator;
pub use node::KvNode;
pub use server::handle_request;
pub use stabilization::stabilize;
pub use transaction::{KvOpKind, ReplyRecord, Transaction};
pub use wire::KvMessage;
