mod entry;
mod protocol;
mod table;
mod wire;

pub use entry::MemberEntry;
pub use protocol::MlNode;
pub use table::{GossipEffect, MembershipTable};
pub use wire::MlMessage;
