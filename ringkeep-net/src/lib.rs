mod config;
mod emulated_network;
mod endpoint;

pub use config::Config;
pub use emulated_network::{EmulatedNetwork, FaultPolicy, Reliable};
pub use endpoint::Endpoint;
