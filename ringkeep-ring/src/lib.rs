mod node;
mod ring;

pub use node::RingNode;
pub use ring::{Neighborhood, Ring};
