mod event;
mod logger;
mod memory_logger;
mod tracing_logger;

pub use event::{LogEvent, Op, Outcome};
pub use logger::Logger;
pub use memory_logger::InMemoryLogger;
pub use tracing_logger::TracingLogger;
