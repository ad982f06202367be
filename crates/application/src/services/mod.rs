mod correlation_cache;
mod fanout;

pub use correlation_cache::{correlation_key, CorrelationCache};
pub use fanout::{FanoutDispatcher, SinkHandle};
