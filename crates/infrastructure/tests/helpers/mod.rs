pub mod builders;
pub mod framestream_client;

pub use builders::*;
pub use framestream_client::*;
