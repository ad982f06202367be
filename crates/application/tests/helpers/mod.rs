pub mod builders;
pub mod mock_decoder;

pub use builders::*;
pub use mock_decoder::*;
