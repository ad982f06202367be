mod decoder;
pub mod proto;

pub use decoder::ProtobufEventDecoder;
