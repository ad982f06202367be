mod event_decoder;

pub use event_decoder::DnstapEventDecoder;
