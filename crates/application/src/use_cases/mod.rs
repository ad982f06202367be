mod decode_frames;

pub use decode_frames::{DecodeFramesUseCase, DecodeStats, FrameOutcome};
