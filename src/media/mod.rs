pub mod audio;
pub mod decoder;
pub mod frame;

pub use audio::{AudioError, AudioFormat, AudioSink, AudioSinkProvider, NullAudioSink};
pub use decoder::{
    AudioData, DecodeError, DecodedUnit, DecoderOpener, MediaDecoder, MediaInfo, VideoData,
};
pub use frame::RawFrame;
