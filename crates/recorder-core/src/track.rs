// crates/recorder-core/src/track.rs
//
// What `PrepareVideoSource`/`PrepareAudioSource`/`PrepareDataSource` hand
// to `Sink::add_track_source`, and what a worker thread hands to
// `Sink::write_data` on every acquired buffer.

use crate::config::BitWidth;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecType {
    H264,
    H265,
    Aac,
}

/// Track-level description built from a validated `*SourceConfig`. One
/// `TrackSource` per live source, produced once during `Prepare` and handed
/// to the sink to register a muxer track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackSource {
    Video {
        codec: CodecType,
        width: u32,
        height: u32,
        bit_rate: u32,
        frame_rate: u32,
        /// Set equal to `frame_rate`, matching the original's
        /// `keyFrameInterval = frameRate`.
        key_frame_interval: u32,
        speed: f32,
    },
    Audio {
        codec: CodecType,
        bit_rate: u32,
        sample_rate: u32,
        channel_count: u32,
        bit_width: BitWidth,
        /// `RECORDER_AUDIO_SAMPLES_PER_FRAME`.
        samples_per_frame: u32,
        avg_bytes_per_sec: u32,
    },
    Data {
        frame_rate: u32,
        bit_rate: u32,
    },
}

/// Opaque id a `Sink` assigns when a track is registered; threaded back
/// into every subsequent `write_data` call for that source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackId(pub u32);

/// `RECORDER_AUDIO_SAMPLES_PER_FRAME` from the original.
pub const AUDIO_SAMPLES_PER_FRAME: u32 = 1024;

/// One buffer's worth of payload + timing, handed from a worker thread's
/// `Source::acquire_buffer` to `Sink::write_data`. Payload bytes are opaque
/// to the orchestrator — it forwards them without inspecting or
/// transcoding, per spec.md's Non-goals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatFrame {
    pub data: Vec<u8>,
    pub timestamp_us: i64,
    pub flags: FrameFlags,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameFlags {
    pub key_frame: bool,
}
