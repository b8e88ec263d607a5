// crates/recorder-core/src/config.rs
//
// Per-kind source configuration, and the small enums the setters validate
// raw caller-supplied integers against. Setters accept `i32`/`f32` the way
// the original interface does (so an out-of-range value can be rejected
// rather than refused at compile time) and convert via `TryFrom` into
// these enums; once inside a config struct the field is always valid.

use crate::error::RecorderError;

/// `VIDEO_SOURCE_SURFACE_YUV ..< VIDEO_SOURCE_BUTT` in the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoSourceType {
    SurfaceYuv,
    SurfaceEs,
}

impl TryFrom<i32> for VideoSourceType {
    type Error = RecorderError;
    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(VideoSourceType::SurfaceYuv),
            1 => Ok(VideoSourceType::SurfaceEs),
            _ => Err(RecorderError::InvalidParam("video source type out of range")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoCodecFormat {
    Default,
    H264,
    Hevc,
}

impl TryFrom<i32> for VideoCodecFormat {
    type Error = RecorderError;
    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(VideoCodecFormat::Default),
            1 => Ok(VideoCodecFormat::H264),
            2 => Ok(VideoCodecFormat::Hevc),
            _ => Err(RecorderError::InvalidParam("video encoder out of range")),
        }
    }
}

/// `AUDIO_SOURCE_INVALID < source <= AUDIO_VOICE_PERFORMANCE` in the
/// original — note `Invalid` itself is excluded, only values strictly
/// above it are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioSourceType {
    Default,
    Mic,
    VoiceUplink,
    VoiceDownlink,
    VoiceCall,
    Camcorder,
    VoiceRecognition,
    VoiceCommunication,
    RemoteSubmix,
    Unprocessed,
    VoicePerformance,
}

impl TryFrom<i32> for AudioSourceType {
    type Error = RecorderError;
    fn try_from(v: i32) -> Result<Self, Self::Error> {
        use AudioSourceType::*;
        match v {
            0 => Ok(Default),
            1 => Ok(Mic),
            2 => Ok(VoiceUplink),
            3 => Ok(VoiceDownlink),
            4 => Ok(VoiceCall),
            5 => Ok(Camcorder),
            6 => Ok(VoiceRecognition),
            7 => Ok(VoiceCommunication),
            8 => Ok(RemoteSubmix),
            9 => Ok(Unprocessed),
            10 => Ok(VoicePerformance),
            _ => Err(RecorderError::InvalidParam("audio source type out of range")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCodecFormat {
    Default,
    AacLc,
    AacHeV1,
    AacHeV2,
    AacLd,
    AacEld,
}

impl TryFrom<i32> for AudioCodecFormat {
    type Error = RecorderError;
    fn try_from(v: i32) -> Result<Self, Self::Error> {
        use AudioCodecFormat::*;
        match v {
            0 => Ok(Default),
            1 => Ok(AacLc),
            2 => Ok(AacHeV1),
            3 => Ok(AacHeV2),
            4 => Ok(AacLd),
            5 => Ok(AacEld),
            _ => Err(RecorderError::InvalidParam("audio encoder out of range")),
        }
    }
}

impl AudioCodecFormat {
    /// `AUDIO_DEFAULT` resolves to LC-AAC at track-build time, same as the
    /// original's `GetAudioTrackSource` switch.
    pub fn resolved(self) -> AudioCodecFormat {
        match self {
            AudioCodecFormat::Default => AudioCodecFormat::AacLc,
            other => other,
        }
    }
}

/// Sample bit width. Anything other than 8/16/24 falls back to 16 with a
/// logged warning — the original does the same rather than rejecting the
/// setter outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitWidth {
    S8,
    S16,
    S24,
}

impl From<u32> for BitWidth {
    fn from(v: u32) -> Self {
        match v {
            8 => BitWidth::S8,
            16 => BitWidth::S16,
            24 => BitWidth::S24,
            _ => {
                tracing::warn!(bit_width = v, "unsupported bit width, defaulting to 16");
                BitWidth::S16
            }
        }
    }
}

/// `source <= METADATA` in the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSourceType {
    Default,
    Metadata,
}

impl TryFrom<i32> for DataSourceType {
    type Error = RecorderError;
    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(DataSourceType::Default),
            1 => Ok(DataSourceType::Metadata),
            _ => Err(RecorderError::InvalidParam("data source type out of range")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormatType {
    Default,
    Mpeg4,
    Ts,
}

impl TryFrom<i32> for OutputFormatType {
    type Error = RecorderError;
    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(OutputFormatType::Default),
            1 => Ok(OutputFormatType::Mpeg4),
            2 => Ok(OutputFormatType::Ts),
            _ => Err(RecorderError::InvalidParam("output format out of range")),
        }
    }
}

impl OutputFormatType {
    pub fn resolved(self) -> OutputFormatType {
        match self {
            OutputFormatType::Default => OutputFormatType::Mpeg4,
            other => other,
        }
    }
}

/// `FileSplitType` as the caller sets it; the Orchestrator translates this
/// into a `ManualSplitType` before forwarding to the `Sink`, exactly as
/// `SetFileSplitDuration` does in the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileSplitType {
    Post,
    Pre,
    Normal,
}

impl TryFrom<i32> for FileSplitType {
    type Error = RecorderError;
    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(FileSplitType::Post),
            1 => Ok(FileSplitType::Pre),
            2 => Ok(FileSplitType::Normal),
            _ => Err(RecorderError::InvalidParam("file split type out of range")),
        }
    }
}

/// The `Sink`-facing counterpart of `FileSplitType` — kept as a distinct
/// type because the original keeps them distinct (one is the caller's
/// vocabulary, the other the muxer's), even though the mapping is 1:1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManualSplitType {
    Post,
    Pre,
    Normal,
}

impl From<FileSplitType> for ManualSplitType {
    fn from(t: FileSplitType) -> Self {
        match t {
            FileSplitType::Post => ManualSplitType::Post,
            FileSplitType::Pre => ManualSplitType::Pre,
            FileSplitType::Normal => ManualSplitType::Normal,
        }
    }
}

/// Default playback/record speed, matching `RECORDER_DEFAULT_SPEED`.
pub const RECORDER_DEFAULT_SPEED: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoSourceConfig {
    pub source_type: VideoSourceType,
    pub encoder: VideoCodecFormat,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub bit_rate: u32,
    pub capture_rate: f64,
    pub orientation_hint_degrees: i32,
    pub speed: f32,
}

impl Default for VideoSourceConfig {
    fn default() -> Self {
        VideoSourceConfig {
            source_type: VideoSourceType::SurfaceYuv,
            encoder: VideoCodecFormat::Default,
            width: 0,
            height: 0,
            frame_rate: 0,
            bit_rate: 0,
            capture_rate: 0.0,
            orientation_hint_degrees: 0,
            speed: RECORDER_DEFAULT_SPEED,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioSourceConfig {
    pub source_type: AudioSourceType,
    pub encoder: AudioCodecFormat,
    pub sample_rate: u32,
    pub channel_count: u32,
    pub bit_rate: u32,
    pub bit_width: BitWidth,
}

impl Default for AudioSourceConfig {
    fn default() -> Self {
        AudioSourceConfig {
            source_type: AudioSourceType::Default,
            encoder: AudioCodecFormat::Default,
            sample_rate: 0,
            channel_count: 0,
            bit_rate: 0,
            bit_width: BitWidth::S16,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DataSourceConfig {
    pub source_type: Option<DataSourceType>,
}

/// Fixed characteristics the original hardcodes for data tracks
/// (`FRAME_RATE_FPS = 30`, `BIT_RATE_KB = 4 * 1024`).
pub const DATA_TRACK_FRAME_RATE: u32 = 30;
pub const DATA_TRACK_BIT_RATE: u32 = 4 * 1024;

/// Passed to `Source::init` so a single trait can carry a kind-specific
/// config without three near-identical trait methods. Only the audio path
/// uses this today (`audioSource->Init(audioSourceConfig)` in the
/// original); video and data sources never call `Init` at all there.
#[derive(Clone, Copy, Debug)]
pub enum SourceConfigRef<'a> {
    Video(&'a VideoSourceConfig),
    Audio(&'a AudioSourceConfig),
    Data(&'a DataSourceConfig),
}
