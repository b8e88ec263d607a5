//! Data model and collaborator contracts for the recorder orchestrator.
//!
//! This crate has no threads and no I/O of its own: it defines the shapes
//! (`SourceId`, the `*SourceConfig` structs, `TrackSource`, `FormatFrame`),
//! the error type (`RecorderError`), and the two traits (`Source`, `Sink`)
//! that `recorder-engine`'s `Orchestrator` drives.

pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod status;
pub mod track;
pub mod traits;
pub mod validate;

pub use config::{
    AudioCodecFormat, AudioSourceConfig, AudioSourceType, BitWidth, DataSourceConfig,
    DataSourceType, FileSplitType, ManualSplitType, OutputFormatType, SourceConfigRef,
    VideoCodecFormat, VideoSourceConfig, VideoSourceType, DATA_TRACK_BIT_RATE,
    DATA_TRACK_FRAME_RATE, RECORDER_DEFAULT_SPEED,
};
pub use error::{RecorderError, RecorderResult, StringError};
pub use events::{RecorderCallback, RecorderEvent};
pub use ids::{SourceId, SourceKind, RECORDER_SOURCE_MAX_CNT};
pub use status::OrchestratorStatus;
pub use track::{CodecType, FormatFrame, FrameFlags, TrackId, TrackSource, AUDIO_SAMPLES_PER_FRAME};
pub use traits::{Sink, Source, SourceFactory};
