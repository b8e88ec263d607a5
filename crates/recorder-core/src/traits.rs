// crates/recorder-core/src/traits.rs
//
// The two collaborator contracts the Orchestrator drives: `Source` (one
// trait for video/audio/data, not three near-identical ones — the
// `SourceKind` returned by `kind()` plus `TrackSource` is enough to tell
// them apart) and `Sink` (the muxer). Grounded on the velocut-core
// `VideoTransition` trait: a capability interface rather than a class
// hierarchy, implementors carry their own kind tag instead of being named
// `VideoSource`/`AudioSource`/`DataSource` types.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::{ManualSplitType, OutputFormatType, SourceConfigRef};
use crate::error::RecorderError;
use crate::events::RecorderCallback;
use crate::ids::SourceKind;
use crate::track::{FormatFrame, TrackId, TrackSource};

// Note: building a `TrackSource` is the Orchestrator's job, from the
// `*SourceConfig` it already holds (matching `GetVideoTrackSource` et al.
// in the original, which read `videoSourceConfig_`/`audioSourceConfig_`,
// not the concrete source object). `Source` itself is never asked for one.

/// A single capture source: a camera surface, a microphone, a metadata
/// stream. One implementation per live slot in the `SourceRegistry`.
///
/// Methods take `&self`, not `&mut self`: a source is shared as `Arc<dyn
/// Source>` between the Orchestrator (which calls `init`/`start`/`stop`/
/// `pause`/`resume`) and that source's own worker thread (which calls
/// `acquire_buffer`/`release_buffer` in a loop). `acquire_buffer(true)` is
/// allowed to block indefinitely waiting for a frame, and `stop` must be
/// callable *while that call is blocked* and unblock it — the original's
/// `Stop()` interrupts whatever `AcquireBuffer` is doing instead of
/// queueing up behind it. That rules out wrapping the whole source in an
/// external `Mutex`, since the worker thread would hold that lock for the
/// entire blocking call and `stop` would never get in. Implementations
/// must therefore manage their own interior mutability (an internal mutex
/// around short-held state, atomics, a condvar to wake a blocked
/// `acquire_buffer`, ...) and be `Sync`.
pub trait Source: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Audio sources require an explicit `init` against their finished
    /// config before registration (`audioSource->Init(audioSourceConfig)`
    /// in the original, called during `Prepare` once every `Set*` call has
    /// already landed); video and data sources are never called here and
    /// may leave this a no-op.
    fn init(&self, _config: SourceConfigRef<'_>) -> Result<(), RecorderError> {
        Ok(())
    }

    fn start(&self) -> Result<(), RecorderError>;

    /// Unblocks a thread parked in `acquire_buffer`; called before the
    /// worker thread is joined. Must not wait on anything the blocked
    /// `acquire_buffer` call itself holds.
    fn stop(&self) -> Result<(), RecorderError>;

    fn pause(&self) -> Result<(), RecorderError>;
    fn resume(&self) -> Result<(), RecorderError>;

    /// `blocking` mirrors the original's per-kind choice: video and data
    /// workers pass `true` (block until a buffer is ready), audio passes
    /// `false` (poll) — see spec.md §4.5. A blocking call must return
    /// (with an error is fine) once `stop` has been called concurrently.
    fn acquire_buffer(&self, blocking: bool) -> Result<FormatFrame, RecorderError>;

    /// Always called after `acquire_buffer`, whether or not that call or
    /// the following `write_data` succeeded, and regardless of paused
    /// state — the original releases unconditionally once a buffer was
    /// acquired.
    fn release_buffer(&self) -> Result<(), RecorderError>;
}

/// The muxing sink. One instance per Orchestrator, constructed before
/// `Prepare` and carried through the whole lifecycle.
///
/// Note on `Pause`/`Resume` asymmetry (spec.md §9, preserved verbatim):
/// `Orchestrator::pause` calls `stop(false)` *after* pausing every source,
/// but `Orchestrator::resume` calls `start()` *before* resuming any source.
/// Worker threads may therefore call `write_data` while the sink is
/// between `stop` and `start` — implementations must accept or silently
/// discard writes in that window rather than error.
pub trait Sink: Send {
    fn prepare(&mut self) -> Result<(), RecorderError>;
    fn add_track_source(&mut self, track: TrackSource) -> Result<TrackId, RecorderError>;

    fn start(&mut self) -> Result<(), RecorderError>;
    fn stop(&mut self, block: bool) -> Result<(), RecorderError>;
    fn reset(&mut self) -> Result<(), RecorderError>;
    fn release(&mut self) -> Result<(), RecorderError>;

    fn write_data(&mut self, track: TrackId, frame: FormatFrame) -> Result<(), RecorderError>;

    fn set_manual_split_duration(
        &mut self,
        split: ManualSplitType,
        duration_us: i64,
    ) -> Result<(), RecorderError>;

    /// Forwards an opaque key/value the Orchestrator did not special-case
    /// itself (everything except `RECORDER_RECORD_SPEED`, which is written
    /// directly into the video source config — see spec.md §9's note on
    /// `SetParameter`'s raw-index access).
    fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), RecorderError>;

    // ---- output configuration surface (spec.md §6) --------------------
    //
    // Every one of these mirrors a `recorderSink_->Set*` call in the
    // original's `RecorderImpl::Set*`; the Orchestrator validates and
    // stores the value into its own `Inner` *and* forwards it here, since
    // it's this trait's implementor (the muxer) that actually opens/
    // rotates/bounds the output file.

    fn set_output_format(&mut self, format: OutputFormatType) -> Result<(), RecorderError>;

    fn set_output_path(&mut self, path: &Path) -> Result<(), RecorderError>;

    fn set_output_file(&mut self, fd: i32) -> Result<(), RecorderError>;

    /// Mid-recording file rotation (`SetNextOutputFile` in the original),
    /// callable outside `Prepare`/`Start` unlike the other output setters.
    fn set_next_output_file(&mut self, fd: i32) -> Result<(), RecorderError>;

    fn set_max_duration(&mut self, duration_us: i64) -> Result<(), RecorderError>;

    fn set_max_file_size(&mut self, bytes: u64) -> Result<(), RecorderError>;

    fn set_location(&mut self, latitude: f32, longitude: f32) -> Result<(), RecorderError>;

    /// The Orchestrator keeps its own `Arc<Mutex<Option<Box<dyn
    /// RecorderCallback>>>>` for worker-thread event notification; the same
    /// handle is handed here so the sink can report its own events (e.g.
    /// max file size reached while writing) through the one callback slot,
    /// matching the original's single `shared_ptr<RecorderCallback>`.
    fn set_recorder_callback(
        &mut self,
        callback: Arc<Mutex<Option<Box<dyn RecorderCallback>>>>,
    ) -> Result<(), RecorderError>;
}

/// Constructs concrete `Source` instances for each kind. The original
/// `RecorderImpl` hardcodes `new RecorderVideoSource()` etc.; this crate
/// takes the construction out as an injected collaborator instead, since
/// `recorder-engine` has no business knowing what a video surface actually
/// is (camera, synthetic test source, ...).
pub trait SourceFactory: Send {
    fn create_video(&self) -> Box<dyn Source>;
    fn create_audio(&self) -> Box<dyn Source>;
    fn create_data(&self) -> Box<dyn Source>;
}
