// crates/recorder-engine/src/orchestrator.rs
//
// The Recorder Orchestrator itself — the component the original calls
// `RecorderImpl`. One `Mutex<Inner>` guards every field the setters and
// lifecycle methods touch; worker threads never take it (they only see
// `Arc<AtomicBool>` flags and their own `Source`/`Sink` handles), matching
// spec.md §5's "the orchestrator lock is never held across a blocking
// acquire_buffer call."

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use recorder_core::{
    AudioCodecFormat, AudioSourceConfig, AudioSourceType, BitWidth, CodecType, DataSourceConfig,
    DataSourceType, FileSplitType, OrchestratorStatus, OutputFormatType, RecorderCallback,
    RecorderError, RecorderResult, Sink, SourceFactory, SourceId, TrackSource, VideoCodecFormat,
    VideoSourceConfig, VideoSourceType, AUDIO_SAMPLES_PER_FRAME, DATA_TRACK_BIT_RATE,
    DATA_TRACK_FRAME_RATE, RECORDER_DEFAULT_SPEED,
};
use recorder_core::validate;

use crate::registry::SourceRegistry;
use crate::worker;

struct Inner {
    status: OrchestratorStatus,
    registry: SourceRegistry,
    sink: Arc<Mutex<Box<dyn Sink>>>,
    factory: Box<dyn SourceFactory>,
    output_format: OutputFormatType,
    output_path: Option<PathBuf>,
    callback: Arc<Mutex<Option<Box<dyn RecorderCallback>>>>,
    max_duration_us: Option<i64>,
    max_file_size_bytes: Option<u64>,
    location: Option<(f32, f32)>,
}

/// Multi-track recorder orchestrator. Construct with a `SourceFactory` and
/// a `Sink`, drive it through `Set*` calls, then `prepare` → `start` →
/// (optionally `pause`/`resume`) → `stop` → `reset`/`release`.
pub struct Orchestrator {
    inner: Mutex<Inner>,
}

impl Orchestrator {
    pub fn new(factory: Box<dyn SourceFactory>, sink: Box<dyn Sink>) -> Self {
        Orchestrator {
            inner: Mutex::new(Inner {
                status: OrchestratorStatus::Initialized,
                registry: SourceRegistry::new(),
                sink: Arc::new(Mutex::new(sink)),
                factory,
                output_format: OutputFormatType::Default,
                output_path: None,
                callback: Arc::new(Mutex::new(None)),
                max_duration_us: None,
                max_file_size_bytes: None,
                location: None,
            }),
        }
    }

    pub fn status(&self) -> OrchestratorStatus {
        self.inner.lock().expect("orchestrator mutex poisoned").status
    }

    fn require_initialized(inner: &Inner, op: &'static str) -> RecorderResult<()> {
        if inner.status == OrchestratorStatus::Initialized {
            Ok(())
        } else {
            tracing::warn!(op, status = %inner.status, "rejected: not in INITIALIZED state");
            Err(RecorderError::IllegalState(op))
        }
    }

    fn require_not_released(inner: &Inner, op: &'static str) -> RecorderResult<()> {
        if inner.status == OrchestratorStatus::Released {
            tracing::warn!(op, "rejected: already RELEASED");
            Err(RecorderError::IllegalState(op))
        } else {
            Ok(())
        }
    }

    // ---- video setters ----------------------------------------------

    pub fn set_video_source(&self, raw_source_type: i32) -> RecorderResult<SourceId> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetVideoSource")?;
        // Original validates the source-type range *before* consuming a
        // free slot.
        let source_type = VideoSourceType::try_from(raw_source_type)?;
        let index = inner
            .registry
            .free_video_index()
            .ok_or(RecorderError::NoFreeChannel)?;
        let config = VideoSourceConfig {
            source_type,
            ..Default::default()
        };
        let source = inner.factory.create_video();
        let id = inner.registry.insert_video(index, config, source);
        tracing::info!(source_id = %id, "video source registered");
        Ok(id)
    }

    pub fn set_video_encoder(&self, id: SourceId, raw_encoder: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetVideoEncoder")?;
        let encoder = VideoCodecFormat::try_from(raw_encoder)?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .video_mut(index)
            .ok_or(RecorderError::InvalidParam("no video source at that id"))?;
        handle.config.encoder = encoder;
        Ok(())
    }

    pub fn set_video_size(&self, id: SourceId, width: i32, height: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetVideoSize")?;
        let width = validate::non_zero_positive_i32(width, "video width")?;
        let height = validate::non_zero_positive_i32(height, "video height")?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .video_mut(index)
            .ok_or(RecorderError::InvalidParam("no video source at that id"))?;
        handle.config.width = width;
        handle.config.height = height;
        Ok(())
    }

    pub fn set_video_frame_rate(&self, id: SourceId, frame_rate: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetVideoFrameRate")?;
        let frame_rate = validate::non_zero_positive_i32(frame_rate, "video frame rate")?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .video_mut(index)
            .ok_or(RecorderError::InvalidParam("no video source at that id"))?;
        handle.config.frame_rate = frame_rate;
        Ok(())
    }

    pub fn set_video_encoding_bit_rate(&self, id: SourceId, bit_rate: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetVideoEncodingBitRate")?;
        let bit_rate = validate::non_zero_positive_i32(bit_rate, "video bit rate")?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .video_mut(index)
            .ok_or(RecorderError::InvalidParam("no video source at that id"))?;
        handle.config.bit_rate = bit_rate;
        Ok(())
    }

    pub fn set_capture_rate(&self, id: SourceId, fps: f64) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetCaptureRate")?;
        let fps = validate::capture_rate(fps)?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .video_mut(index)
            .ok_or(RecorderError::InvalidParam("no video source at that id"))?;
        handle.config.capture_rate = fps;
        Ok(())
    }

    pub fn set_orientation_hint(&self, id: SourceId, degree: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetOrientationHint")?;
        let degree = validate::orientation_hint(degree)?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .video_mut(index)
            .ok_or(RecorderError::InvalidParam("no video source at that id"))?;
        handle.config.orientation_hint_degrees = degree;
        Ok(())
    }

    /// Returns a handle the caller renders into. This crate owns no
    /// windowing/GPU stack (Non-goal), so the "surface" is the `SourceId`
    /// itself — the concrete `Source` implementation is expected to expose
    /// its own buffer-queue API out of band, the same way the original's
    /// `sptr<Surface>` is itself an opaque handle to the real producer.
    pub fn get_surface(&self, id: SourceId) -> RecorderResult<SourceId> {
        let inner = self.inner.lock().expect("orchestrator mutex poisoned");
        let index = inner.registry.lookup(id)?;
        // Data-range ids resolve against the data slot; every other range
        // (video, and audio which has no surface of its own) resolves
        // against the video slot, matching the original's `GetSurface`.
        match id.kind_hint() {
            recorder_core::SourceKind::Data => {
                inner
                    .registry
                    .data(index)
                    .ok_or(RecorderError::InvalidParam("no data source at that id"))?;
            }
            _ => {
                inner
                    .registry
                    .video(index)
                    .ok_or(RecorderError::InvalidParam("no video source at that id"))?;
            }
        }
        Ok(id)
    }

    // ---- audio setters ----------------------------------------------

    pub fn set_audio_source(&self, raw_source_type: i32) -> RecorderResult<SourceId> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetAudioSource")?;
        // Original allocates the free slot *before* validating the source
        // type; an invalid value still consumes the slot. Preserved —
        // see DESIGN.md.
        let index = inner
            .registry
            .free_audio_index()
            .ok_or(RecorderError::NoFreeChannel)?;
        let source = inner.factory.create_audio();
        let id = inner
            .registry
            .insert_audio(index, AudioSourceConfig::default(), source);
        let source_type = AudioSourceType::try_from(raw_source_type)?;
        inner.registry.audio_mut(index).unwrap().config.source_type = source_type;
        tracing::info!(source_id = %id, "audio source registered");
        Ok(id)
    }

    pub fn set_audio_encoder(&self, id: SourceId, raw_encoder: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetAudioEncoder")?;
        let encoder = AudioCodecFormat::try_from(raw_encoder)?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .audio_mut(index)
            .ok_or(RecorderError::InvalidParam("no audio source at that id"))?;
        handle.config.encoder = encoder;
        Ok(())
    }

    pub fn set_audio_sample_rate(&self, id: SourceId, sample_rate: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetAudioSampleRate")?;
        let sample_rate = validate::non_zero_positive_i32(sample_rate, "audio sample rate")?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .audio_mut(index)
            .ok_or(RecorderError::InvalidParam("no audio source at that id"))?;
        handle.config.sample_rate = sample_rate;
        Ok(())
    }

    pub fn set_audio_channels(&self, id: SourceId, channel_count: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetAudioChannels")?;
        let channel_count = validate::non_zero_positive_i32(channel_count, "audio channel count")?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .audio_mut(index)
            .ok_or(RecorderError::InvalidParam("no audio source at that id"))?;
        handle.config.channel_count = channel_count;
        Ok(())
    }

    pub fn set_audio_encoding_bit_rate(&self, id: SourceId, bit_rate: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetAudioEncodingBitRate")?;
        let bit_rate = validate::non_zero_positive_i32(bit_rate, "audio bit rate")?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .audio_mut(index)
            .ok_or(RecorderError::InvalidParam("no audio source at that id"))?;
        handle.config.bit_rate = bit_rate;
        Ok(())
    }

    /// Not part of the original's setter table directly (bit width is
    /// inferred at track-build time there) but exposed here since
    /// `AudioSourceConfig::bit_width` needs a way in; anything other than
    /// 8/16/24 falls back to 16 with a logged warning (`BitWidth::from`).
    pub fn set_audio_bit_width(&self, id: SourceId, bits: u32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetAudioBitWidth")?;
        let index = inner.registry.lookup(id)?;
        let handle = inner
            .registry
            .audio_mut(index)
            .ok_or(RecorderError::InvalidParam("no audio source at that id"))?;
        handle.config.bit_width = BitWidth::from(bits);
        Ok(())
    }

    // ---- data setters -------------------------------------------------

    pub fn set_data_source(&self, raw_source_type: i32) -> RecorderResult<SourceId> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetDataSource")?;
        let source_type = DataSourceType::try_from(raw_source_type)?;
        let index = inner
            .registry
            .free_data_index()
            .ok_or(RecorderError::NoFreeChannel)?;
        let source = inner.factory.create_data();
        let config = DataSourceConfig {
            source_type: Some(source_type),
        };
        let id = inner.registry.insert_data(index, config, source);
        tracing::info!(source_id = %id, "data source registered");
        Ok(id)
    }

    // ---- global setters -------------------------------------------------

    pub fn set_output_format(&self, raw_format: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetOutputFormat")?;
        let format = OutputFormatType::try_from(raw_format)?.resolved();
        inner.output_format = format;
        let sink = inner.sink.clone();
        sink.lock()
            .expect("sink mutex poisoned")
            .set_output_format(format)
    }

    pub fn set_output_path(&self, path: impl AsRef<Path>) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetOutputPath")?;
        let path = path.as_ref();
        let meta = std::fs::metadata(path)
            .map_err(|_| RecorderError::InvalidParam("output path does not exist"))?;
        if !meta.is_dir() {
            return Err(RecorderError::InvalidParam("output path is not a directory"));
        }
        if !path_is_writable(path) {
            return Err(RecorderError::InvalidParam("output path is not writable"));
        }
        inner.output_path = Some(path.to_path_buf());
        let sink = inner.sink.clone();
        sink.lock().expect("sink mutex poisoned").set_output_path(path)
    }

    pub fn set_output_file(&self, fd: i32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetOutputFile")?;
        check_fd_writable(fd)?;
        inner.output_path = None;
        let sink = inner.sink.clone();
        sink.lock().expect("sink mutex poisoned").set_output_file(fd)
    }

    /// Unlike every other setter, `SetNextOutputFile` is callable in *any*
    /// status (it supports rotating the output file mid-recording) — the
    /// original skips the `IsPrepared()` gate here specifically. Still
    /// performs the fd-mode check, then forwards the fd to the sink so
    /// rotation actually takes effect.
    pub fn set_next_output_file(&self, fd: i32) -> RecorderResult<()> {
        let inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_not_released(&inner, "SetNextOutputFile")?;
        check_fd_writable(fd)?;
        let sink = inner.sink.clone();
        sink.lock()
            .expect("sink mutex poisoned")
            .set_next_output_file(fd)
    }

    pub fn set_max_duration(&self, duration_us: i64) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetMaxDuration")?;
        if duration_us <= 0 {
            return Err(RecorderError::InvalidParam("max duration must be positive"));
        }
        inner.max_duration_us = Some(duration_us);
        let sink = inner.sink.clone();
        sink.lock()
            .expect("sink mutex poisoned")
            .set_max_duration(duration_us)
    }

    pub fn set_max_file_size(&self, bytes: u64) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetMaxFileSize")?;
        if bytes == 0 {
            return Err(RecorderError::InvalidParam("max file size must be positive"));
        }
        inner.max_file_size_bytes = Some(bytes);
        let sink = inner.sink.clone();
        sink.lock()
            .expect("sink mutex poisoned")
            .set_max_file_size(bytes)
    }

    pub fn set_location(&self, latitude: f32, longitude: f32) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "SetLocation")?;
        inner.location = Some((latitude, longitude));
        let sink = inner.sink.clone();
        sink.lock()
            .expect("sink mutex poisoned")
            .set_location(latitude, longitude)
    }

    pub fn set_recorder_callback(&self, callback: Box<dyn RecorderCallback>) -> RecorderResult<()> {
        let inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_not_released(&inner, "SetRecorderCallback")?;
        *inner.callback.lock().expect("callback mutex poisoned") = Some(callback);
        let sink = inner.sink.clone();
        sink.lock()
            .expect("sink mutex poisoned")
            .set_recorder_callback(inner.callback.clone())
    }

    /// `RECORDER_RECORD_SPEED` is special-cased onto the video source
    /// config (matching the original's direct `sourceManager_[sourceId]`
    /// write — note the original indexes with the *raw* sourceId value,
    /// not the decoded slot index; we go through the normal decode path
    /// instead, since the raw-index access only coincides with the decoded
    /// index for video ids (video's base offset is zero) and diverging
    /// would be indistinguishable for any id actually produced by
    /// `SetVideoSource`). Anything else forwards to the sink unchanged.
    pub fn set_parameter(&self, id: SourceId, key: &str, value: &str) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_not_released(&inner, "SetParameter")?;
        if key == "RECORDER_RECORD_SPEED" {
            let speed: f32 = value
                .parse()
                .map_err(|_| RecorderError::InvalidParam("speed is not a valid float"))?;
            let index = inner.registry.lookup(id)?;
            if let Some(handle) = inner.registry.video_mut(index) {
                handle.config.speed = speed;
            }
            return Ok(());
        }
        let sink = inner.sink.clone();
        let mut sink = sink.lock().expect("sink mutex poisoned");
        sink.set_parameter(key, value).map_err(|e| match e {
            RecorderError::Sink(_) => e,
            other => RecorderError::sink(StringifiedError(other.to_string())),
        })
    }

    // ---- lifecycle ----------------------------------------------------

    pub fn prepare(&self) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        Self::require_initialized(&inner, "Prepare")?;

        let sink = inner.sink.clone();
        sink.lock().expect("sink mutex poisoned").prepare()?;

        for (_, handle) in inner.registry.iter_video_mut() {
            let track = video_track_source(&handle.config)?;
            let track_id = sink
                .lock()
                .expect("sink mutex poisoned")
                .add_track_source(track)?;
            handle.track_id = Some(track_id);
        }

        for (_, handle) in inner.registry.iter_audio_mut() {
            handle
                .source
                .init(recorder_core::SourceConfigRef::Audio(&handle.config))?;
            let track = audio_track_source(&handle.config)?;
            let track_id = sink
                .lock()
                .expect("sink mutex poisoned")
                .add_track_source(track)?;
            handle.track_id = Some(track_id);
        }

        for (_, handle) in inner.registry.iter_data_mut() {
            let track = TrackSource::Data {
                frame_rate: DATA_TRACK_FRAME_RATE,
                bit_rate: DATA_TRACK_BIT_RATE,
            };
            let track_id = sink
                .lock()
                .expect("sink mutex poisoned")
                .add_track_source(track)?;
            handle.track_id = Some(track_id);
        }

        inner.status = OrchestratorStatus::Prepared;
        tracing::info!("prepared");
        Ok(())
    }

    pub fn start(&self) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        match inner.status {
            OrchestratorStatus::Prepared
            | OrchestratorStatus::Paused
            | OrchestratorStatus::Stopped => {}
            _ => {
                tracing::warn!(status = %inner.status, "Start rejected");
                return Err(RecorderError::IllegalState("Start"));
            }
        }

        {
            let sink = inner.sink.clone();
            sink.lock().expect("sink mutex poisoned").start()?;
        }

        self.start_video_sources(&mut inner)?;
        self.start_audio_sources(&mut inner)?;
        self.start_data_sources(&mut inner)?;

        inner.status = OrchestratorStatus::Recording;
        tracing::info!("recording started");
        Ok(())
    }

    fn start_video_sources(&self, inner: &mut Inner) -> RecorderResult<()> {
        let sink = inner.sink.clone();
        let callback = inner.callback.clone();
        for (index, handle) in inner.registry.iter_video_mut() {
            let track_id = handle
                .track_id
                .ok_or(RecorderError::Unknown("video source never prepared"))?;
            handle.source.start()?;
            handle.started.store(true, Ordering::SeqCst);
            let name = format!("video-src-{index}");
            let join = worker::spawn(
                name,
                worker::VIDEO_THREAD_PRIORITY,
                true,
                handle.source.clone(),
                handle.started.clone(),
                handle.paused.clone(),
                sink.clone(),
                track_id,
                callback.clone(),
            )
            .map_err(|e| RecorderError::sink(StringifiedError(e.to_string())))?;
            handle.worker = Some(join);
        }
        Ok(())
    }

    fn start_audio_sources(&self, inner: &mut Inner) -> RecorderResult<()> {
        let sink = inner.sink.clone();
        let callback = inner.callback.clone();
        for (index, handle) in inner.registry.iter_audio_mut() {
            let track_id = handle
                .track_id
                .ok_or(RecorderError::Unknown("audio source never prepared"))?;
            handle.source.start()?;
            handle.started.store(true, Ordering::SeqCst);
            let name = format!("audio-src-{index}");
            let join = worker::spawn(
                name,
                worker::AUDIO_THREAD_PRIORITY,
                false,
                handle.source.clone(),
                handle.started.clone(),
                handle.paused.clone(),
                sink.clone(),
                track_id,
                callback.clone(),
            )
            .map_err(|e| RecorderError::sink(StringifiedError(e.to_string())))?;
            handle.worker = Some(join);
        }
        Ok(())
    }

    fn start_data_sources(&self, inner: &mut Inner) -> RecorderResult<()> {
        let sink = inner.sink.clone();
        let callback = inner.callback.clone();
        for (index, handle) in inner.registry.iter_data_mut() {
            let track_id = handle
                .track_id
                .ok_or(RecorderError::Unknown("data source never prepared"))?;
            handle.source.start()?;
            handle.started.store(true, Ordering::SeqCst);
            let name = format!("data-src-{index}");
            let join = worker::spawn(
                name,
                worker::DATA_THREAD_PRIORITY,
                true,
                handle.source.clone(),
                handle.started.clone(),
                handle.paused.clone(),
                sink.clone(),
                track_id,
                callback.clone(),
            )
            .map_err(|e| RecorderError::sink(StringifiedError(e.to_string())))?;
            handle.worker = Some(join);
        }
        Ok(())
    }

    pub fn pause(&self) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        if inner.status != OrchestratorStatus::Recording {
            tracing::warn!(status = %inner.status, "Pause rejected");
            return Err(RecorderError::IllegalState("Pause"));
        }

        for (_, handle) in inner.registry.iter_video_mut() {
            handle.source.pause()?;
            handle.paused.store(true, Ordering::SeqCst);
        }
        for (_, handle) in inner.registry.iter_audio_mut() {
            handle.source.pause()?;
            handle.paused.store(true, Ordering::SeqCst);
        }
        for (_, handle) in inner.registry.iter_data_mut() {
            handle.source.pause()?;
            handle.paused.store(true, Ordering::SeqCst);
        }

        // Sink stop comes *last* in Pause but *first* in Resume — preserved
        // asymmetry, see traits::Sink doc comment.
        {
            let sink = inner.sink.clone();
            sink.lock().expect("sink mutex poisoned").stop(false)?;
        }

        inner.status = OrchestratorStatus::Paused;
        tracing::info!("paused");
        Ok(())
    }

    pub fn resume(&self) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        if inner.status != OrchestratorStatus::Paused {
            tracing::warn!(status = %inner.status, "Resume rejected");
            return Err(RecorderError::IllegalState("Resume"));
        }

        {
            let sink = inner.sink.clone();
            sink.lock().expect("sink mutex poisoned").start()?;
        }

        for (_, handle) in inner.registry.iter_video_mut() {
            handle.source.resume()?;
            handle.paused.store(false, Ordering::SeqCst);
        }
        for (_, handle) in inner.registry.iter_audio_mut() {
            handle.source.resume()?;
            handle.paused.store(false, Ordering::SeqCst);
        }
        for (_, handle) in inner.registry.iter_data_mut() {
            handle.source.resume()?;
            handle.paused.store(false, Ordering::SeqCst);
        }

        inner.status = OrchestratorStatus::Recording;
        tracing::info!("resumed");
        Ok(())
    }

    pub fn stop(&self, block: bool) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        if !matches!(
            inner.status,
            OrchestratorStatus::Recording | OrchestratorStatus::Paused
        ) {
            tracing::warn!(status = %inner.status, "Stop rejected");
            return Err(RecorderError::IllegalState("Stop"));
        }
        self.stop_internal(&mut inner, block)?;
        inner.status = OrchestratorStatus::Stopped;
        tracing::info!("stopped");
        Ok(())
    }

    fn stop_internal(&self, inner: &mut Inner, block: bool) -> RecorderResult<()> {
        stop_sources(inner.registry.iter_video_mut());
        stop_sources(inner.registry.iter_audio_mut());
        stop_sources(inner.registry.iter_data_mut());
        let sink = inner.sink.clone();
        sink.lock().expect("sink mutex poisoned").stop(block)?;
        Ok(())
    }

    pub fn reset(&self) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        if inner.status == OrchestratorStatus::Released {
            return Err(RecorderError::IllegalState("Reset"));
        }
        if matches!(
            inner.status,
            OrchestratorStatus::Recording | OrchestratorStatus::Paused
        ) {
            self.stop_internal(&mut inner, false)?;
        }
        {
            let sink = inner.sink.clone();
            sink.lock().expect("sink mutex poisoned").reset()?;
        }
        inner.registry.reset();
        inner.output_format = OutputFormatType::Default;
        inner.output_path = None;
        inner.max_duration_us = None;
        inner.max_file_size_bytes = None;
        inner.location = None;
        inner.status = OrchestratorStatus::Initialized;
        tracing::info!("reset");
        Ok(())
    }

    pub fn release(&self) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        if inner.status == OrchestratorStatus::Released {
            return Err(RecorderError::IllegalState("Release"));
        }
        if matches!(
            inner.status,
            OrchestratorStatus::Recording | OrchestratorStatus::Paused
        ) {
            self.stop_internal(&mut inner, false)?;
        }
        {
            let sink = inner.sink.clone();
            sink.lock().expect("sink mutex poisoned").release()?;
        }
        inner.status = OrchestratorStatus::Released;
        tracing::info!("released");
        Ok(())
    }

    pub fn set_file_split_duration(
        &self,
        raw_split_type: i32,
        duration_us: i64,
    ) -> RecorderResult<()> {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        if inner.status != OrchestratorStatus::Recording {
            tracing::warn!(status = %inner.status, "SetFileSplitDuration rejected");
            return Err(RecorderError::IllegalState("SetFileSplitDuration"));
        }
        let split = FileSplitType::try_from(raw_split_type)?;
        let sink = inner.sink.clone();
        sink.lock()
            .expect("sink mutex poisoned")
            .set_manual_split_duration(split.into(), duration_us)
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().expect("orchestrator mutex poisoned");
        if inner.status != OrchestratorStatus::Released {
            if matches!(
                inner.status,
                OrchestratorStatus::Recording | OrchestratorStatus::Paused
            ) {
                let _ = self.stop_internal(&mut inner, false);
            }
            let sink = inner.sink.clone();
            let _ = sink.lock().expect("sink mutex poisoned").release();
            inner.status = OrchestratorStatus::Released;
        }
    }
}

fn stop_sources<'a, C: 'a>(
    iter: impl Iterator<Item = (usize, &'a mut crate::registry::SourceHandle<C>)>,
) {
    for (_, handle) in iter {
        // Flip the flag first so the worker loop's next `started.load`
        // check fails, then call `Source::stop` to unblock a worker
        // parked in `acquire_buffer`, then join. No lock guards this call
        // (see the `Source` trait doc comment) — it must run even while
        // the worker thread is blocked inside `acquire_buffer`.
        handle.started.store(false, Ordering::SeqCst);
        if let Err(e) = handle.source.stop() {
            tracing::error!(error = %e, "source stop failed");
        }
        if let Some(join) = handle.worker.take() {
            let _ = join.join();
        }
    }
}

fn video_track_source(config: &VideoSourceConfig) -> RecorderResult<TrackSource> {
    let codec = match config.encoder {
        VideoCodecFormat::H264 => CodecType::H264,
        VideoCodecFormat::Hevc => CodecType::H265,
        VideoCodecFormat::Default => {
            return Err(RecorderError::InvalidParam("video encoder not set"))
        }
    };
    let width = validate::non_zero_positive(config.width, "video width")?;
    let height = validate::non_zero_positive(config.height, "video height")?;
    let bit_rate = validate::non_zero_positive(config.bit_rate, "video bit rate")?;
    let frame_rate = validate::non_zero_positive(config.frame_rate, "video frame rate")?;
    Ok(TrackSource::Video {
        codec,
        width,
        height,
        bit_rate,
        frame_rate,
        key_frame_interval: frame_rate,
        speed: if config.speed == 0.0 {
            RECORDER_DEFAULT_SPEED
        } else {
            config.speed
        },
    })
}

fn audio_track_source(config: &AudioSourceConfig) -> RecorderResult<TrackSource> {
    let resolved = config.encoder.resolved();
    let codec = match resolved {
        AudioCodecFormat::AacLc
        | AudioCodecFormat::AacHeV1
        | AudioCodecFormat::AacHeV2
        | AudioCodecFormat::AacLd
        | AudioCodecFormat::AacEld => CodecType::Aac,
        AudioCodecFormat::Default => unreachable!("resolved() maps Default to AacLc"),
    };
    let bit_rate = validate::non_zero_positive(config.bit_rate, "audio bit rate")?;
    let sample_rate = validate::non_zero_positive(config.sample_rate, "audio sample rate")?;
    let channel_count = validate::non_zero_positive(config.channel_count, "audio channel count")?;
    Ok(TrackSource::Audio {
        codec,
        bit_rate,
        sample_rate,
        channel_count,
        bit_width: config.bit_width,
        samples_per_frame: AUDIO_SAMPLES_PER_FRAME,
        avg_bytes_per_sec: bit_rate,
    })
}

fn path_is_writable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o200 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        !std::fs::metadata(path)
            .map(|m| m.permissions().readonly())
            .unwrap_or(true)
    }
}

fn check_fd_writable(fd: i32) -> RecorderResult<()> {
    #[cfg(unix)]
    {
        // SAFETY: `fcntl` with `F_GETFL` only reads the fd's status flags;
        // it performs no I/O and is safe for any fd value the OS hands
        // back a result for.
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags < 0 {
            return Err(RecorderError::InvalidOperation("fd is not valid"));
        }
        if !validate::fd_mode_ok(flags, libc::O_RDWR, libc::O_WRONLY) {
            return Err(RecorderError::InvalidParam("fd is not writable"));
        }
        Ok(())
    }
    #[cfg(not(unix))]
    {
        let _ = fd;
        Ok(())
    }
}

/// Adapter so a plain `String` can flow through `RecorderError::sink`
/// without a dependency on `anyhow`/`eyre` for this one conversion site.
#[derive(Debug)]
struct StringifiedError(String);

impl std::fmt::Display for StringifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for StringifiedError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{BlockingVideoSourceFactory, FakeSink, FakeSourceFactory};
    use recorder_core::{OrchestratorStatus, TrackId, VideoSourceType, RECORDER_DEFAULT_SPEED};
    use std::thread;
    use std::time::Duration;

    fn new_orchestrator() -> (Orchestrator, crate::testkit::FakeSinkHandle) {
        let sink = FakeSink::new();
        let handle = sink.handle();
        let orch = Orchestrator::new(Box::new(FakeSourceFactory), Box::new(sink));
        (orch, handle)
    }

    // S1 — full lifecycle with one video + one audio source; sink sees one
    // AddTrackSource per source and a steady stream of WriteData calls.
    #[test]
    fn s1_full_recording_lifecycle_drives_both_tracks() {
        let (orch, sink) = new_orchestrator();

        let video_id = orch
            .set_video_source(VideoSourceType::SurfaceYuv as i32)
            .unwrap();
        orch.set_video_encoder(video_id, 1 /* H264 */).unwrap();
        orch.set_video_size(video_id, 1280, 720).unwrap();
        orch.set_video_frame_rate(video_id, 30).unwrap();
        orch.set_video_encoding_bit_rate(video_id, 4_000_000).unwrap();

        let audio_id = orch.set_audio_source(0 /* AUDIO_DEFAULT */).unwrap();
        orch.set_audio_encoder(audio_id, 1 /* AAC_LC */).unwrap();
        orch.set_audio_sample_rate(audio_id, 48_000).unwrap();
        orch.set_audio_channels(audio_id, 2).unwrap();
        orch.set_audio_encoding_bit_rate(audio_id, 96_000).unwrap();
        orch.set_audio_bit_width(audio_id, 16).unwrap();

        orch.set_output_format(1 /* MPEG_4 */).unwrap();

        orch.prepare().unwrap();
        assert_eq!(sink.track_count(), 2);

        orch.start().unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Recording);

        // Let both worker threads produce a handful of frames.
        thread::sleep(Duration::from_millis(50));

        orch.stop(true).unwrap();
        assert!(sink.write_count(TrackId(0)) > 0);
        assert!(sink.write_count(TrackId(1)) > 0);
        assert!(!sink.is_started());
    }

    // S2 — invalid encoder value is rejected; Prepare later fails because
    // the encoder was never actually set away from VIDEO_DEFAULT.
    #[test]
    fn s2_invalid_encoder_rejected_then_prepare_fails() {
        let (orch, _sink) = new_orchestrator();
        let id = orch.set_video_source(0).unwrap();
        let err = orch.set_video_encoder(id, 999).unwrap_err();
        assert!(matches!(err, RecorderError::InvalidParam(_)));

        orch.set_video_size(id, 1280, 720).unwrap();
        orch.set_video_frame_rate(id, 30).unwrap();
        orch.set_video_encoding_bit_rate(id, 1_000_000).unwrap();

        let err = orch.prepare().unwrap_err();
        assert!(matches!(err, RecorderError::InvalidParam(_)));
    }

    // S3 — SetOutputFile rejects a read-only fd, accepts a writable one.
    #[test]
    #[cfg(unix)]
    fn s3_output_file_rejects_read_only_fd_accepts_writable() {
        use std::ffi::CString;

        let (orch, _sink) = new_orchestrator();
        let path = CString::new("/dev/null").unwrap();

        let ro_fd = unsafe { libc::open(path.as_ptr(), libc::O_RDONLY) };
        assert!(ro_fd >= 0);
        let err = orch.set_output_file(ro_fd).unwrap_err();
        assert!(matches!(err, RecorderError::InvalidParam(_)));
        unsafe { libc::close(ro_fd) };

        let wo_fd = unsafe { libc::open(path.as_ptr(), libc::O_WRONLY) };
        assert!(wo_fd >= 0);
        orch.set_output_file(wo_fd).unwrap();
        unsafe { libc::close(wo_fd) };
    }

    // S4 — negative width is rejected and the slot is left unchanged.
    #[test]
    fn s4_negative_video_size_rejected_leaves_slot_unchanged() {
        let (orch, _sink) = new_orchestrator();
        let id = orch.set_video_source(0).unwrap();
        let err = orch.set_video_size(id, -1, 720).unwrap_err();
        assert!(matches!(err, RecorderError::InvalidParam(_)));

        let inner = orch.inner.lock().unwrap();
        let index = inner.registry.lookup(id).unwrap();
        let handle = inner.registry.video(index).unwrap();
        assert_eq!(handle.config.width, 0);
        assert_eq!(handle.config.height, 0);
    }

    // S5 — a second Pause while already PAUSED is illegal.
    #[test]
    fn s5_double_pause_is_illegal_state() {
        let (orch, _sink) = minimal_video_only();
        orch.prepare().unwrap();
        orch.start().unwrap();
        orch.pause().unwrap();
        let err = orch.pause().unwrap_err();
        assert!(matches!(err, RecorderError::IllegalState(_)));
        assert_eq!(orch.status(), OrchestratorStatus::Paused);
    }

    // S6 — configure, run a full cycle, reset, configure again, run again,
    // release; the destructor after Release must be a no-op.
    #[test]
    fn s6_full_life_cycle_twice_then_release() {
        let (orch, sink) = minimal_video_only();
        orch.prepare().unwrap();
        orch.start().unwrap();
        orch.pause().unwrap();
        orch.resume().unwrap();
        orch.stop(true).unwrap();
        orch.reset().unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Initialized);
        assert_eq!(sink.track_count(), 0);

        let id = orch.set_video_source(0).unwrap();
        orch.set_video_encoder(id, 1).unwrap();
        orch.set_video_size(id, 640, 480).unwrap();
        orch.set_video_frame_rate(id, 30).unwrap();
        orch.set_video_encoding_bit_rate(id, 1_000_000).unwrap();
        orch.prepare().unwrap();
        orch.start().unwrap();
        orch.release().unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Released);

        drop(orch);
    }

    fn minimal_video_only() -> (Orchestrator, crate::testkit::FakeSinkHandle) {
        let (orch, sink, _id) = minimal_video_only_with_id();
        (orch, sink)
    }

    fn minimal_video_only_with_id() -> (Orchestrator, crate::testkit::FakeSinkHandle, SourceId) {
        let (orch, sink) = new_orchestrator();
        let id = orch.set_video_source(0).unwrap();
        orch.set_video_encoder(id, 1).unwrap();
        orch.set_video_size(id, 640, 480).unwrap();
        orch.set_video_frame_rate(id, 30).unwrap();
        orch.set_video_encoding_bit_rate(id, 1_000_000).unwrap();
        (orch, sink, id)
    }

    // P1 — configuration setters (other than SetNextOutputFile/SetParameter)
    // reject calls outside INITIALIZED and leave slot config untouched.
    #[test]
    fn p1_setters_illegal_outside_initialized() {
        let (orch, _sink, id) = minimal_video_only_with_id();
        orch.prepare().unwrap();

        let err = orch.set_video_encoder(id, 1).unwrap_err();
        assert!(matches!(err, RecorderError::IllegalState(_)));
        let err = orch.set_video_size(id, 99, 99).unwrap_err();
        assert!(matches!(err, RecorderError::IllegalState(_)));

        let inner = orch.inner.lock().unwrap();
        let index = inner.registry.lookup(id).unwrap();
        let handle = inner.registry.video(index).unwrap();
        assert_eq!(handle.config.width, 640);
        assert_eq!(handle.config.height, 480);
    }

    // P2 — a valid source-id keeps resolving to the same slot until the
    // registry is cleared by Reset.
    #[test]
    fn p2_lookup_stable_until_reset() {
        let (orch, _sink) = new_orchestrator();
        let id = orch.set_video_source(0).unwrap();
        let inner = orch.inner.lock().unwrap();
        let first = inner.registry.lookup(id).unwrap();
        drop(inner);

        let inner = orch.inner.lock().unwrap();
        let second = inner.registry.lookup(id).unwrap();
        assert_eq!(first, second);
        drop(inner);

        orch.reset().unwrap();
        let inner = orch.inner.lock().unwrap();
        assert!(inner.registry.lookup(id).is_err());
    }

    // P4 — exactly one worker thread exists per started source, and none
    // after Stop returns.
    #[test]
    fn p4_worker_count_tracks_start_stop() {
        let (orch, _sink, id) = minimal_video_only_with_id();
        orch.prepare().unwrap();
        orch.start().unwrap();
        {
            let mut inner = orch.inner.lock().unwrap();
            let index = inner.registry.lookup(id).unwrap();
            let handle = inner.registry.video_mut(index).unwrap();
            assert!(handle.worker.is_some());
        }
        orch.stop(true).unwrap();
        let mut inner = orch.inner.lock().unwrap();
        let index = inner.registry.lookup(id).unwrap();
        let handle = inner.registry.video_mut(index).unwrap();
        assert!(handle.worker.is_none());
    }

    // P5 — while paused, writes are suppressed but ReleaseBuffer still runs
    // every iteration (frame_counter keeps advancing).
    #[test]
    fn p5_paused_source_suppresses_writes_but_keeps_acquiring() {
        let (orch, sink) = minimal_video_only();
        orch.prepare().unwrap();
        orch.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        orch.pause().unwrap();
        // Let any write already in flight when `paused` flipped settle.
        thread::sleep(Duration::from_millis(10));
        let writes_at_pause = sink.write_count(TrackId(0));
        thread::sleep(Duration::from_millis(30));
        let writes_after_pause = sink.write_count(TrackId(0));
        assert_eq!(writes_at_pause, writes_after_pause);
        orch.stop(true).unwrap();
    }

    // P6 — the documented status transition graph; off-graph transitions
    // are rejected with IllegalState.
    #[test]
    fn p6_status_transition_graph() {
        let (orch, _sink) = minimal_video_only();
        assert_eq!(orch.status(), OrchestratorStatus::Initialized);
        assert!(orch.pause().is_err());
        orch.prepare().unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Prepared);
        assert!(orch.pause().is_err());
        orch.start().unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Recording);
        orch.pause().unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Paused);
        orch.resume().unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Recording);
        orch.stop(true).unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Stopped);
        orch.start().unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Recording);
        orch.release().unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Released);
        assert!(orch.release().is_err());
    }

    // P7 — SourceId encoding: kind base offset plus slot index.
    #[test]
    fn p7_source_id_encodes_kind_and_index() {
        let (orch, _sink) = new_orchestrator();
        let video_id = orch.set_video_source(0).unwrap();
        let audio_id = orch.set_audio_source(0).unwrap();
        let data_id = orch.set_data_source(0).unwrap();
        assert_eq!(video_id.raw() & !0xFFu32, 0x000);
        assert_eq!(audio_id.raw() & !0xFFu32, 0x100);
        assert_eq!(data_id.raw() & !0xFFu32, 0x200);
    }

    // P3 — configure -> Prepare -> Start -> Stop -> Reset leaves the
    // registry equal (field-by-field) to its just-constructed state: every
    // slot free again, the old id no longer resolving, and a freshly
    // configured video source defaulting to RECORDER_DEFAULT_SPEED (1.0),
    // not some value left over from the round trip.
    #[test]
    fn p3_round_trip_leaves_registry_just_constructed() {
        let (orch, sink, old_id) = minimal_video_only_with_id();

        orch.prepare().unwrap();
        orch.start().unwrap();
        orch.stop(true).unwrap();
        orch.reset().unwrap();

        assert_eq!(orch.status(), OrchestratorStatus::Initialized);
        assert_eq!(sink.track_count(), 0);

        {
            let inner = orch.inner.lock().unwrap();
            assert_eq!(inner.registry.free_video_index(), Some(0));
            assert_eq!(inner.registry.free_audio_index(), Some(0));
            assert_eq!(inner.registry.free_data_index(), Some(0));
            assert!(inner.registry.lookup(old_id).is_err());
            assert_eq!(inner.output_format, OutputFormatType::Default);
            assert!(inner.output_path.is_none());
            assert!(inner.max_duration_us.is_none());
            assert!(inner.max_file_size_bytes.is_none());
            assert!(inner.location.is_none());
        }

        // A video source configured fresh after the round trip starts at
        // the same default speed a brand-new registry's config would.
        let id = orch.set_video_source(0).unwrap();
        let inner = orch.inner.lock().unwrap();
        let index = inner.registry.lookup(id).unwrap();
        let handle = inner.registry.video(index).unwrap();
        assert_eq!(handle.config.speed, RECORDER_DEFAULT_SPEED);
    }

    // Regression for the worker/stop deadlock: a source whose
    // `acquire_buffer(true)` blocks indefinitely (simulating hardware that
    // never produces another frame) must still let `Stop` unblock it and
    // join promptly, since `Source::stop` no longer shares a lock with the
    // blocked call.
    #[test]
    fn stop_unblocks_worker_parked_in_blocking_acquire() {
        let sink = FakeSink::new();
        let orch = Orchestrator::new(Box::new(BlockingVideoSourceFactory), Box::new(sink));
        let id = orch.set_video_source(0).unwrap();
        orch.set_video_encoder(id, 1).unwrap();
        orch.set_video_size(id, 640, 480).unwrap();
        orch.set_video_frame_rate(id, 30).unwrap();
        orch.set_video_encoding_bit_rate(id, 1_000_000).unwrap();
        orch.prepare().unwrap();
        orch.start().unwrap();

        // Give the worker thread time to actually enter the blocking
        // acquire_buffer call before we ask it to stop.
        thread::sleep(Duration::from_millis(20));

        // Under the old `Arc<Mutex<Box<dyn Source>>>` modeling this would
        // hang forever: `stop_sources` would try to lock the same mutex
        // the worker holds for the duration of its blocked acquire call.
        orch.stop(true).unwrap();
        assert_eq!(orch.status(), OrchestratorStatus::Stopped);
    }

    // Sink forwarding: every output-configuration setter must reach the
    // sink, not just update Inner — SetNextOutputFile in particular used
    // to be a silent no-op.
    #[test]
    #[cfg(unix)]
    fn output_setters_forward_to_sink() {
        use std::ffi::CString;

        let (orch, sink) = new_orchestrator();
        orch.set_output_format(1 /* MPEG_4 */).unwrap();
        assert_eq!(sink.output_format(), Some(OutputFormatType::Mpeg4));

        orch.set_max_duration(5_000_000).unwrap();
        assert_eq!(sink.max_duration_us(), Some(5_000_000));

        orch.set_max_file_size(1_048_576).unwrap();
        assert_eq!(sink.max_file_size_bytes(), Some(1_048_576));

        orch.set_location(37.0, -122.0).unwrap();
        assert_eq!(sink.location(), Some((37.0, -122.0)));

        let path = CString::new("/dev/null").unwrap();
        let fd = unsafe { libc::open(path.as_ptr(), libc::O_WRONLY) };
        assert!(fd >= 0);
        orch.set_output_file(fd).unwrap();
        assert_eq!(sink.output_file_fd(), Some(fd));

        let next_fd = unsafe { libc::open(path.as_ptr(), libc::O_WRONLY) };
        assert!(next_fd >= 0);
        orch.set_next_output_file(next_fd).unwrap();
        assert_eq!(sink.next_output_file_fd(), Some(next_fd));
        unsafe {
            libc::close(fd);
            libc::close(next_fd);
        }

        struct NoopCallback;
        impl RecorderCallback for NoopCallback {
            fn on_event(&self, _event: recorder_core::RecorderEvent) {}
        }
        orch.set_recorder_callback(Box::new(NoopCallback)).unwrap();
        assert!(sink.callback_registered());
    }
}

