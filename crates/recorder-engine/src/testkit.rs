// crates/recorder-engine/src/testkit.rs
//
// In-memory `Source`/`Sink`/`SourceFactory` fakes used by this crate's own
// tests. Not a CLI, not a mocking framework — plain structs implementing
// the real traits, the way the teacher's own tests build fixtures
// directly rather than through a mock-object library.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use recorder_core::{
    FormatFrame, FrameFlags, ManualSplitType, OutputFormatType, RecorderCallback, RecorderError,
    RecorderResult, Sink, Source, SourceFactory, SourceKind, StringError, TrackId, TrackSource,
};

/// Synthetic capture source. Each call to `acquire_buffer` yields one
/// frame with a monotonically increasing timestamp until `stop` is
/// called, at which point it returns an error — mirroring a real source
/// whose blocking read is interrupted by the hardware being torn down.
pub struct FakeSource {
    kind: SourceKind,
    stopped: Arc<AtomicBool>,
    frame_count: Arc<AtomicU32>,
    poll_interval: Duration,
}

impl FakeSource {
    pub fn new(kind: SourceKind) -> Self {
        FakeSource {
            kind,
            stopped: Arc::new(AtomicBool::new(true)),
            frame_count: Arc::new(AtomicU32::new(0)),
            poll_interval: Duration::from_millis(2),
        }
    }

    /// Lets a test observe how many buffers this source has produced.
    pub fn frame_counter(&self) -> Arc<AtomicU32> {
        self.frame_count.clone()
    }
}

impl Source for FakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn start(&self) -> RecorderResult<()> {
        self.stopped.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> RecorderResult<()> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) -> RecorderResult<()> {
        Ok(())
    }

    fn resume(&self) -> RecorderResult<()> {
        Ok(())
    }

    fn acquire_buffer(&self, blocking: bool) -> RecorderResult<FormatFrame> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(RecorderError::source(StringError::from("source stopped")));
        }
        if !blocking {
            std::thread::sleep(self.poll_interval);
        }
        let n = self.frame_count.fetch_add(1, Ordering::SeqCst);
        Ok(FormatFrame {
            data: vec![0u8; 16],
            timestamp_us: n as i64 * 1000,
            flags: FrameFlags { key_frame: n == 0 },
        })
    }

    fn release_buffer(&self) -> RecorderResult<()> {
        Ok(())
    }
}

/// A source whose `acquire_buffer(true)` never returns on its own — it
/// parks on a condvar exactly like a real capture source waiting on
/// hardware that will never produce another frame. Only `stop` wakes it.
/// Used to exercise the concurrency contract `FakeSource` is too
/// cooperative to cover: a real blocking acquire must not be serialized
/// behind the same lock `stop` needs.
pub struct BlockingFakeSource {
    kind: SourceKind,
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl BlockingFakeSource {
    pub fn new(kind: SourceKind) -> Self {
        BlockingFakeSource {
            kind,
            state: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }
}

impl Source for BlockingFakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn start(&self) -> RecorderResult<()> {
        Ok(())
    }

    fn stop(&self) -> RecorderResult<()> {
        let (lock, cvar) = &*self.state;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
        Ok(())
    }

    fn pause(&self) -> RecorderResult<()> {
        Ok(())
    }

    fn resume(&self) -> RecorderResult<()> {
        Ok(())
    }

    fn acquire_buffer(&self, _blocking: bool) -> RecorderResult<FormatFrame> {
        let (lock, cvar) = &*self.state;
        let guard = lock.lock().unwrap();
        let _ = cvar.wait_while(guard, |stopped| !*stopped).unwrap();
        Err(RecorderError::source(StringError::from("source stopped")))
    }

    fn release_buffer(&self) -> RecorderResult<()> {
        Ok(())
    }
}

pub struct FakeSourceFactory;

impl SourceFactory for FakeSourceFactory {
    fn create_video(&self) -> Box<dyn Source> {
        Box::new(FakeSource::new(SourceKind::Video))
    }

    fn create_audio(&self) -> Box<dyn Source> {
        Box::new(FakeSource::new(SourceKind::Audio))
    }

    fn create_data(&self) -> Box<dyn Source> {
        Box::new(FakeSource::new(SourceKind::Data))
    }
}

/// Like [`FakeSourceFactory`] but hands out a [`BlockingFakeSource`] for
/// the video slot, so a test can drive a worker thread into a genuinely
/// blocked `acquire_buffer` and confirm `Stop` still unblocks it promptly.
pub struct BlockingVideoSourceFactory;

impl SourceFactory for BlockingVideoSourceFactory {
    fn create_video(&self) -> Box<dyn Source> {
        Box::new(BlockingFakeSource::new(SourceKind::Video))
    }

    fn create_audio(&self) -> Box<dyn Source> {
        Box::new(FakeSource::new(SourceKind::Audio))
    }

    fn create_data(&self) -> Box<dyn Source> {
        Box::new(FakeSource::new(SourceKind::Data))
    }
}

#[derive(Default)]
struct FakeSinkState {
    prepared: bool,
    started: bool,
    next_track_id: u32,
    tracks: Vec<TrackSource>,
    writes_by_track: std::collections::HashMap<u32, u32>,
    params: std::collections::HashMap<String, String>,
    split_calls: Vec<(ManualSplitType, i64)>,
    output_format: Option<OutputFormatType>,
    output_path: Option<PathBuf>,
    output_file_fd: Option<i32>,
    next_output_file_fd: Option<i32>,
    max_duration_us: Option<i64>,
    max_file_size_bytes: Option<u64>,
    location: Option<(f32, f32)>,
    callback_registered: bool,
}

/// In-memory muxer fake. Records what it was asked to do rather than
/// producing real media — enough to assert the Orchestrator drove it in
/// the right order with the right data.
///
/// State lives behind an `Arc` so a test can keep a [`FakeSinkHandle`] for
/// inspection after handing the `FakeSink` itself to the Orchestrator as
/// a `Box<dyn Sink>`.
#[derive(Default)]
pub struct FakeSink {
    state: Arc<Mutex<FakeSinkState>>,
}

impl FakeSink {
    pub fn new() -> Self {
        FakeSink::default()
    }

    pub fn handle(&self) -> FakeSinkHandle {
        FakeSinkHandle(self.state.clone())
    }
}

#[derive(Clone)]
pub struct FakeSinkHandle(Arc<Mutex<FakeSinkState>>);

impl FakeSinkHandle {
    pub fn write_count(&self, track: TrackId) -> u32 {
        self.0
            .lock()
            .unwrap()
            .writes_by_track
            .get(&track.0)
            .copied()
            .unwrap_or(0)
    }

    pub fn track_count(&self) -> usize {
        self.0.lock().unwrap().tracks.len()
    }

    pub fn tracks(&self) -> Vec<TrackSource> {
        self.0.lock().unwrap().tracks.clone()
    }

    pub fn is_started(&self) -> bool {
        self.0.lock().unwrap().started
    }

    pub fn param(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().params.get(key).cloned()
    }

    pub fn split_calls(&self) -> Vec<(ManualSplitType, i64)> {
        self.0.lock().unwrap().split_calls.clone()
    }

    pub fn output_format(&self) -> Option<OutputFormatType> {
        self.0.lock().unwrap().output_format
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        self.0.lock().unwrap().output_path.clone()
    }

    pub fn output_file_fd(&self) -> Option<i32> {
        self.0.lock().unwrap().output_file_fd
    }

    pub fn next_output_file_fd(&self) -> Option<i32> {
        self.0.lock().unwrap().next_output_file_fd
    }

    pub fn max_duration_us(&self) -> Option<i64> {
        self.0.lock().unwrap().max_duration_us
    }

    pub fn max_file_size_bytes(&self) -> Option<u64> {
        self.0.lock().unwrap().max_file_size_bytes
    }

    pub fn location(&self) -> Option<(f32, f32)> {
        self.0.lock().unwrap().location
    }

    pub fn callback_registered(&self) -> bool {
        self.0.lock().unwrap().callback_registered
    }
}

impl Sink for FakeSink {
    fn prepare(&mut self) -> RecorderResult<()> {
        self.state.lock().unwrap().prepared = true;
        Ok(())
    }

    fn add_track_source(&mut self, track: TrackSource) -> RecorderResult<TrackId> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_track_id;
        state.next_track_id += 1;
        state.tracks.push(track);
        Ok(TrackId(id))
    }

    fn start(&mut self) -> RecorderResult<()> {
        self.state.lock().unwrap().started = true;
        Ok(())
    }

    fn stop(&mut self, _block: bool) -> RecorderResult<()> {
        self.state.lock().unwrap().started = false;
        Ok(())
    }

    fn reset(&mut self) -> RecorderResult<()> {
        *self.state.lock().unwrap() = FakeSinkState::default();
        Ok(())
    }

    fn release(&mut self) -> RecorderResult<()> {
        self.state.lock().unwrap().started = false;
        Ok(())
    }

    fn write_data(&mut self, track: TrackId, _frame: FormatFrame) -> RecorderResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state.started {
            // Between Pause's `stop` and Resume's `start` the sink must
            // tolerate writes rather than error — see the Sink trait doc
            // comment.
            return Ok(());
        }
        *state.writes_by_track.entry(track.0).or_insert(0) += 1;
        Ok(())
    }

    fn set_manual_split_duration(
        &mut self,
        split: ManualSplitType,
        duration_us: i64,
    ) -> RecorderResult<()> {
        self.state.lock().unwrap().split_calls.push((split, duration_us));
        Ok(())
    }

    fn set_parameter(&mut self, key: &str, value: &str) -> RecorderResult<()> {
        self.state
            .lock()
            .unwrap()
            .params
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_output_format(&mut self, format: OutputFormatType) -> RecorderResult<()> {
        self.state.lock().unwrap().output_format = Some(format);
        Ok(())
    }

    fn set_output_path(&mut self, path: &Path) -> RecorderResult<()> {
        self.state.lock().unwrap().output_path = Some(path.to_path_buf());
        Ok(())
    }

    fn set_output_file(&mut self, fd: i32) -> RecorderResult<()> {
        self.state.lock().unwrap().output_file_fd = Some(fd);
        Ok(())
    }

    fn set_next_output_file(&mut self, fd: i32) -> RecorderResult<()> {
        self.state.lock().unwrap().next_output_file_fd = Some(fd);
        Ok(())
    }

    fn set_max_duration(&mut self, duration_us: i64) -> RecorderResult<()> {
        self.state.lock().unwrap().max_duration_us = Some(duration_us);
        Ok(())
    }

    fn set_max_file_size(&mut self, bytes: u64) -> RecorderResult<()> {
        self.state.lock().unwrap().max_file_size_bytes = Some(bytes);
        Ok(())
    }

    fn set_location(&mut self, latitude: f32, longitude: f32) -> RecorderResult<()> {
        self.state.lock().unwrap().location = Some((latitude, longitude));
        Ok(())
    }

    fn set_recorder_callback(
        &mut self,
        _callback: Arc<Mutex<Option<Box<dyn RecorderCallback>>>>,
    ) -> RecorderResult<()> {
        self.state.lock().unwrap().callback_registered = true;
        Ok(())
    }
}
