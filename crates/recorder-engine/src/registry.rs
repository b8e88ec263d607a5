// crates/recorder-engine/src/registry.rs
//
// `SourceRegistry` mirrors the original's `sourceManager_[RECORDER_SOURCE_MAX_CNT]`
// array exactly: ONE fixed array of slots, each slot able to hold a video
// *and* an audio *and* a data source at the same time (three independent
// optional fields), not three separate per-kind arrays. `GetFreeVideoSourceID`
// scans for the first slot whose `video` field is empty, ignoring whatever
// the slot's `audio`/`data` fields hold, and the reverse for the other two
// kinds.
//
// `lookup` preserves the original's permissive `GetIndexBySourceID`: it
// decodes an index from the id's numeric value and checks only that *some*
// field in that slot is occupied, not that the specific kind implied by the
// id is the one present. See spec.md §9 and DESIGN.md.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::JoinHandle;

use recorder_core::{
    AudioSourceConfig, DataSourceConfig, RecorderError, Source, SourceId, SourceKind,
    TrackId, VideoSourceConfig, RECORDER_SOURCE_MAX_CNT,
};

/// Shared state for one live source: the `Source` implementation (shared,
/// not locked — `Source: Send + Sync` puts the burden of interior
/// mutability on the implementor so `stop` can run while this source's
/// worker thread is parked in a blocking `acquire_buffer`; see the
/// `Source` trait doc comment), and the cross-thread flags the worker loop
/// checks every iteration.
pub struct SourceHandle<C> {
    pub config: C,
    pub source: Arc<dyn Source>,
    pub started: Arc<AtomicBool>,
    pub paused: Arc<AtomicBool>,
    pub track_id: Option<TrackId>,
    pub worker: Option<JoinHandle<()>>,
}

impl<C> SourceHandle<C> {
    fn new(config: C, source: Box<dyn Source>) -> Self {
        SourceHandle {
            config,
            source: Arc::from(source),
            started: Arc::new(AtomicBool::new(false)),
            paused: Arc::new(AtomicBool::new(false)),
            track_id: None,
            worker: None,
        }
    }
}

#[derive(Default)]
struct Slot {
    video: Option<SourceHandle<VideoSourceConfig>>,
    audio: Option<SourceHandle<AudioSourceConfig>>,
    data: Option<SourceHandle<DataSourceConfig>>,
}

pub struct SourceRegistry {
    slots: [Slot; RECORDER_SOURCE_MAX_CNT],
}

impl Default for SourceRegistry {
    fn default() -> Self {
        SourceRegistry {
            slots: Default::default(),
        }
    }
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn free_index(&self, has: impl Fn(&Slot) -> bool) -> Option<usize> {
        self.slots.iter().position(|s| !has(s))
    }

    pub fn free_video_index(&self) -> Option<usize> {
        self.free_index(|s| s.video.is_some())
    }

    pub fn free_audio_index(&self) -> Option<usize> {
        self.free_index(|s| s.audio.is_some())
    }

    pub fn free_data_index(&self) -> Option<usize> {
        self.free_index(|s| s.data.is_some())
    }

    pub fn insert_video(&mut self, index: usize, config: VideoSourceConfig, source: Box<dyn Source>) -> SourceId {
        self.slots[index].video = Some(SourceHandle::new(config, source));
        SourceId::new(SourceKind::Video, index)
    }

    pub fn insert_audio(&mut self, index: usize, config: AudioSourceConfig, source: Box<dyn Source>) -> SourceId {
        self.slots[index].audio = Some(SourceHandle::new(config, source));
        SourceId::new(SourceKind::Audio, index)
    }

    pub fn insert_data(&mut self, index: usize, config: DataSourceConfig, source: Box<dyn Source>) -> SourceId {
        self.slots[index].data = Some(SourceHandle::new(config, source));
        SourceId::new(SourceKind::Data, index)
    }

    pub fn video_mut(&mut self, index: usize) -> Option<&mut SourceHandle<VideoSourceConfig>> {
        self.slots.get_mut(index)?.video.as_mut()
    }

    pub fn audio_mut(&mut self, index: usize) -> Option<&mut SourceHandle<AudioSourceConfig>> {
        self.slots.get_mut(index)?.audio.as_mut()
    }

    pub fn data_mut(&mut self, index: usize) -> Option<&mut SourceHandle<DataSourceConfig>> {
        self.slots.get_mut(index)?.data.as_mut()
    }

    pub fn video(&self, index: usize) -> Option<&SourceHandle<VideoSourceConfig>> {
        self.slots.get(index)?.video.as_ref()
    }

    pub fn audio(&self, index: usize) -> Option<&SourceHandle<AudioSourceConfig>> {
        self.slots.get(index)?.audio.as_ref()
    }

    pub fn data(&self, index: usize) -> Option<&SourceHandle<DataSourceConfig>> {
        self.slots.get(index)?.data.as_ref()
    }

    /// The original's `GetIndexBySourceID`: bounds-check the decoded index,
    /// then accept it as long as *any* field of that slot is occupied.
    /// Does not confirm the occupied field matches `id.kind_hint()` — that
    /// mismatch is the permissive-lookup behavior spec.md §9 documents.
    pub fn lookup(&self, id: SourceId) -> Result<usize, RecorderError> {
        let index = id.index();
        let slot = self
            .slots
            .get(index)
            .ok_or(RecorderError::InvalidParam("source id index out of range"))?;
        if slot.video.is_some() || slot.audio.is_some() || slot.data.is_some() {
            Ok(index)
        } else {
            Err(RecorderError::InvalidParam("no source registered at that id"))
        }
    }

    pub fn iter_video(&self) -> impl Iterator<Item = (usize, &SourceHandle<VideoSourceConfig>)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.video.as_ref().map(|h| (i, h)))
    }

    pub fn iter_audio(&self) -> impl Iterator<Item = (usize, &SourceHandle<AudioSourceConfig>)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.audio.as_ref().map(|h| (i, h)))
    }

    pub fn iter_data(&self) -> impl Iterator<Item = (usize, &SourceHandle<DataSourceConfig>)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.data.as_ref().map(|h| (i, h)))
    }

    pub fn iter_video_mut(&mut self) -> impl Iterator<Item = (usize, &mut SourceHandle<VideoSourceConfig>)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| s.video.as_mut().map(|h| (i, h)))
    }

    pub fn iter_audio_mut(&mut self) -> impl Iterator<Item = (usize, &mut SourceHandle<AudioSourceConfig>)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| s.audio.as_mut().map(|h| (i, h)))
    }

    pub fn iter_data_mut(&mut self) -> impl Iterator<Item = (usize, &mut SourceHandle<DataSourceConfig>)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| s.data.as_mut().map(|h| (i, h)))
    }

    /// `ResetConfig`: drop every source handle and config back to defaults.
    pub fn reset(&mut self) {
        self.slots = Default::default();
    }
}
