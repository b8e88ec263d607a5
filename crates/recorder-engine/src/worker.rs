// crates/recorder-engine/src/worker.rs
//
// One OS thread per live source, mirroring `VideoSourceProcess`/
// `AudioSourceProcess`/`DataSourceProcess` in the original: acquire a
// buffer, forward it to the sink unless paused, always release the
// buffer, loop while `started` holds. Grounded on velocut-media's
// `worker.rs` for the general shape (named threads, `Arc<AtomicBool>`
// shutdown flags) — the original has no channel/condvar handoff here at
// all, so none is added; the loop is a plain blocking `while`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use recorder_core::{RecorderCallback, RecorderEvent, Sink, Source, TrackId};

/// `RECORDER_VIDEO_THREAD_PRIORITY` / `RECORDER_AUDIO_THREAD_PRIORITY`
/// from the original; data tracks share the audio priority, matching
/// `DataSourceProcess`.
pub const VIDEO_THREAD_PRIORITY: i32 = 20;
pub const AUDIO_THREAD_PRIORITY: i32 = 19;
pub const DATA_THREAD_PRIORITY: i32 = 19;

#[cfg_attr(not(unix), allow(unused_variables))]
fn apply_realtime_priority(thread_name: &str, priority: i32) {
    #[cfg(all(unix, feature = "rt-scheduling"))]
    {
        // SAFETY: `sched_param`/`sched_setscheduler` are called on the
        // calling (current) thread with a priority value in the valid
        // SCHED_RR range; failure is recoverable (we just log and keep
        // running at the default scheduling class).
        unsafe {
            // Zero-initialize rather than a struct literal: glibc/musl
            // disagree on whether `sched_param` carries reserved fields
            // beyond `sched_priority`.
            let mut param: libc::sched_param = std::mem::zeroed();
            param.sched_priority = priority;
            let rc = libc::sched_setscheduler(0, libc::SCHED_RR, &param);
            if rc != 0 {
                tracing::info!(
                    thread = thread_name,
                    priority,
                    "SCHED_RR unavailable, continuing at default scheduling class"
                );
            }
        }
    }
    #[cfg(not(all(unix, feature = "rt-scheduling")))]
    {
        tracing::info!(
            thread = thread_name,
            priority,
            "real-time scheduling not available on this build, skipping"
        );
    }
}

/// Spawns the per-source worker thread and returns its handle. `started`
/// must already be `true` when this is called — the caller (`Orchestrator`)
/// sets it before spawning, exactly like `StartVideoSource` et al.
pub fn spawn(
    thread_name: String,
    priority: i32,
    blocking: bool,
    source: Arc<dyn Source>,
    started: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    sink: Arc<Mutex<Box<dyn Sink>>>,
    track_id: TrackId,
    callback: Arc<Mutex<Option<Box<dyn RecorderCallback>>>>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            apply_realtime_priority(&thread_name, priority);
            run_loop(
                &thread_name,
                blocking,
                &source,
                &started,
                &paused,
                &sink,
                track_id,
                &callback,
            );
        })
}

fn notify(callback: &Mutex<Option<Box<dyn RecorderCallback>>>, event: RecorderEvent) {
    if let Some(cb) = callback.lock().expect("callback mutex poisoned").as_deref() {
        cb.on_event(event);
    }
}

fn run_loop(
    thread_name: &str,
    blocking: bool,
    source: &Arc<dyn Source>,
    started: &AtomicBool,
    paused: &AtomicBool,
    sink: &Arc<Mutex<Box<dyn Sink>>>,
    track_id: TrackId,
    callback: &Mutex<Option<Box<dyn RecorderCallback>>>,
) {
    while started.load(Ordering::SeqCst) {
        // No lock held across this call: `acquire_buffer(true)` may block
        // indefinitely, and `Source::stop` (called from the thread driving
        // Stop/Reset/Release/Drop) must be able to run concurrently and
        // unblock it rather than wait behind it.
        let frame = match source.acquire_buffer(blocking) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(thread = thread_name, error = %e, "acquire_buffer failed");
                notify(callback, RecorderEvent::Error { code: 1, extra: 0 });
                // The original neither releases nor exits here — it just
                // loops back around and tries again (the `started` check
                // above is what actually ends the loop after `stop`).
                continue;
            }
        };

        if !paused.load(Ordering::SeqCst) {
            let mut sink_guard = sink.lock().expect("sink mutex poisoned");
            if let Err(e) = sink_guard.write_data(track_id, frame) {
                tracing::error!(thread = thread_name, error = %e, "write_data failed");
                notify(callback, RecorderEvent::Error { code: 2, extra: 0 });
            }
        }

        // Released unconditionally: whether paused, whether the write
        // above succeeded.
        if let Err(e) = source.release_buffer() {
            tracing::error!(thread = thread_name, error = %e, "release_buffer failed");
            notify(callback, RecorderEvent::Error { code: 3, extra: 0 });
        }
    }
    tracing::debug!(thread = thread_name, "worker loop exiting");
}
