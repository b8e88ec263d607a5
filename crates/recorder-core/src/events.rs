// crates/recorder-core/src/events.rs
//
// `SetRecorderCallback`'s event surface. The original reports errors and
// informational events (e.g. max duration reached, max file size reached)
// through a callback interface rather than a channel; we keep that shape
// since the caller, not the Orchestrator, decides how to route events
// (log them, forward over IPC, ...).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecorderEvent {
    /// A worker or sink reported an error that does not itself tear down
    /// the orchestrator (the original's `OnError`); `code` mirrors the
    /// original's error-type tag, `extra` a secondary detail value.
    Error { code: i32, extra: i32 },
    /// Informational events such as max duration/file-size reached
    /// (the original's `OnInfo`).
    Info { code: i32, extra: i32 },
}

/// Registered once via `Orchestrator::set_recorder_callback`. Invoked from
/// whichever thread detects the condition (a worker thread for frame
/// errors, the calling thread for synchronous setter failures are NOT
/// routed here — only asynchronous conditions are).
pub trait RecorderCallback: Send {
    fn on_event(&self, event: RecorderEvent);
}
