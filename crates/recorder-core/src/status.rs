// crates/recorder-core/src/status.rs

/// Orchestrator lifecycle. Transitions are enforced by `Orchestrator`, not
/// by this type — it is plain data, matching the original's `status_`
/// field (an enum class, not a state-machine object in its own right).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrchestratorStatus {
    Initialized,
    Prepared,
    Recording,
    Paused,
    Stopped,
    /// Terminal. No operation is legal from here except `Drop`.
    Released,
}

impl OrchestratorStatus {
    pub fn name(self) -> &'static str {
        match self {
            OrchestratorStatus::Initialized => "INITIALIZED",
            OrchestratorStatus::Prepared => "PREPARED",
            OrchestratorStatus::Recording => "RECORDING",
            OrchestratorStatus::Paused => "PAUSED",
            OrchestratorStatus::Stopped => "STOPPED",
            OrchestratorStatus::Released => "RELEASED",
        }
    }
}

impl std::fmt::Display for OrchestratorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
