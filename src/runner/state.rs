use std::fmt;

/// Where a runner currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Init,
    Authenticating,
    LoggedIn,
    PollingTasks,
    Cooldown,
    /// The messenger session is unusable; the runner has stopped.
    Fatal,
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunnerState::Init => "INIT",
            RunnerState::Authenticating => "AUTHENTICATING",
            RunnerState::LoggedIn => "LOGGED_IN",
            RunnerState::PollingTasks => "POLLING_TASKS",
            RunnerState::Cooldown => "COOLDOWN",
            RunnerState::Fatal => "FATAL",
        };
        write!(f, "{name}")
    }
}

/// How a single cycle ended, when it did not end fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Tasks were polled; followed by the regular random sleep.
    Completed,
    /// The handshake produced no init data; followed by the login cooldown.
    AuthUnavailable,
    /// The service refused the init data; followed by the login cooldown.
    LoginRejected,
    /// Something else failed mid-cycle; retried after a short pause.
    Errored,
}
