//! Runner configuration.

use crate::runtimes::checkpointer::CheckpointerType;

/// Environment variable consulted for the default step limit.
pub const MAX_STEPS_ENV: &str = "THREADFLOW_MAX_STEPS";

/// Configuration attached to a compiled workflow.
///
/// Set at graph build time via
/// [`GraphBuilder::with_runner_config`](crate::graphs::GraphBuilder::with_runner_config).
/// `max_steps` defaults from the `THREADFLOW_MAX_STEPS` environment variable
/// (a `.env` file is honored via `dotenvy`); per-run
/// [`RunOptions`](crate::runtimes::runner::RunOptions) override it.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Fixed session id for single-session deployments. When unset, callers
    /// name sessions explicitly or let the runner mint ids.
    pub session_id: Option<String>,
    /// Checkpoint store selection.
    pub checkpointer: CheckpointerType,
    /// Default upper bound on steps emitted per run. `None` means unbounded.
    pub max_steps: Option<u32>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            checkpointer: CheckpointerType::InMemory,
            max_steps: max_steps_from_env(),
        }
    }
}

impl RunnerConfig {
    #[must_use]
    pub fn new(
        session_id: Option<String>,
        checkpointer: CheckpointerType,
        max_steps: Option<u32>,
    ) -> Self {
        Self {
            session_id,
            checkpointer,
            max_steps,
        }
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    #[must_use]
    pub fn with_checkpointer(mut self, checkpointer: CheckpointerType) -> Self {
        self.checkpointer = checkpointer;
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

fn max_steps_from_env() -> Option<u32> {
    // Loads .env once per lookup; dotenvy is a no-op after the first load
    // and when no .env file exists.
    let _ = dotenvy::dotenv();
    std::env::var(MAX_STEPS_ENV).ok()?.parse().ok()
}
