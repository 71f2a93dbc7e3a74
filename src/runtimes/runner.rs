//! Session-oriented workflow execution.
//!
//! [`WorkflowRunner`] drives a compiled [`Workflow`] one session at a time:
//! load the session's checkpoint (or start fresh), merge the run input, then
//! loop node → merge → route → commit, yielding a [`StepReport`] per step.
//! The returned stream is lazy; the consumer's pace is the execution pace,
//! and dropping the stream abandons the run without losing committed steps.

use async_stream::try_stream;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::graphs::{Edge, Transition};
use crate::node::{NodeContext, NodeError};
use crate::reducers::ReducerError;
use crate::runtimes::checkpointer::{
    Checkpoint, Checkpointer, CheckpointerError, CheckpointerType, InMemoryCheckpointer,
};
use crate::runtimes::inspector::SessionInspector;
use crate::state::{RunInput, SessionState, StateSnapshot};
use crate::types::NodeName;
use crate::utils::id_generator::IdGenerator;
use crate::workflow::Workflow;

/// One committed execution step, yielded after its checkpoint is durable.
#[derive(Clone, Debug)]
pub struct StepReport {
    /// Step number within the session; continues across resumed runs.
    pub step: u64,
    /// The node that executed.
    pub node: NodeName,
    /// State after this step's merge.
    pub state: StateSnapshot,
    /// Where execution goes next.
    pub next: Transition,
}

impl StepReport {
    /// True when this is the last step of the run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.next.is_terminal()
    }
}

/// Per-run knobs, overriding [`RunnerConfig`](crate::runtimes::runtime_config::RunnerConfig)
/// defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    /// Upper bound on steps emitted by this run.
    pub max_steps: Option<u32>,
}

impl RunOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// Stream of committed steps; ends after a terminal step or an error.
pub type StepStream = BoxStream<'static, Result<StepReport, RunnerError>>;

/// Run-time failures surfaced through the step stream.
///
/// Every variant leaves the session's checkpoint at the last committed step;
/// re-running the session resumes from there.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    #[error("checkpoint cursor names node `{node}`, which is not in the graph")]
    #[diagnostic(
        code(threadflow::runner::unknown_node),
        help("The stored checkpoint was written against a different graph shape.")
    )]
    UnknownNode { node: NodeName },

    #[error("router for node `{node}` returned unmapped label `{label}`")]
    #[diagnostic(
        code(threadflow::runner::routing),
        help("Add the label to the conditional edge's target map, or fix the router.")
    )]
    Routing { node: NodeName, label: String },

    #[error("node `{node}` failed at step {step}")]
    #[diagnostic(code(threadflow::runner::node_failed))]
    NodeRun {
        node: NodeName,
        step: u64,
        #[source]
        #[diagnostic_source]
        source: NodeError,
    },

    #[error("step limit of {limit} reached before the workflow terminated")]
    #[diagnostic(
        code(threadflow::runner::step_limit),
        help("The session's checkpoint is valid; run it again to continue, or raise the limit.")
    )]
    StepLimitExceeded { limit: u32 },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Checkpointer(#[from] CheckpointerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reducer(#[from] ReducerError),
}

/// Executes runs of a compiled workflow against a checkpoint store.
///
/// Cheap to clone; clones share the checkpointer and the per-session lock
/// table, so the one-run-per-session guarantee holds across clones.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn demo(workflow: threadflow::workflow::Workflow) -> miette::Result<()> {
/// use futures_util::StreamExt;
/// use threadflow::state::RunInput;
///
/// let runner = workflow.runner();
/// let mut steps = runner.run("thread-1", RunInput::user("Hello!"));
/// while let Some(step) = steps.next().await {
///     let step = step?;
///     println!("step {} ran {}", step.step, step.node);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WorkflowRunner {
    workflow: Arc<Workflow>,
    checkpointer: Arc<dyn Checkpointer>,
    session_locks: Arc<Mutex<FxHashMap<String, Arc<Mutex<()>>>>>,
    id_generator: IdGenerator,
}

impl WorkflowRunner {
    /// Creates a runner with a store chosen by [`CheckpointerType`].
    #[must_use]
    pub fn new(workflow: Workflow, checkpointer_type: CheckpointerType) -> Self {
        let checkpointer: Arc<dyn Checkpointer> = match checkpointer_type {
            CheckpointerType::InMemory => Arc::new(InMemoryCheckpointer::new()),
        };
        Self::with_checkpointer(workflow, checkpointer)
    }

    /// Creates a runner over an externally supplied checkpoint store.
    #[must_use]
    pub fn with_checkpointer(workflow: Workflow, checkpointer: Arc<dyn Checkpointer>) -> Self {
        Self {
            workflow: Arc::new(workflow),
            checkpointer,
            session_locks: Arc::new(Mutex::new(FxHashMap::default())),
            id_generator: IdGenerator::new(),
        }
    }

    /// Runs the session with config-default options.
    pub fn run(&self, session_id: impl Into<String>, input: RunInput) -> StepStream {
        self.run_with_options(session_id, input, RunOptions::default())
    }

    /// Runs the workflow against a freshly minted session id.
    ///
    /// Returns the id alongside the stream so the caller can resume the
    /// session later.
    pub fn run_detached(&self, input: RunInput) -> (String, StepStream) {
        let session_id = self
            .workflow
            .runner_config()
            .session_id
            .clone()
            .unwrap_or_else(|| self.id_generator.generate_session_id());
        let stream = self.run(session_id.clone(), input);
        (session_id, stream)
    }

    /// Runs the session, yielding one [`StepReport`] per committed step.
    ///
    /// The stream does nothing until polled. Work happens between yields:
    /// suspending consumption suspends execution at the last yield point.
    /// Exactly one run per session id executes at a time; a second run for
    /// the same id waits for the first stream to finish or drop.
    pub fn run_with_options(
        &self,
        session_id: impl Into<String>,
        input: RunInput,
        options: RunOptions,
    ) -> StepStream {
        let workflow = self.workflow.clone();
        let checkpointer = self.checkpointer.clone();
        let session_locks = self.session_locks.clone();
        let session_id: String = session_id.into();
        let max_steps = options.max_steps.or(workflow.runner_config().max_steps);

        Box::pin(try_stream! {
            let session_lock = {
                let mut table = session_locks.lock().await;
                table.entry(session_id.clone()).or_default().clone()
            };
            // Held until the stream is exhausted or dropped: one in-flight
            // run per session id.
            let _guard = session_lock.lock_owned().await;

            let (mut state, mut cursor, mut step) = match checkpointer.load(&session_id).await? {
                Some(checkpoint) => {
                    info!(
                        session_id = %session_id,
                        step = checkpoint.step,
                        cursor = %checkpoint.next_node,
                        "resuming session from checkpoint"
                    );
                    (checkpoint.state, checkpoint.next_node, checkpoint.step)
                }
                None => {
                    debug!(session_id = %session_id, "starting fresh session");
                    (SessionState::new(), workflow.entry().clone(), 0)
                }
            };

            // Run input goes through the same reducers as node output.
            let input_update = input.into_partial();
            if !input_update.is_empty() {
                workflow.apply_update(&mut state, &input_update)?;
            }

            let mut emitted: u32 = 0;
            loop {
                if let Some(limit) = max_steps
                    && emitted >= limit
                {
                    warn!(session_id = %session_id, limit, "step limit reached");
                    Err(RunnerError::StepLimitExceeded { limit })?;
                }

                step += 1;
                let node = workflow
                    .node(&cursor)
                    .cloned()
                    .ok_or_else(|| RunnerError::UnknownNode { node: cursor.clone() })?;

                debug!(session_id = %session_id, node = %cursor, step, "invoking node");
                let ctx = NodeContext {
                    node: cursor.clone(),
                    step,
                    session_id: session_id.clone(),
                };
                let partial = node
                    .run(state.snapshot(), ctx)
                    .await
                    .map_err(|source| RunnerError::NodeRun {
                        node: cursor.clone(),
                        step,
                        source,
                    })?;

                workflow.apply_update(&mut state, &partial)?;

                let next = resolve_transition(&workflow, &cursor, state.snapshot())?;

                // Terminal runs park the cursor at the entry so the next run
                // of this session re-enters at the top with the full log.
                let next_cursor = match &next {
                    Transition::Continue(target) => target.clone(),
                    Transition::Terminate => workflow.entry().clone(),
                };
                checkpointer
                    .save(Checkpoint::new(
                        session_id.clone(),
                        step,
                        state.clone(),
                        next_cursor.clone(),
                    ))
                    .await?;

                let report = StepReport {
                    step,
                    node: cursor.clone(),
                    state: state.snapshot(),
                    next: next.clone(),
                };
                yield report;
                emitted += 1;

                match next {
                    Transition::Terminate => {
                        info!(session_id = %session_id, step, "run reached terminal transition");
                        break;
                    }
                    Transition::Continue(_) => {
                        cursor = next_cursor;
                    }
                }
            }
        })
    }

    /// Drives a run to completion and collects every step report.
    ///
    /// Convenience for callers that do not need streaming consumption.
    pub async fn collect_steps(
        &self,
        session_id: impl Into<String>,
        input: RunInput,
    ) -> Result<Vec<StepReport>, RunnerError> {
        let mut stream = self.run(session_id, input);
        let mut reports = Vec::new();
        while let Some(step) = stream.next().await {
            reports.push(step?);
        }
        Ok(reports)
    }

    /// Read-only inspector over this runner's checkpoint store.
    #[must_use]
    pub fn inspector(&self) -> SessionInspector {
        SessionInspector::new(self.checkpointer.clone())
    }

    /// Last committed state of a session, without executing anything.
    pub async fn peek(
        &self,
        session_id: &str,
    ) -> Result<Option<StateSnapshot>, CheckpointerError> {
        self.inspector().peek(session_id).await
    }
}

/// Evaluates a node's outgoing edge against the merged post-step snapshot.
fn resolve_transition(
    workflow: &Workflow,
    from: &NodeName,
    snapshot: StateSnapshot,
) -> Result<Transition, RunnerError> {
    // Compile-time validation guarantees every node has an edge; a miss here
    // means the checkpoint cursor predates the current graph shape.
    let edge = workflow
        .edge(from)
        .ok_or_else(|| RunnerError::UnknownNode { node: from.clone() })?;
    match edge {
        Edge::Direct(transition) => Ok(transition.clone()),
        Edge::Conditional(conditional) => {
            let label = conditional.route(snapshot);
            debug!(node = %from, label = %label, "conditional edge evaluated");
            conditional
                .resolve(&label)
                .cloned()
                .ok_or_else(|| RunnerError::Routing {
                    node: from.clone(),
                    label,
                })
        }
    }
}
