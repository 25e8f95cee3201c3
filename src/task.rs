//! A decode run as a cancellable unit of work.
//!
//! The run writes its result exactly once, when it finishes. Until then every
//! read through a [`TaskHandle`] comes back empty, and a cancelled run never
//! writes at all.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use log::{error, info, warn};

use crate::classify::{PolicyTables, TagClassifier};
use crate::data::overpass::OverpassResponse;
use crate::data::Registry;
use crate::decode::{DecodeStats, Decoder, Pass};
use crate::errors::Error;

/// Cooperative cancellation flag shared between a run and whoever may stop it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
    pub registry: Registry,
    pub stats: DecodeStats,
    /// Server notice carried by the response, if any.
    pub remark: Option<String>,
}

pub type RunResult = std::result::Result<DecodeOutcome, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Finished,
    Failed,
    Cancelled,
}

#[derive(Debug, Default)]
struct TaskState {
    finished: OnceLock<RunResult>,
}

/// Read side of a decode run. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    token: CancellationToken,
    state: Arc<TaskState>,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the run has written its result, success or run-level failure.
    pub fn is_finished(&self) -> bool {
        self.state.finished.get().is_some()
    }

    pub fn result(&self) -> Option<&RunResult> {
        self.state.finished.get()
    }

    pub fn outcome(&self) -> Option<&DecodeOutcome> {
        self.result().and_then(|result| result.as_ref().ok())
    }

    pub fn registry(&self) -> Option<&Registry> {
        self.outcome().map(|outcome| &outcome.registry)
    }

    pub fn error(&self) -> Option<&Error> {
        self.result().and_then(|result| result.as_ref().err())
    }

    /// Writes the run's result unless the run was cancelled first. A cancel that
    /// arrives after this point counts as arriving after the run finished.
    fn publish(&self, result: RunResult) -> TaskStatus {
        if self.is_cancelled() {
            info!("Decode cancelled before its result was published");
            return TaskStatus::Cancelled;
        }
        let status = match result {
            Ok(_) => TaskStatus::Finished,
            Err(_) => TaskStatus::Failed,
        };
        let _ = self.state.finished.set(result);
        status
    }

    /// Takes the result out, cloning it if other handles are still around.
    pub fn into_result(self) -> Option<RunResult> {
        match Arc::try_unwrap(self.state) {
            Ok(state) => state.finished.into_inner(),
            Err(shared) => shared.finished.get().cloned(),
        }
    }
}

/// One decode run over one response body. Consumed by running it, so a run can
/// never be resumed or repeated.
pub struct DecodeTask<C = PolicyTables> {
    decoder: Arc<Decoder<C>>,
    input: Vec<u8>,
    handle: TaskHandle,
}

impl<C: TagClassifier> DecodeTask<C> {
    pub fn new(decoder: Arc<Decoder<C>>, input: Vec<u8>) -> Self {
        DecodeTask {
            decoder,
            input,
            handle: TaskHandle {
                token: CancellationToken::new(),
                state: Arc::new(TaskState::default()),
            },
        }
    }

    pub fn handle(&self) -> TaskHandle {
        self.handle.clone()
    }

    pub fn run(self) -> TaskStatus {
        self.run_observed(|_| ())
    }

    /// Runs the task, calling `on_pass` as each decode pass starts.
    pub fn run_observed(self, mut on_pass: impl FnMut(Pass)) -> TaskStatus {
        let DecodeTask { decoder, input, handle } = self;
        if handle.is_cancelled() {
            info!("Decode cancelled before start");
            return TaskStatus::Cancelled;
        }

        let response: OverpassResponse = match serde_json::from_slice(&input) {
            Ok(response) => response,
            Err(err) => {
                let err = Error::from(err);
                error!(err = err.message.as_str(); "Overpass response could not be parsed");
                return handle.publish(Err(err));
            }
        };
        if let Some(remark) = &response.remark {
            warn!(remark = remark.as_str(); "Overpass returned a partial result");
        }
        info!(elements = response.elements.len(); "Decoding Overpass response");

        match decoder.decode(&response, &handle.token, &mut on_pass) {
            Some((registry, stats)) => {
                info!(
                    nodes = stats.nodes,
                    ways = stats.ways,
                    relations = stats.relations,
                    failed = stats.failed;
                    "Decode finished"
                );
                let outcome = DecodeOutcome {
                    registry,
                    stats,
                    remark: response.remark,
                };
                handle.publish(Ok(outcome))
            }
            None => TaskStatus::Cancelled,
        }
    }
}
