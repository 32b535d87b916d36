//! Cooperative script execution.
//!
//! A [`ScriptRunner`] is polled once per frame. It executes every step that is
//! due and suspends only at pause boundaries, so tweens keep advancing while a
//! script waits. Pauses are laid out on the script's own timeline: a frame that
//! arrives late does not push later steps back.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::script::{FaceRef, Script, ScriptStep};
use crate::error::FocusError;

/// What a running script drives. Implemented by the focus engine.
pub trait ScriptTarget {
    /// Select a face the way a live tap would, optionally at a given distance.
    fn select_scripted(&mut self, face: &FaceRef, distance: Option<f32>) -> Result<(), FocusError>;

    /// Move the cursor overlay onto a face.
    fn point_at(&mut self, face: &FaceRef) -> Result<(), FocusError>;
}

#[derive(Debug, Default)]
struct HandleState {
    cancelled: Cell<bool>,
    finished: Cell<bool>,
}

/// Shared view of a running script, handed out by `run_script`.
#[derive(Debug, Clone, Default)]
pub struct ScriptHandle {
    state: Rc<HandleState>,
}

impl ScriptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the script to stop before its next step.
    pub fn cancel(&self) {
        self.state.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// True once the owner has finished cleaning up after the script.
    pub fn is_finished(&self) -> bool {
        self.state.finished.get()
    }

    pub(crate) fn mark_finished(&self) {
        self.state.finished.set(true);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerStatus {
    Running,
    Finished,
    Cancelled,
}

pub struct ScriptRunner {
    steps: Vec<ScriptStep>,
    cursor: usize,
    /// Script-local clock; starts at the first poll.
    timeline: Option<Duration>,
    resume_at: Option<Duration>,
    handle: ScriptHandle,
    skipped: usize,
}

impl ScriptRunner {
    pub fn new(script: Script, handle: ScriptHandle) -> Self {
        Self {
            steps: script.steps,
            cursor: 0,
            timeline: None,
            resume_at: None,
            handle,
            skipped: 0,
        }
    }

    pub fn handle(&self) -> &ScriptHandle {
        &self.handle
    }

    /// Steps that failed and were skipped.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Index of the next step to run.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Run every step due at `now`.
    pub fn poll<T: ScriptTarget + ?Sized>(
        &mut self,
        now: Duration,
        target: &mut T,
    ) -> RunnerStatus {
        let mut timeline = *self.timeline.get_or_insert(now);
        loop {
            if self.handle.is_cancelled() {
                log::info!("Script cancelled before step {}", self.cursor);
                return RunnerStatus::Cancelled;
            }

            if let Some(resume_at) = self.resume_at {
                if now < resume_at {
                    self.timeline = Some(timeline);
                    return RunnerStatus::Running;
                }
                timeline = resume_at;
                self.resume_at = None;
            }

            let Some(step) = self.steps.get(self.cursor) else {
                log::info!("Script finished, {} step(s) skipped", self.skipped);
                return RunnerStatus::Finished;
            };
            self.cursor += 1;

            let result = match step {
                ScriptStep::Pause(duration) => {
                    self.resume_at = Some(timeline + *duration);
                    Ok(())
                }
                ScriptStep::Select { face, distance } => target.select_scripted(face, *distance),
                ScriptStep::Pointer(face) => target.point_at(face),
            };
            if let Err(error) = result {
                self.skipped += 1;
                log::warn!("Skipping script step {}: {}", self.cursor - 1, error);
            }
        }
    }
}
