use std::sync::Arc;

use crossbeam_channel::TryRecvError;
use tracing::{info, warn};

use super::*;
use crate::task::{spawn as spawn_task, Rejection, Task, TaskResult};

impl Widget {
    pub(super) fn start_task(
        &mut self,
        name: &str,
        task: Arc<dyn Task>,
        input: Option<String>,
        hint_on_finish: bool,
        surface: &mut impl Surface,
    ) {
        info!(task = name, "task started");
        let rx = spawn_task(name, task, input);
        self.pending = Some(PendingRun {
            name: name.to_string(),
            rx,
            hint_on_finish,
        });
        surface.set_loading(true);
    }

    /// Drain whatever the running task has sent so far without blocking.
    /// Returns true if anything was applied.
    pub(crate) fn poll_task(&mut self, surface: &mut impl Surface) -> bool {
        let Some(rx) = self.pending.as_ref().map(|run| run.rx.clone()) else {
            return false;
        };
        let mut processed_any = false;
        loop {
            match rx.try_recv() {
                Ok(TaskEvent::Emit(message)) => {
                    processed_any = true;
                    self.append(surface, message);
                }
                Ok(TaskEvent::Finished(result)) => {
                    processed_any = true;
                    self.finish(result, surface);
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    processed_any = true;
                    warn!("task channel closed without a result");
                    self.finish(Err(Rejection::empty()), surface);
                    break;
                }
            }
        }
        processed_any
    }

    fn finish(&mut self, result: TaskResult, surface: &mut impl Surface) {
        let Some(run) = self.pending.take() else {
            return;
        };
        match result {
            Ok(message) => {
                info!(task = %run.name, "task resolved");
                self.append(surface, message);
            }
            Err(rejection) => {
                warn!(task = %run.name, "task rejected");
                self.append(surface, rejection.into_message());
            }
        }
        surface.set_loading(false);
        if run.hint_on_finish {
            self.append_system(surface, HELP_HINT_MOUNT);
        }
        surface.focus_input();
        self.drain_queue(surface);
    }

    /// Replay queued lines until one of them starts another task.
    fn drain_queue(&mut self, surface: &mut impl Surface) {
        let mut drained = false;
        while !self.is_busy() {
            let Some(line) = self.queued.pop_front() else {
                break;
            };
            drained = true;
            self.execute(&line, surface);
        }
        if drained {
            surface.scroll_to_bottom();
        }
    }

    #[cfg(test)]
    pub(crate) fn attach_test_run(
        &mut self,
        name: &str,
        rx: Receiver<TaskEvent>,
        surface: &mut impl Surface,
    ) {
        self.pending = Some(PendingRun {
            name: name.to_string(),
            rx,
            hint_on_finish: false,
        });
        surface.set_loading(true);
    }
}
