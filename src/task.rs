use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, error, warn};

use crate::message::Message;

pub(crate) type TaskResult = Result<Message, Rejection>;

/// A failed task. An empty rejection is rendered as the default error line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rejection {
    payload: Option<Message>,
}

impl Rejection {
    pub(crate) fn empty() -> Self {
        Self { payload: None }
    }

    pub(crate) fn into_message(self) -> Message {
        self.payload.unwrap_or_else(Message::default_error)
    }
}

impl From<Message> for Rejection {
    fn from(payload: Message) -> Self {
        Self {
            payload: Some(payload),
        }
    }
}

#[derive(Debug)]
pub(crate) enum TaskEvent {
    Emit(Message),
    Finished(TaskResult),
}

/// Handle a running task uses to push intermediate lines into the log.
#[derive(Clone)]
pub(crate) struct Emitter {
    tx: Sender<TaskEvent>,
}

impl Emitter {
    pub(crate) fn emit(&self, message: Message) {
        // The widget may already be gone; nothing left to show the line to.
        let _ = self.tx.send(TaskEvent::Emit(message));
    }

    #[cfg(test)]
    pub(crate) fn channel() -> (Self, Receiver<TaskEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

/// Host-supplied asynchronous handler. Runs on a worker thread.
pub(crate) trait Task: Send + Sync {
    fn run(&self, emit: &Emitter, input: Option<&str>) -> TaskResult;
}

impl<F> Task for F
where
    F: Fn(&Emitter, Option<&str>) -> TaskResult + Send + Sync,
{
    fn run(&self, emit: &Emitter, input: Option<&str>) -> TaskResult {
        self(emit, input)
    }
}

/// Worker threads are named `task:<name>` so the panic hook can tell them
/// apart from the UI thread.
pub(crate) const TASK_THREAD_PREFIX: &str = "task:";

pub(crate) fn is_task_thread(thread_name: Option<&str>) -> bool {
    thread_name.is_some_and(|name| name.starts_with(TASK_THREAD_PREFIX))
}

/// Start `task` on its own thread and hand back the event stream.
///
/// A handler that panics is reported as an empty rejection. If the thread
/// cannot be started the sender is dropped, which the poller also treats as
/// an empty rejection.
pub(crate) fn spawn(name: &str, task: Arc<dyn Task>, input: Option<String>) -> Receiver<TaskEvent> {
    let (tx, rx) = unbounded::<TaskEvent>();
    let task_name = name.to_string();
    let spawned = std::thread::Builder::new()
        .name(format!("{TASK_THREAD_PREFIX}{name}"))
        .spawn(move || {
            let emitter = Emitter { tx: tx.clone() };
            debug!(task = %task_name, "task thread started");
            let result = catch_unwind(AssertUnwindSafe(|| task.run(&emitter, input.as_deref())))
                .unwrap_or_else(|_| {
                    warn!(task = %task_name, "task handler panicked");
                    Err(Rejection::empty())
                });
            let _ = tx.send(TaskEvent::Finished(result));
        });
    if let Err(err) = spawned {
        error!(task = name, error = %err, "could not start task thread");
    }
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn collect(rx: Receiver<TaskEvent>) -> Vec<TaskEvent> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.recv_timeout(Duration::from_secs(2)) {
            let done = matches!(ev, TaskEvent::Finished(_));
            events.push(ev);
            if done {
                break;
            }
        }
        events
    }

    #[test]
    fn spawned_task_streams_emits_then_result() {
        let task: Arc<dyn Task> = Arc::new(|emit: &Emitter, input: Option<&str>| {
            emit.emit(Message::text("working"));
            Ok(Message::text(input.unwrap_or("none").to_string()))
        });
        let events = collect(spawn("worker", task, Some("worker arg".to_string())));

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], TaskEvent::Emit(m) if m.text_content() == "working"));
        assert!(
            matches!(&events[1], TaskEvent::Finished(Ok(m)) if m.text_content() == "worker arg")
        );
    }

    #[test]
    fn panicking_task_is_an_empty_rejection() {
        let task: Arc<dyn Task> =
            Arc::new(|_: &Emitter, _: Option<&str>| -> TaskResult { panic!("boom") });
        let events = collect(spawn("boom", task, None));

        match events.last() {
            Some(TaskEvent::Finished(Err(rejection))) => {
                assert_eq!(rejection.clone().into_message(), Message::default_error());
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn workers_run_on_named_task_threads() {
        let task: Arc<dyn Task> = Arc::new(|_: &Emitter, _: Option<&str>| -> TaskResult {
            let name = std::thread::current().name().unwrap_or_default().to_string();
            Ok(Message::text(name))
        });
        let events = collect(spawn("countdown", task, None));

        match events.last() {
            Some(TaskEvent::Finished(Ok(m))) => {
                assert_eq!(m.text_content(), "task:countdown");
                assert!(is_task_thread(Some(m.text_content())));
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn only_task_threads_are_recognised() {
        assert!(is_task_thread(Some("task:echo")));
        assert!(!is_task_thread(Some("main")));
        assert!(!is_task_thread(None));
    }

    #[test]
    fn rejection_keeps_its_payload() {
        let payload = Message::text("nope");
        assert_eq!(Rejection::from(payload.clone()).into_message(), payload);
    }
}
