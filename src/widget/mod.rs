//! Dispatch, history and task bookkeeping for one terminal pane.
//!
//! Nothing in here knows about ratatui or crossterm; every visible effect
//! goes through [`Surface`].

use std::collections::VecDeque;

use crossbeam_channel::Receiver;

use crate::config::{BusyPolicy, WidgetConfig};
use crate::message::Message;
use crate::registry::Registry;
use crate::task::TaskEvent;

mod dispatch;
mod input;
mod runner;
mod surface;

pub(crate) use input::InputState;
pub(crate) use surface::Surface;

pub(crate) const HELP_HINT_MOUNT: &str = "Type \"help\" to get a supporting command list.";
pub(crate) const HELP_HINT: &str = "type \"help\" to get a supporting command list.";
pub(crate) const HELP_USAGE: &str = "Enter help <command> to get help for a particular command.";
pub(crate) const UNKNOWN_COMMAND: &str = "Unknown Command.";
pub(crate) const BUSY_NOTICE: &str = "task is running, wait...";

struct PendingRun {
    name: String,
    rx: Receiver<TaskEvent>,
    /// Set for the mount-time default task.
    hint_on_finish: bool,
}

pub(crate) struct Widget {
    title: String,
    default_task: String,
    registry: Registry,
    busy_policy: BusyPolicy,
    input: InputState,
    pending: Option<PendingRun>,
    queued: VecDeque<String>,
}

impl Widget {
    pub(crate) fn new(config: WidgetConfig) -> Self {
        Self {
            title: config.title,
            default_task: config.default_task,
            registry: config.registry,
            busy_policy: config.busy_policy,
            input: InputState::new(),
            pending: None,
            queued: VecDeque::new(),
        }
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn input(&self) -> &InputState {
        &self.input
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn running_task(&self) -> Option<&str> {
        self.pending.as_ref().map(|run| run.name.as_str())
    }

    /// Editing is locked while a task runs unless lines are being queued.
    pub(crate) fn accepts_edits(&self) -> bool {
        !self.is_busy() || self.busy_policy == BusyPolicy::Queue
    }

    pub(crate) fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub(crate) fn edit(&mut self, f: impl FnOnce(&mut InputState)) {
        if self.accepts_edits() {
            f(&mut self.input);
        }
    }

    pub(crate) fn history_prev(&mut self) {
        self.edit(InputState::history_prev);
    }

    pub(crate) fn history_next(&mut self) {
        self.edit(InputState::history_next);
    }

    pub(crate) fn echo_line(&self, line: &str) -> String {
        format!("$ \\ {} {}", self.title, line)
    }

    fn append(&self, surface: &mut impl Surface, message: Message) {
        surface.append(message.stamped());
    }

    fn append_system(&self, surface: &mut impl Surface, text: &str) {
        self.append(surface, Message::system(text));
    }
}
