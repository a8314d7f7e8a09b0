use tracing::{debug, warn};

use super::*;
use crate::message::Level;
use crate::registry::Dispatch;

impl Widget {
    /// Run the default task; the help hint follows once it settles.
    pub(crate) fn mount(&mut self, surface: &mut impl Surface) {
        let name = self.default_task.clone();
        match self.registry.task(&name).map(|entry| entry.task.clone()) {
            Some(task) => self.start_task(&name, task, None, true, surface),
            None => {
                warn!(task = %name, "default task is not registered");
                self.append_system(surface, HELP_HINT_MOUNT);
                surface.focus_input();
            }
        }
    }

    /// Handle Enter on the prompt. The line is matched, echoed and recorded
    /// exactly as typed.
    pub(crate) fn submit(&mut self, surface: &mut impl Surface) {
        let line = self.input.text().to_string();

        if self.is_busy() {
            match self.busy_policy {
                BusyPolicy::Reject => {
                    let already_shown = surface
                        .last_message()
                        .is_some_and(|m| m.text_content() == BUSY_NOTICE);
                    if !already_shown {
                        self.append_system(surface, BUSY_NOTICE);
                    }
                }
                BusyPolicy::Queue => {
                    self.input.record(&line);
                    self.input.clear();
                    if line.trim().is_empty() {
                        return;
                    }
                    debug!(queued = self.queued.len() + 1, "line queued behind running task");
                    self.queued.push_back(line);
                }
            }
            return;
        }

        self.input.record(&line);
        self.input.clear();
        self.execute(&line, surface);
        surface.scroll_to_bottom();
    }

    /// Echo `line`, then route it to help, a command, a task or the fallback.
    /// Blank lines stop after the echo.
    pub(super) fn execute(&mut self, line: &str, surface: &mut impl Surface) {
        self.append(surface, Message::text(self.echo_line(line)));
        if line.trim().is_empty() {
            return;
        }

        match self.registry.resolve(line) {
            Dispatch::Help(topic) => {
                debug!(topic = topic.as_deref().unwrap_or(""), "help");
                self.help(topic.as_deref(), surface);
            }
            Dispatch::Command(messages) => {
                debug!(command = line, lines = messages.len(), "command");
                for message in messages {
                    self.append(surface, message);
                }
            }
            Dispatch::Task { name, task } => {
                self.start_task(&name, task, Some(line.to_string()), false, surface);
            }
            Dispatch::Unknown => {
                debug!(line, "unknown command");
                self.append_system(surface, UNKNOWN_COMMAND);
                self.append_system(surface, HELP_HINT);
            }
        }
    }

    fn help(&self, topic: Option<&str>, surface: &mut impl Surface) {
        if let Some(name) = topic {
            match self.registry.describe(name) {
                Some(description) => self.append(surface, Message::text(description)),
                None => {
                    self.append_system(surface, UNKNOWN_COMMAND);
                    self.append_system(surface, HELP_HINT);
                }
            }
            return;
        }

        let rows: Vec<Message> = self
            .registry
            .listing()
            .into_iter()
            .map(|(name, description)| {
                Message::text(format!("---> {description}"))
                    .with_level(Level::Success)
                    .with_label(name)
            })
            .collect();
        for row in rows {
            self.append(surface, row);
        }
        self.append(surface, Message::text(HELP_USAGE));
    }
}
