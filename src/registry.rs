use std::sync::Arc;

use serde::Deserialize;

use crate::message::Message;
use crate::task::Task;

/// Static entry: a fixed list of lines printed when the full input matches.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct CommandEntry {
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) messages: Vec<Message>,
}

#[derive(Clone)]
pub(crate) struct TaskEntry {
    pub(crate) description: String,
    pub(crate) task: Arc<dyn Task>,
}

pub(crate) enum Entry<'a> {
    Command(&'a CommandEntry),
    Task(&'a TaskEntry),
}

impl<'a> Entry<'a> {
    pub(crate) fn description(&self) -> &'a str {
        match *self {
            Entry::Command(entry) => &entry.description,
            Entry::Task(entry) => &entry.description,
        }
    }
}

/// What a submitted line resolves to.
pub(crate) enum Dispatch {
    Help(Option<String>),
    Command(Vec<Message>),
    Task { name: String, task: Arc<dyn Task> },
    Unknown,
}

/// Commands and tasks, each kept in registration order.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    commands: Vec<(String, CommandEntry)>,
    tasks: Vec<(String, TaskEntry)>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a command, replacing any earlier one with the same name.
    pub(crate) fn add_command(&mut self, name: impl Into<String>, entry: CommandEntry) {
        let name = name.into();
        match self.commands.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = entry,
            None => self.commands.push((name, entry)),
        }
    }

    pub(crate) fn add_task(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        task: impl Task + 'static,
    ) {
        self.add_task_entry(
            name,
            TaskEntry {
                description: description.into(),
                task: Arc::new(task),
            },
        );
    }

    pub(crate) fn add_task_entry(&mut self, name: impl Into<String>, entry: TaskEntry) {
        let name = name.into();
        match self.tasks.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = entry,
            None => self.tasks.push((name, entry)),
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.commands
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entry)| entry)
    }

    pub(crate) fn task(&self, name: &str) -> Option<&TaskEntry> {
        self.tasks
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entry)| entry)
    }

    /// Commands shadow tasks of the same name.
    pub(crate) fn lookup(&self, name: &str) -> Option<Entry<'_>> {
        self.command(name)
            .map(Entry::Command)
            .or_else(|| self.task(name).map(Entry::Task))
    }

    pub(crate) fn describe(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|entry| entry.description())
    }

    /// Every entry as `(name, description)`: commands first, then tasks.
    pub(crate) fn listing(&self) -> Vec<(&str, &str)> {
        self.commands
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description.as_str()))
            .chain(
                self.tasks
                    .iter()
                    .map(|(name, entry)| (name.as_str(), entry.description.as_str())),
            )
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.commands.len() + self.tasks.len()
    }

    /// Resolve a raw input line.
    ///
    /// `help` wins over everything, then an exact match of the whole line
    /// against a command key, then the first token against a task key.
    /// Tokens are split on single whitespace characters, so leading blanks
    /// make the first token empty.
    pub(crate) fn resolve(&self, line: &str) -> Dispatch {
        let mut tokens = line.split(char::is_whitespace);
        let head = tokens.next().unwrap_or_default();

        if head == "help" {
            let topic = tokens.next().filter(|t| !t.is_empty());
            return Dispatch::Help(topic.map(str::to_string));
        }
        if let Some(entry) = self.command(line) {
            return Dispatch::Command(entry.messages.clone());
        }
        if let Some(entry) = self.task(head) {
            return Dispatch::Task {
                name: head.to_string(),
                task: Arc::clone(&entry.task),
            };
        }
        Dispatch::Unknown
    }
}
