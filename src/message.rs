use chrono::Local;
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_ERROR_TEXT: &str = "Something went wrong!";

/// Severity of a log line. Controls the label colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Level {
    #[serde(alias = "Info")]
    Info,
    #[serde(alias = "Warning")]
    Warning,
    #[serde(alias = "Success")]
    Success,
    #[serde(alias = "Error")]
    Error,
    #[serde(alias = "System")]
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum MessageBody {
    Text(String),
    List { text: String, list: Vec<Message> },
}

impl MessageBody {
    pub(crate) fn text(&self) -> &str {
        match self {
            MessageBody::Text(text) => text,
            MessageBody::List { text, .. } => text,
        }
    }
}

/// One line of the log pane.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Message {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) label: Option<String>,
    #[serde(
        default,
        rename = "type",
        alias = "level",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) level: Option<Level>,
    #[serde(rename = "message")]
    pub(crate) body: MessageBody,
}

impl Message {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self {
            time: String::new(),
            label: None,
            level: None,
            body: MessageBody::Text(text.into()),
        }
    }

    pub(crate) fn list(text: impl Into<String>, list: Vec<Message>) -> Self {
        Self {
            time: String::new(),
            label: None,
            level: None,
            body: MessageBody::List {
                text: text.into(),
                list,
            },
        }
    }

    pub(crate) fn system(text: impl Into<String>) -> Self {
        Self::text(text).with_level(Level::System)
    }

    /// Payload used when a task rejects without one.
    pub(crate) fn default_error() -> Self {
        Self::text(DEFAULT_ERROR_TEXT)
            .with_level(Level::Error)
            .with_label("Error")
    }

    pub(crate) fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub(crate) fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Fill in the wall-clock time if the producer left it blank.
    pub(crate) fn stamped(mut self) -> Self {
        if self.time.is_empty() {
            self.time = Local::now().format("%H:%M:%S").to_string();
        }
        self
    }

    pub(crate) fn text_content(&self) -> &str {
        self.body.text()
    }

    #[cfg(test)]
    pub(crate) fn same_content(&self, other: &Message) -> bool {
        self.label == other.label && self.level == other.level && self.body == other.body
    }
}
