use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::message::Message;
use crate::registry::{CommandEntry, Registry};
use crate::task::{Emitter, Rejection, Task, TaskResult};

pub(crate) const DEFAULT_TITLE: &str = "termpane";
pub(crate) const DEFAULT_TASK: &str = "defaultTask";
const CONFIG_ENV: &str = "TERMPANE_CONFIG";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("reading config file at `{}`: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing config file at `{}`: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// What happens to Enter while a task is still running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum BusyPolicy {
    #[default]
    Reject,
    Queue,
}

/// Everything a widget needs at construction.
#[derive(Clone)]
pub(crate) struct WidgetConfig {
    pub(crate) title: String,
    pub(crate) default_task: String,
    pub(crate) registry: Registry,
    pub(crate) busy_policy: BusyPolicy,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            default_task: DEFAULT_TASK.to_string(),
            registry: Registry::new(),
            busy_policy: BusyPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ScriptStep {
    #[serde(default)]
    pub(crate) delay_ms: u64,
    pub(crate) message: Message,
}

/// A task defined in the config file: timed lines, then a fixed outcome.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ScriptedTask {
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) steps: Vec<ScriptStep>,
    #[serde(default)]
    pub(crate) result: Option<Message>,
    #[serde(default)]
    pub(crate) fail: bool,
}

impl Task for ScriptedTask {
    fn run(&self, emit: &Emitter, _input: Option<&str>) -> TaskResult {
        for step in &self.steps {
            if step.delay_ms > 0 {
                std::thread::sleep(Duration::from_millis(step.delay_ms));
            }
            emit.emit(step.message.clone());
        }
        match (&self.result, self.fail) {
            (Some(result), false) => Ok(result.clone()),
            (None, false) => Ok(Message::text("")),
            (Some(result), true) => Err(Rejection::from(result.clone())),
            (None, true) => Err(Rejection::empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ConfigFile {
    pub(crate) title: Option<String>,
    pub(crate) default_task: Option<String>,
    pub(crate) busy_policy: BusyPolicy,
    pub(crate) commands: BTreeMap<String, CommandEntry>,
    pub(crate) tasks: BTreeMap<String, ScriptedTask>,
}

impl ConfigFile {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: ConfigFile =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            path = %path.display(),
            commands = parsed.commands.len(),
            tasks = parsed.tasks.len(),
            "config loaded"
        );
        Ok(parsed)
    }

    /// Merge onto `base`; file entries replace same-named ones already there.
    pub(crate) fn into_widget_config(self, mut base: Registry) -> WidgetConfig {
        for (name, entry) in self.commands {
            base.add_command(name, entry);
        }
        for (name, task) in self.tasks {
            let description = task.description.clone();
            base.add_task(name, description, task);
        }
        WidgetConfig {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            default_task: self
                .default_task
                .unwrap_or_else(|| DEFAULT_TASK.to_string()),
            registry: base,
            busy_policy: self.busy_policy,
        }
    }
}

/// `--config` wins over the environment.
pub(crate) fn resolve_config_path(cli: Option<PathBuf>) -> Option<PathBuf> {
    let path = cli.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    if let Some(path) = &path {
        debug!(path = %path.display(), "config path");
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Level;
    use crate::task::TaskEvent;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(body.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn loads_commands_tasks_and_policy() {
        let file = write_config(
            r#"{
                "title": "demo",
                "busy_policy": "queue",
                "commands": {
                    "about": {"description": "what is this", "messages": [{"message": "a pane"}]}
                },
                "tasks": {
                    "deploy": {
                        "description": "pretend deploy",
                        "steps": [{"message": {"message": "step"}}],
                        "result": {"type": "success", "message": "deployed"}
                    }
                }
            }"#,
        );
        let config = ConfigFile::load(file.path())
            .expect("load config")
            .into_widget_config(Registry::new());

        assert_eq!(config.title, "demo");
        assert_eq!(config.default_task, DEFAULT_TASK);
        assert_eq!(config.busy_policy, BusyPolicy::Queue);
        assert_eq!(config.registry.describe("about"), Some("what is this"));
        assert_eq!(config.registry.describe("deploy"), Some("pretend deploy"));
    }

    #[test]
    fn empty_object_uses_defaults() {
        let file = write_config("{}");
        let config = ConfigFile::load(file.path())
            .expect("load config")
            .into_widget_config(Registry::new());

        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.busy_policy, BusyPolicy::Reject);
        assert_eq!(config.registry.len(), 0);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_config("{ not json");
        let err = ConfigFile::load(file.path()).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("parsing config file at"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ConfigFile::load(&dir.path().join("absent.json")).expect_err("should fail");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn file_tasks_replace_same_named_base_entries() {
        let mut base = Registry::new();
        base.add_task("deploy", "built in", |_: &Emitter, _: Option<&str>| {
            Ok(Message::text("builtin"))
        });
        let file = ConfigFile {
            tasks: BTreeMap::from([(
                "deploy".to_string(),
                ScriptedTask {
                    description: "from file".to_string(),
                    steps: Vec::new(),
                    result: None,
                    fail: false,
                },
            )]),
            ..ConfigFile::default()
        };
        let config = file.into_widget_config(base);
        assert_eq!(config.registry.describe("deploy"), Some("from file"));
        assert_eq!(config.registry.len(), 1);
    }

    #[test]
    fn scripted_task_emits_steps_then_rejects() {
        let task = ScriptedTask {
            description: "flaky".to_string(),
            steps: vec![
                ScriptStep {
                    delay_ms: 0,
                    message: Message::text("one"),
                },
                ScriptStep {
                    delay_ms: 0,
                    message: Message::text("two"),
                },
            ],
            result: Some(Message::text("broke").with_level(Level::Error)),
            fail: true,
        };
        let (emitter, rx) = Emitter::channel();
        let result = task.run(&emitter, None);

        let emitted: Vec<String> = rx
            .try_iter()
            .filter_map(|ev| match ev {
                TaskEvent::Emit(m) => Some(m.text_content().to_string()),
                TaskEvent::Finished(_) => None,
            })
            .collect();
        assert_eq!(emitted, vec!["one", "two"]);
        assert_eq!(
            result.expect_err("rejects").into_message().text_content(),
            "broke"
        );
    }

    #[test]
    fn scripted_failure_without_result_uses_default_error() {
        let task = ScriptedTask {
            description: "bare".to_string(),
            steps: Vec::new(),
            result: None,
            fail: true,
        };
        let (emitter, _rx) = Emitter::channel();
        let err = task.run(&emitter, None).expect_err("rejects");
        assert_eq!(err.into_message(), Message::default_error());
    }
}
