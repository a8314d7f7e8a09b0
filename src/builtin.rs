use std::time::Duration;

use crate::config::DEFAULT_TASK;
use crate::message::{Level, Message};
use crate::registry::Registry;
use crate::task::{Emitter, Rejection, TaskResult};

const COUNTDOWN_DEFAULT: u32 = 3;
const COUNTDOWN_MAX: u32 = 10;
const COUNTDOWN_TICK: Duration = Duration::from_millis(250);

/// Tasks the binary ships with. Config entries may replace any of them.
pub(crate) fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    registry.add_task(DEFAULT_TASK, "print the welcome banner", welcome);
    registry.add_task("echo", "echo <text> -- repeat text back", echo);
    registry.add_task(
        "countdown",
        "countdown [n] -- count down from n (max 10)",
        countdown,
    );
    registry.add_task("fail", "fail [reason] -- a task that always fails", fail);
    registry
}

/// Everything after the first token.
fn argument(input: Option<&str>) -> Option<&str> {
    let line = input?.trim();
    let (_, rest) = line.split_once(char::is_whitespace)?;
    let rest = rest.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

fn welcome(emit: &Emitter, _input: Option<&str>) -> TaskResult {
    let tries = ["echo hello", "countdown 5", "fail out of coffee"]
        .into_iter()
        .map(|line| Message::text(line).with_level(Level::Info))
        .collect();
    emit.emit(Message::list(
        format!(
            "termpane {} -- a terminal in a pane. Things to try:",
            env!("CARGO_PKG_VERSION")
        ),
        tries,
    ));
    Ok(Message::text("ready")
        .with_level(Level::Success)
        .with_label("Ready"))
}

fn echo(_emit: &Emitter, input: Option<&str>) -> TaskResult {
    Ok(Message::text(argument(input).unwrap_or_default()))
}

fn countdown(emit: &Emitter, input: Option<&str>) -> TaskResult {
    let from = match argument(input) {
        None => COUNTDOWN_DEFAULT,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) => n.min(COUNTDOWN_MAX),
            Err(_) => {
                return Err(Rejection::from(
                    Message::text(format!("not a number: {raw}"))
                        .with_level(Level::Warning)
                        .with_label("Usage"),
                ))
            }
        },
    };
    for n in (1..=from).rev() {
        emit.emit(Message::text(n.to_string()).with_level(Level::Info));
        std::thread::sleep(COUNTDOWN_TICK);
    }
    Ok(Message::text("liftoff")
        .with_level(Level::Success)
        .with_label("Done"))
}

fn fail(_emit: &Emitter, input: Option<&str>) -> TaskResult {
    match argument(input) {
        Some(reason) => Err(Rejection::from(
            Message::text(reason)
                .with_level(Level::Error)
                .with_label("Error"),
        )),
        None => Err(Rejection::empty()),
    }
}
